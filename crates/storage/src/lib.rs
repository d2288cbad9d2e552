#![forbid(unsafe_code)]

pub mod repository;
pub mod sqlite;

pub use repository::{
    ChoiceRepository, InMemoryChoiceRepository, PersistedChoice, Storage, StorageError,
};
pub use sqlite::{SqliteInitError, SqliteRepository};
