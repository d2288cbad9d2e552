#![forbid(unsafe_code)]

pub mod app_services;
pub mod dataset;
pub mod error;
pub mod review;

pub use review_core::Clock;

pub use app_services::AppServices;
pub use dataset::{Dataset, DatasetRow};
pub use error::{AppServicesError, DatasetError, ReviewError};
pub use review::{PersistStatus, ReviewFlowService, ReviewScreen, SelectOutcome};
