//! Shared error types for the services crate.

use thiserror::Error;

use review_core::session::SessionError;
use storage::sqlite::SqliteInitError;

/// Errors emitted while loading the question dataset.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DatasetError {
    /// Zero rows: the session has no valid initial position, so this is
    /// fatal to session start.
    #[error("dataset contains no rows")]
    Empty,
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors emitted by `ReviewFlowService`.
///
/// Note that a failed choice upsert is deliberately *not* here: persistence
/// failures during `select` are surfaced through `PersistStatus::Failed`,
/// and a failed hydration read degrades to a fresh session, so the reviewer
/// can keep working either way.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ReviewError {
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping the app.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Dataset(#[from] DatasetError),
}
