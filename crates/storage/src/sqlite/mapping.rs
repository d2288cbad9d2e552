use review_core::model::Choice;
use sqlx::Row;

use crate::repository::{PersistedChoice, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn choice_from_label(label: &str) -> Result<Choice, StorageError> {
    Choice::from_label(label).map_err(ser)
}

pub(crate) fn map_choice_row(row: &sqlx::sqlite::SqliteRow) -> Result<PersistedChoice, StorageError> {
    let question: String = row.try_get("question").map_err(ser)?;
    let label: String = row.try_get("selected_response").map_err(ser)?;
    let recorded_at: chrono::DateTime<chrono::Utc> = row.try_get("recorded_at").map_err(ser)?;

    Ok(PersistedChoice {
        question,
        choice: choice_from_label(&label)?,
        recorded_at,
    })
}
