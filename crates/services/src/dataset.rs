use std::path::Path;

use serde::Deserialize;

use review_core::model::{QuestionIndex, QuestionItem};

use crate::error::DatasetError;

/// One row of the static input table.
///
/// The field names match the input columns exactly: `question`, `response_1`,
/// `response_2`. No text-quality validation is applied; malformed text passes
/// through as-is.
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetRow {
    pub question: String,
    pub response_1: String,
    pub response_2: String,
}

/// The ordered, immutable question set for one review session.
///
/// Indexes are assigned by row order starting at 1 and never change for the
/// lifetime of the session.
#[derive(Debug, Clone)]
pub struct Dataset {
    items: Vec<QuestionItem>,
}

impl Dataset {
    /// Build a dataset from already-deserialized rows.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Empty` when there are zero rows.
    pub fn from_rows(rows: Vec<DatasetRow>) -> Result<Self, DatasetError> {
        if rows.is_empty() {
            return Err(DatasetError::Empty);
        }
        let items = rows
            .into_iter()
            .enumerate()
            .map(|(offset, row)| {
                QuestionItem::new(
                    QuestionIndex::new(offset + 1),
                    row.question,
                    row.response_1,
                    row.response_2,
                )
            })
            .collect();
        Ok(Self { items })
    }

    /// Parse a dataset from a JSON array of row objects.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Parse` for malformed JSON and
    /// `DatasetError::Empty` for an empty array.
    pub fn from_json_str(json: &str) -> Result<Self, DatasetError> {
        let rows: Vec<DatasetRow> = serde_json::from_str(json)?;
        Self::from_rows(rows)
    }

    /// Load a dataset from a JSON file on disk.
    ///
    /// # Errors
    ///
    /// Returns `DatasetError::Io` if the file cannot be read, plus the
    /// `from_json_str` failure modes.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    #[must_use]
    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    #[must_use]
    pub fn into_items(self) -> Vec<QuestionItem> {
        self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
