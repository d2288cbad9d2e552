use async_trait::async_trait;
use chrono::{DateTime, Utc};
use review_core::model::Choice;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted shape for one recorded choice.
///
/// Rows are keyed by the literal `question` text with replace-on-conflict
/// semantics: the store holds exactly one row per distinct question at any
/// time, so re-selecting overwrites rather than duplicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedChoice {
    pub question: String,
    pub choice: Choice,
    pub recorded_at: DateTime<Utc>,
}

impl PersistedChoice {
    #[must_use]
    pub fn new(question: impl Into<String>, choice: Choice, recorded_at: DateTime<Utc>) -> Self {
        Self {
            question: question.into(),
            choice,
            recorded_at,
        }
    }
}

/// Repository contract for recorded choices.
#[async_trait]
pub trait ChoiceRepository: Send + Sync {
    /// Replace any existing row for the exact question text, insert otherwise.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the choice cannot be stored.
    async fn upsert_choice(&self, choice: &PersistedChoice) -> Result<(), StorageError>;

    /// Fetch all stored choices, used to rehydrate a session after restart.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the rows cannot be read.
    async fn list_choices(&self) -> Result<Vec<PersistedChoice>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryChoiceRepository {
    choices: Arc<Mutex<HashMap<String, (Choice, DateTime<Utc>)>>>,
}

impl InMemoryChoiceRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            choices: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of distinct stored questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.choices.lock().map_or(0, |guard| guard.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ChoiceRepository for InMemoryChoiceRepository {
    async fn upsert_choice(&self, choice: &PersistedChoice) -> Result<(), StorageError> {
        let mut guard = self
            .choices
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(
            choice.question.clone(),
            (choice.choice, choice.recorded_at),
        );
        Ok(())
    }

    async fn list_choices(&self) -> Result<Vec<PersistedChoice>, StorageError> {
        let guard = self
            .choices
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut rows: Vec<PersistedChoice> = guard
            .iter()
            .map(|(question, (choice, recorded_at))| {
                PersistedChoice::new(question.clone(), *choice, *recorded_at)
            })
            .collect();
        rows.sort_by(|a, b| a.question.cmp(&b.question));
        Ok(rows)
    }
}

/// Aggregates the choice repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub choices: Arc<dyn ChoiceRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let choices: Arc<dyn ChoiceRepository> = Arc::new(InMemoryChoiceRepository::new());
        Self { choices }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use review_core::time::fixed_now;

    #[tokio::test]
    async fn upsert_replaces_in_memory_row() {
        let repo = InMemoryChoiceRepository::new();

        repo.upsert_choice(&PersistedChoice::new("Q1", Choice::ResponseA, fixed_now()))
            .await
            .unwrap();
        repo.upsert_choice(&PersistedChoice::new("Q1", Choice::ResponseB, fixed_now()))
            .await
            .unwrap();

        let rows = repo.list_choices().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "Q1");
        assert_eq!(rows[0].choice, Choice::ResponseB);
    }

    #[tokio::test]
    async fn distinct_questions_keep_distinct_rows() {
        let repo = InMemoryChoiceRepository::new();

        repo.upsert_choice(&PersistedChoice::new("Q1", Choice::ResponseA, fixed_now()))
            .await
            .unwrap();
        repo.upsert_choice(&PersistedChoice::new("Q2", Choice::ResponseB, fixed_now()))
            .await
            .unwrap();

        assert_eq!(repo.len(), 2);
    }

    #[tokio::test]
    async fn storage_facade_wires_in_memory_backend() {
        let storage = Storage::in_memory();
        storage
            .choices
            .upsert_choice(&PersistedChoice::new("Q1", Choice::ResponseA, fixed_now()))
            .await
            .unwrap();

        let rows = storage.choices.list_choices().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].choice, Choice::ResponseA);
    }
}
