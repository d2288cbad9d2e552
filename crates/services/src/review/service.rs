use std::sync::Arc;

use review_core::model::{Choice, QuestionIndex};
use review_core::session::ReviewSession;
use storage::repository::{ChoiceRepository, PersistedChoice, StorageError};

use crate::Clock;
use crate::dataset::Dataset;
use crate::error::ReviewError;

/// Whether the durable store accepted the write for one `select`.
#[derive(Debug)]
pub enum PersistStatus {
    Saved,
    /// The in-memory selection and advance stand; the reviewer can keep
    /// working and the next overwrite of this question will retry the row.
    Failed(StorageError),
}

impl PersistStatus {
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, PersistStatus::Saved)
    }
}

/// Result of selecting an answer for the current question.
#[derive(Debug)]
pub struct SelectOutcome {
    pub index: QuestionIndex,
    pub is_complete: bool,
    pub persistence: PersistStatus,
}

/// Orchestrates the review session against the durable store.
///
/// The session state machine stays pure; this service dispatches exactly one
/// upsert per `select` transition, inside the same call, and awaits it before
/// returning. That gives the one-in-flight write ordering the store contract
/// asks for without any queueing.
#[derive(Clone)]
pub struct ReviewFlowService {
    clock: Clock,
    choices: Arc<dyn ChoiceRepository>,
}

impl ReviewFlowService {
    #[must_use]
    pub fn new(clock: Clock, choices: Arc<dyn ChoiceRepository>) -> Self {
        Self { clock, choices }
    }

    /// Start a fresh session over the dataset, ignoring any stored choices.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Session` if the dataset is empty.
    pub fn start(&self, dataset: Dataset) -> Result<ReviewSession, ReviewError> {
        Ok(ReviewSession::new(dataset.into_items())?)
    }

    /// Start a session and rehydrate prior choices from the store.
    ///
    /// Stored rows are matched to questions by exact text; rows matching no
    /// dataset question are ignored. The session repositions to the first
    /// unanswered question (or straight to completed when none remain). A
    /// storage failure here degrades to a fresh session with a warning
    /// rather than aborting: the durable rows are still intact, and review
    /// availability wins.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Session` if the dataset is empty.
    pub async fn start_resumed(&self, dataset: Dataset) -> Result<ReviewSession, ReviewError> {
        let mut session = ReviewSession::new(dataset.into_items())?;

        match self.choices.list_choices().await {
            Ok(stored) => {
                for row in stored {
                    if let Some(item) = session
                        .items()
                        .iter()
                        .find(|item| item.question() == row.question)
                    {
                        session.restore_selection(item.index(), row.choice);
                    }
                }
                session.seek_first_unset();
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load stored choices; starting fresh");
            }
        }

        Ok(session)
    }

    /// Record a choice for the current question, persist it, and advance.
    ///
    /// The in-memory transition happens first and is never rolled back; a
    /// failed upsert is reported in the outcome's `persistence` field and
    /// logged, but does not stop the session.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Session` if the session is already complete.
    pub async fn select(
        &self,
        session: &mut ReviewSession,
        choice: Choice,
    ) -> Result<SelectOutcome, ReviewError> {
        let record = session.select(choice)?;

        let row = PersistedChoice::new(record.question, record.choice, self.clock.now());
        let persistence = match self.choices.upsert_choice(&row).await {
            Ok(()) => PersistStatus::Saved,
            Err(err) => {
                tracing::warn!(
                    question = %row.question,
                    error = %err,
                    "choice not persisted; continuing review"
                );
                PersistStatus::Failed(err)
            }
        };

        Ok(SelectOutcome {
            index: record.index,
            is_complete: session.is_complete(),
            persistence,
        })
    }

    /// Step back one question. Nothing is re-persisted.
    ///
    /// # Errors
    ///
    /// Returns `ReviewError::Session` when the first question is showing.
    pub fn retreat(&self, session: &mut ReviewSession) -> Result<(), ReviewError> {
        session.retreat()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use review_core::time::fixed_clock;
    use storage::repository::InMemoryChoiceRepository;

    use crate::dataset::DatasetRow;

    fn dataset(n: usize) -> Dataset {
        let rows = (1..=n)
            .map(|i| DatasetRow {
                question: format!("Q{i}"),
                response_1: format!("first {i}"),
                response_2: format!("second {i}"),
            })
            .collect();
        Dataset::from_rows(rows).unwrap()
    }

    struct FailingRepository;

    #[async_trait]
    impl ChoiceRepository for FailingRepository {
        async fn upsert_choice(&self, _choice: &PersistedChoice) -> Result<(), StorageError> {
            Err(StorageError::Connection("store offline".into()))
        }

        async fn list_choices(&self) -> Result<Vec<PersistedChoice>, StorageError> {
            Err(StorageError::Connection("store offline".into()))
        }
    }

    #[tokio::test]
    async fn select_persists_label_for_choice() {
        let repo = InMemoryChoiceRepository::new();
        let service = ReviewFlowService::new(fixed_clock(), Arc::new(repo.clone()));
        let mut session = service.start(dataset(2)).unwrap();

        let outcome = service
            .select(&mut session, Choice::ResponseB)
            .await
            .unwrap();
        assert!(outcome.persistence.is_saved());
        assert!(!outcome.is_complete);
        assert_eq!(outcome.index, QuestionIndex::new(1));

        let rows = repo.list_choices().await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].question, "Q1");
        assert_eq!(rows[0].choice.label(), "Response 2");
    }

    #[tokio::test]
    async fn persistence_failure_does_not_block_advance() {
        let service = ReviewFlowService::new(fixed_clock(), Arc::new(FailingRepository));
        let mut session = service.start(dataset(2)).unwrap();

        let outcome = service
            .select(&mut session, Choice::ResponseA)
            .await
            .unwrap();

        assert!(matches!(outcome.persistence, PersistStatus::Failed(_)));
        assert_eq!(session.position(), 2);
        assert_eq!(
            session.selection_at(QuestionIndex::new(1)).unwrap().choice(),
            Some(Choice::ResponseA)
        );
    }

    #[tokio::test]
    async fn hydration_failure_degrades_to_fresh_session() {
        let service = ReviewFlowService::new(fixed_clock(), Arc::new(FailingRepository));
        let session = service.start_resumed(dataset(3)).await.unwrap();

        assert_eq!(session.position(), 1);
        assert!(session.selections().iter().all(|s| !s.is_set()));
    }

    #[tokio::test]
    async fn retreat_is_not_persisted() {
        let repo = InMemoryChoiceRepository::new();
        let service = ReviewFlowService::new(fixed_clock(), Arc::new(repo.clone()));
        let mut session = service.start(dataset(2)).unwrap();

        service
            .select(&mut session, Choice::ResponseA)
            .await
            .unwrap();
        service.retreat(&mut session).unwrap();

        assert_eq!(repo.len(), 1);
        assert_eq!(session.position(), 1);
    }
}
