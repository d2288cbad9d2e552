use thiserror::Error;

use crate::model::{Choice, QuestionIndex, QuestionItem, Selection};

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors emitted by the review session state machine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    /// The dataset resolved to zero questions; no valid initial position
    /// exists, so the session cannot start.
    #[error("dataset contains no questions")]
    EmptyDataset,

    /// `select` was called after every question was answered. A correctly
    /// wired view never triggers this; it is a caller contract violation and
    /// leaves the session untouched.
    #[error("review already completed")]
    Completed,

    /// `retreat` was called while the first question was showing. Also a
    /// caller contract violation; the session is left untouched.
    #[error("already at the first question")]
    AtFirstQuestion,
}

//
// ─── CHOICE RECORD ────────────────────────────────────────────────────────────
//

/// Persistence effect emitted by a `select` transition.
///
/// The machine itself performs no I/O; each successful `select` hands the
/// caller exactly one record to upsert, keyed by the question's literal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRecord {
    pub index: QuestionIndex,
    pub question: String,
    pub choice: Choice,
}

//
// ─── PROGRESS ─────────────────────────────────────────────────────────────────
//

/// Aggregated view of session progress, useful for UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewProgress {
    pub total: usize,
    pub answered: usize,
    pub remaining: usize,
    pub is_complete: bool,
}

//
// ─── REVIEW SESSION ───────────────────────────────────────────────────────────
//

/// In-memory state machine for one reviewer stepping through a question set.
///
/// `position` is 1-based and always stays in `[1, N + 1]`: positions `1..=N`
/// show a question (`Reviewing`), and `N + 1` is the re-enterable terminal
/// state (`Completed`) reached by selecting on the last question. Retreating
/// from `Completed` returns to question `N`.
///
/// Selections are owned exclusively by the session and only mirrored by the
/// durable store; a persistence failure therefore never rolls back in-memory
/// state.
#[derive(Debug)]
pub struct ReviewSession {
    items: Vec<QuestionItem>,
    position: usize,
    selections: Vec<Selection>,
}

impl ReviewSession {
    /// Start a fresh session over the given question set.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::EmptyDataset` if `items` is empty.
    pub fn new(items: Vec<QuestionItem>) -> Result<Self, SessionError> {
        if items.is_empty() {
            return Err(SessionError::EmptyDataset);
        }
        let len = items.len();
        Ok(Self {
            items,
            position: 1,
            selections: vec![Selection::Unset; len],
        })
    }

    /// Number of questions in the session.
    #[must_use]
    pub fn total(&self) -> usize {
        self.items.len()
    }

    /// Current 1-based position, `total() + 1` once complete.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// True once every question has been stepped past.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.position > self.items.len()
    }

    /// The question at the current position, or `None` once complete.
    #[must_use]
    pub fn current_question(&self) -> Option<&QuestionItem> {
        self.items.get(self.position - 1)
    }

    /// All questions in session order.
    #[must_use]
    pub fn items(&self) -> &[QuestionItem] {
        &self.items
    }

    /// Selection state for the given 1-based index, `None` if out of range.
    ///
    /// The view calls this with the current position to decide which answer
    /// to highlight: the answer recorded for the question being shown now,
    /// not the one just departed.
    #[must_use]
    pub fn selection_at(&self, index: QuestionIndex) -> Option<Selection> {
        self.selections.get(index.to_offset()).copied()
    }

    /// All selections in session order.
    #[must_use]
    pub fn selections(&self) -> &[Selection] {
        &self.selections
    }

    /// Number of questions with a recorded choice.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_set()).count()
    }

    /// Returns a summary of the current session progress.
    #[must_use]
    pub fn progress(&self) -> ReviewProgress {
        let answered = self.answered_count();
        ReviewProgress {
            total: self.total(),
            answered,
            remaining: self.total() - answered,
            is_complete: self.is_complete(),
        }
    }

    /// Record a choice for the current question and advance one position.
    ///
    /// Re-selecting an index after a retreat overwrites the prior choice;
    /// the emitted record upserts, so the store ends up with one row per
    /// question regardless of how often the reviewer changes their mind.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` (without mutating state) if every
    /// question has already been stepped past.
    pub fn select(&mut self, choice: Choice) -> Result<ChoiceRecord, SessionError> {
        let Some(item) = self.items.get(self.position - 1) else {
            return Err(SessionError::Completed);
        };

        let record = ChoiceRecord {
            index: item.index(),
            question: item.question().to_string(),
            choice,
        };

        self.selections[self.position - 1] = Selection::Chosen(choice);
        self.position += 1;

        Ok(record)
    }

    /// Step back one question, possibly out of the completed state.
    ///
    /// Selections are untouched and nothing is re-persisted; the row written
    /// on the forward pass remains authoritative until overwritten by a new
    /// `select`.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::AtFirstQuestion` (without mutating state) when
    /// the first question is showing.
    pub fn retreat(&mut self) -> Result<(), SessionError> {
        if self.position == 1 {
            return Err(SessionError::AtFirstQuestion);
        }
        self.position -= 1;
        Ok(())
    }

    /// Mark a previously persisted choice without emitting a new record.
    ///
    /// Used when rehydrating a session from the durable store; out-of-range
    /// indexes are ignored.
    pub fn restore_selection(&mut self, index: QuestionIndex, choice: Choice) {
        if let Some(slot) = self.selections.get_mut(index.to_offset()) {
            *slot = Selection::Chosen(choice);
        }
    }

    /// First index with no recorded choice, `None` when all are set.
    #[must_use]
    pub fn first_unset(&self) -> Option<QuestionIndex> {
        self.selections
            .iter()
            .position(|s| !s.is_set())
            .map(|offset| QuestionIndex::new(offset + 1))
    }

    /// Reposition to the first unanswered question, or to the completed
    /// state when every question already has a choice. Used after hydration.
    pub fn seek_first_unset(&mut self) {
        self.position = self
            .first_unset()
            .map_or(self.items.len() + 1, |idx| idx.value());
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<QuestionItem> {
        (1..=n)
            .map(|i| {
                QuestionItem::new(
                    QuestionIndex::new(i),
                    format!("Q{i}"),
                    format!("first answer {i}"),
                    format!("second answer {i}"),
                )
            })
            .collect()
    }

    #[test]
    fn empty_dataset_cannot_start() {
        let err = ReviewSession::new(Vec::new()).unwrap_err();
        assert_eq!(err, SessionError::EmptyDataset);
    }

    #[test]
    fn fresh_session_starts_at_one() {
        let session = ReviewSession::new(items(4)).unwrap();
        assert_eq!(session.position(), 1);
        assert!(!session.is_complete());
        assert_eq!(session.current_question().unwrap().question(), "Q1");
        assert!(session.selections().iter().all(|s| !s.is_set()));
    }

    #[test]
    fn select_records_and_advances() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        let record = session.select(Choice::ResponseA).unwrap();

        assert_eq!(record.question, "Q1");
        assert_eq!(record.choice, Choice::ResponseA);
        assert_eq!(session.position(), 2);
        assert_eq!(
            session.selection_at(QuestionIndex::new(1)),
            Some(Selection::Chosen(Choice::ResponseA))
        );
    }

    #[test]
    fn select_on_last_question_completes() {
        let mut session = ReviewSession::new(items(1)).unwrap();
        session.select(Choice::ResponseB).unwrap();

        assert!(session.is_complete());
        assert_eq!(session.position(), 2);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn select_while_complete_is_rejected_without_mutation() {
        let mut session = ReviewSession::new(items(1)).unwrap();
        session.select(Choice::ResponseA).unwrap();

        let err = session.select(Choice::ResponseB).unwrap_err();
        assert_eq!(err, SessionError::Completed);
        assert_eq!(session.position(), 2);
        assert_eq!(
            session.selection_at(QuestionIndex::new(1)),
            Some(Selection::Chosen(Choice::ResponseA))
        );
    }

    #[test]
    fn retreat_at_first_question_is_rejected() {
        let mut session = ReviewSession::new(items(2)).unwrap();
        let err = session.retreat().unwrap_err();
        assert_eq!(err, SessionError::AtFirstQuestion);
        assert_eq!(session.position(), 1);
    }

    #[test]
    fn retreat_reopens_a_completed_session() {
        let mut session = ReviewSession::new(items(2)).unwrap();
        session.select(Choice::ResponseA).unwrap();
        session.select(Choice::ResponseA).unwrap();
        assert!(session.is_complete());

        session.retreat().unwrap();
        assert!(!session.is_complete());
        assert_eq!(session.position(), 2);
        assert_eq!(session.current_question().unwrap().question(), "Q2");
    }

    #[test]
    fn reselection_overwrites_prior_choice() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        session.select(Choice::ResponseA).unwrap();
        session.retreat().unwrap();
        let record = session.select(Choice::ResponseB).unwrap();

        assert_eq!(record.question, "Q1");
        assert_eq!(record.choice, Choice::ResponseB);
        assert_eq!(session.position(), 2);
        assert_eq!(
            session.selections(),
            &[
                Selection::Chosen(Choice::ResponseB),
                Selection::Unset,
                Selection::Unset
            ]
        );
    }

    #[test]
    fn position_stays_in_bounds_under_interleaving() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        let moves: &[bool] = &[true, true, false, true, true, false, true];

        for &forward in moves {
            if forward {
                let _ = session.select(Choice::ResponseA);
            } else {
                let _ = session.retreat();
            }
            assert!(session.position() >= 1);
            assert!(session.position() <= session.total() + 1);
        }
    }

    #[test]
    fn full_pass_then_retreat_round_trip() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        for _ in 0..3 {
            session.select(Choice::ResponseB).unwrap();
        }
        assert_eq!(session.position(), 4);
        assert!(session.is_complete());

        session.retreat().unwrap();
        assert_eq!(session.position(), 3);
        assert!(!session.is_complete());
    }

    #[test]
    fn progress_counts_answered_questions() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        session.select(Choice::ResponseA).unwrap();
        session.select(Choice::ResponseB).unwrap();
        session.retreat().unwrap();

        let progress = session.progress();
        assert_eq!(progress.total, 3);
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.remaining, 1);
        assert!(!progress.is_complete);
    }

    #[test]
    fn restore_and_seek_position_on_first_gap() {
        let mut session = ReviewSession::new(items(3)).unwrap();
        session.restore_selection(QuestionIndex::new(1), Choice::ResponseA);
        session.restore_selection(QuestionIndex::new(3), Choice::ResponseB);
        session.seek_first_unset();

        assert_eq!(session.position(), 2);
        assert_eq!(
            session.selection_at(QuestionIndex::new(3)),
            Some(Selection::Chosen(Choice::ResponseB))
        );
    }

    #[test]
    fn seek_with_all_restored_lands_on_completed() {
        let mut session = ReviewSession::new(items(2)).unwrap();
        session.restore_selection(QuestionIndex::new(1), Choice::ResponseA);
        session.restore_selection(QuestionIndex::new(2), Choice::ResponseA);
        session.seek_first_unset();

        assert!(session.is_complete());
        assert_eq!(session.position(), 3);
    }

    #[test]
    fn restore_ignores_out_of_range_index() {
        let mut session = ReviewSession::new(items(2)).unwrap();
        session.restore_selection(QuestionIndex::new(9), Choice::ResponseA);
        assert!(session.selections().iter().all(|s| !s.is_set()));
    }
}
