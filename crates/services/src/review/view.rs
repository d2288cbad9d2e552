use review_core::model::Choice;
use review_core::session::ReviewSession;

/// Presentation-agnostic snapshot of what the view should render.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no layout or styling assumptions
///
/// The view owns no state the session doesn't already expose; it re-derives a
/// `ReviewScreen` after every transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewScreen {
    Question {
        /// 1-based position of the question being shown.
        index: usize,
        total: usize,
        question: String,
        response_a: String,
        response_b: String,
        /// Which answer to highlight: the choice recorded for the question
        /// being shown now (post-transition position), or `None` when it is
        /// still unset.
        highlighted: Option<Choice>,
        answered: usize,
    },
    Completed {
        total: usize,
        answered: usize,
    },
}

impl ReviewScreen {
    #[must_use]
    pub fn from_session(session: &ReviewSession) -> Self {
        let progress = session.progress();

        match session.current_question() {
            Some(item) => ReviewScreen::Question {
                index: item.index().value(),
                total: progress.total,
                question: item.question().to_string(),
                response_a: item.response_a().to_string(),
                response_b: item.response_b().to_string(),
                highlighted: session
                    .selection_at(item.index())
                    .and_then(|s| s.choice()),
                answered: progress.answered,
            },
            None => ReviewScreen::Completed {
                total: progress.total,
                answered: progress.answered,
            },
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, ReviewScreen::Completed { .. })
    }
}
