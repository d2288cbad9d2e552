use thiserror::Error;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

/// Errors that can occur when mapping choices to persisted labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChoiceError {
    #[error("invalid selected_response label: {0:?}")]
    InvalidLabel(String),
}

//
// ─── CHOICE ───────────────────────────────────────────────────────────────────
//

/// Which of the two candidate answers the reviewer preferred.
///
/// The durable store records choices as the labels `"Response 1"` and
/// `"Response 2"`; the mapping lives here so every layer agrees on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// The first candidate answer, persisted as `"Response 1"`.
    ResponseA,
    /// The second candidate answer, persisted as `"Response 2"`.
    ResponseB,
}

impl Choice {
    /// Maps this choice to its persisted `selected_response` label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Choice::ResponseA => "Response 1",
            Choice::ResponseB => "Response 2",
        }
    }

    /// Parses a persisted `selected_response` label back into a choice.
    ///
    /// # Errors
    ///
    /// Returns `ChoiceError::InvalidLabel` for anything other than the two
    /// known labels.
    pub fn from_label(label: &str) -> Result<Self, ChoiceError> {
        match label {
            "Response 1" => Ok(Self::ResponseA),
            "Response 2" => Ok(Self::ResponseB),
            other => Err(ChoiceError::InvalidLabel(other.to_string())),
        }
    }
}

//
// ─── SELECTION ────────────────────────────────────────────────────────────────
//

/// Per-question selection state.
///
/// Every question starts `Unset`; the session's `select` transition overwrites
/// it, and a later re-selection overwrites it again. Selections are never
/// deleted during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Unset,
    Chosen(Choice),
}

impl Selection {
    /// True once a choice has been recorded for the question.
    #[must_use]
    pub fn is_set(&self) -> bool {
        matches!(self, Selection::Chosen(_))
    }

    /// The recorded choice, if any.
    #[must_use]
    pub fn choice(&self) -> Option<Choice> {
        match self {
            Selection::Unset => None,
            Selection::Chosen(c) => Some(*c),
        }
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
