use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a question within a review session.
///
/// Indexes are 1-based and assigned by dataset row order; they are stable for
/// the lifetime of the session.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionIndex(usize);

impl QuestionIndex {
    /// Creates an index from a 1-based ordinal.
    #[must_use]
    pub fn new(ordinal: usize) -> Self {
        Self(ordinal)
    }

    /// The first question of any session.
    #[must_use]
    pub fn first() -> Self {
        Self(1)
    }

    /// Returns the underlying 1-based ordinal.
    #[must_use]
    pub fn value(&self) -> usize {
        self.0
    }

    /// Zero-based offset for slice addressing.
    #[must_use]
    pub fn to_offset(&self) -> usize {
        self.0.saturating_sub(1)
    }
}

impl fmt::Debug for QuestionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QuestionIndex({})", self.0)
    }
}

impl fmt::Display for QuestionIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
