use crate::model::ids::QuestionIndex;

/// One question with its two candidate answers.
///
/// Items are created once at session start from the static dataset and never
/// mutated or destroyed during the session. The `question` text doubles as the
/// natural key in the durable store, so two items with identical text would
/// share one stored row; the dataset is trusted to keep texts distinct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionItem {
    index: QuestionIndex,
    question: String,
    response_a: String,
    response_b: String,
}

impl QuestionItem {
    #[must_use]
    pub fn new(
        index: QuestionIndex,
        question: impl Into<String>,
        response_a: impl Into<String>,
        response_b: impl Into<String>,
    ) -> Self {
        Self {
            index,
            question: question.into(),
            response_a: response_a.into(),
            response_b: response_b.into(),
        }
    }

    #[must_use]
    pub fn index(&self) -> QuestionIndex {
        self.index
    }

    #[must_use]
    pub fn question(&self) -> &str {
        &self.question
    }

    #[must_use]
    pub fn response_a(&self) -> &str {
        &self.response_a
    }

    #[must_use]
    pub fn response_b(&self) -> &str {
        &self.response_b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn item_exposes_fields() {
        let item = QuestionItem::new(QuestionIndex::new(3), "Q", "first", "second");
        assert_eq!(item.index().value(), 3);
        assert_eq!(item.question(), "Q");
        assert_eq!(item.response_a(), "first");
        assert_eq!(item.response_b(), "second");
    }
}
