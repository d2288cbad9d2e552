mod choice;
mod ids;
mod question;

pub use choice::{Choice, ChoiceError, Selection};
pub use ids::QuestionIndex;
pub use question::QuestionItem;
