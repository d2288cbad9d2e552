#![forbid(unsafe_code)]

pub mod model;
pub mod session;
pub mod time;

pub use model::{Choice, ChoiceError, QuestionIndex, QuestionItem, Selection};
pub use session::{ChoiceRecord, ReviewProgress, ReviewSession, SessionError};
pub use time::Clock;
