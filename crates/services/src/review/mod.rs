mod service;
mod view;

// Public API of the review subsystem.
pub use crate::error::ReviewError;
pub use service::{PersistStatus, ReviewFlowService, SelectOutcome};
pub use view::ReviewScreen;
