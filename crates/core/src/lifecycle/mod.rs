pub mod input;
pub mod manager;

pub use input::{validate, CreateRequestInput, ValidatedRequest, MAX_COPIES, MIN_REASON_CHARS};
pub use manager::RequestLifecycleManager;
