pub mod audit;
pub mod config;
pub mod domain;
pub mod errors;
pub mod filter;
pub mod fixtures;
pub mod library;
pub mod lifecycle;
pub mod notifications;
pub mod session;
pub mod stats;
pub mod store;

pub use audit::{
    AuditCategory, AuditContext, AuditEvent, AuditOutcome, AuditSink, InMemoryAuditSink,
};
pub use domain::document::{DocumentCategory, IssuedDocument};
pub use domain::notification::Notification;
pub use domain::request::{
    Decision, DocumentRequest, DocumentType, RequestId, RequestStatus, StatusEvent,
};
pub use domain::school_year::SchoolYearWindow;
pub use errors::{AlertLevel, CancelError, DecisionError, LifecycleError, ValidationError};
pub use filter::{filter, Searchable, StatusFilter};
pub use fixtures::{DemoDataset, SeededRequestInfo};
pub use library::{CategoryFilter, DocumentLibrary};
pub use lifecycle::{CreateRequestInput, RequestLifecycleManager};
pub use notifications::NotificationFeed;
pub use session::Session;
pub use stats::DashboardStats;
pub use store::RequestStore;
