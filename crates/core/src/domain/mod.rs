pub mod document;
pub mod notification;
pub mod request;
pub mod school_year;
