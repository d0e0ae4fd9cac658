pub mod client;
pub mod language;

pub use client::{ApiClient, ApiError, TaskProgress};
pub use language::Language;
