//! Jira-backed story fetcher.

pub mod client;
pub mod fetcher;
pub mod jql;
pub mod response;

pub use client::*;
pub use fetcher::*;
pub use jql::*;
pub use response::*;
