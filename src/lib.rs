//! reposcope - rate-limit-aware GitHub repository analysis
//!
//! This library wraps the GitHub REST API behind a small gateway that keeps
//! track of the credential in use, the latest rate limit snapshot and a
//! consistent classification of failures. On top of it sit concurrent report
//! collection, repository statistics and a command-line front end.

pub mod analysis;
pub mod cli;
pub mod core;
pub mod error;
pub mod github;

pub use error::{ReposcopeError, Result};
