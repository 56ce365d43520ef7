//! Core functionality for reposcope
//!
//! This module contains shared business logic including:
//! - Application configuration
//! - Credential management
//! - Repository input parsing
//! - Local history and bookmarks

pub mod config;
pub mod credentials;
pub mod repository;
pub mod storage;

pub use config::Config;
pub use credentials::CredentialStore;
pub use repository::{parse_repository_input, RepoRef};
pub use storage::LocalStore;
