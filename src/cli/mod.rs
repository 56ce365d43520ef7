//! CLI module for reposcope
//!
//! This module contains all CLI command definitions and handlers using clap.

pub mod commands;
pub mod analyze;
pub mod auth;
pub mod config;
pub mod history;
pub mod limits;

pub use commands::{Cli, Commands};
