//! Configuration CLI command handlers

use crate::cli::commands::ConfigCommand;
use crate::core::config::{Config, ConfigKey, API_URL_ENV};
use crate::error::Result;

/// Handle configuration commands
pub fn handle_config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Set { key, value } => handle_set(key, value),
        ConfigCommand::Get { key } => handle_get(key),
        ConfigCommand::Reset { key } => handle_reset(key),
    }
}

fn key_name(key: ConfigKey) -> &'static str {
    match key {
        ConfigKey::ApiUrl => "API URL",
        ConfigKey::Timeout => "Request timeout (seconds)",
        ConfigKey::PerPage => "Page size",
        ConfigKey::HistoryLimit => "History limit",
    }
}

/// Handle setting a configuration value
fn handle_set(key: ConfigKey, value: String) -> Result<()> {
    let mut config = Config::load()?;
    config.set(key, &value)?;
    config.save()?;

    println!("{} set to: {}", key_name(key), config.get(key));
    if key == ConfigKey::ApiUrl && std::env::var(API_URL_ENV).is_ok() {
        println!("  Note: {} is set and overrides this value.", API_URL_ENV);
    }
    Ok(())
}

/// Handle getting a configuration value
fn handle_get(key: ConfigKey) -> Result<()> {
    let config = Config::load()?;
    println!("{}: {}", key_name(key), config.get(key));
    Ok(())
}

/// Handle resetting a configuration value
fn handle_reset(key: ConfigKey) -> Result<()> {
    let mut config = Config::load()?;
    config.reset(key);
    config.save()?;
    println!("{} reset to default: {}", key_name(key), config.get(key));
    Ok(())
}
