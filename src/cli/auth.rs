//! Authentication CLI command handlers

use std::io::{self, Write};

use crate::cli::commands::AuthCommand;
use crate::core::credentials::{
    mask_token, CredentialBackend, CredentialStore, KeyringBackend, GITHUB_TOKEN_ENV,
};
use crate::error::{ReposcopeError, Result};

/// Handle authentication commands
pub fn handle_auth(command: AuthCommand) -> Result<()> {
    match command {
        AuthCommand::Set { token } => handle_set(token),
        AuthCommand::Clear => handle_clear(),
        AuthCommand::Status => handle_status(),
    }
}

/// Store a personal access token in the keyring
fn handle_set(token: Option<String>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => prompt_for_token()?,
    };

    if token.trim().is_empty() {
        return Err(ReposcopeError::InvalidInput("No token provided".to_string()));
    }

    let mut store = CredentialStore::open(KeyringBackend)?;
    store.set_credential(Some(&token))?;

    if let Some(token) = store.credential() {
        println!("✓ GitHub token stored: {}", mask_token(token));
    }
    let info = store.rate_limit_info();
    println!("  Rate limit raised to {} requests/hour.", info.limit);
    warn_if_env_overrides();
    Ok(())
}

fn prompt_for_token() -> Result<String> {
    println!("To create a token, go to: https://github.com/settings/tokens/new");
    println!("No scopes are needed for public repositories; add 'repo' for private ones.");
    println!();
    print!("Paste your token here: ");
    io::stdout().flush()?;

    let mut token = String::new();
    io::stdin().read_line(&mut token)?;
    Ok(token.trim().to_string())
}

/// Remove the stored token
fn handle_clear() -> Result<()> {
    let mut store = CredentialStore::open(KeyringBackend)?;
    if clear_credential(&mut store)? {
        println!("GitHub token removed. Requests are now anonymous (60/hour).");
    } else {
        println!("No stored token.");
    }
    warn_if_env_overrides();
    Ok(())
}

/// Delete the persisted entry, reporting whether a usable token was held
///
/// The backend is cleared even when the entry was blank and never loaded.
fn clear_credential<B: CredentialBackend>(store: &mut CredentialStore<B>) -> Result<bool> {
    let had_token = store.has_credential();
    store.set_credential(None)?;
    Ok(had_token)
}

/// Show which credential, if any, would be used
fn handle_status() -> Result<()> {
    let store = CredentialStore::detect()?;
    let info = store.rate_limit_info();

    println!("Authentication Status:");
    match store.credential() {
        Some(token) => {
            let source = if env_token_set() {
                GITHUB_TOKEN_ENV
            } else {
                "keyring"
            };
            println!("  GitHub: Authenticated ({})", source);
            println!("  Token: {}", mask_token(token));
        }
        None => println!("  GitHub: Not authenticated"),
    }
    println!("  Rate limit: {} requests/hour ({})", info.limit, info.label);
    Ok(())
}

fn env_token_set() -> bool {
    std::env::var(GITHUB_TOKEN_ENV).is_ok_and(|v| !v.trim().is_empty())
}

fn warn_if_env_overrides() {
    if env_token_set() {
        println!();
        println!(
            "  Note: {} is set and takes precedence over the stored token.",
            GITHUB_TOKEN_ENV
        );
    }
}
