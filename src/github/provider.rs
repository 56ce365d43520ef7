//! Credential-bound client provider
//!
//! Owns the credential store and hands out a shared [`GitHubClient`] built
//! for the current credential. The client is built lazily on first use and
//! dropped whenever the credential changes, so a stale `Authorization`
//! header is never sent by a client obtained after the change.

use std::sync::{Arc, Mutex};

use crate::core::config::Config;
use crate::core::credentials::{CredentialBackend, CredentialStore, RateLimitInfo};
use crate::error::Result;
use crate::github::client::GitHubClient;

/// Lazily (re)builds the GitHub client for the current credential
pub struct ClientProvider<B: CredentialBackend> {
    credentials: CredentialStore<B>,
    config: Config,
    cached: Mutex<Option<Arc<GitHubClient>>>,
}

impl<B: CredentialBackend> ClientProvider<B> {
    pub fn new(credentials: CredentialStore<B>, config: Config) -> Self {
        Self {
            credentials,
            config,
            cached: Mutex::new(None),
        }
    }

    /// Client for the current credential, built on first use
    ///
    /// Callers already holding an older `Arc` keep using it; only clients
    /// obtained after a credential change carry the new headers.
    pub fn client(&self) -> Result<Arc<GitHubClient>> {
        let mut cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        if let Some(client) = cached.as_ref() {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(GitHubClient::build(
            self.credentials.credential(),
            &self.config,
        )?);
        *cached = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Store or clear the token and invalidate the cached client
    pub fn set_credential(&mut self, token: Option<&str>) -> Result<()> {
        let result = self.credentials.set_credential(token);
        self.invalidate();
        result
    }

    pub fn has_credential(&self) -> bool {
        self.credentials.has_credential()
    }

    pub fn rate_limit_info(&self) -> RateLimitInfo {
        self.credentials.rate_limit_info()
    }

    pub fn credentials(&self) -> &CredentialStore<B> {
        &self.credentials
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn invalidate(&self) {
        let mut cached = self.cached.lock().unwrap_or_else(|p| p.into_inner());
        *cached = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::credentials::MemoryBackend;
    use reqwest::header::AUTHORIZATION;

    fn provider() -> ClientProvider<MemoryBackend> {
        let store = CredentialStore::open(MemoryBackend::default()).unwrap();
        ClientProvider::new(store, Config::default())
    }

    #[test]
    fn test_client_is_reused_until_credential_changes() {
        let mut provider = provider();
        let first = provider.client().unwrap();
        let second = provider.client().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        provider.set_credential(Some("abc123")).unwrap();
        let third = provider.client().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
    }

    #[test]
    fn test_authorization_follows_credential() {
        let mut provider = provider();
        assert!(provider.client().unwrap().headers().get(AUTHORIZATION).is_none());

        provider.set_credential(Some("abc123")).unwrap();
        let client = provider.client().unwrap();
        assert_eq!(
            client.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc123"
        );

        provider.set_credential(None).unwrap();
        assert!(provider.client().unwrap().headers().get(AUTHORIZATION).is_none());
        assert!(!provider.has_credential());
        assert_eq!(provider.rate_limit_info().limit, 60);
    }

    #[test]
    fn test_replacing_token_rebuilds_headers() {
        let mut provider = provider();
        provider.set_credential(Some("first")).unwrap();
        let _ = provider.client().unwrap();
        provider.set_credential(Some("second")).unwrap();
        assert_eq!(
            provider.client().unwrap().headers().get(AUTHORIZATION).unwrap(),
            "Bearer second"
        );
    }
}
