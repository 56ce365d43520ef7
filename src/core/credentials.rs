//! GitHub credential storage
//!
//! Holds at most one personal access token. Persistence goes through a
//! [`CredentialBackend`]: the system keyring in normal use, memory for tests
//! and for tokens supplied via `GITHUB_TOKEN` (never written to disk).
//!
//! Changing the credential does not touch any HTTP client directly; the
//! [`ClientProvider`](crate::github::ClientProvider) drops its cached client
//! whenever it forwards a change here.

use std::sync::RwLock;

use keyring::Entry;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;

use crate::error::{ReposcopeError, Result};

const SERVICE_NAME: &str = "reposcope";

/// Fixed storage key for the token
pub const GITHUB_TOKEN_KEY: &str = "github_api_key";

/// Environment variable supplying a session-only token
pub const GITHUB_TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Documented hourly ceiling with a token
pub const AUTHENTICATED_LIMIT: u32 = 5000;

/// Documented hourly ceiling without a token
pub const ANONYMOUS_LIMIT: u32 = 60;

/// Persistence for a single token string
#[cfg_attr(test, mockall::automock)]
pub trait CredentialBackend: Send + Sync {
    /// Read the stored token, if any
    fn load(&self) -> Result<Option<String>>;
    /// Overwrite the stored token
    fn store(&self, token: &str) -> Result<()>;
    /// Remove the stored token; a missing entry is not an error
    fn clear(&self) -> Result<()>;
}

impl<T: CredentialBackend + ?Sized> CredentialBackend for Box<T> {
    fn load(&self) -> Result<Option<String>> {
        (**self).load()
    }

    fn store(&self, token: &str) -> Result<()> {
        (**self).store(token)
    }

    fn clear(&self) -> Result<()> {
        (**self).clear()
    }
}

/// System keyring backend (macOS Keychain, Linux Secret Service)
#[derive(Debug, Default, Clone, Copy)]
pub struct KeyringBackend;

impl KeyringBackend {
    fn entry() -> Result<Entry> {
        Ok(Entry::new(SERVICE_NAME, GITHUB_TOKEN_KEY)?)
    }
}

impl CredentialBackend for KeyringBackend {
    fn load(&self) -> Result<Option<String>> {
        match Self::entry()?.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(ReposcopeError::Credential(format!(
                "Cannot access system keychain. Make sure your keyring is unlocked. ({})",
                e
            ))),
        }
    }

    fn store(&self, token: &str) -> Result<()> {
        Self::entry()?.set_password(token)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match Self::entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(ReposcopeError::Credential(e.to_string())),
        }
    }
}

/// In-process backend
#[derive(Debug, Default)]
pub struct MemoryBackend {
    value: RwLock<Option<String>>,
}

impl MemoryBackend {
    /// Backend pre-loaded with a token
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(token.into())),
        }
    }
}

impl CredentialBackend for MemoryBackend {
    fn load(&self) -> Result<Option<String>> {
        self.value
            .read()
            .map(|v| v.clone())
            .map_err(|_| ReposcopeError::Credential("credential lock poisoned".into()))
    }

    fn store(&self, token: &str) -> Result<()> {
        let mut value = self
            .value
            .write()
            .map_err(|_| ReposcopeError::Credential("credential lock poisoned".into()))?;
        *value = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut value = self
            .value
            .write()
            .map_err(|_| ReposcopeError::Credential("credential lock poisoned".into()))?;
        *value = None;
        Ok(())
    }
}

/// Static rate-limit policy for the current credential state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitInfo {
    pub has_credential: bool,
    pub limit: u32,
    pub label: &'static str,
}

impl RateLimitInfo {
    /// Documented GitHub ceilings; not a live server check
    pub fn for_credential(has_credential: bool) -> Self {
        if has_credential {
            Self {
                has_credential,
                limit: AUTHENTICATED_LIMIT,
                label: "authenticated",
            }
        } else {
            Self {
                has_credential,
                limit: ANONYMOUS_LIMIT,
                label: "anonymous",
            }
        }
    }
}

/// Credential store holding the optional GitHub token
///
/// The backend is read once at construction; afterwards the in-memory copy
/// is authoritative and every mutation is written through.
pub struct CredentialStore<B: CredentialBackend> {
    backend: B,
    token: Option<SecretString>,
}

impl<B: CredentialBackend> CredentialStore<B> {
    /// Open the store, loading any persisted token
    pub fn open(backend: B) -> Result<Self> {
        let token = backend.load()?.and_then(normalize).map(SecretString::from);
        Ok(Self { backend, token })
    }

    /// Store a token, or clear it with `None`
    ///
    /// Empty or whitespace-only tokens are treated as `None`. Clearing removes
    /// the persisted entry as well.
    pub fn set_credential(&mut self, token: Option<&str>) -> Result<()> {
        match token.map(str::to_string).and_then(normalize) {
            Some(token) => {
                self.backend.store(&token)?;
                self.token = Some(SecretString::from(token));
                tracing::debug!("GitHub token stored");
            }
            None => {
                self.backend.clear()?;
                self.token = None;
                tracing::debug!("GitHub token cleared");
            }
        }
        Ok(())
    }

    /// Whether a token is present
    pub fn has_credential(&self) -> bool {
        self.token.is_some()
    }

    /// The current token
    pub fn credential(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Documented rate limit for the current mode
    pub fn rate_limit_info(&self) -> RateLimitInfo {
        RateLimitInfo::for_credential(self.has_credential())
    }
}

impl CredentialStore<Box<dyn CredentialBackend>> {
    /// Store used by the CLI
    ///
    /// Priority: `GITHUB_TOKEN` (session only, never persisted) > keyring.
    pub fn detect() -> Result<Self> {
        let backend: Box<dyn CredentialBackend> =
            match std::env::var(GITHUB_TOKEN_ENV).ok().and_then(normalize) {
                Some(token) => {
                    tracing::debug!("Using GitHub token from {}", GITHUB_TOKEN_ENV);
                    Box::new(MemoryBackend::with_token(token))
                }
                None => Box::new(KeyringBackend),
            };
        Self::open(backend)
    }
}

fn normalize(token: String) -> Option<String> {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Get a masked version of a token for display (shows first 4 and last 4 chars)
pub fn mask_token(token: &SecretString) -> String {
    let exposed = token.expose_secret();
    let chars: Vec<char> = exposed.chars().collect();
    if chars.len() <= 8 {
        "*".repeat(chars.len())
    } else {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}...{}", head, tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_token() {
        let short = SecretString::from("abc");
        assert_eq!(mask_token(&short), "***");

        let long = SecretString::from("ghp_1234567890abcdef");
        assert_eq!(mask_token(&long), "ghp_...cdef");
    }

    #[test]
    fn test_anonymous_info() {
        let store = CredentialStore::open(MemoryBackend::default()).unwrap();
        assert!(!store.has_credential());
        assert_eq!(
            store.rate_limit_info(),
            RateLimitInfo {
                has_credential: false,
                limit: 60,
                label: "anonymous"
            }
        );
    }

    #[test]
    fn test_authenticated_info() {
        let mut store = CredentialStore::open(MemoryBackend::default()).unwrap();
        store.set_credential(Some("abc123")).unwrap();
        assert!(store.has_credential());
        assert_eq!(
            store.rate_limit_info(),
            RateLimitInfo {
                has_credential: true,
                limit: 5000,
                label: "authenticated"
            }
        );
        assert_eq!(store.credential().unwrap().expose_secret(), "abc123");
    }

    #[test]
    fn test_info_tracks_any_sequence_of_updates() {
        let mut store = CredentialStore::open(MemoryBackend::default()).unwrap();
        let steps = [Some("a"), None, Some("b"), Some("  "), Some("c"), None, None];
        for step in steps {
            store.set_credential(step).unwrap();
            let info = store.rate_limit_info();
            assert_eq!(info.has_credential, store.has_credential());
            assert_eq!(info.limit == 5000, store.has_credential());
            assert_eq!(info.limit == 60, !store.has_credential());
        }
    }

    #[test]
    fn test_clearing_removes_persisted_value() {
        let mut store = CredentialStore::open(MemoryBackend::with_token("old")).unwrap();
        assert!(store.has_credential());
        store.set_credential(None).unwrap();
        assert!(store.backend.load().unwrap().is_none());
        assert!(store.credential().is_none());
    }

    #[test]
    fn test_blank_token_clears() {
        let mut backend = MockCredentialBackend::new();
        backend.expect_load().returning(|| Ok(Some("persisted".into())));
        backend.expect_clear().times(1).returning(|| Ok(()));
        backend.expect_store().never();

        let mut store = CredentialStore::open(backend).unwrap();
        store.set_credential(Some("   ")).unwrap();
        assert!(!store.has_credential());
    }

    #[test]
    fn test_token_is_trimmed_before_persisting() {
        let mut backend = MockCredentialBackend::new();
        backend.expect_load().returning(|| Ok(None));
        backend
            .expect_store()
            .withf(|token| token == "ghp_token")
            .times(1)
            .returning(|_| Ok(()));

        let mut store = CredentialStore::open(backend).unwrap();
        store.set_credential(Some(" ghp_token\n")).unwrap();
        assert_eq!(store.credential().unwrap().expose_secret(), "ghp_token");
    }

    #[test]
    fn test_backend_failure_leaves_state_unchanged() {
        let mut backend = MockCredentialBackend::new();
        backend.expect_load().returning(|| Ok(None));
        backend
            .expect_store()
            .returning(|_| Err(ReposcopeError::Credential("locked".into())));

        let mut store = CredentialStore::open(backend).unwrap();
        assert!(store.set_credential(Some("abc")).is_err());
        assert!(!store.has_credential());
    }
}
