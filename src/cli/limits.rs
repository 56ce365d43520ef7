//! Rate limit command handler

use crate::core::credentials::CredentialStore;
use crate::error::Result;

/// Show the documented limit for the current credential
///
/// The live counters are only known after a request; `analyze` prints them.
pub fn handle_limits() -> Result<()> {
    let store = CredentialStore::detect()?;
    let info = store.rate_limit_info();

    println!("Mode: {}", info.label);
    println!("Limit: {} requests/hour", info.limit);
    if !info.has_credential {
        println!();
        println!("Set GITHUB_TOKEN or run `reposcope auth set` to raise the limit to 5000/hour.");
    }
    Ok(())
}
