//! Optional remember-me storage for login credentials.
//!
//! Credentials live in the OS keychain, never on disk next to the token.
//! The session itself never consults this store; it exists purely so the
//! shell can offer "use stored password?" on the next login.

use anyhow::{Context, Result};
use keyring::Entry;

const SERVICE_NAME: &str = "hallpass";

pub struct CredentialStore;

impl CredentialStore {
    /// Remember the password for a username in the OS keychain.
    pub fn remember(username: &str, password: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(password)
            .context("Failed to store password in keychain")?;
        Ok(())
    }

    /// Retrieve the remembered password for a username.
    pub fn password_for(username: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve password from keychain")
    }

    /// Forget the remembered password for a username.
    pub fn forget(username: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, username)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete credential from keychain")?;
        Ok(())
    }

    /// Whether a password is remembered for a username.
    pub fn has_saved(username: &str) -> bool {
        match Entry::new(SERVICE_NAME, username) {
            Ok(entry) => entry.get_password().is_ok(),
            Err(_) => false,
        }
    }
}
