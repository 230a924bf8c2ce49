//! Authentication module for managing the client session lifecycle.
//!
//! This module provides:
//! - `Session`: the authentication state machine (bootstrap, login,
//!   register, logout) with injected exchange and store
//! - `token`: bearer-token claim decoding and expiry checks
//! - `TokenStore`: durable persistence of the single access token
//! - `CredentialStore`: optional OS-keychain storage of login credentials
//!
//! The token is the only persisted authority; the session fields are a
//! derived in-memory cache of its decoded claims.

pub mod credentials;
pub mod session;
pub mod store;
pub mod token;

pub use credentials::CredentialStore;
pub use session::{Session, SessionSnapshot};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};
pub use token::{Claims, DecodeError};
