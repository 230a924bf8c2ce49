//! REST API client module for the authentication backend.
//!
//! This module provides the `AuthClient` for the two exchanges the session
//! lifecycle depends on: trading credentials for a bearer token and
//! registering a new account (which also yields a token).
//!
//! Failure statuses are mapped to the `AuthError` taxonomy so the
//! presentation layer can show a specific message without inspecting HTTP
//! details.

pub mod client;
pub mod error;

pub use client::{AuthClient, AuthExchange, TokenResponse};
pub use error::AuthError;
