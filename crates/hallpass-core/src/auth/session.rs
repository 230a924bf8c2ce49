//! Client session state machine.
//!
//! `Session` owns the three authentication fields (`user_id`,
//! `is_authenticated`, `is_loading`) and every transition between them:
//! `bootstrap` from the persisted token at startup, `login` and `register`
//! through the injected exchange, and `logout`. The exchange and the token
//! store are injected so each test constructs its session in isolation.
//!
//! Exactly one login or registration call may be in flight at a time; a
//! second call is rejected with `AuthError::AlreadyPending` rather than
//! raced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

use crate::api::{AuthError, AuthExchange};
use crate::auth::store::TokenStore;
use crate::auth::token;

/// Serializable view of the session fields for a presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
pub struct SessionSnapshot {
    pub user_id: Option<i64>,
    pub is_authenticated: bool,
    pub is_loading: bool,
}

#[derive(Debug, Default)]
struct State {
    user_id: Option<i64>,
    authenticated: bool,
}

/// The session lifecycle manager.
///
/// Interior mutability keeps the API `&self` so one session can be shared
/// with a UI layer, while the loading flag serializes the authentication
/// calls.
pub struct Session<E> {
    exchange: E,
    store: Box<dyn TokenStore>,
    state: Mutex<State>,
    loading: AtomicBool,
}

/// Releases the loading flag when dropped, so the flag cannot outlive the
/// call even if the future is cancelled mid-exchange.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl<E: AuthExchange> Session<E> {
    /// Create a session in the anonymous state.
    pub fn new(exchange: E, store: Box<dyn TokenStore>) -> Self {
        Self {
            exchange,
            store,
            state: Mutex::new(State::default()),
            loading: AtomicBool::new(false),
        }
    }

    pub fn user_id(&self) -> Option<i64> {
        self.state().user_id
    }

    pub fn is_authenticated(&self) -> bool {
        self.state().authenticated
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state();
        SessionSnapshot {
            user_id: state.user_id,
            is_authenticated: state.authenticated,
            is_loading: self.is_loading(),
        }
    }

    /// Restore session state from the persisted token.
    ///
    /// An absent, expired or undecodable token leaves the session anonymous
    /// with `user_id` cleared. Idempotent, infallible, intended to run once
    /// at startup.
    pub fn bootstrap(&self) {
        let now = Utc::now().timestamp();
        let mut state = self.state();
        match self.store.read() {
            Some(tok) if !token::is_expired(&tok, now) => {
                // is_expired == false guarantees the token decodes.
                if let Ok(claims) = token::decode(&tok) {
                    state.user_id = Some(claims.subject_id);
                    state.authenticated = true;
                }
            }
            _ => {
                state.user_id = None;
                state.authenticated = false;
            }
        }
    }

    /// Exchange credentials for a token and authenticate the session.
    ///
    /// On failure the prior state is untouched (the store still holds
    /// whatever token it held), the error is logged once and returned.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), AuthError> {
        let guard = self.acquire_loading()?;
        let result = self.exchange.login(username, password).await;
        drop(guard);

        match result {
            Ok(response) => {
                self.establish(&response.access)?;
                info!(username, "Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                Err(e)
            }
        }
    }

    /// Register a new account; success immediately establishes an
    /// authenticated session.
    ///
    /// The confirmation field is checked here and never sent to the
    /// exchange.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        password_confirm: &str,
    ) -> Result<(), AuthError> {
        if password != password_confirm {
            return Err(AuthError::PasswordMismatch);
        }

        let guard = self.acquire_loading()?;
        let result = self.exchange.register(username, email, password).await;
        drop(guard);

        match result {
            Ok(response) => {
                self.establish(&response.access)?;
                info!(username, "Registration successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                Err(e)
            }
        }
    }

    /// Drop the session and the persisted token. Cannot fail.
    pub fn logout(&self) {
        self.store.clear();
        let mut state = self.state();
        state.user_id = None;
        state.authenticated = false;
    }

    /// Persist and decode a freshly issued token, entering the
    /// authenticated state.
    ///
    /// A token we cannot read must not half-authenticate the session, and
    /// must not linger in the store for the next bootstrap to trip over.
    fn establish(&self, access: &str) -> Result<(), AuthError> {
        match token::decode(access) {
            Ok(claims) => {
                self.store.save(access);
                let mut state = self.state();
                state.user_id = Some(claims.subject_id);
                state.authenticated = true;
                Ok(())
            }
            Err(e) => {
                self.store.clear();
                let mut state = self.state();
                state.user_id = None;
                state.authenticated = false;
                error!(error = %e, "Exchange returned an unusable token");
                Err(AuthError::InvalidToken(e))
            }
        }
    }

    fn acquire_loading(&self) -> Result<LoadingGuard<'_>, AuthError> {
        if self
            .loading
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(AuthError::AlreadyPending);
        }
        Ok(LoadingGuard(&self.loading))
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
