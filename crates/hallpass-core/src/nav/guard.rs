//! Navigation guard with redirect-back semantics.
//!
//! The guard runs once per route transition, before the transition commits:
//! it either allows the destination or substitutes a redirect. Decisions
//! are synchronous and purely a function of the route table and the
//! session's authentication flag.

use tracing::debug;

use crate::nav::routes::{RouteAccess, RouteTable};

/// Outcome of evaluating one route transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Proceed to the requested destination unchanged.
    Allow,
    /// Redirect to `to` instead. `redirect` carries the originally
    /// requested destination when it should be resumed after login.
    Redirect {
        to: String,
        redirect: Option<String>,
    },
}

impl GuardDecision {
    /// The effective destination as a single path-and-query string, with
    /// the redirect intent escaped into the query.
    pub fn target(&self, requested: &str) -> String {
        match self {
            GuardDecision::Allow => requested.to_string(),
            GuardDecision::Redirect { to, redirect: None } => to.clone(),
            GuardDecision::Redirect {
                to,
                redirect: Some(intent),
            } => format!("{to}?redirect={}", urlencoding::encode(intent)),
        }
    }
}

pub struct NavigationGuard {
    table: RouteTable,
}

impl NavigationGuard {
    pub fn new(table: RouteTable) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Evaluate a route transition to `destination` (path plus optional
    /// query) under the given session state.
    pub fn evaluate(&self, destination: &str, authenticated: bool) -> GuardDecision {
        match self.table.access_for(destination) {
            RouteAccess::RequiresAuth if !authenticated => {
                debug!(destination, "Unauthenticated navigation redirected to login");
                GuardDecision::Redirect {
                    to: self.table.login_path().to_string(),
                    redirect: Some(destination.to_string()),
                }
            }
            RouteAccess::GuestOnly if authenticated => {
                debug!(destination, "Authenticated navigation redirected to landing");
                GuardDecision::Redirect {
                    to: self.table.landing_path().to_string(),
                    redirect: None,
                }
            }
            _ => GuardDecision::Allow,
        }
    }

    /// Destination to land on after a successful login, consuming a stored
    /// redirect intent when it is a safe same-origin path.
    pub fn after_login(&self, intent: Option<&str>) -> String {
        intent
            .and_then(sanitize_redirect)
            .unwrap_or(self.table.landing_path())
            .to_string()
    }
}

/// Accept a redirect intent only when it is a same-origin relative path:
/// non-empty, starting with a single `/` but not `//` (which a browser
/// would treat as protocol-relative and follow off-origin).
pub fn sanitize_redirect(intent: &str) -> Option<&str> {
    if intent.starts_with('/') && !intent.starts_with("//") {
        Some(intent)
    } else {
        None
    }
}
