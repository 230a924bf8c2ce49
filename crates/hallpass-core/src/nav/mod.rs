//! Navigation module: route declarations and the guard that enforces them.
//!
//! Every route transition is evaluated before it commits. Protected routes
//! bounce anonymous users to the login route, carrying the requested
//! destination as a redirect intent; guest-only routes bounce authenticated
//! users to the landing route. Redirect intents are validated against
//! open-redirect abuse before they are consumed.

pub mod guard;
pub mod routes;

pub use guard::{sanitize_redirect, GuardDecision, NavigationGuard};
pub use routes::{Route, RouteAccess, RouteTable};
