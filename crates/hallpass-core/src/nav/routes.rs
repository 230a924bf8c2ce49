//! Route declarations consumed by the navigation guard.

/// Access class of a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteAccess {
    /// Reachable regardless of session state.
    Public,
    /// Requires an authenticated session.
    RequiresAuth,
    /// Only reachable without a session (login and registration pages).
    GuestOnly,
}

/// A declared route.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub access: RouteAccess,
}

impl Route {
    pub fn new(path: impl Into<String>, name: impl Into<String>, access: RouteAccess) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            access,
        }
    }
}

/// The application route table, plus the two distinguished destinations the
/// guard redirects to: the login route and the default authenticated
/// landing route.
#[derive(Debug, Clone)]
pub struct RouteTable {
    routes: Vec<Route>,
    login_path: String,
    landing_path: String,
}

impl RouteTable {
    pub fn new(
        routes: Vec<Route>,
        login_path: impl Into<String>,
        landing_path: impl Into<String>,
    ) -> Self {
        Self {
            routes,
            login_path: login_path.into(),
            landing_path: landing_path.into(),
        }
    }

    /// The route table of the reference application.
    pub fn standard() -> Self {
        Self::new(
            vec![
                Route::new("/", "home", RouteAccess::Public),
                Route::new("/about", "about", RouteAccess::Public),
                Route::new("/login", "login", RouteAccess::GuestOnly),
                Route::new("/register", "register", RouteAccess::GuestOnly),
                Route::new("/dashboard", "dashboard", RouteAccess::RequiresAuth),
            ],
            "/login",
            "/dashboard",
        )
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn landing_path(&self) -> &str {
        &self.landing_path
    }

    /// The declared route whose path matches a destination, query and
    /// fragment stripped.
    pub fn find(&self, destination: &str) -> Option<&Route> {
        let path = strip_query(destination);
        self.routes.iter().find(|r| r.path == path)
    }

    /// Access class for a destination. Undeclared paths are public: the
    /// guard only constrains what a route explicitly declares.
    pub fn access_for(&self, destination: &str) -> RouteAccess {
        self.find(destination)
            .map(|r| r.access)
            .unwrap_or(RouteAccess::Public)
    }
}

fn strip_query(destination: &str) -> &str {
    destination
        .split(['?', '#'])
        .next()
        .unwrap_or(destination)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_exact_paths() {
        let table = RouteTable::standard();
        assert_eq!(table.access_for("/dashboard"), RouteAccess::RequiresAuth);
        assert_eq!(table.access_for("/login"), RouteAccess::GuestOnly);
        assert_eq!(table.access_for("/"), RouteAccess::Public);
    }

    #[test]
    fn strips_query_and_fragment_before_matching() {
        let table = RouteTable::standard();
        assert_eq!(
            table.access_for("/dashboard?tab=events"),
            RouteAccess::RequiresAuth
        );
        assert_eq!(
            table.access_for("/dashboard#summary"),
            RouteAccess::RequiresAuth
        );
    }

    #[test]
    fn undeclared_paths_are_public() {
        let table = RouteTable::standard();
        assert_eq!(table.access_for("/nowhere"), RouteAccess::Public);
    }

    #[test]
    fn finds_routes_by_name_and_path() {
        let table = RouteTable::standard();
        assert_eq!(table.find("/register").map(|r| r.name.as_str()), Some("register"));
        assert!(table.find("/missing").is_none());
    }
}
