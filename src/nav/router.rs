use std::sync::Mutex;

use tracing::debug;

/// Screen area a location belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenArea {
    Auth,
    Main,
}

/// Navigable routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SignIn,
    SignUp,
    Home,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::SignIn => "/auth/sign-in",
            Route::SignUp => "/auth/sign-up",
            Route::Home => "/",
        }
    }

    pub fn location(&self) -> Location {
        Location::parse(self.path())
    }
}

/// A navigation location, held as path segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    segments: Vec<String>,
}

impl Location {
    pub fn parse(path: &str) -> Self {
        let segments = path
            .split('/')
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { segments }
    }

    /// The first path segment decides the area: `auth` is the auth group,
    /// everything else (including the root) is the main area.
    pub fn area(&self) -> ScreenArea {
        match self.segments.first().map(String::as_str) {
            Some("auth") => ScreenArea::Auth,
            _ => ScreenArea::Main,
        }
    }

    pub fn is_route(&self, route: Route) -> bool {
        *self == route.location()
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}", self.segments.join("/"))
    }
}

/// Navigation port. Replace-only: callers swap the current location and
/// never grow a history stack.
pub trait Router: Send + Sync {
    fn current(&self) -> Location;
    fn replace(&self, to: Route);
}

/// Router keeping the current location in process memory.
pub struct MemoryRouter {
    current: Mutex<Location>,
}

impl MemoryRouter {
    pub fn new(initial: Route) -> Self {
        Self {
            current: Mutex::new(initial.location()),
        }
    }
}

impl Router for MemoryRouter {
    fn current(&self) -> Location {
        self.current.lock().expect("location lock").clone()
    }

    fn replace(&self, to: Route) {
        let mut current = self.current.lock().expect("location lock");
        debug!(from = %current, to = to.path(), "navigation replace");
        *current = to.location();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_routes_are_in_the_auth_area() {
        assert_eq!(Route::SignIn.location().area(), ScreenArea::Auth);
        assert_eq!(Route::SignUp.location().area(), ScreenArea::Auth);
    }

    #[test]
    fn test_root_is_in_the_main_area() {
        assert_eq!(Route::Home.location().area(), ScreenArea::Main);
    }

    #[test]
    fn test_unknown_main_paths_are_main_area() {
        assert_eq!(Location::parse("/meals/today").area(), ScreenArea::Main);
    }

    #[test]
    fn test_parse_ignores_duplicate_slashes() {
        assert_eq!(Location::parse("//auth//sign-in").area(), ScreenArea::Auth);
        assert_eq!(Location::parse("//auth//sign-in"), Location::parse("/auth/sign-in"));
    }

    #[test]
    fn test_is_route_matches_exact_location() {
        let location = Location::parse("/auth/sign-in");
        assert!(location.is_route(Route::SignIn));
        assert!(!location.is_route(Route::SignUp));
    }

    #[test]
    fn test_memory_router_replace_updates_current() {
        let router = MemoryRouter::new(Route::SignIn);
        assert!(router.current().is_route(Route::SignIn));

        router.replace(Route::Home);
        assert!(router.current().is_route(Route::Home));
    }
}
