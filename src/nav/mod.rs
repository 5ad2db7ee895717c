//! Navigation model and the auth-gated redirect.
//!
//! This module provides:
//! - `Route` / `Location`: the app's two screen areas as segment paths
//! - `Router`: the replace-only navigation port, with an in-memory impl
//! - `decide_navigation` / `SessionGate`: the level-triggered guard that
//!   keeps signed-out users on the auth screens and signed-in users off them

pub mod gate;
pub mod router;

#[cfg(test)]
pub mod testing;

pub use gate::{decide_navigation, AuthStatus, NavigationCommand, SessionGate};
pub use router::{Location, MemoryRouter, Route, Router, ScreenArea};
