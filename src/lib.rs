//! Core library for Platewise - identity flows, token cache, session gate,
//! and profile sync for the calorie-tracking client.
//!
//! The crate wires a hosted identity provider (email/password plus Google
//! OAuth) to a write-once user-profile upsert against a cloud document
//! store, persists session tokens across restarts, and gates navigation on
//! sign-in state. Rendering is out of scope: `screens` holds display-free
//! controllers that any shell can drive.

pub mod app;
pub mod auth;
pub mod cache;
pub mod config;
pub mod nav;
pub mod profile;
pub mod screens;

pub use auth::{AuthSnapshot, AuthUser, SessionManager};
pub use cache::TokenCache;
pub use nav::{decide_navigation, AuthStatus, NavigationCommand, Route, SessionGate};
pub use profile::{save_user_profile, UserProfile};
