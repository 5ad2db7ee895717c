//! Session token persistence.
//!
//! This module provides the `TokenCache`, a dual-backend store for session
//! tokens. The secure backend is the OS keychain; the general backend is a
//! JSON file under the cache directory, keeping a session usable on machines
//! where the keychain is not. On platforms without local storage there is no
//! cache at all and sessions do not survive a restart.

pub mod token;

pub use token::{FileBackend, KeyringBackend, MemoryBackend, TokenBackend, TokenCache};
