//! Test doubles for navigation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::router::{Location, Route, Router};

/// Router that records every replace call.
pub struct RecordingRouter {
    current: Mutex<Location>,
    replace_count: AtomicUsize,
}

impl RecordingRouter {
    pub fn new(initial: Route) -> Self {
        Self {
            current: Mutex::new(initial.location()),
            replace_count: AtomicUsize::new(0),
        }
    }

    pub fn replaces(&self) -> usize {
        self.replace_count.load(Ordering::SeqCst)
    }
}

impl Router for RecordingRouter {
    fn current(&self) -> Location {
        self.current.lock().unwrap().clone()
    }

    fn replace(&self, to: Route) {
        self.replace_count.fetch_add(1, Ordering::SeqCst);
        *self.current.lock().unwrap() = to.location();
    }
}
