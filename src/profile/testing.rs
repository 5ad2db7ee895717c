//! In-memory profile store double.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use super::store::{ProfileError, ProfileRecord, ProfileStore};
use super::upsert::UserProfile;

/// Profile store that records every call.
#[derive(Default)]
pub struct RecordingStore {
    pub records: Mutex<HashMap<String, ProfileRecord>>,
    fetch_calls: AtomicUsize,
    create_calls: AtomicUsize,
    fetch_broken: AtomicBool,
    create_broken: AtomicBool,
}

impl RecordingStore {
    pub fn fetches(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn creates(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn break_fetch(&self) {
        self.fetch_broken.store(true, Ordering::SeqCst);
    }

    pub fn break_create(&self) {
        self.create_broken.store(true, Ordering::SeqCst);
    }

    /// Insert a record directly, bypassing the counters.
    pub fn seed(&self, profile: &UserProfile) {
        self.records.lock().unwrap().insert(
            profile.id.clone(),
            ProfileRecord {
                external_id: profile.id.clone(),
                email: profile.email.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                created_at: Some(Utc::now()),
            },
        );
    }
}

#[async_trait]
impl ProfileStore for RecordingStore {
    async fn fetch(&self, id: &str) -> Result<Option<ProfileRecord>, ProfileError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if self.fetch_broken.load(Ordering::SeqCst) {
            return Err(ProfileError::ServerError("store offline".to_string()));
        }
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn create(&self, profile: &UserProfile) -> Result<(), ProfileError> {
        if self.create_broken.load(Ordering::SeqCst) {
            return Err(ProfileError::AccessDenied("write rejected".to_string()));
        }
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().insert(
            profile.id.clone(),
            ProfileRecord {
                external_id: profile.id.clone(),
                email: profile.email.clone(),
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                created_at: Some(Utc::now()),
            },
        );
        Ok(())
    }
}
