//! Single-slot in-memory catalog cache

use std::sync::{Arc, Mutex, MutexGuard};

use crate::state::FetchResult;

#[derive(Debug, Default)]
struct Slot {
    request_id: u64,
    result: Option<FetchResult>,
}

/// Cloneable handle to one cached [`FetchResult`].
///
/// There is no key and no expiry: a store overwrites whatever the slot held,
/// unless it comes from an older request than the stored one.
#[derive(Clone, Debug, Default)]
pub struct CatalogCache {
    slot: Arc<Mutex<Slot>>,
}

impl CatalogCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<FetchResult> {
        self.lock().result.clone()
    }

    /// Returns false if `request_id` is older than the stored result.
    pub fn store(&self, request_id: u64, result: FetchResult) -> bool {
        let mut slot = self.lock();
        if slot.result.is_some() && request_id < slot.request_id {
            return false;
        }
        slot.request_id = request_id;
        slot.result = Some(result);
        true
    }

    pub fn invalidate(&self) {
        let mut slot = self.lock();
        slot.result = None;
    }

    pub fn is_empty(&self) -> bool {
        self.lock().result.is_none()
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
