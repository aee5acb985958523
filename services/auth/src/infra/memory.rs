use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::repository::AuthCodeStore;
use crate::domain::types::{AuthCodeRecord, CodeKey};

/// Process-local [`AuthCodeStore`] backed by a mutex-guarded map.
///
/// Cloning shares the underlying map. The lock is never held across an `.await`.
#[derive(Clone, Default)]
pub struct InMemoryAuthCodeStore {
    records: Arc<Mutex<HashMap<CodeKey, AuthCodeRecord>>>,
}

impl InMemoryAuthCodeStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Every critical section leaves the map consistent, so a panic elsewhere
    // while holding the lock does not invalidate its contents.
    fn lock(&self) -> MutexGuard<'_, HashMap<CodeKey, AuthCodeRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl AuthCodeStore for InMemoryAuthCodeStore {
    fn put(&self, record: AuthCodeRecord) -> Option<AuthCodeRecord> {
        self.lock().insert(record.key.clone(), record)
    }

    fn with_record<R>(
        &self,
        key: &CodeKey,
        f: impl FnOnce(&mut Option<AuthCodeRecord>) -> R,
    ) -> R {
        let mut records = self.lock();
        let mut slot = records.remove(key);
        let out = f(&mut slot);
        if let Some(record) = slot {
            records.insert(key.clone(), record);
        }
        out
    }

    fn evict_where(&self, mut evict: impl FnMut(&AuthCodeRecord) -> bool) -> usize {
        let mut records = self.lock();
        let before = records.len();
        records.retain(|_, record| !evict(record));
        before - records.len()
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
