//! In-process read-through cache owned by [`ProfileStore`](super::ProfileStore).
//!
//! The cache is only coherent within one process: another process writing
//! the same table is not observed until the entry is evicted.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::CachePolicy;

use super::model::{Profile, UserId};

#[derive(Debug)]
pub struct ProfileCache {
    policy: CachePolicy,
    entries: Mutex<HashMap<UserId, Profile>>,
}

impl ProfileCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn get(&self, user_id: &UserId) -> Option<Profile> {
        if self.policy == CachePolicy::Disabled {
            return None;
        }
        self.entries().get(user_id).cloned()
    }

    /// Stores a record read from the table.
    pub fn fill(&self, user_id: &UserId, profile: &Profile) {
        if self.policy == CachePolicy::Disabled {
            return;
        }
        self.entries().insert(user_id.clone(), profile.clone());
    }

    /// Applies the invalidation policy after a successful save.
    pub fn record_save(&self, user_id: &UserId, merged: &Profile) {
        match self.policy {
            CachePolicy::WriteThrough => {
                self.entries().insert(user_id.clone(), merged.clone());
            }
            CachePolicy::Invalidate => self.evict(user_id),
            CachePolicy::Disabled => {}
        }
    }

    pub fn evict(&self, user_id: &UserId) {
        self.entries().remove(user_id);
    }

    pub fn clear(&self) {
        self.entries().clear();
    }

    pub fn len(&self) -> usize {
        self.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<UserId, Profile>> {
        // A panic while holding the guard cannot leave a half-written entry.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
