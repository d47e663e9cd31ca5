use std::sync::Arc;

use log::{debug, warn};

use crate::storage::{KeyValueStore, StorageResult};
use crate::user::User;

/// Storage key of the cached users collection.
pub const USERS_CACHE_KEY: &str = "lendsqr_users";

/// The full, unfiltered users collection as last fetched.
///
/// There is no expiry: the entry lives until [`invalidate`](Self::invalidate)
/// is called, which happens on sign-in.
#[derive(Clone)]
pub struct UsersCache {
    store: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for UsersCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UsersCache")
            .field("key", &USERS_CACHE_KEY)
            .finish_non_exhaustive()
    }
}

impl UsersCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Returns the cached collection, or `None` on a miss.
    ///
    /// Unreadable or malformed entries count as a miss. A malformed entry is
    /// also cleared so the next successful fetch replaces it.
    pub fn load(&self) -> Option<Vec<User>> {
        let raw = match self.store.get(USERS_CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Users cache unreadable, treating as miss: {e}");
                return None;
            }
        };

        match serde_json::from_str::<Vec<User>>(&raw) {
            Ok(users) => {
                debug!("Users cache hit: {} record(s)", users.len());
                Some(users)
            }
            Err(e) => {
                warn!("Discarding malformed users cache entry: {e}");
                if let Err(e) = self.invalidate() {
                    warn!("Failed to clear malformed users cache entry: {e}");
                }
                None
            }
        }
    }

    /// Overwrites the cached collection.
    pub fn store(&self, users: &[User]) -> StorageResult<()> {
        let raw = serde_json::to_string(users)?;
        self.store.set(USERS_CACHE_KEY, &raw)
    }

    pub fn invalidate(&self) -> StorageResult<()> {
        self.store.remove(USERS_CACHE_KEY)
    }
}
