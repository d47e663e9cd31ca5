use std::sync::Arc;

use log::info;

use crate::cache::UsersCache;
use crate::storage::{KeyValueStore, StorageResult};

/// Storage key of the sign-in flag.
pub const AUTH_FLAG_KEY: &str = "isAuthenticated";

/// Sign-in state backed by the same store as the users cache.
///
/// Sign-in is simulated: any email is accepted and no credential is checked.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn KeyValueStore>,
    cache: UsersCache,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        let cache = UsersCache::new(store.clone());
        Self { store, cache }
    }

    /// Drops the users cache, so the next dashboard load fetches fresh data,
    /// then marks the session signed in. The flag is left alone if the cache
    /// could not be dropped.
    pub fn sign_in(&self, email: &str) -> StorageResult<()> {
        self.cache.invalidate()?;
        self.store.set(AUTH_FLAG_KEY, "true")?;
        info!("Signed in as {email}");
        Ok(())
    }

    /// A store that cannot be read counts as signed out.
    pub fn is_authenticated(&self) -> bool {
        matches!(self.store.get(AUTH_FLAG_KEY), Ok(Some(flag)) if flag == "true")
    }
}
