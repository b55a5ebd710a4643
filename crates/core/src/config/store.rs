use std::sync::{Arc, RwLock};

use super::types::Config;

/// Holder for the current configuration snapshot.
///
/// Readers clone an `Arc` and keep working against a consistent snapshot;
/// a reload replaces the whole snapshot at once, so concurrent readers
/// never observe a partially updated configuration.
#[derive(Debug)]
pub struct ConfigStore {
    inner: RwLock<Arc<Config>>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        Self {
            inner: RwLock::new(Arc::new(config)),
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<Config> {
        self.inner.read().expect("config store poisoned").clone()
    }

    /// Swap in a new snapshot, returning the previous one.
    pub fn replace(&self, config: Config) -> Arc<Config> {
        let mut guard = self.inner.write().expect("config store poisoned");
        std::mem::replace(&mut *guard, Arc::new(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_is_stable_across_replace() {
        let store = ConfigStore::new(Config::default());
        let before = store.snapshot();
        assert_eq!(before.admin_user_id, None);

        let mut updated = Config::default();
        updated.admin_user_id = Some(42);
        let previous = store.replace(updated);

        // The old snapshot a reader holds is unchanged.
        assert_eq!(before.admin_user_id, None);
        assert_eq!(previous.admin_user_id, None);
        assert_eq!(store.snapshot().admin_user_id, Some(42));
    }
}
