//! Process-wide read model of the branding configuration.
//!
//! One [`ConfigCache`] is built at startup and shared through the app state.
//! It starts out holding the built-in defaults, so readers always get a
//! complete snapshot even before the first refresh lands.

use crate::common::error::{ServiceResult, settings_store_unavailable};
use crate::models::settings::ConfigSnapshot;
use crate::repositories::settings::SettingsStore;
use hashbrown::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error};
use uuid::Uuid;

pub type SubscriptionId = Uuid;
type Handler = Arc<dyn Fn(&Arc<ConfigSnapshot>) + Send + Sync>;

pub struct ConfigCache {
    store: Arc<dyn SettingsStore>,
    snapshot: watch::Sender<Arc<ConfigSnapshot>>,
    handlers: Mutex<HashMap<SubscriptionId, Handler>>,
    loaded: AtomicBool,
    /// Handed out to each refresh before it reads the store
    next_generation: AtomicU64,
    /// Generation of the published snapshot; only written under the watch lock
    published_generation: AtomicU64,
}

impl ConfigCache {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        let (snapshot, _) = watch::channel(Arc::new(ConfigSnapshot::default()));
        Self {
            store,
            snapshot,
            handlers: Mutex::new(HashMap::new()),
            loaded: AtomicBool::new(false),
            next_generation: AtomicU64::new(1),
            published_generation: AtomicU64::new(0),
        }
    }

    /// The last published snapshot. Never blocks on the store.
    pub fn current(&self) -> Arc<ConfigSnapshot> {
        self.snapshot.borrow().clone()
    }

    /// Whether a refresh has ever succeeded.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Re-reads the store and publishes the result. On failure the previous
    /// snapshot stays published and is returned.
    pub async fn refresh(&self) -> Arc<ConfigSnapshot> {
        match self.try_refresh().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                error!("Error loading system settings, keeping last snapshot: {e:?}");
                self.current()
            }
        }
    }

    /// Like [`ConfigCache::refresh`], but reports store failures.
    ///
    /// Overlapping refreshes publish in the order they started reading. A
    /// refresh overtaken by a later one returns the later snapshot.
    pub async fn try_refresh(&self) -> ServiceResult<Arc<ConfigSnapshot>> {
        let generation = self.next_generation.fetch_add(1, Ordering::AcqRel);
        let entries = match self.store.fetch_all().await {
            Ok(entries) => entries,
            Err(e) => return settings_store_unavailable(e),
        };
        let snapshot = Arc::new(ConfigSnapshot::from_entries(&entries));
        Ok(self.publish(generation, snapshot))
    }

    /// Registers `handler` to be called with every newly published snapshot.
    pub fn subscribe<F>(&self, handler: F) -> SubscriptionId
    where
        F: Fn(&Arc<ConfigSnapshot>) + Send + Sync + 'static,
    {
        let id = Uuid::new_v4();
        self.handlers().insert(id, Arc::new(handler));
        id
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.handlers().remove(&id).is_some()
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers().len()
    }

    /// A receiver that observes every published snapshot.
    pub fn watch(&self) -> watch::Receiver<Arc<ConfigSnapshot>> {
        self.snapshot.subscribe()
    }

    /// Drops every subscriber. The last snapshot stays readable.
    pub fn close(&self) {
        self.handlers().clear();
    }

    fn publish(&self, generation: u64, snapshot: Arc<ConfigSnapshot>) -> Arc<ConfigSnapshot> {
        let published = self.snapshot.send_if_modified(|current| {
            if generation <= self.published_generation.load(Ordering::Acquire) {
                return false;
            }
            self.published_generation.store(generation, Ordering::Release);
            *current = snapshot.clone();
            true
        });
        if !published {
            debug!(generation, "Discarding snapshot overtaken by a newer refresh");
            return self.current();
        }
        self.loaded.store(true, Ordering::Release);

        // handlers may subscribe or unsubscribe, so call them outside the lock
        let handlers: Vec<Handler> = self.handlers().values().cloned().collect();
        for handler in handlers {
            handler(&snapshot);
        }
        snapshot
    }

    fn handlers(&self) -> MutexGuard<'_, HashMap<SubscriptionId, Handler>> {
        self.handlers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
