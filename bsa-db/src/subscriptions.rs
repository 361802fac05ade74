//! Live subscriptions to the stats aggregate and to filtered record lists.
//!
//! A subscriber receives the full current snapshot as soon as it subscribes
//! and again after every committed write through any clone of the
//! [`Database`]. There is no delta delivery. Callbacks run on the writer's
//! thread after its transaction committed and after the connection lock was
//! released, so a callback may query the database. Deliveries are
//! serialised: each one reads the store after every earlier delivery
//! finished, so the last snapshot a watch receives is never older than the
//! last committed write. A callback must not write through the database,
//! since the write's own delivery would wait on the one in progress.
//!
//! Dropping the returned [`Subscription`] (or calling
//! [`Subscription::unsubscribe`]) releases the watch.

use bsa_core::{CategoryStats, RecordFilter, WasteRecord};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::Database;

type StatsCallback = Arc<dyn Fn(&CategoryStats) + Send + Sync>;
type RecordsCallback = Arc<dyn Fn(&[WasteRecord]) + Send + Sync>;

#[derive(Clone)]
enum Watch {
    Stats(StatsCallback),
    Records {
        filter: RecordFilter,
        callback: RecordsCallback,
    },
}

/// Registry of active watches, shared by every clone of a database.
#[derive(Default)]
pub(crate) struct SubscriptionHub {
    next_id: AtomicU64,
    watches: Mutex<BTreeMap<u64, Watch>>,
    /// Held while snapshots are read and delivered.
    delivery: Mutex<()>,
}

impl SubscriptionHub {
    fn watches(&self) -> MutexGuard<'_, BTreeMap<u64, Watch>> {
        self.watches.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn delivery(&self) -> MutexGuard<'_, ()> {
        self.delivery.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn register(&self, watch: Watch) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.watches().insert(id, watch);
        id
    }

    fn remove(&self, id: u64) -> bool {
        self.watches().remove(&id).is_some()
    }

    fn snapshot(&self) -> Vec<Watch> {
        self.watches().values().cloned().collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.watches().len()
    }
}

/// Handle to an active watch. The watch ends when the handle is dropped.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    hub: Weak<SubscriptionHub>,
}

impl Subscription {
    /// Stop further callbacks and release the watch.
    pub fn unsubscribe(self) {
        drop(self);
    }

    /// Whether the watch is still registered.
    pub fn is_active(&self) -> bool {
        self.hub
            .upgrade()
            .map(|hub| hub.watches().contains_key(&self.id))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(hub) = self.hub.upgrade() {
            if hub.remove(self.id) {
                log::debug!("[BSA Debug] subscriptions: watch {} released", self.id);
            }
        }
    }
}

impl Database {
    /// Watch the category stats.
    pub fn subscribe_stats<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&CategoryStats) + Send + Sync + 'static,
    {
        let callback: StatsCallback = Arc::new(callback);
        let _delivery = self.hub.delivery();
        if let Some(stats) = self.stats() {
            callback(&stats);
        }
        let id = self.hub.register(Watch::Stats(callback));
        log::debug!("[BSA Debug] subscriptions: stats watch {} registered", id);
        Subscription {
            id,
            hub: Arc::downgrade(&self.hub),
        }
    }

    /// Watch the records matching `filter`, as [`Database::list_records`]
    /// would return them.
    pub fn subscribe_records<F>(&self, filter: RecordFilter, callback: F) -> Subscription
    where
        F: Fn(&[WasteRecord]) + Send + Sync + 'static,
    {
        let callback: RecordsCallback = Arc::new(callback);
        let _delivery = self.hub.delivery();
        callback(&self.list_records(&filter));
        let id = self.hub.register(Watch::Records { filter, callback });
        log::debug!("[BSA Debug] subscriptions: records watch {} registered", id);
        Subscription {
            id,
            hub: Arc::downgrade(&self.hub),
        }
    }

    /// Number of live watches.
    pub fn active_subscriptions(&self) -> usize {
        self.hub.len()
    }

    /// Deliver fresh snapshots to every watch. Called after each commit.
    pub(crate) fn publish(&self) {
        let _delivery = self.hub.delivery();
        let watches = self.hub.snapshot();
        if watches.is_empty() {
            return;
        }
        let mut stats: Option<Option<CategoryStats>> = None;
        for watch in watches {
            match watch {
                Watch::Stats(callback) => {
                    let current = stats.get_or_insert_with(|| self.stats());
                    if let Some(current) = current.as_ref() {
                        callback(current);
                    }
                }
                Watch::Records { filter, callback } => {
                    callback(&self.list_records(&filter));
                }
            }
        }
    }
}
