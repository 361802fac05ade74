//! Session-scoped ownership of dashboard watches.

use bsa_core::{CategoryStats, RecordFilter, WasteRecord};

use crate::subscriptions::Subscription;
use crate::Database;

/// Holds the live watches of one dashboard view: at most one stats watch
/// and one record-list watch. Replacing a watch releases the previous one;
/// [`DashboardSession::teardown`] releases both.
#[derive(Default)]
pub struct DashboardSession {
    stats: Option<Subscription>,
    records: Option<Subscription>,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn watch_stats<F>(&mut self, db: &Database, callback: F)
    where
        F: Fn(&CategoryStats) + Send + Sync + 'static,
    {
        self.stats = Some(db.subscribe_stats(callback));
    }

    pub fn watch_records<F>(&mut self, db: &Database, filter: RecordFilter, callback: F)
    where
        F: Fn(&[WasteRecord]) + Send + Sync + 'static,
    {
        self.records = Some(db.subscribe_records(filter, callback));
    }

    pub fn is_active(&self) -> bool {
        self.stats.is_some() || self.records.is_some()
    }

    /// Release every watch held by this session.
    pub fn teardown(&mut self) {
        if let Some(sub) = self.stats.take() {
            sub.unsubscribe();
        }
        if let Some(sub) = self.records.take() {
            sub.unsubscribe();
        }
    }
}
