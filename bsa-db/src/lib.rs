//! SQLite storage layer for Portal BSA (Bank Sampah Adiwiyata).
//!
//! This crate owns the record collection and the two derived aggregate
//! documents, and exposes the services built on them:
//!
//! - **Aggregation** ([`records`]): insert, update and delete records while
//!   keeping running totals, monthly changes and the environmental impact
//!   estimate in step. Each mutation runs in one SQLite transaction.
//! - **Queries** ([`queries`]): filtered record lists, the monthly chart
//!   series, the composition snapshot and exports. Read failures are logged
//!   and surface as empty results.
//! - **Live subscriptions** ([`subscriptions`]): callbacks that receive a
//!   full snapshot immediately and after every committed write.
//!
//! # Usage
//!
//! ```rust
//! use bsa_core::{NewRecord, RecordFilter, WasteCategory};
//! use bsa_db::Database;
//!
//! let db = Database::new().unwrap();
//! let id = db.insert_record(NewRecord::new(WasteCategory::Organic, 24.5)).unwrap();
//!
//! let stats = db.stats().unwrap();
//! assert!((stats.organic.total - 24.5).abs() < 0.01);
//!
//! let organic = db.list_records(&RecordFilter::default().category(WasteCategory::Organic));
//! assert_eq!(organic[0].id, id);
//! ```
//!
//! # Tables
//!
//! See [`schema::create_schema`] for the full SQL schema.

mod aggregates;
mod loader;
pub mod models;
mod queries;
mod records;
pub mod schema;
pub mod session;
pub mod subscriptions;

pub use loader::SAMPLE_RECORDS_CSV;
pub use session::DashboardSession;
pub use subscriptions::Subscription;

use bsa_core::{Clock, SystemClock};
use chrono::NaiveDateTime;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use subscriptions::SubscriptionHub;

/// Handle to the Portal BSA store.
///
/// Cheaply cloneable; clones share the connection, the clock and the
/// subscription registry. The connection sits behind a mutex so writes are
/// serialised and each compound mutation sees a consistent store.
///
/// # Example
///
/// ```rust
/// use bsa_db::Database;
///
/// let db = Database::new().unwrap();
/// let db2 = db.clone();
/// db.load_records_csv(bsa_db::SAMPLE_RECORDS_CSV).unwrap();
/// assert_eq!(db2.count_records(), 10);
/// ```
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
    clock: Arc<dyn Clock>,
    hub: Arc<SubscriptionHub>,
}

impl Database {
    /// Create a new in-memory database with the full schema applied.
    pub fn new() -> bsa_core::Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    /// Open (or create) a database file and apply the schema.
    pub fn open(path: impl AsRef<Path>) -> bsa_core::Result<Self> {
        let path = path.as_ref();
        log::info!("[BSA Debug] db: opening {}", path.display());
        Self::from_connection(Connection::open(path)?)
    }

    fn from_connection(conn: Connection) -> bsa_core::Result<Self> {
        conn.execute_batch(schema::create_schema())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            clock: Arc::new(SystemClock),
            hub: Arc::new(SubscriptionHub::default()),
        })
    }

    /// Replace the clock used for store timestamps and "today".
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub(crate) fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
