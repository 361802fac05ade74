//! Core types for the Portal BSA (Bank Sampah Adiwiyata) waste bank.
//!
//! Records of weighed waste, the per-category running totals derived from
//! them, the environmental impact estimate, list filters, and the error
//! taxonomy shared by the storage and command crates.

pub mod category;
pub mod clock;
pub mod error;
pub mod filter;
pub mod impact;
pub mod record;
mod sql;
pub mod stats;

pub use category::WasteCategory;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{BsaError, Result};
pub use filter::RecordFilter;
pub use impact::EnvironmentalImpact;
pub use record::{NewRecord, RecordFields, RecordPatch, RecordStatus, WasteRecord};
pub use stats::{CategoryStats, CategoryTotal, MonthTotals};

/// Short month labels used by the monthly chart.
pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

/// Maximum number of records included in a JSON export.
pub const EXPORT_RECORD_LIMIT: usize = 1000;
