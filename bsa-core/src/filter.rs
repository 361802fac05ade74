use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::category::WasteCategory;
use crate::record::{RecordStatus, WasteRecord};

/// Optional constraints for listing and watching records. No field is
/// mandatory; an empty filter matches everything.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordFilter {
    #[serde(rename = "type")]
    pub category: Option<WasteCategory>,
    pub status: Option<RecordStatus>,
    /// Inclusive lower bound on the record date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper bound on the record date.
    pub end_date: Option<NaiveDate>,
    /// Maximum number of records. `None` or `Some(0)` means no limit.
    pub limit: Option<usize>,
}

impl RecordFilter {
    pub fn category(mut self, category: WasteCategory) -> Self {
        self.category = Some(category);
        self
    }

    pub fn status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn between(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Whether `record` satisfies every constraint except `limit`.
    pub fn matches(&self, record: &WasteRecord) -> bool {
        self.category.is_none_or(|c| c == record.category)
            && self.status.is_none_or(|s| s == record.status)
            && self.start_date.is_none_or(|d| record.date >= d)
            && self.end_date.is_none_or(|d| record.date <= d)
    }
}
