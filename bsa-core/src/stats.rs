//! Running totals per waste category and month-over-month change.

use bsa_utils::numbers::round1;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::category::WasteCategory;

/// Running total and monthly change for one category.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// Cumulative weight in kilograms.
    pub total: f64,
    /// Percentage change of this month over last month, one decimal.
    pub monthly_change: f64,
}

/// The `stats/current` aggregate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryStats {
    #[serde(rename = "organik")]
    pub organic: CategoryTotal,
    #[serde(rename = "anorganik")]
    pub inorganic: CategoryTotal,
    #[serde(rename = "b3")]
    pub hazardous: CategoryTotal,
    pub last_updated: Option<NaiveDateTime>,
}

impl CategoryStats {
    pub fn get(&self, category: WasteCategory) -> &CategoryTotal {
        match category {
            WasteCategory::Organic => &self.organic,
            WasteCategory::Inorganic => &self.inorganic,
            WasteCategory::Hazardous => &self.hazardous,
        }
    }

    pub fn get_mut(&mut self, category: WasteCategory) -> &mut CategoryTotal {
        match category {
            WasteCategory::Organic => &mut self.organic,
            WasteCategory::Inorganic => &mut self.inorganic,
            WasteCategory::Hazardous => &mut self.hazardous,
        }
    }

    /// Sum of all three category totals.
    pub fn combined_total(&self) -> f64 {
        self.organic.total + self.inorganic.total + self.hazardous.total
    }

    /// Sum of the totals that feed the environmental impact estimate.
    pub fn impact_basis(&self) -> f64 {
        WasteCategory::ALL
            .iter()
            .filter(|c| c.counts_toward_impact())
            .map(|c| self.get(*c).total)
            .sum()
    }
}

/// Per-category weight sums for one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MonthTotals {
    pub organic: f64,
    pub inorganic: f64,
    pub hazardous: f64,
}

impl MonthTotals {
    pub fn get(&self, category: WasteCategory) -> f64 {
        match category {
            WasteCategory::Organic => self.organic,
            WasteCategory::Inorganic => self.inorganic,
            WasteCategory::Hazardous => self.hazardous,
        }
    }

    pub fn add(&mut self, category: WasteCategory, weight: f64) {
        match category {
            WasteCategory::Organic => self.organic += weight,
            WasteCategory::Inorganic => self.inorganic += weight,
            WasteCategory::Hazardous => self.hazardous += weight,
        }
    }
}

/// Percentage change from `last_month` to `this_month`, rounded to one
/// decimal. Zero when last month had no weight.
pub fn monthly_change(last_month: f64, this_month: f64) -> f64 {
    monthly_change_checked(last_month, this_month).unwrap_or(0.0)
}

/// Like [`monthly_change`] but returns `None` when there is no prior-month
/// weight to compare against.
pub fn monthly_change_checked(last_month: f64, this_month: f64) -> Option<f64> {
    if last_month > 0.0 {
        Some(round1((this_month - last_month) / last_month * 100.0))
    } else {
        None
    }
}
