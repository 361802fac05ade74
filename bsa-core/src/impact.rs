//! Environmental impact estimates derived from the category totals.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::stats::CategoryStats;

/// Trees saved per kilogram of recycled waste.
pub const TREES_PER_KG: f64 = 0.05;

/// Energy saved per kilogram of recycled waste, in kWh.
pub const KWH_PER_KG: f64 = 2.0;

/// CO2 avoided per kilogram of recycled waste, in kg.
pub const CO2_KG_PER_KG: f64 = 0.8;

/// The `environmental_impact/current` aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnvironmentalImpact {
    pub trees_saved: i64,
    /// kWh
    pub energy_saved: i64,
    /// kg CO2
    pub co2_reduced: i64,
    pub last_updated: Option<NaiveDateTime>,
}

impl EnvironmentalImpact {
    /// Estimate from a recycled weight (organic + inorganic, in kg).
    pub fn from_weight(recycled_kg: f64, last_updated: Option<NaiveDateTime>) -> Self {
        Self {
            trees_saved: (recycled_kg * TREES_PER_KG).round() as i64,
            energy_saved: (recycled_kg * KWH_PER_KG).round() as i64,
            co2_reduced: (recycled_kg * CO2_KG_PER_KG).round() as i64,
            last_updated,
        }
    }

    /// Estimate from the category stats. Hazardous weight is ignored.
    pub fn from_stats(stats: &CategoryStats, last_updated: Option<NaiveDateTime>) -> Self {
        Self::from_weight(stats.impact_basis(), last_updated)
    }
}
