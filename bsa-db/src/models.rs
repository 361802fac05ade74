//! Query result model structs for charts, tables and exports.
//!
//! All structs derive `Serialize` so the presentation layer can hand them
//! to a chart widget as JSON.

use bsa_core::{CategoryStats, EnvironmentalImpact, WasteCategory, WasteRecord};
use chrono::NaiveDateTime;
use serde::Serialize;

/// Summed weight per category for each month of one calendar year.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MonthlySeries {
    pub year: i32,
    /// Short month labels, January first.
    pub labels: Vec<String>,
    #[serde(rename = "organik")]
    pub organic: [f64; 12],
    #[serde(rename = "anorganik")]
    pub inorganic: [f64; 12],
    #[serde(rename = "b3")]
    pub hazardous: [f64; 12],
}

impl MonthlySeries {
    pub fn empty(year: i32) -> Self {
        Self {
            year,
            labels: bsa_core::MONTH_LABELS.iter().map(|s| s.to_string()).collect(),
            organic: [0.0; 12],
            inorganic: [0.0; 12],
            hazardous: [0.0; 12],
        }
    }

    pub fn series(&self, category: WasteCategory) -> &[f64; 12] {
        match category {
            WasteCategory::Organic => &self.organic,
            WasteCategory::Inorganic => &self.inorganic,
            WasteCategory::Hazardous => &self.hazardous,
        }
    }

    /// Add `weight` to the bucket for `month0` (0 = January).
    pub(crate) fn add(&mut self, category: WasteCategory, month0: usize, weight: f64) {
        let series = match category {
            WasteCategory::Organic => &mut self.organic,
            WasteCategory::Inorganic => &mut self.inorganic,
            WasteCategory::Hazardous => &mut self.hazardous,
        };
        if let Some(bucket) = series.get_mut(month0) {
            *bucket += weight;
        }
    }
}

/// Category totals and their share of the combined total, for the
/// composition (doughnut) chart.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompositionSnapshot {
    /// `Organik`, `Anorganik`, `B3`
    pub labels: [&'static str; 3],
    /// Totals in kg, same order as `labels`.
    pub data: [f64; 3],
    /// Percentages rounded to one decimal; all zero when nothing is recorded.
    pub percentages: [f64; 3],
}

impl CompositionSnapshot {
    pub fn percentage(&self, category: WasteCategory) -> f64 {
        self.percentages[index_of(category)]
    }

    pub fn total(&self, category: WasteCategory) -> f64 {
        self.data[index_of(category)]
    }
}

fn index_of(category: WasteCategory) -> usize {
    match category {
        WasteCategory::Organic => 0,
        WasteCategory::Inorganic => 1,
        WasteCategory::Hazardous => 2,
    }
}

/// Record count plus both aggregates, for the admin stats report.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StoreSummary {
    pub record_count: usize,
    pub stats: CategoryStats,
    pub environmental_impact: EnvironmentalImpact,
}

/// Full export of the store.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExportSnapshot {
    pub export_date: NaiveDateTime,
    pub stats: CategoryStats,
    pub records: Vec<WasteRecord>,
    pub environmental_impact: EnvironmentalImpact,
}

impl ExportSnapshot {
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_series_has_twelve_labels() {
        let series = MonthlySeries::empty(2024);
        assert_eq!(series.labels.len(), 12);
        assert_eq!(series.labels[4], "Mei");
        assert_eq!(series.labels[11], "Des");
        assert!(series.organic.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn series_add_ignores_out_of_range_month() {
        let mut series = MonthlySeries::empty(2024);
        series.add(WasteCategory::Inorganic, 2, 3.5);
        series.add(WasteCategory::Inorganic, 12, 100.0);
        assert!((series.series(WasteCategory::Inorganic)[2] - 3.5).abs() < 0.01);
        assert!(series.series(WasteCategory::Inorganic).iter().sum::<f64>() < 3.6);
    }

    #[test]
    fn series_serializes_with_store_keys() {
        let json = serde_json::to_value(MonthlySeries::empty(2024)).unwrap();
        assert!(json.get("organik").is_some());
        assert!(json.get("anorganik").is_some());
        assert!(json.get("b3").is_some());
    }
}
