use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BsaError;

/// Classification of a weighed waste batch.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WasteCategory {
    #[serde(rename = "organik", alias = "organic")]
    Organic,
    #[serde(rename = "anorganik", alias = "inorganic")]
    Inorganic,
    /// Hazardous waste (B3). Excluded from environmental impact estimates.
    #[serde(rename = "b3", alias = "hazardous")]
    Hazardous,
}

impl WasteCategory {
    /// All categories in display order.
    pub const ALL: [WasteCategory; 3] = [
        WasteCategory::Organic,
        WasteCategory::Inorganic,
        WasteCategory::Hazardous,
    ];

    /// Token persisted in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "organik",
            WasteCategory::Inorganic => "anorganik",
            WasteCategory::Hazardous => "b3",
        }
    }

    /// Chart label.
    pub fn label(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "Organik",
            WasteCategory::Inorganic => "Anorganik",
            WasteCategory::Hazardous => "B3",
        }
    }

    /// Column prefix in the `stats` table, e.g. `organic_total`.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            WasteCategory::Organic => "organic",
            WasteCategory::Inorganic => "inorganic",
            WasteCategory::Hazardous => "hazardous",
        }
    }

    /// Whether this category counts toward the environmental impact estimate.
    pub fn counts_toward_impact(&self) -> bool {
        !matches!(self, WasteCategory::Hazardous)
    }
}

impl fmt::Display for WasteCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WasteCategory {
    type Err = BsaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "organik" | "organic" => Ok(WasteCategory::Organic),
            "anorganik" | "inorganic" => Ok(WasteCategory::Inorganic),
            "b3" | "hazardous" => Ok(WasteCategory::Hazardous),
            other => Err(BsaError::Validation(format!(
                "unknown waste category '{}'",
                other
            ))),
        }
    }
}
