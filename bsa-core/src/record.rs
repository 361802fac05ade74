//! Waste-weighing records and the inputs used to create and patch them.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::category::WasteCategory;
use crate::error::{BsaError, Result};

/// Officer name used when none is supplied.
pub const DEFAULT_OFFICER: &str = "Admin Petugas";

/// Class label used when none is supplied.
pub const DEFAULT_CLASS: &str = "-";

/// Processing status of a record.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, Default, Serialize, Deserialize)]
pub enum RecordStatus {
    #[default]
    #[serde(rename = "selesai", alias = "done")]
    Done,
    #[serde(rename = "pending")]
    Pending,
}

impl RecordStatus {
    /// Token persisted in the `status` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Done => "selesai",
            RecordStatus::Pending => "pending",
        }
    }
}

impl fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordStatus {
    type Err = BsaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "selesai" | "done" => Ok(RecordStatus::Done),
            "pending" => Ok(RecordStatus::Pending),
            other => Err(BsaError::Validation(format!(
                "unknown record status '{}'",
                other
            ))),
        }
    }
}

/// A single weighing event as stored in `waste_records`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WasteRecord {
    pub id: String,
    pub date: NaiveDate,
    pub officer: String,
    pub class: String,
    #[serde(rename = "type")]
    pub category: WasteCategory,
    /// Weight in kilograms.
    pub weight: f64,
    pub status: RecordStatus,
    /// Store-assigned creation time; authoritative for ordering.
    pub timestamp: Option<NaiveDateTime>,
    /// Creation time as seen by the writer. Informational only.
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// Input for inserting a record. Only category and weight are required.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NewRecord {
    pub date: Option<NaiveDate>,
    pub officer: Option<String>,
    pub class: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<WasteCategory>,
    pub weight: Option<f64>,
    pub status: Option<RecordStatus>,
}

/// Fully-defaulted, validated record fields ready to persist.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFields {
    pub date: NaiveDate,
    pub officer: String,
    pub class: String,
    pub category: WasteCategory,
    pub weight: f64,
    pub status: RecordStatus,
}

impl NewRecord {
    pub fn new(category: WasteCategory, weight: f64) -> Self {
        Self {
            category: Some(category),
            weight: Some(weight),
            ..Self::default()
        }
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_officer(mut self, officer: impl Into<String>) -> Self {
        self.officer = Some(officer.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_status(mut self, status: RecordStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Apply defaults and validate. Blank officer and class strings fall back
    /// to their placeholders.
    pub fn into_fields(self, today: NaiveDate) -> Result<RecordFields> {
        let category = self
            .category
            .ok_or_else(|| BsaError::Validation("waste category is required".to_string()))?;
        let weight = self
            .weight
            .ok_or_else(|| BsaError::Validation("weight is required".to_string()))?;
        Ok(RecordFields {
            date: self.date.unwrap_or(today),
            officer: non_blank(self.officer).unwrap_or_else(|| DEFAULT_OFFICER.to_string()),
            class: non_blank(self.class).unwrap_or_else(|| DEFAULT_CLASS.to_string()),
            category,
            weight: validate_weight(weight)?,
            status: self.status.unwrap_or_default(),
        })
    }
}

/// Partial update for an existing record. Absent fields are left unchanged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    pub date: Option<NaiveDate>,
    pub officer: Option<String>,
    pub class: Option<String>,
    #[serde(rename = "type")]
    pub category: Option<WasteCategory>,
    pub weight: Option<f64>,
    pub status: Option<RecordStatus>,
}

impl RecordPatch {
    pub fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.officer.is_none()
            && self.class.is_none()
            && self.category.is_none()
            && self.weight.is_none()
            && self.status.is_none()
    }

    /// True when the patch changes a record's contribution to the aggregates.
    pub fn touches_aggregates(&self) -> bool {
        self.weight.is_some() || self.category.is_some()
    }

    /// Blank officer and class values become their placeholders, matching
    /// what an insert would store.
    pub fn normalized(mut self) -> Self {
        if self.officer.is_some() {
            self.officer = non_blank(self.officer).or_else(|| Some(DEFAULT_OFFICER.to_string()));
        }
        if self.class.is_some() {
            self.class = non_blank(self.class).or_else(|| Some(DEFAULT_CLASS.to_string()));
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(weight) = self.weight {
            validate_weight(weight)?;
        }
        Ok(())
    }
}

/// Weights must be finite and non-negative.
pub fn validate_weight(weight: f64) -> Result<f64> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(BsaError::Validation(format!(
            "weight must be a non-negative number of kilograms, got {}",
            weight
        )));
    }
    Ok(weight)
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, 20).unwrap()
    }

    #[test]
    fn new_record_applies_defaults() {
        let fields = NewRecord::new(WasteCategory::Organic, 24.5)
            .into_fields(today())
            .unwrap();
        assert_eq!(fields.date, today());
        assert_eq!(fields.officer, DEFAULT_OFFICER);
        assert_eq!(fields.class, DEFAULT_CLASS);
        assert_eq!(fields.status, RecordStatus::Done);
        assert!((fields.weight - 24.5).abs() < 0.001);
    }

    #[test]
    fn blank_officer_falls_back_to_placeholder() {
        let fields = NewRecord::new(WasteCategory::Inorganic, 1.0)
            .with_officer("   ")
            .with_class("7B")
            .into_fields(today())
            .unwrap();
        assert_eq!(fields.officer, DEFAULT_OFFICER);
        assert_eq!(fields.class, "7B");
    }

    #[test]
    fn missing_category_or_weight_is_rejected() {
        let no_category = NewRecord {
            weight: Some(3.0),
            ..NewRecord::default()
        };
        assert!(matches!(
            no_category.into_fields(today()),
            Err(BsaError::Validation(_))
        ));

        let no_weight = NewRecord {
            category: Some(WasteCategory::Hazardous),
            ..NewRecord::default()
        };
        assert!(matches!(
            no_weight.into_fields(today()),
            Err(BsaError::Validation(_))
        ));
    }

    #[test]
    fn negative_and_non_finite_weights_are_rejected() {
        assert!(validate_weight(-0.1).is_err());
        assert!(validate_weight(f64::NAN).is_err());
        assert!(validate_weight(f64::INFINITY).is_err());
        assert!(validate_weight(0.0).is_ok());
    }

    #[test]
    fn patch_touches_aggregates_only_for_weight_or_category() {
        let officer_only = RecordPatch {
            officer: Some("Siti".to_string()),
            ..RecordPatch::default()
        };
        assert!(!officer_only.touches_aggregates());
        assert!(!officer_only.is_empty());

        let category = RecordPatch {
            category: Some(WasteCategory::Hazardous),
            ..RecordPatch::default()
        };
        assert!(category.touches_aggregates());
        assert!(RecordPatch::default().is_empty());
    }

    #[test]
    fn patch_blank_officer_and_class_fall_back_to_placeholders() {
        let patch = RecordPatch {
            officer: Some("   ".to_string()),
            class: Some(String::new()),
            ..RecordPatch::default()
        }
        .normalized();
        assert_eq!(patch.officer.as_deref(), Some(DEFAULT_OFFICER));
        assert_eq!(patch.class.as_deref(), Some(DEFAULT_CLASS));

        let untouched = RecordPatch {
            officer: Some(" Siti ".to_string()),
            ..RecordPatch::default()
        }
        .normalized();
        assert_eq!(untouched.officer.as_deref(), Some("Siti"));
        assert!(untouched.class.is_none());
    }

    #[test]
    fn status_parses_both_vocabularies() {
        assert_eq!("selesai".parse::<RecordStatus>().unwrap(), RecordStatus::Done);
        assert_eq!("done".parse::<RecordStatus>().unwrap(), RecordStatus::Done);
        assert_eq!("PENDING".parse::<RecordStatus>().unwrap(), RecordStatus::Pending);
        assert!("archived".parse::<RecordStatus>().is_err());
    }
}
