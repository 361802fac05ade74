//! Bulk CSV import of waste records.
//!
//! # CSV Format
//!
//! Headers are required: `date,officer,class,type,weight,status`. Only
//! `type` and `weight` must be filled; blank cells take the same defaults as
//! [`Database::insert_record`]. Every row goes through `insert_record`, so
//! the aggregates are kept current row by row.

use bsa_core::{BsaError, NewRecord, Result};
use bsa_utils::dates::parse_date;
use serde::Deserialize;

use crate::Database;

/// Ten sample weighings from December 2024, used to seed a demo store.
pub static SAMPLE_RECORDS_CSV: &str = include_str!("../fixtures/sample_records.csv");

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    date: String,
    #[serde(default)]
    officer: String,
    #[serde(default)]
    class: String,
    #[serde(rename = "type")]
    category: String,
    weight: String,
    #[serde(default)]
    status: String,
}

impl CsvRow {
    fn into_new_record(self, line: u64) -> Result<NewRecord> {
        let invalid = |what: &str, value: &str| {
            BsaError::Validation(format!("line {}: invalid {} '{}'", line, what, value))
        };
        let date = match self.date.trim() {
            "" => None,
            raw => Some(parse_date(raw).map_err(|_| invalid("date", raw))?),
        };
        let weight = self
            .weight
            .trim()
            .parse::<f64>()
            .map_err(|_| invalid("weight", &self.weight))?;
        let status = match self.status.trim() {
            "" => None,
            raw => Some(raw.parse()?),
        };
        Ok(NewRecord {
            date,
            officer: Some(self.officer),
            class: Some(self.class),
            category: Some(self.category.parse()?),
            weight: Some(weight),
            status,
        })
    }
}

impl Database {
    /// Import records from CSV. Returns the number of records inserted.
    ///
    /// Stops at the first malformed row; rows before it stay inserted.
    pub fn load_records_csv(&self, csv_data: &str) -> Result<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(csv_data.as_bytes());

        let mut count = 0usize;
        for result in rdr.deserialize::<CsvRow>() {
            let row = result?;
            let line = count as u64 + 2;
            self.insert_record(row.into_new_record(line)?)?;
            count += 1;
        }
        log::info!("[BSA Debug] loader: Loaded {} records", count);
        Ok(count)
    }
}
