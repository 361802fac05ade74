//! Read-only projections of the record store and the aggregates.
//!
//! Public query methods never fail the caller: a store error is logged with
//! `log::error!` and an empty list or `None` is returned instead. Callers
//! therefore cannot tell "no data" from "read failed".

use bsa_core::{CategoryStats, EnvironmentalImpact, RecordFilter, WasteCategory, WasteRecord};
use bsa_utils::dates::{format_date, format_timestamp, parse_date, parse_timestamp, year_bounds};
use bsa_utils::numbers::round1;
use chrono::{Datelike, NaiveDate, NaiveDateTime};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::aggregates;
use crate::models::{CompositionSnapshot, ExportSnapshot, MonthlySeries, StoreSummary};
use crate::Database;

pub(crate) const RECORD_COLUMNS: &str =
    "id, date, officer, class, type, weight, status, timestamp, created_at, updated_at";

impl Database {
    // ───────────────────── Record Queries ─────────────────────

    /// List records matching `filter`, newest store timestamp first.
    ///
    /// Records without a store timestamp sort last.
    pub fn list_records(&self, filter: &RecordFilter) -> Vec<WasteRecord> {
        let conn = self.lock();
        match select_records(&conn, filter) {
            Ok(rows) => {
                log::info!(
                    "[BSA Debug] query: list_records returned {} records",
                    rows.len()
                );
                rows
            }
            Err(e) => {
                log::error!("[BSA] query: list_records failed: {}", e);
                Vec::new()
            }
        }
    }

    /// Fetch a single record by id.
    pub fn record(&self, id: &str) -> Option<WasteRecord> {
        let conn = self.lock();
        fetch_record(&conn, id).unwrap_or_else(|e| {
            log::error!("[BSA] query: record {} failed: {}", id, e);
            None
        })
    }

    /// Number of stored records.
    pub fn count_records(&self) -> usize {
        let conn = self.lock();
        conn.query_row("SELECT COUNT(*) FROM waste_records", [], |row| {
            row.get::<_, i64>(0)
        })
        .map(|n| n as usize)
        .unwrap_or_else(|e| {
            log::error!("[BSA] query: count_records failed: {}", e);
            0
        })
    }

    // ───────────────────── Aggregate Queries ─────────────────────

    /// Current category stats, created with zeros on first access.
    pub fn stats(&self) -> Option<CategoryStats> {
        let conn = self.lock();
        aggregates::load_stats(&conn, self.now())
            .map_err(|e| log::error!("[BSA] query: stats failed: {}", e))
            .ok()
    }

    /// Current environmental impact estimate, derived from the stats on
    /// first access.
    pub fn environmental_impact(&self) -> Option<EnvironmentalImpact> {
        let conn = self.lock();
        aggregates::load_impact(&conn, self.now())
            .map_err(|e| log::error!("[BSA] query: environmental_impact failed: {}", e))
            .ok()
    }

    // ───────────────────── Chart Queries ─────────────────────

    /// Summed weight per category for each month of `year`.
    ///
    /// A record is bucketed by its store timestamp, or by its calendar date
    /// when it has no timestamp.
    pub fn monthly_chart_series(&self, year: i32) -> Option<MonthlySeries> {
        let conn = self.lock();
        match select_monthly_series(&conn, year) {
            Ok(series) => {
                log::info!("[BSA Debug] query: monthly_chart_series({}) built", year);
                Some(series)
            }
            Err(e) => {
                log::error!("[BSA] query: monthly_chart_series({}) failed: {}", year, e);
                None
            }
        }
    }

    /// Category totals with their percentage share of the combined total.
    pub fn composition_snapshot(&self) -> Option<CompositionSnapshot> {
        let stats = self.stats()?;
        Some(composition_from_stats(&stats))
    }

    // ───────────────────── Reports ─────────────────────

    /// Record count and both aggregates.
    pub fn summary(&self) -> Option<StoreSummary> {
        Some(StoreSummary {
            record_count: self.count_records(),
            stats: self.stats()?,
            environmental_impact: self.environmental_impact()?,
        })
    }

    /// Stats, the newest records (up to [`bsa_core::EXPORT_RECORD_LIMIT`])
    /// and the impact estimate.
    pub fn export_snapshot(&self) -> Option<ExportSnapshot> {
        let records =
            self.list_records(&RecordFilter::default().limit(bsa_core::EXPORT_RECORD_LIMIT));
        Some(ExportSnapshot {
            export_date: self.now(),
            stats: self.stats()?,
            records,
            environmental_impact: self.environmental_impact()?,
        })
    }
}

// ───────────────────── Helper Functions ─────────────────────

pub(crate) fn select_records(
    conn: &Connection,
    filter: &RecordFilter,
) -> rusqlite::Result<Vec<WasteRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {RECORD_COLUMNS} FROM waste_records
         WHERE (?1 IS NULL OR type = ?1)
           AND (?2 IS NULL OR status = ?2)
           AND (?3 IS NULL OR date >= ?3)
           AND (?4 IS NULL OR date <= ?4)
         ORDER BY timestamp DESC, rowid DESC
         LIMIT ?5"
    ))?;
    // SQLite treats a negative LIMIT as "no limit". A zero limit means the
    // same.
    let limit = filter
        .limit
        .filter(|n| *n > 0)
        .map(|n| n as i64)
        .unwrap_or(-1);
    let rows = stmt
        .query_map(
            params![
                filter.category,
                filter.status,
                filter.start_date.as_ref().map(format_date),
                filter.end_date.as_ref().map(format_date),
                limit,
            ],
            row_to_record,
        )?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

pub(crate) fn fetch_record(conn: &Connection, id: &str) -> rusqlite::Result<Option<WasteRecord>> {
    conn.query_row(
        &format!("SELECT {RECORD_COLUMNS} FROM waste_records WHERE id = ?1"),
        params![id],
        row_to_record,
    )
    .optional()
}

fn select_monthly_series(conn: &Connection, year: i32) -> rusqlite::Result<MonthlySeries> {
    let (start, end) = year_bounds(year)
        .ok_or_else(|| rusqlite::Error::InvalidParameterName(format!("year {}", year)))?;
    let mut stmt = conn.prepare(
        "SELECT type, weight, timestamp, date FROM waste_records
         WHERE (timestamp >= ?1 AND timestamp <= ?2)
            OR (timestamp IS NULL AND date >= ?3 AND date <= ?4)",
    )?;
    let rows = stmt
        .query_map(
            params![
                format_timestamp(&start),
                format_timestamp(&end),
                format_date(&start.date()),
                format_date(&end.date()),
            ],
            |row| {
                let category: WasteCategory = row.get(0)?;
                let weight: f64 = row.get(1)?;
                let timestamp = opt_timestamp(row, 2)?;
                let date = date_column(row, 3)?;
                Ok((category, weight, timestamp.map(|t| t.date()).unwrap_or(date)))
            },
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let mut series = MonthlySeries::empty(year);
    for (category, weight, day) in rows {
        series.add(category, day.month0() as usize, weight);
    }
    Ok(series)
}

pub(crate) fn composition_from_stats(stats: &CategoryStats) -> CompositionSnapshot {
    let data = WasteCategory::ALL.map(|c| stats.get(c).total);
    let total: f64 = data.iter().sum();
    let percentages = if total > 0.0 {
        data.map(|value| round1(value / total * 100.0))
    } else {
        [0.0; 3]
    };
    CompositionSnapshot {
        labels: WasteCategory::ALL.map(|c| c.label()),
        data,
        percentages,
    }
}

fn row_to_record(row: &Row<'_>) -> rusqlite::Result<WasteRecord> {
    Ok(WasteRecord {
        id: row.get(0)?,
        date: date_column(row, 1)?,
        officer: row.get(2)?,
        class: row.get(3)?,
        category: row.get(4)?,
        weight: row.get(5)?,
        status: row.get(6)?,
        timestamp: opt_timestamp(row, 7)?,
        created_at: opt_timestamp(row, 8)?,
        updated_at: opt_timestamp(row, 9)?,
    })
}

fn date_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<NaiveDate> {
    let raw: String = row.get(idx)?;
    parse_date(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
}

pub(crate) fn opt_timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDateTime>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| {
        parse_timestamp(&s)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, e.into()))
    })
    .transpose()
}
