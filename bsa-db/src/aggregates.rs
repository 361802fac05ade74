//! Maintenance of the `stats` and `environmental_impact` aggregates.
//!
//! Every function takes a plain `&Connection` so it can run either directly
//! or inside the transaction of a record mutation (a `Transaction` derefs to
//! `Connection`).
//!
//! Both aggregates are bootstrapped lazily: the first read of an absent row
//! persists the default with `INSERT OR IGNORE`, so concurrent first readers
//! converge on the same row.

use bsa_core::stats::monthly_change;
use bsa_core::{CategoryStats, CategoryTotal, EnvironmentalImpact, MonthTotals, WasteCategory};
use bsa_utils::dates::{format_timestamp, month_bounds, previous_month};
use chrono::{Datelike, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension};

use crate::queries::opt_timestamp;
use crate::schema::CURRENT_KEY;

// ───────────────────── Category Stats ─────────────────────

/// Persist the all-zero stats row if it does not exist yet.
pub(crate) fn ensure_stats(conn: &Connection, now: NaiveDateTime) -> rusqlite::Result<()> {
    let inserted = conn.execute(
        "INSERT OR IGNORE INTO stats (id, last_updated) VALUES (?1, ?2)",
        params![CURRENT_KEY, format_timestamp(&now)],
    )?;
    if inserted > 0 {
        log::info!("[BSA Debug] aggregates: initialised default stats");
    }
    Ok(())
}

pub(crate) fn read_stats(conn: &Connection) -> rusqlite::Result<Option<CategoryStats>> {
    conn.query_row(
        "SELECT organic_total, organic_monthly_change,
                inorganic_total, inorganic_monthly_change,
                hazardous_total, hazardous_monthly_change,
                last_updated
         FROM stats WHERE id = ?1",
        params![CURRENT_KEY],
        |row| {
            Ok(CategoryStats {
                organic: CategoryTotal {
                    total: row.get(0)?,
                    monthly_change: row.get(1)?,
                },
                inorganic: CategoryTotal {
                    total: row.get(2)?,
                    monthly_change: row.get(3)?,
                },
                hazardous: CategoryTotal {
                    total: row.get(4)?,
                    monthly_change: row.get(5)?,
                },
                last_updated: opt_timestamp(row, 6)?,
            })
        },
    )
    .optional()
}

/// Read the stats row, creating the zero default first if needed.
pub(crate) fn load_stats(conn: &Connection, now: NaiveDateTime) -> rusqlite::Result<CategoryStats> {
    ensure_stats(conn, now)?;
    read_stats(conn)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Running totals closer to zero than this are stored as exactly zero.
const TOTAL_EPSILON: f64 = 1e-9;

/// Add `delta` kg (negative to subtract) to one category's running total.
///
/// Float residue left by subtracting every contribution is snapped to zero.
pub(crate) fn adjust_total(
    conn: &Connection,
    category: WasteCategory,
    delta: f64,
    now: NaiveDateTime,
) -> rusqlite::Result<()> {
    ensure_stats(conn, now)?;
    let column = format!("{}_total", category.column_prefix());
    conn.execute(
        &format!(
            "UPDATE stats SET
                {column} = CASE WHEN abs({column} + ?1) < ?4 THEN 0.0 ELSE {column} + ?1 END,
                last_updated = ?2
             WHERE id = ?3"
        ),
        params![delta, format_timestamp(&now), CURRENT_KEY, TOTAL_EPSILON],
    )?;
    log::debug!(
        "[BSA Debug] aggregates: {} total adjusted by {:+}",
        category,
        delta
    );
    Ok(())
}

/// Sum record weights per category over an inclusive store-timestamp range.
pub(crate) fn month_totals(
    conn: &Connection,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> rusqlite::Result<MonthTotals> {
    let mut stmt = conn.prepare(
        "SELECT type, SUM(weight) FROM waste_records
         WHERE timestamp >= ?1 AND timestamp <= ?2
         GROUP BY type",
    )?;
    let rows = stmt
        .query_map(
            params![format_timestamp(&start), format_timestamp(&end)],
            |row| Ok((row.get::<_, WasteCategory>(0)?, row.get::<_, f64>(1)?)),
        )?
        .collect::<Result<Vec<_>, _>>()?;

    let mut totals = MonthTotals::default();
    for (category, weight) in rows {
        totals.add(category, weight);
    }
    Ok(totals)
}

/// Recompute the month-over-month change of every category from the
/// records of the current and previous calendar month of `now`.
pub(crate) fn recompute_monthly_changes(
    conn: &Connection,
    now: NaiveDateTime,
) -> rusqlite::Result<[f64; 3]> {
    let today = now.date();
    let (last_year, last_month) = previous_month(&today);
    let (this_start, this_end) = month_bounds(today.year(), today.month())
        .ok_or_else(|| rusqlite::Error::InvalidParameterName(format!("month of {}", today)))?;
    let (last_start, last_end) = month_bounds(last_year, last_month)
        .ok_or_else(|| rusqlite::Error::InvalidParameterName(format!("month before {}", today)))?;

    let last = month_totals(conn, last_start, last_end)?;
    let this = month_totals(conn, this_start, this_end)?;

    let changes = WasteCategory::ALL.map(|c| monthly_change(last.get(c), this.get(c)));

    ensure_stats(conn, now)?;
    conn.execute(
        "UPDATE stats SET organic_monthly_change = ?1,
                          inorganic_monthly_change = ?2,
                          hazardous_monthly_change = ?3
         WHERE id = ?4",
        params![changes[0], changes[1], changes[2], CURRENT_KEY],
    )?;
    log::debug!(
        "[BSA Debug] aggregates: monthly changes organik={} anorganik={} b3={}",
        changes[0],
        changes[1],
        changes[2]
    );
    Ok(changes)
}

// ───────────────────── Environmental Impact ─────────────────────

pub(crate) fn read_impact(conn: &Connection) -> rusqlite::Result<Option<EnvironmentalImpact>> {
    conn.query_row(
        "SELECT trees_saved, energy_saved, co2_reduced, last_updated
         FROM environmental_impact WHERE id = ?1",
        params![CURRENT_KEY],
        |row| {
            Ok(EnvironmentalImpact {
                trees_saved: row.get(0)?,
                energy_saved: row.get(1)?,
                co2_reduced: row.get(2)?,
                last_updated: opt_timestamp(row, 3)?,
            })
        },
    )
    .optional()
}

fn write_impact(
    conn: &Connection,
    impact: &EnvironmentalImpact,
    replace: bool,
) -> rusqlite::Result<()> {
    let verb = if replace { "INSERT OR REPLACE" } else { "INSERT OR IGNORE" };
    conn.execute(
        &format!(
            "{verb} INTO environmental_impact
             (id, trees_saved, energy_saved, co2_reduced, last_updated)
             VALUES (?1, ?2, ?3, ?4, ?5)"
        ),
        params![
            CURRENT_KEY,
            impact.trees_saved,
            impact.energy_saved,
            impact.co2_reduced,
            impact.last_updated.as_ref().map(format_timestamp),
        ],
    )?;
    Ok(())
}

/// Fully recompute the impact estimate from the current stats and persist it.
pub(crate) fn recompute_impact(
    conn: &Connection,
    now: NaiveDateTime,
) -> rusqlite::Result<EnvironmentalImpact> {
    let stats = load_stats(conn, now)?;
    let impact = EnvironmentalImpact::from_stats(&stats, Some(now));
    write_impact(conn, &impact, true)?;
    log::debug!(
        "[BSA Debug] aggregates: impact trees={} energy={}kWh co2={}kg",
        impact.trees_saved,
        impact.energy_saved,
        impact.co2_reduced
    );
    Ok(impact)
}

/// Read the impact row; when absent, derive it from the stats and persist it.
pub(crate) fn load_impact(
    conn: &Connection,
    now: NaiveDateTime,
) -> rusqlite::Result<EnvironmentalImpact> {
    if let Some(impact) = read_impact(conn)? {
        return Ok(impact);
    }
    let stats = load_stats(conn, now)?;
    write_impact(conn, &EnvironmentalImpact::from_stats(&stats, Some(now)), false)?;
    log::info!("[BSA Debug] aggregates: initialised environmental impact");
    read_impact(conn)?.ok_or(rusqlite::Error::QueryReturnedNoRows)
}

/// Monthly changes then impact, as run after every aggregate-affecting write.
pub(crate) fn refresh_derived(conn: &Connection, now: NaiveDateTime) -> rusqlite::Result<()> {
    recompute_monthly_changes(conn, now)?;
    recompute_impact(conn, now)?;
    Ok(())
}

/// Overwrite both aggregates with zeros.
pub(crate) fn reset_aggregates(conn: &Connection, now: NaiveDateTime) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT OR REPLACE INTO stats (id, last_updated) VALUES (?1, ?2)",
        params![CURRENT_KEY, format_timestamp(&now)],
    )?;
    let zero = EnvironmentalImpact {
        last_updated: Some(now),
        ..EnvironmentalImpact::default()
    };
    write_impact(conn, &zero, true)
}
