//! Record commands: add, list, update, delete.

use bsa_core::{NewRecord, RecordFilter, RecordPatch, RecordStatus, WasteCategory, WasteRecord};
use bsa_db::Database;
use chrono::NaiveDate;
use log::info;

pub fn run_add(
    db: &Database,
    category: WasteCategory,
    weight: f64,
    date: Option<NaiveDate>,
    officer: Option<String>,
    class: Option<String>,
    status: Option<RecordStatus>,
) -> anyhow::Result<()> {
    let input = NewRecord {
        date,
        officer,
        class,
        category: Some(category),
        weight: Some(weight),
        status,
    };
    let id = db.insert_record(input)?;
    info!("Recorded {} kg of {}", weight, category);
    println!("{}", id);
    Ok(())
}

pub fn build_filter(
    category: Option<WasteCategory>,
    status: Option<RecordStatus>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    limit: usize,
) -> RecordFilter {
    RecordFilter {
        category,
        status,
        start_date: from,
        end_date: to,
        limit: Some(limit),
    }
}

pub fn run_list(db: &Database, filter: &RecordFilter, json: bool) -> anyhow::Result<()> {
    let records = db.list_records(filter);
    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    } else {
        print!("{}", format_table(&records));
    }
    Ok(())
}

pub fn run_update(db: &Database, id: &str, patch: RecordPatch) -> anyhow::Result<()> {
    if patch.is_empty() {
        anyhow::bail!("nothing to update; pass at least one field");
    }
    db.update_record(id, patch)?;
    info!("Updated {}", id);
    Ok(())
}

pub fn run_delete(db: &Database, id: &str) -> anyhow::Result<()> {
    db.delete_record(id)?;
    info!("Deleted {}", id);
    Ok(())
}

/// Render records as a fixed-width table, one line per record.
pub fn format_table(records: &[WasteRecord]) -> String {
    if records.is_empty() {
        return "Belum ada data\n".to_string();
    }
    let mut out = format!(
        "{:<36}  {:<10}  {:<20}  {:<6}  {:<9}  {:>8}  {}\n",
        "ID", "TANGGAL", "PETUGAS", "KELAS", "JENIS", "BERAT", "STATUS"
    );
    for r in records {
        out.push_str(&format!(
            "{:<36}  {:<10}  {:<20}  {:<6}  {:<9}  {:>8.2}  {}\n",
            r.id,
            r.date,
            r.officer,
            r.class,
            r.category.label(),
            r.weight,
            r.status
        ));
    }
    out
}
