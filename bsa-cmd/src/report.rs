//! Read-only reports: stats, monthly chart, composition, impact, export.

use bsa_core::{CategoryStats, EnvironmentalImpact, WasteCategory};
use bsa_db::models::{CompositionSnapshot, MonthlySeries};
use bsa_db::Database;
use chrono::{Datelike, Local};
use log::info;

pub fn run_stats(db: &Database) -> anyhow::Result<()> {
    let summary = db
        .summary()
        .ok_or_else(|| anyhow::anyhow!("could not read stats; see log for details"))?;
    println!("=== STATISTIK PORTAL BSA ===");
    println!("Total records: {}", summary.record_count);
    print!("{}", format_stats(&summary.stats));
    print!("{}", format_impact(&summary.environmental_impact));
    Ok(())
}

pub fn run_chart(db: &Database, year: Option<i32>) -> anyhow::Result<()> {
    let year = year.unwrap_or_else(|| Local::now().year());
    let series = db
        .monthly_chart_series(year)
        .ok_or_else(|| anyhow::anyhow!("could not build chart data for {}", year))?;
    print!("{}", format_series(&series));
    Ok(())
}

pub fn run_composition(db: &Database) -> anyhow::Result<()> {
    let snapshot = db
        .composition_snapshot()
        .ok_or_else(|| anyhow::anyhow!("could not read composition"))?;
    print!("{}", format_composition(&snapshot));
    Ok(())
}

pub fn run_impact(db: &Database) -> anyhow::Result<()> {
    let impact = db
        .environmental_impact()
        .ok_or_else(|| anyhow::anyhow!("could not read environmental impact"))?;
    print!("{}", format_impact(&impact));
    Ok(())
}

pub fn run_export(db: &Database, output: Option<String>) -> anyhow::Result<()> {
    let snapshot = db
        .export_snapshot()
        .ok_or_else(|| anyhow::anyhow!("could not read store for export"))?;
    let path = output.unwrap_or_else(|| {
        format!(
            "portal-bsa-export-{}.json",
            snapshot.export_date.date().format("%Y-%m-%d")
        )
    });
    std::fs::write(&path, snapshot.to_json_pretty()?)?;
    info!(
        "Exported {} records to {}",
        snapshot.records.len(),
        path
    );
    Ok(())
}

pub fn format_stats(stats: &CategoryStats) -> String {
    let mut out = String::from("Total sampah:\n");
    for category in WasteCategory::ALL {
        out.push_str(&format!(
            "  - {:<9} {:>10.2} kg  ({:+.1}%)\n",
            category.label(),
            stats.get(category).total,
            stats.get(category).monthly_change
        ));
    }
    out.push_str(&format!("  - {:<9} {:>10.2} kg\n", "TOTAL", stats.combined_total()));
    out
}

pub fn format_impact(impact: &EnvironmentalImpact) -> String {
    format!(
        "Dampak lingkungan:\n  - Pohon terselamatkan: {}\n  - Energi dihemat: {} kWh\n  - CO2 dikurangi: {} kg\n",
        impact.trees_saved, impact.energy_saved, impact.co2_reduced
    )
}

pub fn format_series(series: &MonthlySeries) -> String {
    let mut out = format!(
        "{:<5} {:>10} {:>10} {:>10}\n",
        series.year, "Organik", "Anorganik", "B3"
    );
    for (month, label) in series.labels.iter().enumerate() {
        out.push_str(&format!(
            "{:<5} {:>10.2} {:>10.2} {:>10.2}\n",
            label, series.organic[month], series.inorganic[month], series.hazardous[month]
        ));
    }
    out
}

pub fn format_composition(snapshot: &CompositionSnapshot) -> String {
    let mut out = String::new();
    for (i, label) in snapshot.labels.iter().enumerate() {
        out.push_str(&format!(
            "{:<9} {:>10.2} kg {:>6.1}%\n",
            label, snapshot.data[i], snapshot.percentages[i]
        ));
    }
    out
}
