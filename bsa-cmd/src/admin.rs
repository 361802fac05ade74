//! Store administration: initialise, import, reset.

use bsa_db::{Database, SAMPLE_RECORDS_CSV};
use log::{info, warn};

/// Bootstrap both aggregates and optionally seed the sample records.
pub fn run_init(db: &Database, sample: bool) -> anyhow::Result<()> {
    db.stats()
        .ok_or_else(|| anyhow::anyhow!("could not initialise stats"))?;
    db.environmental_impact()
        .ok_or_else(|| anyhow::anyhow!("could not initialise environmental impact"))?;
    info!("Aggregates initialised");

    if sample {
        let count = db.load_records_csv(SAMPLE_RECORDS_CSV)?;
        info!("Added {} sample records", count);
    }
    Ok(())
}

pub fn run_import(db: &Database, csv_path: &str) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(csv_path)?;
    let count = db.load_records_csv(&data)?;
    info!("Imported {} records from {}", count, csv_path);
    Ok(())
}

/// Delete everything. Refuses to run without explicit confirmation.
pub fn run_reset(db: &Database, confirmed: bool) -> anyhow::Result<()> {
    if !confirmed {
        anyhow::bail!("reset deletes ALL records; re-run with --yes to confirm");
    }
    let deleted = db.reset_all()?;
    warn!("Reset complete: {} records deleted", deleted);
    Ok(())
}
