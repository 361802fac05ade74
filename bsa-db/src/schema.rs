//! SQL schema definitions for the Portal BSA store.
//!
//! Contains CREATE TABLE statements for the record collection and the two
//! singleton aggregate documents. The schema is applied as a single batch
//! when the database is opened.

/// Key of the single row held by each aggregate table.
pub const CURRENT_KEY: &str = "current";

/// Returns the full SQL schema as a single batch string.
///
/// This creates the following tables:
///
/// - `waste_records` - One row per weighing event (date, officer, class,
///   type, weight in kg, status, store timestamp)
/// - `stats` - Running total and monthly change per category, row `current`
/// - `environmental_impact` - Trees/energy/CO2 estimates, row `current`
///
/// Timestamps are stored as `YYYY-MM-DD HH:MM:SS` text so range filters and
/// ordering work lexicographically.
pub fn create_schema() -> &'static str {
    r#"
    CREATE TABLE IF NOT EXISTS waste_records (
        id TEXT PRIMARY KEY,
        date TEXT NOT NULL,
        officer TEXT NOT NULL,
        class TEXT NOT NULL DEFAULT '-',
        type TEXT NOT NULL CHECK (type IN ('organik', 'anorganik', 'b3')),
        weight REAL NOT NULL CHECK (weight >= 0),
        status TEXT NOT NULL DEFAULT 'selesai' CHECK (status IN ('selesai', 'pending')),
        timestamp TEXT,
        created_at TEXT,
        updated_at TEXT
    );
    CREATE INDEX IF NOT EXISTS idx_records_timestamp ON waste_records(timestamp);
    CREATE INDEX IF NOT EXISTS idx_records_type ON waste_records(type);
    CREATE INDEX IF NOT EXISTS idx_records_date ON waste_records(date);

    CREATE TABLE IF NOT EXISTS stats (
        id TEXT PRIMARY KEY,
        organic_total REAL NOT NULL DEFAULT 0,
        organic_monthly_change REAL NOT NULL DEFAULT 0,
        inorganic_total REAL NOT NULL DEFAULT 0,
        inorganic_monthly_change REAL NOT NULL DEFAULT 0,
        hazardous_total REAL NOT NULL DEFAULT 0,
        hazardous_monthly_change REAL NOT NULL DEFAULT 0,
        last_updated TEXT
    );

    CREATE TABLE IF NOT EXISTS environmental_impact (
        id TEXT PRIMARY KEY,
        trees_saved INTEGER NOT NULL DEFAULT 0,
        energy_saved INTEGER NOT NULL DEFAULT 0,
        co2_reduced INTEGER NOT NULL DEFAULT 0,
        last_updated TEXT
    );
    "#
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn schema_is_valid_sql() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema())
            .expect("Schema SQL should be valid");
    }

    #[test]
    fn schema_creates_all_tables() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        for table in &["waste_records", "stats", "environmental_impact"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "Table '{}' should exist", table);
        }
    }

    #[test]
    fn schema_rejects_negative_weight_and_unknown_type() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();

        let negative = conn.execute(
            "INSERT INTO waste_records (id, date, officer, type, weight)
             VALUES ('a', '2024-12-20', 'Budi', 'organik', -1.0)",
            [],
        );
        assert!(negative.is_err(), "CHECK (weight >= 0) should reject");

        let unknown = conn.execute(
            "INSERT INTO waste_records (id, date, officer, type, weight)
             VALUES ('b', '2024-12-20', 'Budi', 'kertas', 1.0)",
            [],
        );
        assert!(unknown.is_err(), "CHECK on type should reject");
    }

    #[test]
    fn schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(create_schema()).unwrap();
        conn.execute_batch(create_schema())
            .expect("Applying schema twice should succeed due to IF NOT EXISTS");
    }
}
