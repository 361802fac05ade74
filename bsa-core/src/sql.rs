//! SQLite column conversions for the enum-valued record fields.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};

use crate::category::WasteCategory;
use crate::record::RecordStatus;

impl ToSql for WasteCategory {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for WasteCategory {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

impl ToSql for RecordStatus {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for RecordStatus {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn category_and_status_round_trip_through_sqlite() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("CREATE TABLE t (type TEXT NOT NULL, status TEXT NOT NULL)")
            .unwrap();
        conn.execute(
            "INSERT INTO t (type, status) VALUES (?1, ?2)",
            rusqlite::params![WasteCategory::Hazardous, RecordStatus::Pending],
        )
        .unwrap();

        let raw: (String, String) = conn
            .query_row("SELECT type, status FROM t", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(raw, ("b3".to_string(), "pending".to_string()));

        let typed: (WasteCategory, RecordStatus) = conn
            .query_row("SELECT type, status FROM t", [], |row| {
                Ok((row.get(0)?, row.get(1)?))
            })
            .unwrap();
        assert_eq!(typed, (WasteCategory::Hazardous, RecordStatus::Pending));
    }

    #[test]
    fn unknown_token_fails_conversion() {
        let conn = Connection::open_in_memory().unwrap();
        let result: rusqlite::Result<WasteCategory> =
            conn.query_row("SELECT 'kertas'", [], |row| row.get(0));
        assert!(result.is_err());
    }
}
