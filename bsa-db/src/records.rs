//! Record mutations and the aggregate maintenance that follows them.
//!
//! Each mutation runs in a single SQLite transaction covering the record
//! write, the stats delta, the monthly change recompute and the impact
//! recompute. Either all of it commits or none of it does. Subscribers are
//! notified after the commit, once the connection lock is released.

use bsa_core::{BsaError, NewRecord, RecordPatch, Result};
use bsa_utils::dates::{format_date, format_timestamp};
use rusqlite::params;
use uuid::Uuid;

use crate::aggregates;
use crate::queries::fetch_record;
use crate::Database;

impl Database {
    /// Insert a new record and fold its weight into the aggregates.
    ///
    /// Missing date, officer, class and status are defaulted. Returns the
    /// store-assigned identifier.
    pub fn insert_record(&self, input: NewRecord) -> Result<String> {
        let now = self.now();
        let fields = input.into_fields(now.date())?;
        let id = Uuid::new_v4().to_string();
        {
            let mut conn = self.lock();
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO waste_records
                 (id, date, officer, class, type, weight, status, timestamp, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
                params![
                    id,
                    format_date(&fields.date),
                    fields.officer,
                    fields.class,
                    fields.category,
                    fields.weight,
                    fields.status,
                    format_timestamp(&now),
                ],
            )?;
            aggregates::adjust_total(&tx, fields.category, fields.weight, now)?;
            aggregates::refresh_derived(&tx, now)?;
            tx.commit()?;
        }
        log::info!(
            "[BSA Debug] records: inserted {} ({} {}kg)",
            id,
            fields.category,
            fields.weight
        );
        self.publish();
        Ok(id)
    }

    /// Apply `patch` to an existing record.
    ///
    /// When the patch changes weight or category, the old contribution is
    /// subtracted, the new one added, and monthly changes and impact are
    /// recomputed. Other patches leave the aggregates untouched.
    pub fn update_record(&self, id: &str, patch: RecordPatch) -> Result<()> {
        patch.validate()?;
        let patch = patch.normalized();
        let now = self.now();
        {
            let mut conn = self.lock();
            let tx = conn.transaction()?;
            let old = fetch_record(&tx, id)
                .map_err(|e| {
                    log::error!("[BSA] records: reading {} before update failed: {}", id, e);
                    BsaError::NotFound(id.to_string())
                })?
                .ok_or_else(|| BsaError::NotFound(id.to_string()))?;

            tx.execute(
                "UPDATE waste_records SET
                    date = COALESCE(?2, date),
                    officer = COALESCE(?3, officer),
                    class = COALESCE(?4, class),
                    type = COALESCE(?5, type),
                    weight = COALESCE(?6, weight),
                    status = COALESCE(?7, status),
                    updated_at = ?8
                 WHERE id = ?1",
                params![
                    id,
                    patch.date.as_ref().map(format_date),
                    patch.officer,
                    patch.class,
                    patch.category,
                    patch.weight,
                    patch.status,
                    format_timestamp(&now),
                ],
            )?;

            if patch.touches_aggregates() {
                let new_category = patch.category.unwrap_or(old.category);
                let new_weight = patch.weight.unwrap_or(old.weight);
                aggregates::adjust_total(&tx, old.category, -old.weight, now)?;
                aggregates::adjust_total(&tx, new_category, new_weight, now)?;
                aggregates::refresh_derived(&tx, now)?;
            }
            tx.commit()?;
        }
        log::info!("[BSA Debug] records: updated {}", id);
        self.publish();
        Ok(())
    }

    /// Permanently remove a record and subtract its contribution.
    pub fn delete_record(&self, id: &str) -> Result<()> {
        let now = self.now();
        {
            let mut conn = self.lock();
            let tx = conn.transaction()?;
            let old = fetch_record(&tx, id)?.ok_or_else(|| BsaError::NotFound(id.to_string()))?;
            tx.execute("DELETE FROM waste_records WHERE id = ?1", params![id])?;
            aggregates::adjust_total(&tx, old.category, -old.weight, now)?;
            aggregates::refresh_derived(&tx, now)?;
            tx.commit()?;
        }
        log::info!("[BSA Debug] records: deleted {}", id);
        self.publish();
        Ok(())
    }

    /// Delete every record and zero both aggregates. Returns the number of
    /// records removed.
    pub fn reset_all(&self) -> Result<usize> {
        let now = self.now();
        let deleted = {
            let mut conn = self.lock();
            let tx = conn.transaction()?;
            let deleted = tx.execute("DELETE FROM waste_records", [])?;
            aggregates::reset_aggregates(&tx, now)?;
            tx.commit()?;
            deleted
        };
        log::warn!("[BSA] records: reset removed {} records", deleted);
        self.publish();
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{at, fixed_db};
    use bsa_core::{RecordFilter, RecordStatus, WasteCategory};

    fn total(db: &Database, category: WasteCategory) -> f64 {
        db.stats().unwrap().get(category).total
    }

    /// Sum of stored weights per category, straight from the records.
    fn record_sum(db: &Database, category: WasteCategory) -> f64 {
        db.list_records(&RecordFilter::default().category(category))
            .iter()
            .map(|r| r.weight)
            .sum()
    }

    #[test]
    fn insert_defaults_and_returns_id() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 24.5))
            .unwrap();
        let record = db.record(&id).unwrap();
        assert_eq!(record.officer, bsa_core::record::DEFAULT_OFFICER);
        assert_eq!(record.class, "-");
        assert_eq!(record.status, RecordStatus::Done);
        assert_eq!(record.date.to_string(), "2024-12-20");
        assert_eq!(record.timestamp, Some(at(2024, 12, 20, 9)));
        assert!(record.updated_at.is_none());
    }

    #[test]
    fn insert_rejects_negative_weight_without_touching_store() {
        let (db, _) = fixed_db();
        let err = db
            .insert_record(NewRecord::new(WasteCategory::Organic, -3.0))
            .unwrap_err();
        assert!(matches!(err, BsaError::Validation(_)));
        assert_eq!(db.count_records(), 0);
        assert_eq!(total(&db, WasteCategory::Organic), 0.0);
    }

    #[test]
    fn insert_insert_delete_scenario() {
        let (db, _) = fixed_db();
        let organic = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 24.5))
            .unwrap();
        assert!((total(&db, WasteCategory::Organic) - 24.5).abs() < 0.01);

        db.insert_record(NewRecord::new(WasteCategory::Inorganic, 15.2))
            .unwrap();
        assert!((total(&db, WasteCategory::Inorganic) - 15.2).abs() < 0.01);
        assert!((total(&db, WasteCategory::Organic) - 24.5).abs() < 0.01);

        db.delete_record(&organic).unwrap();
        assert!(total(&db, WasteCategory::Organic).abs() < 0.01);

        let impact = db.environmental_impact().unwrap();
        assert_eq!(impact.trees_saved, 1);
        assert_eq!(impact.energy_saved, 30);
        assert_eq!(impact.co2_reduced, 12);
    }

    #[test]
    fn category_change_moves_weight_between_totals() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 10.0))
            .unwrap();
        db.insert_record(NewRecord::new(WasteCategory::Organic, 5.0))
            .unwrap();
        db.insert_record(NewRecord::new(WasteCategory::Inorganic, 7.0))
            .unwrap();

        db.update_record(
            &id,
            RecordPatch {
                category: Some(WasteCategory::Hazardous),
                ..RecordPatch::default()
            },
        )
        .unwrap();

        assert!((total(&db, WasteCategory::Organic) - 5.0).abs() < 0.01);
        assert!((total(&db, WasteCategory::Hazardous) - 10.0).abs() < 0.01);
        assert!((total(&db, WasteCategory::Inorganic) - 7.0).abs() < 0.01);

        // Impact from organic + inorganic only: 12kg -> 0.6, 24, 9.6
        let impact = db.environmental_impact().unwrap();
        assert_eq!(impact.trees_saved, 1);
        assert_eq!(impact.energy_saved, 24);
        assert_eq!(impact.co2_reduced, 10);

        let record = db.record(&id).unwrap();
        assert_eq!(record.category, WasteCategory::Hazardous);
        assert!(record.updated_at.is_some());
    }

    #[test]
    fn weight_change_adjusts_total() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Inorganic, 12.3))
            .unwrap();
        db.update_record(
            &id,
            RecordPatch {
                weight: Some(16.9),
                ..RecordPatch::default()
            },
        )
        .unwrap();
        assert!((total(&db, WasteCategory::Inorganic) - 16.9).abs() < 0.01);
    }

    #[test]
    fn non_aggregate_patch_leaves_stats_untouched() {
        let (db, clock) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 3.0))
            .unwrap();
        let before = db.stats().unwrap();

        clock.set(at(2024, 12, 22, 9));
        db.update_record(
            &id,
            RecordPatch {
                officer: Some("Siti Aminah".to_string()),
                status: Some(RecordStatus::Pending),
                ..RecordPatch::default()
            },
        )
        .unwrap();

        assert_eq!(db.stats().unwrap(), before);
        let record = db.record(&id).unwrap();
        assert_eq!(record.officer, "Siti Aminah");
        assert_eq!(record.status, RecordStatus::Pending);
        assert_eq!(record.updated_at, Some(at(2024, 12, 22, 9)));
    }

    #[test]
    fn missing_id_is_not_found_and_aggregates_unchanged() {
        let (db, _) = fixed_db();
        db.insert_record(NewRecord::new(WasteCategory::Organic, 8.0))
            .unwrap();
        let stats = db.stats().unwrap();
        let impact = db.environmental_impact().unwrap();

        let update = db.update_record(
            "nope",
            RecordPatch {
                weight: Some(1.0),
                ..RecordPatch::default()
            },
        );
        assert!(matches!(update, Err(BsaError::NotFound(_))));
        assert!(matches!(db.delete_record("nope"), Err(BsaError::NotFound(_))));

        assert_eq!(db.stats().unwrap(), stats);
        assert_eq!(db.environmental_impact().unwrap(), impact);
    }

    #[test]
    fn failed_read_before_update_is_not_found() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 8.0))
            .unwrap();
        db.lock().execute_batch("DROP TABLE waste_records").unwrap();

        let result = db.update_record(
            &id,
            RecordPatch {
                weight: Some(2.0),
                ..RecordPatch::default()
            },
        );
        assert!(matches!(result, Err(BsaError::NotFound(_))));
        assert!((total(&db, WasteCategory::Organic) - 8.0).abs() < 0.01);
    }

    #[test]
    fn blank_officer_and_class_patch_restores_placeholders() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(
                NewRecord::new(WasteCategory::Inorganic, 4.0)
                    .with_officer("Budi Santoso")
                    .with_class("8C"),
            )
            .unwrap();
        db.update_record(
            &id,
            RecordPatch {
                officer: Some(String::new()),
                class: Some("  ".to_string()),
                ..RecordPatch::default()
            },
        )
        .unwrap();
        let record = db.record(&id).unwrap();
        assert_eq!(record.officer, bsa_core::record::DEFAULT_OFFICER);
        assert_eq!(record.class, bsa_core::record::DEFAULT_CLASS);
    }

    #[test]
    fn invalid_patch_weight_is_rejected() {
        let (db, _) = fixed_db();
        let id = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 8.0))
            .unwrap();
        let result = db.update_record(
            &id,
            RecordPatch {
                weight: Some(f64::NAN),
                ..RecordPatch::default()
            },
        );
        assert!(matches!(result, Err(BsaError::Validation(_))));
        assert!((db.record(&id).unwrap().weight - 8.0).abs() < 0.01);
    }

    #[test]
    fn failed_recompute_rolls_back_record_write() {
        let (db, _) = fixed_db();
        db.insert_record(NewRecord::new(WasteCategory::Organic, 8.0))
            .unwrap();
        db.lock()
            .execute_batch("DROP TABLE environmental_impact")
            .unwrap();

        let result = db.insert_record(NewRecord::new(WasteCategory::Organic, 2.0));
        assert!(matches!(result, Err(BsaError::BackingStore(_))));
        assert_eq!(db.count_records(), 1);
        assert!((total(&db, WasteCategory::Organic) - 8.0).abs() < 0.01);
    }

    #[test]
    fn totals_match_record_sums_after_mixed_operations() {
        let (db, clock) = fixed_db();
        let mut ids = Vec::new();
        let inputs = [
            (WasteCategory::Organic, 24.5),
            (WasteCategory::Inorganic, 15.2),
            (WasteCategory::Hazardous, 2.1),
            (WasteCategory::Organic, 18.7),
            (WasteCategory::Inorganic, 12.3),
            (WasteCategory::Organic, 21.8),
        ];
        for (hour, (category, weight)) in inputs.into_iter().enumerate() {
            clock.set(at(2024, 12, 20, hour as u32));
            ids.push(db.insert_record(NewRecord::new(category, weight)).unwrap());
        }

        db.update_record(
            &ids[0],
            RecordPatch {
                weight: Some(30.0),
                category: Some(WasteCategory::Inorganic),
                ..RecordPatch::default()
            },
        )
        .unwrap();
        db.delete_record(&ids[3]).unwrap();
        db.update_record(
            &ids[2],
            RecordPatch {
                class: Some("9A".to_string()),
                ..RecordPatch::default()
            },
        )
        .unwrap();

        for category in WasteCategory::ALL {
            assert!(
                (total(&db, category) - record_sum(&db, category)).abs() < 0.01,
                "{} total drifted from record sum",
                category
            );
        }
    }

    #[test]
    fn deleting_every_record_leaves_exact_zero_totals() {
        let (db, _) = fixed_db();
        let a = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 0.1))
            .unwrap();
        let b = db
            .insert_record(NewRecord::new(WasteCategory::Organic, 0.2))
            .unwrap();
        db.delete_record(&a).unwrap();
        db.delete_record(&b).unwrap();

        assert_eq!(db.count_records(), 0);
        assert_eq!(total(&db, WasteCategory::Organic), 0.0);
        let snapshot = db.composition_snapshot().unwrap();
        assert_eq!(snapshot.data, [0.0, 0.0, 0.0]);
        assert_eq!(snapshot.percentages, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn monthly_change_follows_clock() {
        let (db, clock) = fixed_db();
        clock.set(at(2024, 11, 10, 8));
        db.insert_record(NewRecord::new(WasteCategory::Organic, 20.0))
            .unwrap();
        clock.set(at(2024, 12, 10, 8));
        db.insert_record(NewRecord::new(WasteCategory::Organic, 30.0))
            .unwrap();
        db.insert_record(NewRecord::new(WasteCategory::Inorganic, 9.0))
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.organic.monthly_change, 50.0);
        assert_eq!(stats.inorganic.monthly_change, 0.0);
        assert_eq!(stats.hazardous.monthly_change, 0.0);
    }

    #[test]
    fn reset_all_clears_records_and_aggregates() {
        let (db, _) = fixed_db();
        db.insert_record(NewRecord::new(WasteCategory::Organic, 5.0))
            .unwrap();
        db.insert_record(NewRecord::new(WasteCategory::Hazardous, 1.0))
            .unwrap();
        assert_eq!(db.reset_all().unwrap(), 2);
        assert_eq!(db.count_records(), 0);
        assert_eq!(db.stats().unwrap().combined_total(), 0.0);
        assert_eq!(db.environmental_impact().unwrap().co2_reduced, 0);
    }
}
