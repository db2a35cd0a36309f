use investment_tracker_core::errors::CoreError;
use investment_tracker_core::models::chart::ChartSize;
use investment_tracker_core::models::investment::InvestmentDraft;
use investment_tracker_core::models::projection::ProjectionParams;
use investment_tracker_core::models::settings::Settings;
use investment_tracker_core::storage::backend::{FileBackend, KeyValueBackend, MemoryBackend};
use investment_tracker_core::storage::encryption::KdfParams;
use investment_tracker_core::storage::sealed::SealedFileBackend;
use investment_tracker_core::InvestmentTracker;

fn draft(asset: &str, quantity: f64, purchase: f64, current: Option<f64>) -> InvestmentDraft {
    InvestmentDraft::new(asset, quantity, purchase, current, "2024-01-01").unwrap()
}

fn seeded() -> InvestmentTracker<MemoryBackend> {
    let mut tracker = InvestmentTracker::in_memory();
    tracker.add(draft("ETF", 2.0, 10.0, Some(12.0))).unwrap();
    tracker.add(draft("Gold", 1.0, 100.0, None)).unwrap();
    tracker.add(draft("Bonds", 4.0, 25.0, Some(24.0))).unwrap();
    tracker
}

fn assets(tracker: &InvestmentTracker<MemoryBackend>) -> Vec<String> {
    tracker.list().unwrap().into_iter().map(|i| i.asset).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Add / edit / delete
// ═══════════════════════════════════════════════════════════════════

mod mutations {
    use super::*;

    #[test]
    fn add_appends_in_order() {
        let tracker = seeded();
        assert_eq!(assets(&tracker), vec!["ETF", "Gold", "Bonds"]);
    }

    #[test]
    fn add_from_form() {
        let mut tracker = InvestmentTracker::in_memory();
        let id = tracker
            .add_from_form("ETF", "3", "10.5", "", "2024-02-02")
            .unwrap();
        let stored = tracker.get(id).unwrap();
        assert_eq!(stored.quantity, 3.0);
        assert_eq!(stored.current_price, None);
    }

    #[test]
    fn invalid_form_writes_nothing() {
        let mut tracker = InvestmentTracker::in_memory();
        assert!(tracker.add_from_form("ETF", "x", "10", "", "2024").is_err());
        assert!(tracker.list().unwrap().is_empty());
    }

    #[test]
    fn update_by_id_keeps_position_and_id() {
        let mut tracker = seeded();
        let gold = tracker.list().unwrap()[1].id;
        tracker.update(gold, draft("Silver", 10.0, 20.0, None)).unwrap();

        let list = tracker.list().unwrap();
        assert_eq!(list[1].id, gold);
        assert_eq!(list[1].asset, "Silver");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn remove_by_id() {
        let mut tracker = seeded();
        let etf = tracker.list().unwrap()[0].id;
        let removed = tracker.remove(etf).unwrap();
        assert_eq!(removed.asset, "ETF");
        assert_eq!(assets(&tracker), vec!["Gold", "Bonds"]);
        assert!(matches!(tracker.get(etf), Err(CoreError::InvestmentNotFound(_))));
    }

    #[test]
    fn unknown_id() {
        let mut tracker = seeded();
        let stranger = uuid::Uuid::new_v4();
        assert!(matches!(
            tracker.update(stranger, draft("X", 1.0, 1.0, None)),
            Err(CoreError::InvestmentNotFound(_))
        ));
        assert!(matches!(
            tracker.remove(stranger),
            Err(CoreError::InvestmentNotFound(_))
        ));
    }

    #[test]
    fn edit_by_index_after_delete_targets_the_current_row() {
        let mut tracker = seeded();
        let gold = tracker.list().unwrap()[1].id;

        tracker.remove_at(0).unwrap();
        // "Gold" is now first; index 0 must refer to it, not to the deleted ETF.
        let edited = tracker.update_at(0, draft("Gold bars", 2.0, 100.0, None)).unwrap();

        assert_eq!(edited, gold);
        assert_eq!(assets(&tracker), vec!["Gold bars", "Bonds"]);
    }

    #[test]
    fn edit_later_index_after_deleting_an_earlier_one() {
        let mut tracker = seeded();
        let bonds = tracker.list().unwrap()[2].id;

        tracker.remove_at(0).unwrap();
        let edited = tracker.update_at(1, draft("Bonds 2030", 5.0, 25.0, None)).unwrap();

        assert_eq!(edited, bonds);
        assert_eq!(assets(&tracker), vec!["Gold", "Bonds 2030"]);
        assert_eq!(tracker.get(bonds).unwrap().quantity, 5.0);
    }

    #[test]
    fn index_out_of_range() {
        let mut tracker = seeded();
        assert!(matches!(
            tracker.remove_at(3),
            Err(CoreError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(matches!(
            tracker.update_at(7, draft("X", 1.0, 1.0, None)),
            Err(CoreError::IndexOutOfRange { index: 7, len: 3 })
        ));
    }

    #[test]
    fn clear() {
        let mut tracker = seeded();
        tracker.clear().unwrap();
        assert!(tracker.list().unwrap().is_empty());
        assert_eq!(tracker.view().unwrap().totals.investment_count, 0);
    }

    #[test]
    fn edits_by_another_writer_are_seen() {
        let tracker = seeded();
        let mut backend = tracker.into_backend();
        let key = Settings::default().storage_key;
        backend.set(&key, "[]".into()).unwrap();

        let tracker = InvestmentTracker::new(backend, Settings::default()).unwrap();
        assert!(tracker.list().unwrap().is_empty());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Views, charts, projection through the facade
// ═══════════════════════════════════════════════════════════════════

mod views {
    use super::*;

    #[test]
    fn view_is_recomputed_after_mutation() {
        let mut tracker = seeded();
        assert_eq!(tracker.view().unwrap().totals.total_current_value, 220.0);
        tracker.remove_at(2).unwrap();
        assert_eq!(tracker.view().unwrap().totals.total_current_value, 124.0);
    }

    #[test]
    fn summary_and_table() {
        let tracker = seeded();
        let lines = tracker.summary_lines().unwrap();
        assert_eq!(lines[0], "Total initial value: 220.00 €");
        assert_eq!(lines[1], "Total current value: 220.00 €");
        assert_eq!(lines[2], "Number of investments: 3");
        assert!(tracker.portfolio_table().unwrap().contains("Bonds"));
    }

    #[test]
    fn pie_follows_distribution() {
        let tracker = seeded();
        let layout = tracker.pie_layout().unwrap().unwrap();
        let categories: Vec<&str> = layout.wedges.iter().map(|w| w.category.as_str()).collect();
        assert_eq!(categories, vec!["ETF", "Gold", "Bonds"]);
        assert_eq!(layout.size, ChartSize::new(400.0, 300.0));
    }

    #[test]
    fn empty_portfolio_pie_is_blank() {
        let tracker = InvestmentTracker::in_memory();
        assert!(tracker.pie_layout().unwrap().is_none());
        let svg = tracker.pie_svg().unwrap();
        assert!(svg.starts_with("<svg"));
        assert!(!svg.contains("<path"));
        assert!(!svg.contains("<circle"));
    }

    #[test]
    fn pie_svg_has_a_wedge_per_category() {
        let svg = seeded().pie_svg().unwrap();
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains("ETF (10.9%)"));
    }

    #[test]
    fn projection_chart() {
        let tracker = InvestmentTracker::in_memory();
        let series = tracker
            .simulate(&ProjectionParams::new(1000.0, 100.0, 6.0, 1))
            .unwrap();
        let layout = tracker.projection_layout(&series);
        assert_eq!(layout.points.len(), 12);
        assert_eq!(layout.size, ChartSize::new(800.0, 400.0));

        let svg = tracker.projection_svg(&series);
        assert!(svg.contains("<polyline"));
        assert!(svg.contains("Monthly projection over 1 years"));
        assert_eq!(
            tracker.projection_summary(&series).unwrap(),
            "Estimated final value after 1 years: 2\u{202F}301,40\u{00A0}€"
        );
    }

    #[test]
    fn chart_sizes_can_change() {
        let mut tracker = InvestmentTracker::in_memory();
        tracker
            .set_chart_sizes(ChartSize::new(600.0, 600.0), ChartSize::new(1000.0, 500.0))
            .unwrap();
        assert_eq!(tracker.settings().pie_chart, ChartSize::new(600.0, 600.0));
        assert!(tracker
            .set_chart_sizes(ChartSize::new(0.0, 600.0), ChartSize::new(1000.0, 500.0))
            .is_err());
        assert_eq!(tracker.settings().pie_chart, ChartSize::new(600.0, 600.0));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Opening stores
// ═══════════════════════════════════════════════════════════════════

mod opening {
    use super::*;

    #[test]
    fn legacy_ids_are_stable_after_open() {
        let mut backend = MemoryBackend::new();
        backend
            .set(
                "investissements_arnaud",
                r#"[{"asset":"ETF","quantity":1,"purchasePrice":10,"currentPrice":null,"purchaseDate":"2024"}]"#
                    .into(),
            )
            .unwrap();
        let mut tracker = InvestmentTracker::new(backend, Settings::default()).unwrap();
        let id = tracker.list().unwrap()[0].id;
        assert_eq!(tracker.list().unwrap()[0].id, id);
        tracker.update(id, draft("ETF", 2.0, 10.0, None)).unwrap();
        assert_eq!(tracker.get(id).unwrap().quantity, 2.0);
    }

    #[test]
    fn ids_stay_usable_when_another_writer_drops_them() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        let mut tracker = InvestmentTracker::open_file(&path, Settings::default()).unwrap();

        let mut other = FileBackend::new(&path);
        other
            .set(
                &Settings::default().storage_key,
                r#"[{"asset":"ETF","quantity":1,"purchasePrice":10,"currentPrice":null,"purchaseDate":"2024"}]"#
                    .into(),
            )
            .unwrap();

        let id = tracker.list().unwrap()[0].id;
        assert_eq!(tracker.list().unwrap()[0].id, id);
        assert_eq!(tracker.get(id).unwrap().asset, "ETF");
        tracker.update(id, draft("ETF", 3.0, 10.0, None)).unwrap();
        assert_eq!(tracker.get(id).unwrap().quantity, 3.0);
        assert!(tracker.remove(id).is_ok());
    }

    #[test]
    fn invalid_settings_rejected() {
        let settings = Settings {
            news_limit: 0,
            ..Settings::default()
        };
        assert!(InvestmentTracker::new(MemoryBackend::new(), settings).is_err());
    }

    #[test]
    fn custom_storage_key() {
        let settings = Settings {
            storage_key: "my_key".into(),
            ..Settings::default()
        };
        let mut tracker = InvestmentTracker::new(MemoryBackend::new(), settings).unwrap();
        tracker.add(draft("ETF", 1.0, 1.0, None)).unwrap();
        let backend = tracker.into_backend();
        assert!(backend.get("my_key").unwrap().is_some());
        assert!(backend.get("investissements_arnaud").unwrap().is_none());
    }

    #[test]
    fn json_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.json");
        {
            let mut tracker = InvestmentTracker::open_file(&path, Settings::default()).unwrap();
            tracker.add(draft("ETF", 1.0, 10.0, Some(11.0))).unwrap();
        }
        let tracker = InvestmentTracker::open_file(&path, Settings::default()).unwrap();
        assert_eq!(tracker.list().unwrap()[0].current_price, Some(11.0));
    }

    #[test]
    fn sealed_file_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("portfolio.invk");
        {
            let backend = SealedFileBackend::with_kdf_params(&path, "pw", KdfParams::light());
            let mut tracker = InvestmentTracker::new(backend, Settings::default()).unwrap();
            tracker.add(draft("ETF", 1.0, 10.0, None)).unwrap();
        }
        let backend = SealedFileBackend::with_kdf_params(&path, "pw", KdfParams::light());
        let tracker = InvestmentTracker::new(backend, Settings::default()).unwrap();
        assert_eq!(tracker.list().unwrap().len(), 1);

        let wrong = SealedFileBackend::with_kdf_params(&path, "nope", KdfParams::light());
        assert!(matches!(
            InvestmentTracker::new(wrong, Settings::default()),
            Err(CoreError::Decryption)
        ));
    }
}

// ═══════════════════════════════════════════════════════════════════
// Export / Import
// ═══════════════════════════════════════════════════════════════════

mod export_import {
    use super::*;

    #[test]
    fn json_round_trip_into_empty_tracker() {
        let source = seeded();
        let json = source.export_to_json().unwrap();

        let mut target = InvestmentTracker::in_memory();
        assert_eq!(target.import_from_json(&json).unwrap(), 3);
        assert_eq!(target.list().unwrap(), source.list().unwrap());
    }

    #[test]
    fn import_twice_gets_fresh_ids() {
        let json = seeded().export_to_json().unwrap();
        let mut target = InvestmentTracker::in_memory();
        target.import_from_json(&json).unwrap();
        target.import_from_json(&json).unwrap();

        let list = target.list().unwrap();
        assert_eq!(list.len(), 6);
        let mut ids: Vec<_> = list.iter().map(|i| i.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn invalid_record_aborts_import() {
        let mut tracker = seeded();
        let json = r#"[
            {"asset":"OK","quantity":1,"purchasePrice":1,"purchaseDate":"2024"},
            {"asset":"","quantity":1,"purchasePrice":1,"purchaseDate":"2024"}
        ]"#;
        assert!(tracker.import_from_json(json).is_err());
        assert_eq!(tracker.list().unwrap().len(), 3);
    }

    #[test]
    fn csv_export() {
        let csv = seeded().export_to_csv().unwrap();
        let mut lines = csv.lines();
        assert_eq!(
            lines.next().unwrap(),
            "id,asset,quantity,purchase_price,current_price,purchase_date"
        );
        let gold = lines.nth(1).unwrap();
        assert!(gold.ends_with(",Gold,1,100,,2024-01-01"));
    }
}
