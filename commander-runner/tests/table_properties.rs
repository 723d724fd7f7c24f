//! Property tests for price table loading.
//!
//! 1. Forward fill leaves no gap after a column's first price
//! 2. Batch results follow universe order whatever the table holds

use std::collections::BTreeMap;

use chrono::NaiveDate;
use proptest::prelude::*;

use commander_core::{EngineConfig, ScoringEngine};
use commander_runner::{evaluate_universe, trading_days, PriceTable, Universe};

fn arb_column(len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![3 => (1.0..500.0_f64), 1 => Just(f64::NAN), 1 => Just(-1.0)],
        len,
    )
}

fn dates(len: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
    trading_days(start, start + chrono::Duration::days(len as i64 * 2))
        .into_iter()
        .take(len)
        .collect()
}

proptest! {
    #[test]
    fn forward_fill_leaves_no_interior_gaps(column in arb_column(60)) {
        let columns = BTreeMap::from([("X".to_string(), column.clone())]);
        let table = PriceTable::new(dates(60), columns).unwrap();
        let filled = table.column("X").unwrap();

        match column.iter().position(|p| p.is_finite() && *p > 0.0) {
            Some(first) => {
                prop_assert!(filled[..first].iter().all(|p| p.is_nan()));
                prop_assert!(filled[first..].iter().all(|p| p.is_finite() && *p > 0.0));
                prop_assert_eq!(table.series("X").unwrap().len(), 60 - first);
            }
            None => {
                prop_assert!(filled.iter().all(|p| p.is_nan()));
                prop_assert!(table.series("X").is_none());
            }
        }
    }

    #[test]
    fn batch_preserves_universe_order(mask in prop::collection::vec(any::<bool>(), 6)) {
        let names = ["A", "B", "C", "D", "E", "F"];
        let columns: BTreeMap<String, Vec<f64>> = names
            .iter()
            .zip(&mask)
            .filter(|(_, present)| **present)
            .map(|(name, _)| (name.to_string(), vec![100.0; 30]))
            .collect();
        let table = PriceTable::new(dates(30), columns).unwrap();
        let universe = Universe {
            symbols: names.iter().rev().map(|s| s.to_string()).collect(),
            aliases: BTreeMap::new(),
            margins: BTreeMap::new(),
        };

        let engine = ScoringEngine::new(EngineConfig::default()).unwrap();
        let outcome = evaluate_universe(&engine, &table, &universe);

        let expected: Vec<&str> = names
            .iter()
            .rev()
            .zip(mask.iter().rev())
            .filter(|(_, present)| **present)
            .map(|(name, _)| *name)
            .collect();
        let evaluated: Vec<&str> = outcome.evaluations.iter().map(|e| e.symbol.as_str()).collect();
        prop_assert_eq!(evaluated, expected);
        prop_assert_eq!(outcome.evaluations.len() + outcome.skipped.len(), 6);
    }
}
