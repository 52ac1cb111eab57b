//! Integration tests for doublekey-core

use crate::{DoubleKeyTable, TableSizes};

fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Trace)
        .is_test(true)
        .try_init();
}

fn sizes(list: &[usize]) -> TableSizes {
    TableSizes::new(list.to_vec()).unwrap()
}

/// Every table at or under load factor 0.5
fn within_load_limit<K1, K2, V>(table: &DoubleKeyTable<K1, K2, V>) -> bool
where
    K1: AsRef<str> + Eq,
    K2: AsRef<str> + Eq,
{
    let stats = table.stats();
    stats.outer.load_factor <= 0.5 && stats.inner.iter().all(|s| s.load_factor <= 0.5)
}

#[cfg(test)]
mod integration_tests {
    use super::{init_test_logger, sizes, within_load_limit};
    use crate::{DoubleKeyTable, TableSizes};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::{HashMap, HashSet};

    type Table = DoubleKeyTable<String, String, i32>;

    fn set(table: &mut Table, key1: &str, key2: &str, value: i32) {
        table.set(key1.to_string(), key2.to_string(), value).unwrap();
    }

    #[test]
    fn test_basic_workflow() {
        init_test_logger();
        let mut table = Table::new();

        set(&mut table, "Tim", "Jen", 1);
        set(&mut table, "Amy", "Ben", 2);
        set(&mut table, "May", "Ben", 3);

        assert_eq!(table.get("May", "Ben"), Ok(&3));

        let may: Vec<&String> = table.keys_for("May").unwrap();
        assert_eq!(may, vec!["Ben"]);

        let values: HashSet<i32> = table.values().into_iter().copied().collect();
        assert_eq!(values, HashSet::from([1, 2, 3]));
    }

    #[test]
    fn test_outer_resize_with_collision() {
        init_test_logger();
        let mut table = Table::new();

        // "Amy" and "May" share home slot 3 of the initial 5 slots
        assert_eq!(table.hash1("Amy"), table.hash1("May"));

        let entries = [
            ("Amy", "Ben", 1),
            ("May", "Ben", 2),
            ("Amy", "Tim", 3),
            ("Tim", "Jen", 4),
            ("Jen", "Amy", 5),
            ("Ben", "May", 6),
            ("Tim", "Ben", 7),
            ("Jen", "Tim", 8),
        ];

        for (i, (key1, key2, value)) in entries.iter().enumerate() {
            set(&mut table, key1, key2, *value);

            if table.table_count() <= 2 {
                assert_eq!(table.capacity(), 5, "no resize before entry {}", i);
            } else {
                assert!(table.capacity() > 5, "resize once occupancy exceeds 2");
            }
            assert!(within_load_limit(&table));
        }

        assert_eq!(table.table_count(), 5);
        assert_eq!(table.len(), 8);
        for (key1, key2, value) in entries {
            assert_eq!(table.get(key1, key2), Ok(&value));
        }
        assert!(table.is_consistent());
    }

    #[test]
    fn test_outer_cluster_repair() {
        init_test_logger();
        let mut table = Table::with_sizes(sizes(&[13, 29]), TableSizes::default());

        // 'a', 'n' and 'T' all hash to 6 of 13
        set(&mut table, "a", "x", 1);
        set(&mut table, "n", "x", 2);
        set(&mut table, "T", "x", 3);
        assert_eq!(table.locate("a", "x").unwrap().0, 6);
        assert_eq!(table.locate("n", "x").unwrap().0, 7);
        assert_eq!(table.locate("T", "x").unwrap().0, 8);

        table.delete("a", "x").unwrap();

        assert_eq!(table.table_count(), 2);
        assert_eq!(table.locate("n", "x").unwrap().0, 6);
        assert_eq!(table.locate("T", "x").unwrap().0, 7);
        assert_eq!(table.get("n", "x"), Ok(&2));
        assert_eq!(table.get("T", "x"), Ok(&3));
        assert!(table.is_consistent());
    }

    #[test]
    fn test_inner_cluster_repair() {
        init_test_logger();
        let mut table = Table::with_sizes(TableSizes::default(), sizes(&[13, 29]));

        set(&mut table, "k", "a", 1);
        set(&mut table, "k", "n", 2);
        set(&mut table, "k", "T", 3);
        let outer_pos = table.locate("k", "a").unwrap().0;
        assert_eq!(table.locate("k", "n").unwrap(), (outer_pos, 7));
        assert_eq!(table.locate("k", "T").unwrap(), (outer_pos, 8));

        table.delete("k", "a").unwrap();

        // Inner table still holds entries, outer slot untouched
        assert_eq!(table.table_count(), 1);
        assert_eq!(table.locate("k", "n").unwrap(), (outer_pos, 6));
        assert_eq!(table.locate("k", "T").unwrap(), (outer_pos, 7));
        assert!(table.is_consistent());
    }

    #[test]
    fn test_cluster_repair_across_home_slots() {
        let mut table = Table::with_sizes(sizes(&[13, 29]), TableSizes::default());

        // 'a' and 'n' start at 6, 'b' at 7, 'o' at 7
        for (key1, value) in [("a", 1), ("n", 2), ("b", 3), ("o", 4)] {
            set(&mut table, key1, "x", value);
        }

        table.delete("n", "x").unwrap();

        for (key1, value) in [("a", 1), ("b", 3), ("o", 4)] {
            assert_eq!(table.get(key1, "x"), Ok(&value));
        }
        assert!(table.is_consistent());
        assert_eq!(table.stats().outer.longest_cluster, 3);
    }

    #[test]
    fn test_emptied_inner_table_is_dropped() {
        let mut table = Table::new();
        set(&mut table, "Tim", "Jen", 1);
        set(&mut table, "Tim", "Amy", 2);
        set(&mut table, "Amy", "Ben", 3);

        table.delete("Tim", "Jen").unwrap();
        table.delete("Tim", "Amy").unwrap();

        assert_eq!(table.keys(), vec!["Amy"]);
        assert!(table.values_for("Tim").unwrap_err().is_not_found());
        assert!(table.is_consistent());
    }

    #[test]
    fn test_idempotent_projection() {
        let mut table = Table::new();
        for i in 0..40 {
            set(&mut table, &format!("outer{}", i % 7), &format!("inner{}", i), i);
        }

        assert_eq!(table.keys(), table.keys());
        assert_eq!(table.values(), table.values());
        assert_eq!(table.keys().len(), 7);
        assert_eq!(table.values().len(), 40);
    }

    #[test]
    fn test_digest_ignores_layout() {
        let mut grown: DoubleKeyTable<String, String, String> = DoubleKeyTable::new();
        let mut direct: DoubleKeyTable<String, String, String> =
            DoubleKeyTable::with_sizes(sizes(&[97, 193]), sizes(&[97, 193]));

        for i in 0..30 {
            let key1 = format!("d{}", i % 4);
            let key2 = format!("m{}", i);
            grown.set(key1.clone(), key2.clone(), format!("v{}", i)).unwrap();
        }
        for i in (0..30).rev() {
            direct
                .set(format!("d{}", i % 4), format!("m{}", i), format!("v{}", i))
                .unwrap();
        }
        // Churn that leaves the contents unchanged
        grown.set("zz".to_string(), "gone".to_string(), "x".to_string()).unwrap();
        grown.delete("zz", "gone").unwrap();

        assert_ne!(grown.capacity(), direct.capacity());
        assert_eq!(grown.digest(), direct.digest());
        assert_eq!(grown.digest().count(), 30);

        direct.delete("d1", "m1").unwrap();
        assert_ne!(grown.digest(), direct.digest());
    }

    #[test]
    fn test_random_ops_match_hashmap() {
        init_test_logger();
        let mut rng = ChaCha8Rng::seed_from_u64(12345);
        let mut table = Table::new();
        let mut model: HashMap<(String, String), i32> = HashMap::new();

        for step in 0..5000 {
            // Small key spaces force collisions and repeated deletes
            let key1 = format!("{}", rng.gen_range(0..12));
            let key2 = format!("{}", rng.gen_range(0..40));

            if rng.gen_bool(0.6) {
                let value: i32 = rng.gen_range(0..1000);
                let previous = table.set(key1.clone(), key2.clone(), value).unwrap();
                assert_eq!(previous, model.insert((key1, key2), value));
            } else {
                let removed = table.delete(&key1, &key2).ok();
                assert_eq!(removed, model.remove(&(key1, key2)));
            }

            assert_eq!(table.len(), model.len(), "count drift at step {}", step);
            if step % 50 == 0 {
                assert!(table.is_consistent(), "broken invariant at step {}", step);
                assert!(within_load_limit(&table));
            }
        }

        for ((key1, key2), value) in &model {
            assert_eq!(table.get(key1, key2), Ok(value));
        }
        let distinct_outer: HashSet<&String> = model.keys().map(|(k1, _)| k1).collect();
        assert_eq!(table.table_count(), distinct_outer.len());
        assert!(table.is_consistent());
    }

    #[test]
    fn test_drain_to_empty() {
        let mut rng = ChaCha8Rng::seed_from_u64(54321);
        let mut table = Table::new();
        let mut keys = Vec::new();

        for i in 0..300 {
            let key1 = format!("g{}", rng.gen_range(0..25));
            let key2 = format!("e{}", i);
            set(&mut table, &key1, &key2, i);
            keys.push((key1, key2));
        }

        for (i, (key1, key2)) in keys.iter().enumerate() {
            assert_eq!(table.delete(key1, key2), Ok(i as i32));
        }

        assert!(table.is_empty());
        assert_eq!(table.table_count(), 0);
        assert!(table.keys().is_empty());
        // Tables never shrink
        assert!(table.capacity() > 5);
    }
}
