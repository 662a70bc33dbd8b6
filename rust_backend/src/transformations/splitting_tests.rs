#[cfg(test)]
mod tests {
    use crate::core::{PrepError, Stratify};
    use crate::transformations::splitting::{split, train_test_split};
    use polars::prelude::*;
    use std::collections::HashSet;

    /// Helper: `n_a` rows of category "A" followed by `n_b` rows of "B"
    fn categorical_table(n_a: usize, n_b: usize) -> DataFrame {
        let ids: Vec<i64> = (0..(n_a + n_b) as i64).collect();
        let categories: Vec<&str> = (0..n_a + n_b)
            .map(|i| if i < n_a { "A" } else { "B" })
            .collect();
        df!("id" => ids, "category" => categories).unwrap()
    }

    fn ids(df: &DataFrame) -> Vec<i64> {
        df.column("id")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    fn count_category(df: &DataFrame, category: &str) -> usize {
        df.column("category")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .filter(|v| *v == Some(category))
            .count()
    }

    fn by_category() -> Stratify {
        Stratify::Column("category".into())
    }

    /// Test the 40/60 stratified scenario from the pipeline defaults
    #[test]
    fn test_stratified_scenario_proportions() {
        let table = categorical_table(40, 60);
        let (train, val, test) = split(&table, 0.2, 0.2, 42, &by_category()).unwrap();

        assert_eq!(train.height(), 60);
        assert_eq!(val.height(), 20);
        assert_eq!(test.height(), 20);

        assert_eq!(count_category(&train, "A"), 24);
        assert_eq!(count_category(&train, "B"), 36);
        assert_eq!(count_category(&val, "A"), 8);
        assert_eq!(count_category(&val, "B"), 12);
        assert_eq!(count_category(&test, "A"), 8);
        assert_eq!(count_category(&test, "B"), 12);
    }

    /// Test that partitions are disjoint and cover the input exactly
    #[test]
    fn test_partitions_cover_input() {
        let table = categorical_table(17, 36);
        for stratify in [Stratify::None, by_category()] {
            let (train, val, test) = split(&table, 0.15, 0.25, 7, &stratify).unwrap();

            let mut all: Vec<i64> = ids(&train);
            all.extend(ids(&val));
            all.extend(ids(&test));
            assert_eq!(all.len(), table.height());

            let unique: HashSet<i64> = all.iter().copied().collect();
            assert_eq!(unique.len(), table.height(), "duplicate rows across partitions");
            assert_eq!(unique, ids(&table).into_iter().collect::<HashSet<_>>());
        }
    }

    /// Test that the same seed reproduces the same partitions
    #[test]
    fn test_same_seed_same_partitions() {
        let table = categorical_table(30, 30);
        let first = split(&table, 0.2, 0.3, 123, &Stratify::None).unwrap();
        let second = split(&table, 0.2, 0.3, 123, &Stratify::None).unwrap();
        assert!(first.0.equals_missing(&second.0));
        assert!(first.1.equals_missing(&second.1));
        assert!(first.2.equals_missing(&second.2));

        let third = split(&table, 0.2, 0.3, 124, &Stratify::None).unwrap();
        assert_ne!(ids(&first.2), ids(&third.2));
    }

    /// Test the adjusted validation fraction on a non-stratified split
    #[test]
    fn test_val_size_is_relative_to_whole_table() {
        let table = categorical_table(0, 200);
        let (train, val, test) = split(&table, 0.1, 0.3, 5, &Stratify::None).unwrap();
        assert_eq!(test.height(), 20);
        assert_eq!(val.height(), 60);
        assert_eq!(train.height(), 120);
    }

    /// Test that sizes summing close to 1 leave a near-empty train set
    #[test]
    fn test_near_empty_train_set() {
        let table = categorical_table(0, 100);
        let (train, val, test) = split(&table, 0.5, 0.49, 1, &Stratify::None).unwrap();
        assert_eq!(test.height(), 50);
        assert_eq!(val.height(), 49);
        assert_eq!(train.height(), 1);
    }

    /// Test invalid sizes
    #[test]
    fn test_invalid_sizes() {
        let table = categorical_table(5, 5);
        for (test_size, val_size) in [(0.5, 0.5), (0.6, 0.5), (0.0, 0.2), (0.2, 1.2)] {
            let err = split(&table, test_size, val_size, 1, &Stratify::None).unwrap_err();
            assert!(matches!(err, PrepError::InvalidSizeError(_)));
        }
    }

    /// Test that a singleton category cannot be stratified
    #[test]
    fn test_singleton_category_fails() {
        let table = categorical_table(1, 30);
        let err = split(&table, 0.2, 0.2, 42, &by_category()).unwrap_err();
        match err {
            PrepError::StratificationError(msg) => assert!(msg.contains("'A'"), "{}", msg),
            other => panic!("expected stratification error, got {:?}", other),
        }
    }

    /// Test that the held-out side must fit one row per category
    #[test]
    fn test_too_few_rows_for_categories() {
        let table = categorical_table(2, 2);
        let err = train_test_split(&table, 0.1, 42, &by_category()).unwrap_err();
        assert!(matches!(err, PrepError::StratificationError(_)));
    }

    /// Test that a missing stratify column is a schema error
    #[test]
    fn test_missing_stratify_column() {
        let table = categorical_table(10, 10);
        let stratify = Stratify::Column("neighbourhood_group".into());
        let err = split(&table, 0.2, 0.2, 42, &stratify).unwrap_err();
        assert!(matches!(err, PrepError::SchemaError(_)));
    }

    /// Test stratifying on a numeric column
    #[test]
    fn test_numeric_category() {
        let table = df!(
            "id" => (0..30i64).collect::<Vec<_>>(),
            "category" => (0..30i64).map(|i| i % 3).collect::<Vec<_>>(),
        )
        .unwrap();
        let (_, held) = train_test_split(&table, 0.2, 9, &by_category()).unwrap();
        let held_classes: HashSet<i64> = held
            .column("category")
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect();
        assert_eq!(held.height(), 6);
        assert_eq!(held_classes.len(), 3);
    }

    /// Test that null stratify values form their own category
    #[test]
    fn test_null_category() {
        let categories: Vec<Option<&str>> = (0..20)
            .map(|i| if i % 4 == 0 { None } else { Some("A") })
            .collect();
        let table = df!("id" => (0..20i64).collect::<Vec<_>>(), "category" => categories).unwrap();
        let (kept, held) = train_test_split(&table, 0.2, 3, &by_category()).unwrap();
        assert_eq!(held.height(), 4);
        assert_eq!(held.column("category").unwrap().null_count(), 1);
        assert_eq!(kept.height(), 16);
    }

    /// Test that splitting an empty table yields three empty tables
    #[test]
    fn test_empty_table() {
        let table = categorical_table(0, 0);
        let (train, val, test) = split(&table, 0.2, 0.2, 42, &by_category()).unwrap();
        assert_eq!((train.height(), val.height(), test.height()), (0, 0, 0));
        assert_eq!(train.get_column_names(), table.get_column_names());
    }
}
