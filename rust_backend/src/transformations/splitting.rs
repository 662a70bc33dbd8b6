//! Seeded train/validation/test splitting with optional stratification.
//!
//! A three-way split is two consecutive two-way partitions: the test set is
//! carved out of the whole table, then the validation set is carved out of the
//! remainder using `val_size / (1 - test_size)` so that both sizes stay
//! relative to the whole table. Each partition seeds a fresh ChaCha8
//! generator with the same seed.

use log::debug;
use polars::prelude::*;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::HashMap;

use super::filtering::require_column;
use crate::core::{PrepError, PrepResult, SplitSizes, Stratify};

/// Absorbs float noise such as `0.25000000000000006 * 80`.
const COUNT_TOLERANCE: f64 = 1e-9;

/// Number of partitions each two-way split produces.
const PARTITIONS: usize = 2;

/// Number of rows that go to the held-out side: `ceil(fraction * n)`.
pub fn held_out_count(n_rows: usize, fraction: f64) -> usize {
    let exact = fraction * n_rows as f64 - COUNT_TOLERANCE;
    (exact.ceil().max(0.0) as usize).min(n_rows)
}

/// Distribute `n_draws` among categories proportionally to `counts`.
///
/// Each category first gets the floor of its exact share; leftover draws go to
/// the largest fractional remainders, ties resolved by category order.
pub fn allocate_proportional(counts: &[usize], n_draws: usize) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let exact: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 * n_draws as f64 / total as f64)
        .collect();
    let mut alloc: Vec<usize> = exact
        .iter()
        .map(|e| (e + COUNT_TOLERANCE).floor() as usize)
        .collect();

    let assigned: usize = alloc.iter().sum();
    let remaining = n_draws.saturating_sub(assigned);

    let mut order: Vec<usize> = (0..counts.len()).collect();
    order.sort_by(|&a, &b| {
        let frac_a = exact[a] - alloc[a] as f64;
        let frac_b = exact[b] - alloc[b] as f64;
        frac_b.partial_cmp(&frac_a).unwrap_or(Ordering::Equal)
    });
    for &i in order.iter().take(remaining) {
        alloc[i] += 1;
    }
    alloc
}

/// Row indices of one stratify category; `None` is the null category
type Group = (Option<String>, Vec<IdxSize>);

/// Row indices grouped by the stratify column, groups in first-appearance order.
///
/// Values are compared by their string form; nulls form their own group.
fn group_by_category(df: &DataFrame, column: &str) -> PrepResult<Vec<Group>> {
    let labels = require_column(df, column)?.cast(&DataType::String)?;
    let mut positions: HashMap<Option<String>, usize> = HashMap::new();
    let mut groups: Vec<Group> = Vec::new();

    for (row_idx, label) in labels.str()?.into_iter().enumerate() {
        let key = label.map(str::to_string);
        let row_idx = row_idx as IdxSize;
        match positions.get(&key) {
            Some(&pos) => groups[pos].1.push(row_idx),
            None => {
                positions.insert(key.clone(), groups.len());
                groups.push((key, vec![row_idx]));
            }
        }
    }
    Ok(groups)
}

/// Gather the rows at `indices`, in that order.
fn take_rows(df: &DataFrame, indices: Vec<IdxSize>) -> PrepResult<DataFrame> {
    let indices = IdxCa::from_vec("idx".into(), indices);
    Ok(df.take(&indices)?)
}

fn display_category(key: &Option<String>) -> String {
    match key {
        Some(k) => format!("'{}'", k),
        None => "<null>".to_string(),
    }
}

/// Split a frame in two: `(kept, held_out)`, with `held_out` holding
/// `ceil(held_out_fraction * n)` rows.
///
/// When `stratify` names a column, every category contributes to each side in
/// proportion to its size.
///
/// # Errors
///
/// * [`PrepError::InvalidSizeError`] if the fraction is not in (0, 1)
/// * [`PrepError::SchemaError`] if the stratify column does not exist
/// * [`PrepError::StratificationError`] if a category has fewer than 2 rows,
///   or either side is smaller than the number of categories
pub fn train_test_split(
    df: &DataFrame,
    held_out_fraction: f64,
    random_seed: u64,
    stratify: &Stratify,
) -> PrepResult<(DataFrame, DataFrame)> {
    if !held_out_fraction.is_finite() || held_out_fraction <= 0.0 || held_out_fraction >= 1.0 {
        return Err(PrepError::InvalidSizeError(format!(
            "held-out fraction must be in (0, 1), got {}",
            held_out_fraction
        )));
    }

    let n_rows = df.height();
    let n_held = held_out_count(n_rows, held_out_fraction);
    let mut rng = ChaCha8Rng::seed_from_u64(random_seed);

    let (kept, held) = match stratify.column() {
        None => {
            let mut permutation: Vec<IdxSize> = (0..n_rows as IdxSize).collect();
            permutation.shuffle(&mut rng);
            let (held, kept) = permutation.split_at(n_held);
            (kept.to_vec(), held.to_vec())
        }
        Some(column) => stratified_indices(df, column, n_held, &mut rng)?,
    };

    debug!(
        "Two-way split of {} rows (fraction {}, stratify {}): kept {}, held out {}",
        n_rows,
        held_out_fraction,
        stratify,
        kept.len(),
        held.len()
    );
    Ok((take_rows(df, kept)?, take_rows(df, held)?))
}

fn stratified_indices(
    df: &DataFrame,
    column: &str,
    n_held: usize,
    rng: &mut ChaCha8Rng,
) -> PrepResult<(Vec<IdxSize>, Vec<IdxSize>)> {
    let groups = group_by_category(df, column)?;

    if let Some((key, members)) = groups.iter().find(|(_, m)| m.len() < PARTITIONS) {
        return Err(PrepError::StratificationError(format!(
            "category {} of column '{}' has {} member(s); at least {} are required",
            display_category(key),
            column,
            members.len(),
            PARTITIONS
        )));
    }

    let n_classes = groups.len();
    let n_kept = df.height() - n_held;
    if n_held < n_classes || n_kept < n_classes {
        return Err(PrepError::StratificationError(format!(
            "column '{}' has {} categories but the partitions hold {} and {} rows",
            column, n_classes, n_kept, n_held
        )));
    }

    let counts: Vec<usize> = groups.iter().map(|(_, m)| m.len()).collect();
    let held_per_class = allocate_proportional(&counts, n_held);

    let mut kept = Vec::with_capacity(n_kept);
    let mut held = Vec::with_capacity(n_held);
    for ((_, members), take) in groups.into_iter().zip(held_per_class) {
        let mut members = members;
        members.shuffle(rng);
        held.extend_from_slice(&members[..take]);
        kept.extend_from_slice(&members[take..]);
    }
    kept.shuffle(rng);
    held.shuffle(rng);
    Ok((kept, held))
}

/// Split a frame into `(train, val, test)`.
///
/// `test_size` and `val_size` are both fractions of the whole frame. The same
/// `random_seed` drives both internal partitions, so identical inputs always
/// produce identical partitions.
///
/// # Examples
///
/// ```
/// use nyc_airbnb_prep::core::Stratify;
/// use nyc_airbnb_prep::transformations::split;
/// use polars::prelude::*;
///
/// let df = df!("id" => (0..10i64).collect::<Vec<_>>()).unwrap();
///
/// let (train, val, test) = split(&df, 0.2, 0.2, 42, &Stratify::None).unwrap();
/// assert_eq!((train.height(), val.height(), test.height()), (6, 2, 2));
/// ```
pub fn split(
    df: &DataFrame,
    test_size: f64,
    val_size: f64,
    random_seed: u64,
    stratify_by: &Stratify,
) -> PrepResult<(DataFrame, DataFrame, DataFrame)> {
    let sizes = SplitSizes::new(test_size, val_size)?;
    split_with_sizes(df, sizes, random_seed, stratify_by)
}

/// [`split`] taking already validated [`SplitSizes`].
pub fn split_with_sizes(
    df: &DataFrame,
    sizes: SplitSizes,
    random_seed: u64,
    stratify_by: &Stratify,
) -> PrepResult<(DataFrame, DataFrame, DataFrame)> {
    if let Some(column) = stratify_by.column() {
        require_column(df, column)?;
    }

    let (train_temp, test) = train_test_split(df, sizes.test_size(), random_seed, stratify_by)?;
    let (train, val) = train_test_split(
        &train_temp,
        sizes.adjusted_val_fraction(),
        random_seed,
        stratify_by,
    )?;

    debug!(
        "Split {} rows into train={}, val={}, test={}",
        df.height(),
        train.height(),
        val.height(),
        test.height()
    );
    Ok((train, val, test))
}
