//! Train/eval splitting of a manifest.

use rand::seq::SliceRandom;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::PagemaskError;
use crate::manifest::{read_manifest, write_manifest, ManifestEntry};

pub const DEFAULT_EVAL_FRACTION: f64 = 0.15;
pub const DEFAULT_SEED: u64 = 42;
pub const EVAL_FILE: &str = "eval_data.csv";
pub const TRAIN_FILE: &str = "train_data.csv";

/// Split options.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOptions {
    /// Share of rows drawn into the eval set.
    pub fraction: f64,
    pub seed: u64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            fraction: DEFAULT_EVAL_FRACTION,
            seed: DEFAULT_SEED,
        }
    }
}

/// Validate split options before running.
pub fn validate_split_options(opts: &SplitOptions) -> Result<(), PagemaskError> {
    if !(0.0 < opts.fraction && opts.fraction < 1.0) {
        return Err(PagemaskError::InvalidSplitParams {
            message: format!(
                "--fraction must be in the open interval (0.0, 1.0), got {}",
                opts.fraction
            ),
        });
    }
    Ok(())
}

/// Disjoint eval/train partition of a row set.
#[derive(Clone, Debug, PartialEq)]
pub struct Split<T> {
    /// Sampled rows, in draw order.
    pub eval: Vec<T>,
    /// Remaining rows, in source order.
    pub train: Vec<T>,
}

/// Number of eval rows for `total` rows: `total * fraction`, rounded half to even.
pub fn eval_count(total: usize, fraction: f64) -> usize {
    ((total as f64 * fraction).round_ties_even() as usize).min(total)
}

/// Draw eval row indices; train indices are the sorted complement.
pub fn split_indices<R: Rng + ?Sized>(
    total: usize,
    fraction: f64,
    rng: &mut R,
) -> (Vec<usize>, Vec<usize>) {
    let mut order: Vec<usize> = (0..total).collect();
    order.shuffle(rng);
    order.truncate(eval_count(total, fraction));

    let mut in_eval = vec![false; total];
    for index in &order {
        in_eval[*index] = true;
    }
    let train = (0..total).filter(|index| !in_eval[*index]).collect();

    (order, train)
}

/// Split rows with an explicit random source.
pub fn split_rows<T: Clone, R: Rng + ?Sized>(rows: &[T], fraction: f64, rng: &mut R) -> Split<T> {
    let (eval, train) = split_indices(rows.len(), fraction, rng);
    Split {
        eval: eval.into_iter().map(|i| rows[i].clone()).collect(),
        train: train.into_iter().map(|i| rows[i].clone()).collect(),
    }
}

/// Split rows with a generator seeded from `opts.seed`.
pub fn split_seeded<T: Clone>(rows: &[T], opts: &SplitOptions) -> Result<Split<T>, PagemaskError> {
    validate_split_options(opts)?;
    let mut rng = StdRng::seed_from_u64(opts.seed);
    Ok(split_rows(rows, opts.fraction, &mut rng))
}

/// Files written by [`split_manifest_file`].
#[derive(Clone, Debug, PartialEq)]
pub struct SplitOutput {
    pub eval_path: PathBuf,
    pub train_path: PathBuf,
    pub eval_rows: usize,
    pub train_rows: usize,
}

/// Split a manifest file into `eval_data.csv` and `train_data.csv` next to it.
pub fn split_manifest_file(path: &Path, opts: &SplitOptions) -> Result<SplitOutput, PagemaskError> {
    let entries: Vec<ManifestEntry> = read_manifest(path)?;
    let split = split_seeded(&entries, opts)?;

    let dir = path.parent().unwrap_or_else(|| Path::new(""));
    let eval_path = dir.join(EVAL_FILE);
    let train_path = dir.join(TRAIN_FILE);
    write_manifest(&eval_path, &split.eval)?;
    write_manifest(&train_path, &split.train)?;

    info!(
        eval = split.eval.len(),
        train = split.train.len(),
        seed = opts.seed,
        "split manifest"
    );

    Ok(SplitOutput {
        eval_path,
        train_path,
        eval_rows: split.eval.len(),
        train_rows: split.train.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn validate_opts_rejects_out_of_range_fraction() {
        for fraction in [0.0, 1.0, -0.5, 2.0, f64::NAN] {
            let opts = SplitOptions {
                fraction,
                ..Default::default()
            };
            assert!(validate_split_options(&opts).is_err(), "{fraction}");
        }
        assert!(validate_split_options(&SplitOptions::default()).is_ok());
    }

    #[test]
    fn eval_count_rounds_half_to_even() {
        assert_eq!(eval_count(100, 0.15), 15);
        assert_eq!(eval_count(10, 0.15), 2);
        assert_eq!(eval_count(30, 0.15), 4);
        assert_eq!(eval_count(3, 0.15), 0);
        assert_eq!(eval_count(0, 0.15), 0);
    }

    #[test]
    fn split_partitions_rows() {
        let rows: Vec<u32> = (0..40).collect();
        let split = split_seeded(&rows, &SplitOptions::default()).expect("split");

        assert_eq!(split.eval.len(), 6);
        assert_eq!(split.eval.len() + split.train.len(), rows.len());

        let eval: HashSet<_> = split.eval.iter().collect();
        let train: HashSet<_> = split.train.iter().collect();
        assert!(eval.is_disjoint(&train));
        assert_eq!(eval.union(&train).count(), rows.len());

        let mut sorted_train = split.train.clone();
        sorted_train.sort();
        assert_eq!(split.train, sorted_train);
    }

    #[test]
    fn split_is_deterministic_with_seed() {
        let rows: Vec<u32> = (0..50).collect();
        let a = split_seeded(&rows, &SplitOptions::default()).expect("split a");
        let b = split_seeded(&rows, &SplitOptions::default()).expect("split b");
        assert_eq!(a, b);
    }
}
