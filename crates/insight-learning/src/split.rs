//! Seeded train/test splitting.

use crate::error::{LearningError, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Row indices of the two partitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrainTestSplit {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

impl TrainTestSplit {
    /// Copy the rows of `items` belonging to each partition.
    pub fn apply<T: Clone>(&self, items: &[T]) -> (Vec<T>, Vec<T>) {
        let pick =
            |indices: &[usize]| -> Vec<T> { indices.iter().map(|&i| items[i].clone()).collect() };
        (pick(&self.train), pick(&self.test))
    }
}

/// Shuffle `0..n` with `seed` and hold out `ceil(n * test_size)` rows.
///
/// The first rows of the permutation form the test set.
///
/// # Errors
///
/// Returns [`LearningError::InvalidConfig`] if `test_size` is not in
/// `(0.0, 1.0)`, and [`LearningError::InvalidData`] if either partition
/// would be empty.
pub fn train_test_split(n: usize, test_size: f64, seed: u64) -> Result<TrainTestSplit> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(LearningError::InvalidConfig(format!(
            "test_size must be between 0.0 and 1.0 (exclusive), got {test_size}"
        )));
    }
    let n_test = (n as f64 * test_size).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(LearningError::InvalidData(format!(
            "cannot split {n} rows with test_size {test_size}"
        )));
    }

    let mut permutation: Vec<usize> = (0..n).collect();
    permutation.shuffle(&mut StdRng::seed_from_u64(seed));
    let train = permutation.split_off(n_test);

    Ok(TrainTestSplit {
        train,
        test: permutation,
    })
}
