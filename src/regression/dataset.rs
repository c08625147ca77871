/* ************************************************************************ **
** This file is part of linfit, and is licensed under EITHER the MIT        **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
**                                                                          **
** Be aware that not all of linfit is provided under this permissive        **
** license, and that the project as a whole is licensed under the GPL 3.0.  **
** ************************************************************************ */

//! Simulated measurements and their per-point summaries.

use crate::Result;
use crate::error::{RegressionError, check_same_len, check_finite, check_positive};
use crate::fit::Line;

use itertools::Itertools;
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Repeated measurements at each point of a grid.
///
/// Stored row-major; row `i` holds every replicate drawn at grid point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct Replicates {
    n_replicates: usize,
    values: Vec<f64>,
}

/// Per-point mean and sample standard deviation of a [`Replicates`].
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub mean: Vec<f64>,
    /// Uses the `M - 1` denominator.
    pub std_dev: Vec<f64>,
}

/// Draw `n_replicates` samples from `Normal(line(x_i), noise_scales[i])` at every grid point.
pub fn generate<R: Rng + ?Sized>(
    line: &Line,
    grid: &[f64],
    noise_scales: &[f64],
    n_replicates: usize,
    rng: &mut R,
) -> Result<Replicates> {
    check_same_len("grid", grid.len(), "noise scales", noise_scales.len())?;
    check_finite("true line", &[line.intercept, line.slope])?;
    check_finite("grid", grid)?;
    check_positive("noise scales", noise_scales)?;
    if n_replicates < 2 {
        return Err(RegressionError::TooFewReplicates(n_replicates));
    }

    let mut values = Vec::with_capacity(grid.len() * n_replicates);
    for (index, (&x, &scale)) in grid.iter().zip_eq(noise_scales).enumerate() {
        let normal = Normal::new(line.eval(x), scale)
            .map_err(|_| RegressionError::NonPositiveScale { what: "noise scales", index, value: scale })?;
        values.extend((0..n_replicates).map(|_| normal.sample(rng)));
    }
    debug!("Drew {} replicates at each of {} points.", n_replicates, grid.len());

    Ok(Replicates { n_replicates, values })
}

impl Replicates {
    /// Build from explicit rows, which must all have the same length of at least 2.
    pub fn from_rows<Row: AsRef<[f64]>>(rows: impl IntoIterator<Item=Row>) -> Result<Self> {
        let mut n_replicates = None;
        let mut values = vec![];
        for row in rows {
            let row = row.as_ref();
            let expected = *n_replicates.get_or_insert(row.len());
            check_same_len("first row", expected, "another row", row.len())?;
            values.extend_from_slice(row);
        }

        match n_replicates {
            Some(n) if n >= 2 => Ok(Replicates { n_replicates: n, values }),
            n => Err(RegressionError::TooFewReplicates(n.unwrap_or(0))),
        }
    }

    pub fn n_points(&self) -> usize { self.values.len() / self.n_replicates }
    pub fn n_replicates(&self) -> usize { self.n_replicates }

    pub fn row(&self, index: usize) -> &[f64] {
        let m = self.n_replicates;
        &self.values[index * m..(index + 1) * m]
    }

    pub fn rows(&self) -> impl ExactSizeIterator<Item=&[f64]> {
        self.values.chunks(self.n_replicates)
    }

    pub fn summarize(&self) -> Summary {
        let (mean, std_dev) = self.rows().map(mean_and_std_dev).unzip();
        Summary { mean, std_dev }
    }
}

fn mean_and_std_dev(row: &[f64]) -> (f64, f64) {
    let n = row.len() as f64;
    // accumulating relative to the first value keeps constant rows exact
    let shift = row[0];
    let mean = shift + row.iter().map(|&v| v - shift).sum::<f64>() / n;
    let sum_sq: f64 = row.iter().map(|&v| (v - mean) * (v - mean)).sum();
    (mean, f64::sqrt(sum_sq / (n - 1.0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    const LINE: Line = Line { intercept: 1.0, slope: 2.0 };

    #[test]
    fn constant_rows_are_exact() {
        let rows = vec![vec![0.1; 10], vec![-7.3; 10], vec![1e17; 10]];
        let summary = Replicates::from_rows(&rows).unwrap().summarize();
        assert_eq!(summary.mean, vec![0.1, -7.3, 1e17]);
        assert_eq!(summary.std_dev, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn summary_uses_sample_std_dev() {
        let rows = [[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]];
        let summary = Replicates::from_rows(&rows).unwrap().summarize();
        assert_close!(summary.mean[0], 5.0);
        // population variance is 4; sample variance is 32 / 7
        assert_close!(summary.std_dev[0], f64::sqrt(32.0 / 7.0));
    }

    #[test]
    fn from_rows_needs_two_replicates() {
        assert_eq!(
            Replicates::from_rows(&[[1.0], [2.0]]).unwrap_err(),
            RegressionError::TooFewReplicates(1),
        );
        assert_eq!(
            Replicates::from_rows(Vec::<Vec<f64>>::new()).unwrap_err(),
            RegressionError::TooFewReplicates(0),
        );
        match Replicates::from_rows(vec![vec![1.0; 10], vec![2.0; 3]]) {
            Err(RegressionError::LengthMismatch { left_len: 10, right_len: 3, .. }) => {},
            r => panic!("expected ragged rows to be rejected, got {:?}", r),
        }
    }

    #[test]
    fn generated_shape_and_rows() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = [1.0, 2.0, 3.0, 4.0];
        let reps = generate(&LINE, &grid, &[1.0, 0.5, 2.0, 1.0], 6, &mut rng).unwrap();
        assert_eq!(reps.n_points(), 4);
        assert_eq!(reps.n_replicates(), 6);
        assert_eq!(reps.rows().len(), 4);
        for (i, row) in reps.rows().enumerate() {
            assert_eq!(row, reps.row(i));
            assert_eq!(row.len(), 6);
        }
    }

    #[test]
    fn generated_rows_follow_the_line() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = [0.0, 5.0, 10.0];
        let scales = [0.5, 1.0, 2.0];
        let n = 4000;
        let summary = generate(&LINE, &grid, &scales, n, &mut rng).unwrap().summarize();

        for i in 0..grid.len() {
            // 5 standard errors of the mean
            let tol = 5.0 * scales[i] / (n as f64).sqrt();
            assert_close!(abs=tol, summary.mean[i], LINE.eval(grid[i]));
            assert_close!(rel=0.1, summary.std_dev[i], scales[i]);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let grid = [1.0, 2.0, 3.0];
        let scales = [1.0, 1.0, 1.0];
        let a = generate(&LINE, &grid, &scales, 5, &mut StdRng::seed_from_u64(3)).unwrap();
        let b = generate(&LINE, &grid, &scales, 5, &mut StdRng::seed_from_u64(3)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn invalid_generation_inputs() {
        let mut rng = StdRng::seed_from_u64(0);
        let grid = [1.0, 2.0, 3.0];

        assert_eq!(
            generate(&LINE, &grid, &[1.0, 1.0, 1.0], 1, &mut rng).unwrap_err(),
            RegressionError::TooFewReplicates(1),
        );
        match generate(&LINE, &grid, &[1.0, -1.0, 1.0], 10, &mut rng) {
            Err(RegressionError::NonPositiveScale { index: 1, .. }) => {},
            r => panic!("expected rejection of negative scale, got {:?}", r),
        }
        match generate(&LINE, &grid, &[1.0, 1.0], 10, &mut rng) {
            Err(RegressionError::LengthMismatch { .. }) => {},
            r => panic!("expected length mismatch, got {:?}", r),
        }
    }
}
