//! LSH band layout selection.
//!
//! Given a signature width and a target similarity threshold, picks the
//! (bands, rows) split that minimizes a weighted sum of the false-positive
//! and false-negative areas under the collision S-curve
//! `P(collide at s) = 1 - (1 - s^r)^b`.

/// A banded LSH layout: `bands` bands of `rows` signature positions each.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandParams {
    /// Number of bands
    pub bands: usize,
    /// Rows (signature positions) per band
    pub rows: usize,
}

impl BandParams {
    /// Total signature positions participating in banding.
    pub fn used_positions(&self) -> usize {
        self.bands * self.rows
    }

    /// Collision probability for a document pair at Jaccard similarity `s`.
    pub fn collision_probability(&self, s: f64) -> f64 {
        1.0 - (1.0 - s.powi(self.rows as i32)).powi(self.bands as i32)
    }
}

/// Pick the band layout for `num_permutations` hashes at `threshold`.
///
/// Searches every (b, r) with `b * r <= num_permutations`, scoring each by
/// `fp_weight * FP + fn_weight * FN` where FP integrates the S-curve below
/// the threshold and FN integrates its complement above.
pub fn optimal_params(
    threshold: f64,
    num_permutations: usize,
    fp_weight: f64,
    fn_weight: f64,
) -> BandParams {
    let mut min_error = f64::MAX;
    let mut opt = BandParams { bands: 1, rows: 1 };

    for bands in 1..=num_permutations {
        let max_rows = num_permutations / bands;
        for rows in 1..=max_rows {
            let fp = false_positive_area(threshold, bands, rows);
            let fn_ = false_negative_area(threshold, bands, rows);
            let error = fp * fp_weight + fn_ * fn_weight;
            if error < min_error {
                min_error = error;
                opt = BandParams { bands, rows };
            }
        }
    }

    opt
}

fn false_positive_area(threshold: f64, bands: usize, rows: usize) -> f64 {
    let params = BandParams { bands, rows };
    integrate(|s| params.collision_probability(s), 0.0, threshold)
}

fn false_negative_area(threshold: f64, bands: usize, rows: usize) -> f64 {
    let params = BandParams { bands, rows };
    integrate(|s| 1.0 - params.collision_probability(s), threshold, 1.0)
}

/// Midpoint-rule integration, fine enough for a monotone S-curve.
fn integrate(f: impl Fn(f64) -> f64, a: f64, b: f64) -> f64 {
    let step = 0.001;
    let mut area = 0.0;
    let mut x = a;
    while x < b {
        area += f(x + 0.5 * step) * step;
        x += step;
    }
    area
}
