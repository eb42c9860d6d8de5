//! Feature scaling.
//!
//! A [`FittedScaler`] holds per-feature centering and spread statistics
//! captured at fit time and applies them as a pure transform, in the
//! canonical thirty-feature order. Two fit flavors are provided:
//! mean/standard-deviation and robust (median/IQR), the latter being the
//! better match for the long-tailed Wisconsin area and perimeter features.

use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

use crate::features::{FeatureVector, FEATURE_COUNT};

/// A feature vector after scaling, in canonical order.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedVector {
    values: [f64; FEATURE_COUNT],
}

impl NormalizedVector {
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}

/// Per-feature centering/spread statistics, immutable after fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedScaler {
    pub center: Vec<f64>,
    pub scale: Vec<f64>,
}

impl FittedScaler {
    /// Minimum spread to avoid division by zero when transforming.
    pub const MIN_SCALE: f64 = 1e-6;

    /// Build from precomputed statistics. Spreads are floored at
    /// [`Self::MIN_SCALE`].
    pub fn from_stats(center: Vec<f64>, scale: Vec<f64>) -> Self {
        let scale = scale
            .into_iter()
            .map(|s| s.max(Self::MIN_SCALE))
            .collect();
        FittedScaler { center, scale }
    }

    /// True when the statistics cover exactly the canonical feature count.
    pub fn shape_ok(&self) -> bool {
        self.center.len() == FEATURE_COUNT && self.scale.len() == FEATURE_COUNT
    }

    /// True when every statistic is finite and every spread honors the
    /// [`Self::MIN_SCALE`] floor. Persisted artifacts bypass
    /// [`Self::from_stats`], so loads must re-check this.
    pub fn stats_ok(&self) -> bool {
        self.center.iter().all(|c| c.is_finite())
            && self.scale.iter().all(|s| s.is_finite() && *s >= Self::MIN_SCALE)
    }

    /// Apply the fitted statistics to one vector. Pure; no I/O, input
    /// untouched.
    pub fn transform(&self, v: &FeatureVector) -> NormalizedVector {
        debug_assert!(self.shape_ok());
        let mut values = [0.0f64; FEATURE_COUNT];
        for (i, (value, out)) in v.as_slice().iter().zip(values.iter_mut()).enumerate() {
            *out = (value - self.center[i]) / self.scale[i];
        }
        NormalizedVector { values }
    }
}

/// Fit a mean/standard-deviation scaler from a samples-by-features matrix.
pub fn fit_standard(x: &Array2<f64>) -> FittedScaler {
    let nrows = x.nrows();
    assert!(nrows > 0, "fit_standard requires a non-empty matrix");

    let center: Vec<f64> = x.mean_axis(Axis(0)).expect("non-empty matrix").to_vec();
    let scale: Vec<f64> = (0..x.ncols())
        .map(|c| {
            let col = x.column(c);
            let mean = center[c];
            let var = col.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / nrows as f64;
            var.sqrt()
        })
        .collect();

    FittedScaler::from_stats(center, scale)
}

/// Fit a robust scaler (median center, interquartile-range spread).
pub fn fit_robust(x: &Array2<f64>) -> FittedScaler {
    let nrows = x.nrows();
    assert!(nrows > 0, "fit_robust requires a non-empty matrix");

    let mut center = Vec::with_capacity(x.ncols());
    let mut scale = Vec::with_capacity(x.ncols());
    for c in 0..x.ncols() {
        let mut col: Vec<f64> = x.column(c).to_vec();
        col.sort_by(f64::total_cmp);
        center.push(percentile(&col, 0.5));
        scale.push(percentile(&col, 0.75) - percentile(&col, 0.25));
    }

    FittedScaler::from_stats(center, scale)
}

/// Linear-interpolated percentile of a sorted slice, q in [0, 1].
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}
