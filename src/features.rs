//! The canonical Wisconsin diagnostic feature set.
//!
//! Thirty measurements per sample, in the exact column order of the UCI
//! `wdbc.data` file: ten cell-nucleus measures as dataset means, the same
//! ten as standard errors, and the same ten as worst (largest) values.
//! Every other module indexes features by this order.

use serde::{Deserialize, Serialize};

pub const FEATURE_COUNT: usize = 30;

/// Feature names in canonical dataset order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "radius_mean",
    "texture_mean",
    "perimeter_mean",
    "area_mean",
    "smoothness_mean",
    "compactness_mean",
    "concavity_mean",
    "concave_points_mean",
    "symmetry_mean",
    "fractal_dimension_mean",
    "radius_se",
    "texture_se",
    "perimeter_se",
    "area_se",
    "smoothness_se",
    "compactness_se",
    "concavity_se",
    "concave_points_se",
    "symmetry_se",
    "fractal_dimension_se",
    "radius_worst",
    "texture_worst",
    "perimeter_worst",
    "area_worst",
    "smoothness_worst",
    "compactness_worst",
    "concavity_worst",
    "concave_points_worst",
    "symmetry_worst",
    "fractal_dimension_worst",
];

/// Which statistic of the underlying nucleus measure a feature carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeatureGroup {
    Mean,
    StandardError,
    Worst,
}

/// Observed bounds for one feature, recorded from the diagnostic
/// dataset. `typical` is the band most samples fall in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
    pub typical: (f64, f64),
}

/// Dataset ranges in canonical feature order.
pub const FEATURE_RANGES: [FeatureRange; FEATURE_COUNT] = [
    FeatureRange { min: 6.981, max: 28.11, typical: (10.0, 20.0) },
    FeatureRange { min: 9.71, max: 39.28, typical: (15.0, 25.0) },
    FeatureRange { min: 43.79, max: 188.5, typical: (80.0, 120.0) },
    FeatureRange { min: 143.5, max: 2501.0, typical: (500.0, 1000.0) },
    FeatureRange { min: 0.05263, max: 0.1634, typical: (0.08, 0.12) },
    FeatureRange { min: 0.01938, max: 0.3454, typical: (0.05, 0.15) },
    FeatureRange { min: 0.0, max: 0.4268, typical: (0.0, 0.1) },
    FeatureRange { min: 0.0, max: 0.2012, typical: (0.0, 0.05) },
    FeatureRange { min: 0.106, max: 0.304, typical: (0.15, 0.25) },
    FeatureRange { min: 0.04996, max: 0.09744, typical: (0.06, 0.08) },
    FeatureRange { min: 0.1115, max: 2.873, typical: (0.3, 0.8) },
    FeatureRange { min: 0.3602, max: 4.885, typical: (1.0, 2.0) },
    FeatureRange { min: 0.757, max: 21.98, typical: (2.0, 6.0) },
    FeatureRange { min: 6.802, max: 542.2, typical: (30.0, 100.0) },
    FeatureRange { min: 0.001713, max: 0.03113, typical: (0.005, 0.015) },
    FeatureRange { min: 0.002252, max: 0.1354, typical: (0.01, 0.04) },
    FeatureRange { min: 0.0, max: 0.396, typical: (0.0, 0.05) },
    FeatureRange { min: 0.0, max: 0.05279, typical: (0.0, 0.02) },
    FeatureRange { min: 0.007882, max: 0.07895, typical: (0.02, 0.04) },
    FeatureRange { min: 0.0008948, max: 0.02984, typical: (0.003, 0.01) },
    FeatureRange { min: 7.93, max: 36.04, typical: (12.0, 25.0) },
    FeatureRange { min: 12.02, max: 49.54, typical: (20.0, 35.0) },
    FeatureRange { min: 50.41, max: 251.2, typical: (100.0, 160.0) },
    FeatureRange { min: 185.2, max: 4254.0, typical: (800.0, 1500.0) },
    FeatureRange { min: 0.07117, max: 0.2226, typical: (0.1, 0.16) },
    FeatureRange { min: 0.02729, max: 1.058, typical: (0.1, 0.4) },
    FeatureRange { min: 0.0, max: 1.252, typical: (0.0, 0.3) },
    FeatureRange { min: 0.0, max: 0.291, typical: (0.0, 0.1) },
    FeatureRange { min: 0.1565, max: 0.6638, typical: (0.2, 0.4) },
    FeatureRange { min: 0.05504, max: 0.2075, typical: (0.08, 0.12) },
];

/// Canonical column index of a feature name.
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// Group of the feature at a canonical index.
pub fn feature_group(index: usize) -> FeatureGroup {
    match index / 10 {
        0 => FeatureGroup::Mean,
        1 => FeatureGroup::StandardError,
        _ => FeatureGroup::Worst,
    }
}

/// Human-readable description of the underlying nucleus measure.
pub fn feature_description(name: &str) -> &'static str {
    let base = name
        .trim_end_matches("_mean")
        .trim_end_matches("_se")
        .trim_end_matches("_worst");
    match base {
        "radius" => "mean distance from center to points on the perimeter",
        "texture" => "standard deviation of gray-scale values",
        "perimeter" => "perimeter of the cell nucleus",
        "area" => "area of the cell nucleus",
        "smoothness" => "local variation in radius lengths",
        "compactness" => "perimeter squared over area, minus one",
        "concavity" => "severity of concave portions of the contour",
        "concave_points" => "number of concave portions of the contour",
        "symmetry" => "symmetry of the cell nucleus",
        "fractal_dimension" => "coastline approximation of the contour",
        _ => "unknown measure",
    }
}

/// A complete sample in canonical feature order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: [f64; FEATURE_COUNT],
}

impl FeatureVector {
    /// Build from a slice already in canonical order. `None` unless the
    /// slice holds exactly thirty values.
    pub fn from_ordered(values: &[f64]) -> Option<Self> {
        let values: [f64; FEATURE_COUNT] = values.try_into().ok()?;
        Some(FeatureVector { values })
    }

    /// Value of a named feature.
    pub fn get(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|i| self.values[i])
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }
}
