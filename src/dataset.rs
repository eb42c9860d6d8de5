//! Loading and generating Wisconsin diagnostic data.
//!
//! The UCI `wdbc.data` file is headerless CSV: sample id, `M`/`B`
//! diagnosis, then the thirty features in canonical order. A synthetic
//! generator with the same shape backs tests and demos when the real
//! file is not on disk.

use std::path::Path;

use ndarray::Array2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::ensemble::Diagnosis;
use crate::features::{FeatureRange, FEATURE_COUNT, FEATURE_NAMES, FEATURE_RANGES};

/// A labeled sample matrix: rows are samples, columns follow
/// [`FEATURE_NAMES`].
#[derive(Debug, Clone)]
pub struct Dataset {
    pub x: Array2<f64>,
    pub y: Vec<Diagnosis>,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }

    /// `(benign, malignant)` sample counts.
    pub fn class_counts(&self) -> (usize, usize) {
        let malignant = self
            .y
            .iter()
            .filter(|&&d| d == Diagnosis::Malignant)
            .count();
        (self.y.len() - malignant, malignant)
    }

    /// Observed per-feature bounds, the producer of the validation
    /// range table. `typical` is the interquartile band. Empty for a
    /// dataset with no samples.
    pub fn feature_ranges(&self) -> Vec<FeatureRange> {
        if self.is_empty() {
            return Vec::new();
        }
        (0..FEATURE_COUNT)
            .map(|c| {
                let mut col: Vec<f64> = self.x.column(c).to_vec();
                col.sort_by(f64::total_cmp);
                let q = |p: f64| {
                    let pos = p * (col.len() - 1) as f64;
                    col[pos.round() as usize]
                };
                FeatureRange {
                    min: col[0],
                    max: col[col.len() - 1],
                    typical: (q(0.25), q(0.75)),
                }
            })
            .collect()
    }
}

/// Parse a `wdbc.data` CSV file.
///
/// Rows that do not carry an id, a diagnosis, and thirty finite feature
/// values are rejected with a descriptive error.
pub fn read_wdbc<P: AsRef<Path>>(path: P) -> anyhow::Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path.as_ref())?;

    let mut values = Vec::new();
    let mut y = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if record.len() != FEATURE_COUNT + 2 {
            anyhow::bail!(
                "row {}: expected {} columns, found {}",
                row,
                FEATURE_COUNT + 2,
                record.len()
            );
        }
        let diagnosis = match record.get(1) {
            Some("M") => Diagnosis::Malignant,
            Some("B") => Diagnosis::Benign,
            other => anyhow::bail!("row {}: bad diagnosis {:?}", row, other),
        };
        for (col, field) in record.iter().skip(2).enumerate() {
            let value: f64 = field.parse().map_err(|e| {
                anyhow::anyhow!("row {}, feature {}: {}", row, FEATURE_NAMES[col], e)
            })?;
            values.push(value);
        }
        y.push(diagnosis);
    }

    let x = Array2::from_shape_vec((y.len(), FEATURE_COUNT), values)?;
    log::info!(
        "loaded {} samples ({} benign, {} malignant)",
        y.len(),
        y.iter().filter(|&&d| d == Diagnosis::Benign).count(),
        y.iter().filter(|&&d| d == Diagnosis::Malignant).count()
    );
    Ok(Dataset { x, y })
}

/// Draw a synthetic dataset with the real feature ranges.
///
/// Benign samples sit in the lower portion of each feature range and
/// malignant samples in the upper portion, mimicking the direction of
/// the real measurements without pretending to be them. Class balance
/// follows the real dataset (63% benign).
pub fn synthetic(n_samples: usize, seed: u64) -> Dataset {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut values = Vec::with_capacity(n_samples * FEATURE_COUNT);
    let mut y = Vec::with_capacity(n_samples);

    for _ in 0..n_samples {
        let diagnosis = if rng.gen_bool(0.63) {
            Diagnosis::Benign
        } else {
            Diagnosis::Malignant
        };
        for range in FEATURE_RANGES.iter() {
            let mid = (range.min + range.max) / 2.0;
            let value = match diagnosis {
                Diagnosis::Benign => rng.gen_range(range.min..=mid),
                Diagnosis::Malignant => rng.gen_range(mid..=range.max),
            };
            values.push(value);
        }
        y.push(diagnosis);
    }

    let x = Array2::from_shape_vec((n_samples, FEATURE_COUNT), values)
        .expect("row-major synthetic buffer matches its own shape");
    Dataset { x, y }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn synthetic_respects_ranges_and_balance() {
        let data = synthetic(200, 42);
        assert_eq!(data.len(), 200);
        for (c, range) in FEATURE_RANGES.iter().enumerate() {
            for &v in data.x.column(c) {
                assert!(v >= range.min && v <= range.max);
            }
        }
        let (benign, malignant) = data.class_counts();
        assert!(benign > malignant);
        assert_eq!(benign + malignant, 200);
    }

    #[test]
    fn synthetic_is_deterministic_per_seed() {
        let a = synthetic(50, 7);
        let b = synthetic(50, 7);
        assert_eq!(a.x, b.x);
        assert_eq!(a.y, b.y);
    }

    #[test]
    fn ranges_recomputed_from_data_are_ordered() {
        let data = synthetic(100, 3);
        for range in data.feature_ranges() {
            assert!(range.min <= range.typical.0);
            assert!(range.typical.0 <= range.typical.1);
            assert!(range.typical.1 <= range.max);
        }
    }

    #[test]
    fn empty_dataset_has_no_ranges() {
        let data = synthetic(0, 1);
        assert!(data.is_empty());
        assert!(data.feature_ranges().is_empty());
        assert_eq!(data.class_counts(), (0, 0));
    }

    #[test]
    fn wdbc_csv_parses_ids_labels_and_features() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wdbc.data");
        let mut file = std::fs::File::create(&path).unwrap();
        let features: Vec<String> = (0..FEATURE_COUNT).map(|i| format!("{}.5", i)).collect();
        writeln!(file, "842302,M,{}", features.join(",")).unwrap();
        writeln!(file, "842517,B,{}", features.join(",")).unwrap();
        drop(file);

        let data = read_wdbc(&path).unwrap();
        assert_eq!(data.len(), 2);
        assert_eq!(data.y, vec![Diagnosis::Malignant, Diagnosis::Benign]);
        assert_eq!(data.x[[0, 0]], 0.5);
        assert_eq!(data.x[[1, 29]], 29.5);
    }

    #[test]
    fn short_rows_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wdbc.data");
        std::fs::write(&path, "842302,M,1.0,2.0\n").unwrap();
        assert!(read_wdbc(&path).is_err());
    }
}
