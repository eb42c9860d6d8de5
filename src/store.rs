//! Durable artifact storage for the fitted scaler, the eight ensemble
//! members, and the ensemble metadata.
//!
//! Loading is deliberately non-atomic: each artifact is decoded and
//! sanity-checked independently, and the outcome is a [`LoadReport`] so
//! the ensemble can serve in degraded mode with fewer than eight models.
//! Saving is atomic per artifact (write to a temp file, then rename), so
//! a crash mid-save never leaves a corrupt artifact in place.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::error::EnsembleError;
use crate::features::{FEATURE_COUNT, FEATURE_NAMES};
use crate::models::{Classifier, ClassifierArtifact};
use crate::preprocessing::FittedScaler;

/// The eight ensemble member names, fixed by the training pipeline. The
/// order here is the canonical aggregation order.
pub const MODEL_NAMES: [&str; 8] = [
    "random_forest",
    "gradient_boosting",
    "extra_trees",
    "svm_rbf",
    "svm_linear",
    "neural_network",
    "logistic_regression",
    "ada_boost",
];

pub const SCALER_FILE: &str = "wisconsin_scaler.json";
pub const METADATA_FILE: &str = "wisconsin_ensemble_metadata.json";

/// Artifact file name for one ensemble member.
pub fn classifier_file(name: &str) -> String {
    format!("wisconsin_{name}.json")
}

/// Training-time cross-validation metrics for one member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPerformance {
    pub mean_accuracy: f64,
    pub std_accuracy: f64,
}

/// Ensemble-level metadata persisted next to the model artifacts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsembleMetadata {
    pub ensemble_weights: HashMap<String, f64>,
    pub feature_names: Vec<String>,
    pub model_performance: HashMap<String, ModelPerformance>,
    pub trained_at: DateTime<Utc>,
    pub model_count: usize,
}

/// Which artifacts loaded, which are absent, and which failed checks.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    pub missing: Vec<String>,
    pub corrupt: Vec<(String, String)>,
}

impl LoadReport {
    pub fn loaded_count(&self) -> usize {
        self.loaded.len()
    }
}

/// A fully-built, immutable set of serving artifacts.
///
/// Classifiers are kept in the canonical [`MODEL_NAMES`] order so every
/// prediction aggregates in the same sequence.
pub struct ModelSet {
    pub scaler: Option<FittedScaler>,
    pub classifiers: Vec<(String, Box<dyn Classifier>)>,
    pub metadata: Option<EnsembleMetadata>,
}

impl ModelSet {
    /// Minimum viable subset: the scaler plus at least one classifier.
    pub fn is_ready(&self) -> bool {
        self.scaler.is_some() && !self.classifiers.is_empty()
    }

    pub fn classifier_names(&self) -> Vec<&str> {
        self.classifiers.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Look up one loaded member by name.
    pub fn classifier(&self, name: &str) -> Result<&dyn Classifier, EnsembleError> {
        self.classifiers
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, model)| model.as_ref())
            .ok_or_else(|| EnsembleError::ModelUnavailable {
                name: name.to_string(),
            })
    }

    /// Configured members with no loaded artifact.
    pub fn unavailable(&self) -> Vec<String> {
        MODEL_NAMES
            .iter()
            .filter(|name| !self.classifiers.iter().any(|(n, _)| n == *name))
            .map(|name| name.to_string())
            .collect()
    }

    pub fn ensemble_weights(&self) -> HashMap<String, f64> {
        self.metadata
            .as_ref()
            .map(|m| m.ensemble_weights.clone())
            .unwrap_or_default()
    }
}

/// Reads and writes the artifact directory.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        ModelStore { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Load everything the directory holds into a fresh [`ModelSet`].
    ///
    /// Missing or corrupt artifacts never abort the load; they are
    /// recorded in the report and the affected member is excluded.
    pub fn load(&self) -> (ModelSet, LoadReport) {
        let mut report = LoadReport::default();

        let scaler = match self.read_artifact::<FittedScaler>(SCALER_FILE) {
            Ok(Some(scaler)) => {
                if !scaler.shape_ok() {
                    let reason = format!(
                        "scaler covers {} features, expected {}",
                        scaler.center.len(),
                        FEATURE_COUNT
                    );
                    log::error!("{}: {}", SCALER_FILE, reason);
                    report.corrupt.push(("scaler".to_string(), reason));
                    None
                } else if !scaler.stats_ok() {
                    let reason =
                        "scaler statistics are non-finite or below the spread floor".to_string();
                    log::error!("{}: {}", SCALER_FILE, reason);
                    report.corrupt.push(("scaler".to_string(), reason));
                    None
                } else {
                    report.loaded.push("scaler".to_string());
                    Some(scaler)
                }
            }
            Ok(None) => {
                report.missing.push("scaler".to_string());
                None
            }
            Err(reason) => {
                log::error!("{}: {}", SCALER_FILE, reason);
                report.corrupt.push(("scaler".to_string(), reason));
                None
            }
        };

        let metadata = match self.read_artifact::<EnsembleMetadata>(METADATA_FILE) {
            Ok(Some(metadata)) => {
                let names_ok = metadata
                    .feature_names
                    .iter()
                    .map(String::as_str)
                    .eq(FEATURE_NAMES);
                let bad_weight = metadata
                    .ensemble_weights
                    .iter()
                    .find(|(_, w)| !w.is_finite() || **w < 0.0)
                    .map(|(name, w)| (name.clone(), *w));
                if !names_ok {
                    let reason = "metadata feature names do not match the canonical set".to_string();
                    log::error!("{}: {}", METADATA_FILE, reason);
                    report.corrupt.push(("metadata".to_string(), reason));
                    None
                } else if let Some((name, weight)) = bad_weight {
                    let reason = format!("ensemble weight for {} is {}", name, weight);
                    log::error!("{}: {}", METADATA_FILE, reason);
                    report.corrupt.push(("metadata".to_string(), reason));
                    None
                } else {
                    report.loaded.push("metadata".to_string());
                    Some(metadata)
                }
            }
            Ok(None) => {
                report.missing.push("metadata".to_string());
                None
            }
            Err(reason) => {
                log::error!("{}: {}", METADATA_FILE, reason);
                report.corrupt.push(("metadata".to_string(), reason));
                None
            }
        };

        let mut classifiers: Vec<(String, Box<dyn Classifier>)> = Vec::new();
        for name in MODEL_NAMES {
            let file = classifier_file(name);
            match self.read_artifact::<ClassifierArtifact>(&file) {
                Ok(Some(artifact)) => match artifact.into_classifier(name) {
                    Ok(model) => {
                        log::info!("loaded {} from {}", name, file);
                        report.loaded.push(name.to_string());
                        classifiers.push((name.to_string(), model));
                    }
                    Err(e) => {
                        log::error!("{}: {}", file, e);
                        report.corrupt.push((name.to_string(), e.to_string()));
                    }
                },
                Ok(None) => {
                    log::warn!("{} not found, member {} excluded", file, name);
                    report.missing.push(name.to_string());
                }
                Err(reason) => {
                    log::error!("{}: {}", file, reason);
                    report.corrupt.push((name.to_string(), reason));
                }
            }
        }

        log::info!(
            "model store load complete: {} loaded, {} missing, {} corrupt",
            report.loaded.len(),
            report.missing.len(),
            report.corrupt.len()
        );

        (
            ModelSet {
                scaler,
                classifiers,
                metadata,
            },
            report,
        )
    }

    pub fn save_scaler(&self, scaler: &FittedScaler) -> Result<(), EnsembleError> {
        self.write_artifact(SCALER_FILE, scaler)
    }

    pub fn save_classifier(
        &self,
        name: &str,
        artifact: &ClassifierArtifact,
    ) -> Result<(), EnsembleError> {
        self.write_artifact(&classifier_file(name), artifact)
    }

    pub fn save_metadata(&self, metadata: &EnsembleMetadata) -> Result<(), EnsembleError> {
        self.write_artifact(METADATA_FILE, metadata)
    }

    /// `Ok(None)` when the file does not exist, `Err(reason)` when it
    /// exists but cannot be decoded.
    fn read_artifact<T: DeserializeOwned>(&self, file: &str) -> Result<Option<T>, String> {
        let path = self.dir.join(file);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(format!("read failed: {e}")),
        };
        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| format!("decode failed: {e}"))
    }

    /// Write-temp-then-rename so a crash mid-save cannot leave a partial
    /// artifact under the final name.
    fn write_artifact<T: Serialize>(&self, file: &str, value: &T) -> Result<(), EnsembleError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file);
        let tmp = self.dir.join(format!("{file}.tmp"));
        let bytes = serde_json::to_vec_pretty(value).map_err(|e| EnsembleError::ArtifactCorrupt {
            name: file.to_string(),
            reason: format!("encode failed: {e}"),
        })?;
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, &path)?;
        log::debug!("wrote artifact {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn member_names_are_stable_and_unique() {
        assert_eq!(MODEL_NAMES.len(), 8);
        let mut names = MODEL_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 8);
        assert_eq!(classifier_file("svm_rbf"), "wisconsin_svm_rbf.json");
    }

    #[test]
    fn empty_directory_loads_nothing_and_is_not_ready() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let (set, report) = store.load();
        assert!(!set.is_ready());
        assert!(report.loaded.is_empty());
        assert_eq!(report.missing.len(), 10); // scaler + metadata + 8 members
        assert_eq!(set.unavailable().len(), 8);
    }

    #[test]
    fn garbage_artifact_is_reported_corrupt_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(classifier_file("svm_rbf")), b"not json").unwrap();
        let store = ModelStore::new(dir.path());
        let (set, report) = store.load();
        assert!(report.corrupt.iter().any(|(name, _)| name == "svm_rbf"));
        assert!(!set.classifier_names().contains(&"svm_rbf"));
    }

    #[test]
    fn structurally_broken_tree_artifact_is_corrupt_at_load() {
        use crate::models::forest::ForestModel;
        use crate::models::tree::DecisionTree;

        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        // Decodes as valid JSON but the node arena is empty; a walk over
        // it would panic, so the load must report it corrupt instead.
        let artifact = ClassifierArtifact::Forest(ForestModel::new(
            vec![DecisionTree { nodes: vec![] }],
            FEATURE_COUNT,
        ));
        store.save_classifier("random_forest", &artifact).unwrap();

        let (set, report) = store.load();
        assert!(report.corrupt.iter().any(|(name, _)| name == "random_forest"));
        assert!(!set.classifier_names().contains(&"random_forest"));
        assert!(set.unavailable().contains(&"random_forest".to_string()));
    }

    #[test]
    fn scaler_round_trips_through_the_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let scaler = FittedScaler::from_stats(
            vec![1.0; FEATURE_COUNT],
            vec![2.0; FEATURE_COUNT],
        );
        store.save_scaler(&scaler).unwrap();
        let (set, report) = store.load();
        assert_eq!(set.scaler, Some(scaler));
        assert!(report.loaded.contains(&"scaler".to_string()));
        // No stray temp file left behind.
        assert!(!dir.path().join(format!("{SCALER_FILE}.tmp")).exists());
    }

    #[test]
    fn negative_ensemble_weight_is_metadata_corruption() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let mut metadata = EnsembleMetadata {
            ensemble_weights: HashMap::new(),
            feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
            model_performance: HashMap::new(),
            trained_at: chrono::Utc::now(),
            model_count: 8,
        };
        metadata
            .ensemble_weights
            .insert("svm_rbf".to_string(), -0.5);
        store.save_metadata(&metadata).unwrap();

        let (set, report) = store.load();
        assert!(set.metadata.is_none());
        assert!(report
            .corrupt
            .iter()
            .any(|(name, reason)| name == "metadata" && reason.contains("svm_rbf")));
        // Degraded metadata falls back to default weighting.
        assert!(set.ensemble_weights().is_empty());
    }

    #[test]
    fn zero_spread_scaler_artifact_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        // Built directly, sidestepping the floor from_stats applies, the
        // way a hand-edited or damaged artifact would arrive on disk.
        let scaler = FittedScaler {
            center: vec![0.0; FEATURE_COUNT],
            scale: vec![0.0; FEATURE_COUNT],
        };
        store.save_scaler(&scaler).unwrap();

        let (set, report) = store.load();
        assert!(set.scaler.is_none());
        assert!(report
            .corrupt
            .iter()
            .any(|(name, reason)| name == "scaler" && reason.contains("spread floor")));
    }

    #[test]
    fn wrong_width_scaler_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let store = ModelStore::new(dir.path());
        let scaler = FittedScaler::from_stats(vec![0.0; 5], vec![1.0; 5]);
        store.save_scaler(&scaler).unwrap();
        let (set, report) = store.load();
        assert!(set.scaler.is_none());
        assert!(report.corrupt.iter().any(|(name, _)| name == "scaler"));
    }
}
