//! Shared fixtures: a hand-built artifact set whose members all separate
//! the same two synthetic samples, one deep in benign territory and one
//! deep in malignant territory.

use std::collections::HashMap;
use std::path::Path;

use chrono::Utc;

use wisconsin_ensemble::features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_RANGES};
use wisconsin_ensemble::models::ada_boost::AdaBoostModel;
use wisconsin_ensemble::models::gradient_boosting::GradientBoostingModel;
use wisconsin_ensemble::models::linear::LogisticModel;
use wisconsin_ensemble::models::neural_net::{Layer, MlpModel};
use wisconsin_ensemble::models::svm::{Kernel, SvmModel};
use wisconsin_ensemble::models::tree::DecisionTree;
use wisconsin_ensemble::models::{forest::ForestModel, ClassifierArtifact};
use wisconsin_ensemble::preprocessing::FittedScaler;
use wisconsin_ensemble::store::{EnsembleMetadata, ModelPerformance, ModelStore, MODEL_NAMES};

/// Scaler centered on the typical band, spread at half the dataset range.
pub fn fixture_scaler() -> FittedScaler {
    let center = FEATURE_RANGES
        .iter()
        .map(|r| (r.typical.0 + r.typical.1) / 2.0)
        .collect();
    let scale = FEATURE_RANGES.iter().map(|r| (r.max - r.min) / 2.0).collect();
    FittedScaler::from_stats(center, scale)
}

/// A sample in the lower typical band of every feature. Under the fixture
/// scaler its normalized values are all mildly negative.
pub fn benign_values() -> [f64; FEATURE_COUNT] {
    let mut values = [0.0; FEATURE_COUNT];
    for (v, r) in values.iter_mut().zip(FEATURE_RANGES.iter()) {
        *v = r.typical.0 + 0.2 * (r.typical.1 - r.typical.0);
    }
    values
}

/// A sample near the top of every feature range; normalized values are
/// all clearly positive.
pub fn malignant_values() -> [f64; FEATURE_COUNT] {
    let mut values = [0.0; FEATURE_COUNT];
    for (v, r) in values.iter_mut().zip(FEATURE_RANGES.iter()) {
        *v = r.min + 0.9 * (r.max - r.min);
    }
    values
}

pub fn named(values: &[f64; FEATURE_COUNT]) -> HashMap<String, f64> {
    FEATURE_NAMES
        .iter()
        .zip(values.iter())
        .map(|(name, v)| (name.to_string(), *v))
        .collect()
}

pub fn benign_example() -> HashMap<String, f64> {
    named(&benign_values())
}

pub fn malignant_example() -> HashMap<String, f64> {
    named(&malignant_values())
}

fn class_stumps(features: &[usize], benign_leaf: Vec<f64>, malignant_leaf: Vec<f64>) -> Vec<DecisionTree> {
    features
        .iter()
        .map(|&f| DecisionTree::stump(f, 0.0, benign_leaf.clone(), malignant_leaf.clone()))
        .collect()
}

/// One artifact per ensemble member, all agreeing on the sign of the
/// normalized feature sum.
pub fn fixture_artifacts() -> Vec<(&'static str, ClassifierArtifact)> {
    let scaler = fixture_scaler();
    let z = |values: [f64; FEATURE_COUNT]| -> Vec<f64> {
        let v = FeatureVector::from_ordered(&values).unwrap();
        scaler.transform(&v).as_slice().to_vec()
    };

    vec![
        (
            "random_forest",
            ClassifierArtifact::Forest(ForestModel::new(
                class_stumps(&[0, 1, 2, 3, 4], vec![0.95, 0.05], vec![0.08, 0.92]),
                FEATURE_COUNT,
            )),
        ),
        (
            "gradient_boosting",
            ClassifierArtifact::GradientBoosting(GradientBoostingModel {
                trees: class_stumps(&[0, 1, 2], vec![-2.0], vec![2.0]),
                learning_rate: 1.0,
                init_raw_score: 0.0,
                n_features: FEATURE_COUNT,
            }),
        ),
        (
            "extra_trees",
            ClassifierArtifact::Forest(ForestModel::new(
                class_stumps(&[5, 6, 7, 8, 9], vec![0.9, 0.1], vec![0.1, 0.9]),
                FEATURE_COUNT,
            )),
        ),
        (
            "svm_rbf",
            ClassifierArtifact::Svm(SvmModel {
                kernel: Kernel::Rbf { gamma: 0.05 },
                support_vectors: vec![z(benign_values()), z(malignant_values())],
                dual_coef: vec![-2.0, 2.0],
                intercept: 0.0,
                platt_a: -6.0,
                platt_b: 0.0,
                n_features: FEATURE_COUNT,
            }),
        ),
        (
            "svm_linear",
            ClassifierArtifact::Svm(SvmModel {
                kernel: Kernel::Linear,
                support_vectors: vec![vec![1.0; FEATURE_COUNT]],
                dual_coef: vec![1.0],
                intercept: 0.0,
                platt_a: -2.0,
                platt_b: 0.0,
                n_features: FEATURE_COUNT,
            }),
        ),
        (
            "neural_network",
            ClassifierArtifact::NeuralNetwork(MlpModel {
                layers: vec![
                    Layer {
                        weights: vec![vec![-1.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]],
                        biases: vec![0.0, 0.0],
                    },
                    Layer {
                        weights: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
                        biases: vec![0.0, 0.0],
                    },
                ],
                n_features: FEATURE_COUNT,
            }),
        ),
        (
            "logistic_regression",
            ClassifierArtifact::LogisticRegression(LogisticModel {
                weights: vec![2.0; FEATURE_COUNT],
                intercept: 0.0,
                n_features: FEATURE_COUNT,
            }),
        ),
        (
            "ada_boost",
            ClassifierArtifact::AdaBoost(AdaBoostModel {
                learners: class_stumps(&[0, 1, 2], vec![1.0, 0.0], vec![0.0, 1.0]),
                learner_weights: vec![1.0, 0.8, 0.6],
                n_features: FEATURE_COUNT,
            }),
        ),
    ]
}

pub fn fixture_metadata() -> EnsembleMetadata {
    let performance = MODEL_NAMES
        .iter()
        .map(|name| {
            (
                name.to_string(),
                ModelPerformance {
                    mean_accuracy: 0.95,
                    std_accuracy: 0.02,
                },
            )
        })
        .collect();
    EnsembleMetadata {
        ensemble_weights: MODEL_NAMES.iter().map(|n| (n.to_string(), 1.0)).collect(),
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        model_performance: performance,
        trained_at: Utc::now(),
        model_count: MODEL_NAMES.len(),
    }
}

/// Write the complete fixture artifact set into a directory.
pub fn populate_store(dir: &Path) {
    let store = ModelStore::new(dir);
    store.save_scaler(&fixture_scaler()).unwrap();
    for (name, artifact) in fixture_artifacts() {
        store.save_classifier(name, &artifact).unwrap();
    }
    store.save_metadata(&fixture_metadata()).unwrap();
}
