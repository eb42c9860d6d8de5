//! Build a small artifact set from synthetic data, load it through the
//! store, and run a prediction with a per-model breakdown.
//!
//! Run with `cargo run --example predict`.

use std::collections::HashMap;

use chrono::Utc;

use wisconsin_ensemble::dataset;
use wisconsin_ensemble::features::{FEATURE_COUNT, FEATURE_NAMES, FEATURE_RANGES};
use wisconsin_ensemble::models::linear::LogisticModel;
use wisconsin_ensemble::models::tree::DecisionTree;
use wisconsin_ensemble::models::{forest::ForestModel, ClassifierArtifact};
use wisconsin_ensemble::predictor::{PredictOptions, Predictor};
use wisconsin_ensemble::preprocessing::fit_robust;
use wisconsin_ensemble::store::{EnsembleMetadata, ModelStore, MODEL_NAMES};
use wisconsin_ensemble::validation::RangePolicy;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let dir = tempfile::tempdir()?;
    let store = ModelStore::new(dir.path());

    // Fit the scaler on synthetic data shaped like the real measurements.
    let data = dataset::synthetic(400, 17);
    let scaler = fit_robust(&data.x);
    store.save_scaler(&scaler)?;

    // Two stand-in members; a real artifact directory carries all eight.
    store.save_classifier(
        "logistic_regression",
        &ClassifierArtifact::LogisticRegression(LogisticModel {
            weights: vec![0.5; FEATURE_COUNT],
            intercept: 0.0,
            n_features: FEATURE_COUNT,
        }),
    )?;
    store.save_classifier(
        "random_forest",
        &ClassifierArtifact::Forest(ForestModel::new(
            (0..5)
                .map(|f| DecisionTree::stump(f, 0.0, vec![0.9, 0.1], vec![0.1, 0.9]))
                .collect(),
            FEATURE_COUNT,
        )),
    )?;
    store.save_metadata(&EnsembleMetadata {
        ensemble_weights: MODEL_NAMES.iter().map(|n| (n.to_string(), 1.0)).collect(),
        feature_names: FEATURE_NAMES.iter().map(|n| n.to_string()).collect(),
        model_performance: HashMap::new(),
        trained_at: Utc::now(),
        model_count: 2,
    })?;

    let (predictor, report) = Predictor::open(dir.path(), RangePolicy::default());
    println!(
        "loaded {} artifacts ({} missing), ready = {}",
        report.loaded.len(),
        report.missing.len(),
        predictor.is_ready()
    );

    // A sample in the middle of the typical band of every feature.
    let features: HashMap<String, f64> = FEATURE_NAMES
        .iter()
        .zip(FEATURE_RANGES.iter())
        .map(|(name, r)| (name.to_string(), (r.typical.0 + r.typical.1) / 2.0))
        .collect();

    let result = predictor.predict(
        &features,
        PredictOptions {
            include_breakdown: true,
        },
    )?;

    println!(
        "diagnosis: {} (confidence {:.3}, uncertainty {:.3}, risk {})",
        result.diagnosis, result.confidence, result.uncertainty, result.risk_level
    );
    println!(
        "p(benign) = {:.4}, p(malignant) = {:.4}",
        result.probabilities.benign, result.probabilities.malignant
    );
    if let Some(breakdown) = &result.breakdown {
        for vote in breakdown {
            println!(
                "  {:<20} p(malignant) = {:.4} (weight {:.2})",
                vote.model, vote.probabilities.malignant, vote.weight
            );
        }
    }
    if !result.unavailable_models.is_empty() {
        println!("unavailable members: {}", result.unavailable_models.join(", "));
    }

    Ok(())
}
