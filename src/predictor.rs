//! Serving facade: validation, scaling, parallel adapter invocation, and
//! aggregation behind one handle.
//!
//! The currently served [`ModelSet`] sits behind a read-write lock and is
//! replaced wholesale on reload: a new set is built off to the side and
//! swapped in only once complete, so no request ever observes a
//! half-loaded ensemble.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rayon::prelude::*;

use crate::ensemble::{Aggregator, PredictionResult};
use crate::error::EnsembleError;
use crate::store::{LoadReport, ModelSet, ModelStore};
use crate::validation::{RangePolicy, Validator};

/// Per-request options.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredictOptions {
    /// Attach the per-model probability breakdown to the result.
    pub include_breakdown: bool,
}

/// A loaded ensemble ready to answer prediction requests.
pub struct Predictor {
    store: ModelStore,
    validator: Validator,
    set: RwLock<Arc<ModelSet>>,
}

impl Predictor {
    /// Open an artifact directory and load whatever it holds.
    ///
    /// Never fails outright: a sparse or empty directory produces a
    /// predictor that reports not-ready until a reload finds artifacts.
    pub fn open<P: Into<std::path::PathBuf>>(dir: P, policy: RangePolicy) -> (Self, LoadReport) {
        let store = ModelStore::new(dir);
        let (set, report) = store.load();
        let predictor = Predictor {
            store,
            validator: Validator::new(policy),
            set: RwLock::new(Arc::new(set)),
        };
        (predictor, report)
    }

    /// Whether the minimum viable subset (scaler plus one classifier) is
    /// currently served.
    pub fn is_ready(&self) -> bool {
        self.current().is_ready()
    }

    /// Names of the currently served ensemble members.
    pub fn model_names(&self) -> Vec<String> {
        self.current()
            .classifier_names()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Rebuild the served set from the artifact directory.
    ///
    /// The new set is constructed entirely before the swap; concurrent
    /// requests keep using the old set until the single pointer store.
    pub fn reload(&self) -> LoadReport {
        let (set, report) = self.store.load();
        let set = Arc::new(set);
        let mut guard = self.set.write().expect("model set lock poisoned");
        *guard = set;
        log::info!(
            "reloaded model set: {} artifacts loaded, ready = {}",
            report.loaded_count(),
            guard.is_ready()
        );
        report
    }

    fn current(&self) -> Arc<ModelSet> {
        Arc::clone(&self.set.read().expect("model set lock poisoned"))
    }

    /// Run one prediction over a named feature mapping.
    ///
    /// The request either yields a complete [`PredictionResult`], a
    /// structured validation error, or a service-not-ready error, never
    /// a silent default prediction.
    pub fn predict(
        &self,
        features: &HashMap<String, f64>,
        options: PredictOptions,
    ) -> Result<PredictionResult, EnsembleError> {
        let validated = self.validator.validate(features)?;
        let set = self.current();

        let scaler = set.scaler.as_ref().ok_or(EnsembleError::EnsembleUnavailable)?;
        if set.classifiers.is_empty() {
            return Err(EnsembleError::EnsembleUnavailable);
        }

        let normalized = scaler.transform(&validated.vector);

        // Adapters are read-only over immutable fitted parameters, so
        // they can run in parallel; the collected vote order still
        // follows the canonical member order.
        let mut unavailable = set.unavailable();
        let votes: Vec<(String, [f64; 2])> = set
            .classifiers
            .par_iter()
            .map(|(name, model)| (name.clone(), model.predict_proba(&normalized)))
            .collect();

        let mut surviving = Vec::with_capacity(votes.len());
        for (name, probs) in votes {
            if probs.iter().all(|p| p.is_finite() && (0.0..=1.0).contains(p)) {
                surviving.push((name, probs));
            } else {
                log::warn!(
                    "model {} produced an invalid probability pair {:?}; excluded",
                    name,
                    probs
                );
                unavailable.push(name);
            }
        }

        let aggregator = Aggregator::new(set.ensemble_weights());
        let mut result = aggregator.aggregate(&surviving, options.include_breakdown)?;
        result.warnings = validated.warnings;
        result.unavailable_models = unavailable;
        Ok(result)
    }
}
