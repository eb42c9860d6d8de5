//! Adaptive boosting over shallow trees.
//!
//! Each weak learner casts a vote for the class its leaf distribution
//! prefers; votes are combined with the per-learner weights assigned at
//! fit time, and probabilities are the weighted vote shares.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::models::tree::DecisionTree;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdaBoostModel {
    pub learners: Vec<DecisionTree>,
    /// One weight per learner, non-negative.
    pub learner_weights: Vec<f64>,
    pub n_features: usize,
}

impl Classifier for AdaBoostModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let mut votes = [0.0f64; 2];
        let mut total = 0.0f64;
        for (tree, &weight) in self.learners.iter().zip(self.learner_weights.iter()) {
            let leaf = tree.evaluate(x.as_slice());
            let class = if leaf[1] > leaf[0] { 1 } else { 0 };
            votes[class] += weight;
            total += weight;
        }
        if total == 0.0 {
            return [0.5, 0.5];
        }
        [votes[0] / total, votes[1] / total]
    }

    fn family(&self) -> &'static str {
        "ada_boost"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        let mut counts = vec![0.0f64; self.n_features];
        for (tree, &weight) in self.learners.iter().zip(self.learner_weights.iter()) {
            for feature in tree.split_features() {
                counts[feature] += weight;
            }
        }
        crate::models::normalize_importance(counts)
    }
}
