//! Gradient-boosted trees.
//!
//! The fitted model is a chain of regression trees over log-odds space:
//! the raw score is the initial score plus the learning-rate-weighted sum
//! of the leaf values, squashed through the logistic function.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::models::sigmoid;
use crate::models::tree::DecisionTree;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingModel {
    pub trees: Vec<DecisionTree>,
    pub learning_rate: f64,
    /// Log-odds prior from the training class balance.
    pub init_raw_score: f64,
    pub n_features: usize,
}

impl GradientBoostingModel {
    /// Raw additive score before the logistic link.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        let boosted: f64 = self.trees.iter().map(|t| t.evaluate(x)[0]).sum();
        self.init_raw_score + self.learning_rate * boosted
    }
}

impl Classifier for GradientBoostingModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let p_malignant = sigmoid(self.decision_function(x.as_slice()));
        [1.0 - p_malignant, p_malignant]
    }

    fn family(&self) -> &'static str {
        "gradient_boosting"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        let mut counts = vec![0.0f64; self.n_features];
        for tree in &self.trees {
            for feature in tree.split_features() {
                counts[feature] += 1.0;
            }
        }
        crate::models::normalize_importance(counts)
    }
}
