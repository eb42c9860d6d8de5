//! Averaged tree ensembles.
//!
//! One inference form serves both bagged-forest ensemble members
//! (`random_forest` and `extra_trees`); they differ only in how the
//! offline training routine grew the trees.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::models::tree::DecisionTree;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForestModel {
    pub trees: Vec<DecisionTree>,
    pub n_features: usize,
}

impl ForestModel {
    pub fn new(trees: Vec<DecisionTree>, n_features: usize) -> Self {
        ForestModel { trees, n_features }
    }
}

impl Classifier for ForestModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let mut acc = [0.0f64; 2];
        for tree in &self.trees {
            let leaf = tree.evaluate(x.as_slice());
            // Leaf payloads are class counts or distributions; normalize
            // per tree so every tree votes with equal mass.
            let total: f64 = leaf.iter().sum();
            if total > 0.0 {
                acc[0] += leaf[0] / total;
                acc[1] += leaf[1] / total;
            }
        }
        let n = self.trees.len() as f64;
        [acc[0] / n, acc[1] / n]
    }

    fn family(&self) -> &'static str {
        "forest"
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
