//! Logistic regression inference.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::models::sigmoid;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    /// One coefficient per feature; positive coefficients push toward
    /// malignant.
    pub weights: Vec<f64>,
    pub intercept: f64,
    pub n_features: usize,
}

impl LogisticModel {
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>() + self.intercept
    }
}

impl Classifier for LogisticModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let p_malignant = sigmoid(self.decision_function(x.as_slice()));
        [1.0 - p_malignant, p_malignant]
    }

    fn family(&self) -> &'static str {
        "logistic_regression"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn feature_importance(&self) -> Option<Vec<f64>> {
        crate::models::normalize_importance(self.weights.iter().map(|w| w.abs()).collect())
    }
}
