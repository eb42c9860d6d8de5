//! Kernel support-vector machines with Platt-scaled probabilities.
//!
//! One inference form serves both kernel-machine ensemble members:
//! `svm_linear` (linear kernel) and `svm_rbf` (Gaussian kernel). The
//! decision function is the dual-coefficient-weighted kernel sum over the
//! support vectors; Platt scaling maps it to a malignant probability.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::models::sigmoid;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kernel")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
}

impl Kernel {
    fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => a.iter().zip(b).map(|(x, y)| x * y).sum(),
            Kernel::Rbf { gamma } => {
                let sq_dist: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
                (-gamma * sq_dist).exp()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SvmModel {
    #[serde(flatten)]
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    /// Signed dual coefficients, one per support vector.
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    /// Platt scaling slope; negative when larger margins mean malignant.
    pub platt_a: f64,
    /// Platt scaling offset.
    pub platt_b: f64,
    pub n_features: usize,
}

impl SvmModel {
    /// Signed distance to the separating surface.
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        self.support_vectors
            .iter()
            .zip(self.dual_coef.iter())
            .map(|(sv, coef)| coef * self.kernel.apply(sv, x))
            .sum::<f64>()
            + self.intercept
    }
}

impl Classifier for SvmModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let margin = self.decision_function(x.as_slice());
        // Platt: p(malignant) = 1 / (1 + exp(A * margin + B))
        let p_malignant = sigmoid(-(self.platt_a * margin + self.platt_b));
        [1.0 - p_malignant, p_malignant]
    }

    fn family(&self) -> &'static str {
        "svm"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    /// Only the linear kernel has a primal weight vector to read
    /// importances from; the RBF surface has no per-feature form.
    fn feature_importance(&self) -> Option<Vec<f64>> {
        match self.kernel {
            Kernel::Linear => {
                let mut primal = vec![0.0f64; self.n_features];
                for (sv, coef) in self.support_vectors.iter().zip(self.dual_coef.iter()) {
                    for (w, v) in primal.iter_mut().zip(sv) {
                        *w += coef * v;
                    }
                }
                crate::models::normalize_importance(
                    primal.into_iter().map(f64::abs).collect(),
                )
            }
            Kernel::Rbf { .. } => None,
        }
    }
}
