//! Artifact decoding and classifier construction.
//!
//! Every classifier persists as a JSON document tagged with its algorithm
//! family; the factory turns a decoded artifact into a boxed
//! [`Classifier`] after a shape sanity check.

use serde::{Deserialize, Serialize};

use crate::error::EnsembleError;
use crate::features::FEATURE_COUNT;
use crate::models::ada_boost::AdaBoostModel;
use crate::models::classifier_trait::Classifier;
use crate::models::forest::ForestModel;
use crate::models::gradient_boosting::GradientBoostingModel;
use crate::models::linear::LogisticModel;
use crate::models::neural_net::MlpModel;
use crate::models::svm::SvmModel;
use crate::models::tree::DecisionTree;

/// Serialized form of one fitted classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "family")]
pub enum ClassifierArtifact {
    Forest(ForestModel),
    GradientBoosting(GradientBoostingModel),
    AdaBoost(AdaBoostModel),
    Svm(SvmModel),
    NeuralNetwork(MlpModel),
    LogisticRegression(LogisticModel),
}

impl ClassifierArtifact {
    fn declared_features(&self) -> usize {
        match self {
            ClassifierArtifact::Forest(m) => m.n_features,
            ClassifierArtifact::GradientBoosting(m) => m.n_features,
            ClassifierArtifact::AdaBoost(m) => m.n_features,
            ClassifierArtifact::Svm(m) => m.n_features,
            ClassifierArtifact::NeuralNetwork(m) => m.n_features,
            ClassifierArtifact::LogisticRegression(m) => m.n_features,
        }
    }

    /// Structural checks beyond the declared feature count: internal
    /// shapes must agree with it.
    fn shape_problem(&self) -> Option<String> {
        fn tree_problem(trees: &[DecisionTree], n: usize, leaf_len: usize) -> Option<String> {
            if let Some(problem) = trees.iter().find_map(|t| t.arena_problem()) {
                return Some(problem);
            }
            if let Some(f) = trees.iter().filter_map(|t| t.max_feature()).find(|&f| f >= n) {
                return Some(format!("tree references feature {} of {}", f, n));
            }
            trees
                .iter()
                .flat_map(|t| t.leaves())
                .find(|leaf| leaf.len() < leaf_len)
                .map(|leaf| format!("leaf holds {} values, expected {}", leaf.len(), leaf_len))
        }

        let n = self.declared_features();
        match self {
            ClassifierArtifact::Forest(m) => tree_problem(&m.trees, n, 2),
            ClassifierArtifact::GradientBoosting(m) => tree_problem(&m.trees, n, 1),
            ClassifierArtifact::AdaBoost(m) => {
                if m.learners.len() != m.learner_weights.len() {
                    Some(format!(
                        "{} learners but {} weights",
                        m.learners.len(),
                        m.learner_weights.len()
                    ))
                } else {
                    tree_problem(&m.learners, n, 2)
                }
            }
            ClassifierArtifact::Svm(m) => {
                if m.support_vectors.len() != m.dual_coef.len() {
                    Some(format!(
                        "{} support vectors but {} dual coefficients",
                        m.support_vectors.len(),
                        m.dual_coef.len()
                    ))
                } else {
                    m.support_vectors
                        .iter()
                        .find(|sv| sv.len() != n)
                        .map(|sv| format!("support vector has {} values, expected {}", sv.len(), n))
                }
            }
            ClassifierArtifact::NeuralNetwork(m) => {
                if m.layers.is_empty() {
                    return Some("network has no layers".to_string());
                }
                // Walk the layers so every weight row matches the width of
                // the activations it will be zipped against.
                let mut width = n;
                for (i, layer) in m.layers.iter().enumerate() {
                    if layer.biases.len() != layer.weights.len() {
                        return Some(format!(
                            "layer {} has {} units but {} biases",
                            i,
                            layer.weights.len(),
                            layer.biases.len()
                        ));
                    }
                    if let Some(row) = layer.weights.iter().find(|row| row.len() != width) {
                        return Some(format!(
                            "layer {} row holds {} weights, expected {}",
                            i,
                            row.len(),
                            width
                        ));
                    }
                    width = layer.weights.len();
                }
                if width != 2 {
                    return Some("output layer must have exactly two units".to_string());
                }
                None
            }
            ClassifierArtifact::LogisticRegression(m) => {
                if m.weights.len() != n {
                    Some(format!("{} coefficients for {} features", m.weights.len(), n))
                } else {
                    None
                }
            }
        }
    }

    /// Convert the artifact into a live classifier.
    ///
    /// `name` is the ensemble member name (e.g. `svm_rbf`), used only for
    /// error reporting.
    pub fn into_classifier(self, name: &str) -> Result<Box<dyn Classifier>, EnsembleError> {
        if self.declared_features() != FEATURE_COUNT {
            return Err(EnsembleError::ArtifactCorrupt {
                name: name.to_string(),
                reason: format!(
                    "fitted on {} features, expected {}",
                    self.declared_features(),
                    FEATURE_COUNT
                ),
            });
        }
        if let Some(problem) = self.shape_problem() {
            return Err(EnsembleError::ArtifactCorrupt {
                name: name.to_string(),
                reason: problem,
            });
        }

        Ok(match self {
            ClassifierArtifact::Forest(m) => Box::new(m),
            ClassifierArtifact::GradientBoosting(m) => Box::new(m),
            ClassifierArtifact::AdaBoost(m) => Box::new(m),
            ClassifierArtifact::Svm(m) => Box::new(m),
            ClassifierArtifact::NeuralNetwork(m) => Box::new(m),
            ClassifierArtifact::LogisticRegression(m) => Box::new(m),
        })
    }
}
