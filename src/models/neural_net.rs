//! Feed-forward network inference.
//!
//! ReLU hidden layers and a two-unit softmax output, matching the shape
//! of the fitted multi-layer perceptron artifact. Only the forward pass
//! lives here; weights come from the offline training routine.

use serde::{Deserialize, Serialize};

use crate::models::classifier_trait::Classifier;
use crate::preprocessing::NormalizedVector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Row-major weights, `weights[out][in]`.
    pub weights: Vec<Vec<f64>>,
    pub biases: Vec<f64>,
}

impl Layer {
    fn forward(&self, input: &[f64]) -> Vec<f64> {
        self.weights
            .iter()
            .zip(self.biases.iter())
            .map(|(row, bias)| {
                row.iter().zip(input).map(|(w, x)| w * x).sum::<f64>() + bias
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlpModel {
    /// Hidden layers followed by a final two-unit layer.
    pub layers: Vec<Layer>,
    pub n_features: usize,
}

impl MlpModel {
    /// Logits `[benign, malignant]` before the softmax.
    pub fn forward(&self, x: &[f64]) -> Vec<f64> {
        let mut activations = x.to_vec();
        let last = self.layers.len() - 1;
        for (i, layer) in self.layers.iter().enumerate() {
            activations = layer.forward(&activations);
            if i != last {
                for a in activations.iter_mut() {
                    *a = a.max(0.0);
                }
            }
        }
        activations
    }
}

impl Classifier for MlpModel {
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2] {
        let logits = self.forward(x.as_slice());
        // Stabilized two-class softmax.
        let m = logits[0].max(logits[1]);
        let e0 = (logits[0] - m).exp();
        let e1 = (logits[1] - m).exp();
        [e0 / (e0 + e1), e1 / (e0 + e1)]
    }

    fn family(&self) -> &'static str {
        "neural_network"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureVector, FEATURE_COUNT};
    use crate::preprocessing::FittedScaler;

    fn normalized(values: [f64; FEATURE_COUNT]) -> NormalizedVector {
        let scaler =
            FittedScaler::from_stats(vec![0.0; FEATURE_COUNT], vec![1.0; FEATURE_COUNT]);
        scaler.transform(&FeatureVector::from_ordered(&values).unwrap())
    }

    /// Two ReLU detector units, one per class, wired to the output layer.
    fn model() -> MlpModel {
        MlpModel {
            layers: vec![
                Layer {
                    weights: vec![vec![1.0; FEATURE_COUNT], vec![-1.0; FEATURE_COUNT]],
                    biases: vec![0.0, 0.0],
                },
                Layer {
                    weights: vec![vec![0.0, 1.0], vec![1.0, 0.0]],
                    biases: vec![0.0, 0.0],
                },
            ],
            n_features: FEATURE_COUNT,
        }
    }

    #[test]
    fn softmax_output_sums_to_one() {
        let probs = model().predict_proba(&normalized([-0.2; FEATURE_COUNT]));
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-12);
        assert!(probs[1] < 0.01, "p_malignant = {}", probs[1]);
    }

    #[test]
    fn relu_gates_the_opposite_detector() {
        let m = model();
        // Negative sum activates only the benign detector.
        let logits = m.forward(&[-0.2; FEATURE_COUNT]);
        assert_eq!(logits[1], 0.0);
        assert!((logits[0] - 6.0).abs() < 1e-12);

        let probs = m.predict_proba(&normalized([0.2; FEATURE_COUNT]));
        assert!(probs[1] > 0.99);
    }
}
