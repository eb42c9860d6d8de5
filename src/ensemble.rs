//! Weighted consensus over the per-model probability outputs.
//!
//! The aggregator takes the probability pairs produced by the surviving
//! classifiers, averages the malignant-class probability under the
//! configured per-model weights (renormalized over the survivors so
//! exclusions do not bias the consensus toward zero), and derives the
//! discrete diagnosis, a confidence, an uncertainty, and a risk label.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EnsembleError;
use crate::validation::FieldError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Diagnosis {
    Benign,
    Malignant,
}

impl fmt::Display for Diagnosis {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Diagnosis::Benign => write!(f, "Benign"),
            Diagnosis::Malignant => write!(f, "Malignant"),
        }
    }
}

/// Human-facing risk label derived from diagnosis and confidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    LowMedium,
    Medium,
    MediumHigh,
    High,
}

impl RiskLevel {
    /// Fixed lookup from (diagnosis, confidence).
    pub fn derive(diagnosis: Diagnosis, confidence: f64) -> RiskLevel {
        match diagnosis {
            Diagnosis::Benign => {
                if confidence > 0.9 {
                    RiskLevel::Low
                } else if confidence > 0.7 {
                    RiskLevel::LowMedium
                } else {
                    RiskLevel::Medium
                }
            }
            Diagnosis::Malignant => {
                if confidence > 0.9 {
                    RiskLevel::High
                } else if confidence > 0.7 {
                    RiskLevel::MediumHigh
                } else {
                    RiskLevel::Medium
                }
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let text = match self {
            RiskLevel::Low => "Low",
            RiskLevel::LowMedium => "Low-Medium",
            RiskLevel::Medium => "Medium",
            RiskLevel::MediumHigh => "Medium-High",
            RiskLevel::High => "High",
        };
        write!(f, "{text}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    pub benign: f64,
    pub malignant: f64,
}

/// One surviving classifier's contribution to the consensus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelVote {
    pub model: String,
    pub probabilities: ClassProbabilities,
    /// Weight before renormalization.
    pub weight: f64,
}

/// Structured result of one prediction request. Created fresh per
/// request; never mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionResult {
    pub diagnosis: Diagnosis,
    /// Probability mass of the winning class, in [0, 1].
    pub confidence: f64,
    /// Spread (max minus min) of the per-model malignant probabilities:
    /// zero when every model agrees, growing monotonically with
    /// disagreement.
    pub uncertainty: f64,
    pub risk_level: RiskLevel,
    pub probabilities: ClassProbabilities,
    /// Per-model outputs, present when the caller asked for a breakdown.
    pub breakdown: Option<Vec<ModelVote>>,
    /// Range warnings carried over from validation.
    pub warnings: Vec<FieldError>,
    /// Configured ensemble members that could not contribute.
    pub unavailable_models: Vec<String>,
}

/// Combines per-model probability pairs into one consensus.
#[derive(Debug, Clone)]
pub struct Aggregator {
    weights: HashMap<String, f64>,
    /// Weight for models absent from the table.
    default_weight: f64,
}

impl Default for Aggregator {
    fn default() -> Self {
        Aggregator::new(HashMap::new())
    }
}

impl Aggregator {
    /// Aggregator over configured per-model weights. Models not in the
    /// table weigh 1.0, matching the training metadata convention.
    pub fn new(weights: HashMap<String, f64>) -> Self {
        Aggregator {
            weights,
            default_weight: 1.0,
        }
    }

    pub fn weight_of(&self, model: &str) -> f64 {
        self.weights.get(model).copied().unwrap_or(self.default_weight)
    }

    /// Combine the surviving per-model outputs into a consensus.
    ///
    /// `votes` holds `(member name, [p_benign, p_malignant])` pairs in the
    /// fixed member order. Fails with `EnsembleUnavailable` when no votes
    /// survive. The weighted average is commutative, so permuting the
    /// votes leaves the consensus unchanged.
    pub fn aggregate(
        &self,
        votes: &[(String, [f64; 2])],
        include_breakdown: bool,
    ) -> Result<PredictionResult, EnsembleError> {
        if votes.is_empty() {
            return Err(EnsembleError::EnsembleUnavailable);
        }

        let mut weighted_malignant = 0.0f64;
        let mut total_weight = 0.0f64;
        let mut min_malignant = f64::INFINITY;
        let mut max_malignant = f64::NEG_INFINITY;

        for (name, probs) in votes {
            let weight = self.weight_of(name);
            weighted_malignant += weight * probs[1];
            total_weight += weight;
            min_malignant = min_malignant.min(probs[1]);
            max_malignant = max_malignant.max(probs[1]);
        }

        if total_weight <= 0.0 {
            return Err(EnsembleError::EnsembleUnavailable);
        }

        let p_malignant = (weighted_malignant / total_weight).clamp(0.0, 1.0);
        let p_benign = 1.0 - p_malignant;

        // Tie at exactly 0.5 resolves to Benign.
        let diagnosis = if p_malignant > 0.5 {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        };
        let confidence = p_benign.max(p_malignant);
        let uncertainty = (max_malignant - min_malignant).clamp(0.0, 1.0);
        let risk_level = RiskLevel::derive(diagnosis, confidence);

        let breakdown = include_breakdown.then(|| {
            votes
                .iter()
                .map(|(name, probs)| ModelVote {
                    model: name.clone(),
                    probabilities: ClassProbabilities {
                        benign: probs[0],
                        malignant: probs[1],
                    },
                    weight: self.weight_of(name),
                })
                .collect()
        });

        log::debug!(
            "ensemble consensus: {} (p_malignant {:.4}, confidence {:.4}, spread {:.4}, {} models)",
            diagnosis,
            p_malignant,
            confidence,
            uncertainty,
            votes.len()
        );

        Ok(PredictionResult {
            diagnosis,
            confidence,
            uncertainty,
            risk_level,
            probabilities: ClassProbabilities {
                benign: p_benign,
                malignant: p_malignant,
            },
            breakdown,
            warnings: Vec::new(),
            unavailable_models: Vec::new(),
        })
    }
}
