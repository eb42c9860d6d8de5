//! Offline quality metrics for a loaded model set.
//!
//! Runs the full scale-predict-aggregate path over a labeled dataset and
//! summarizes accuracy, the confusion matrix, rank-based ROC AUC, and the
//! average confidence and uncertainty of the consensus.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::dataset::Dataset;
use crate::ensemble::{Aggregator, Diagnosis};
use crate::error::EnsembleError;
use crate::features::FeatureVector;
use crate::store::ModelSet;

/// Summary of one evaluation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub n_samples: usize,
    pub accuracy: f64,
    pub roc_auc: f64,
    /// Rows are truth (benign, malignant), columns are predictions.
    pub confusion: [[usize; 2]; 2],
    pub average_confidence: f64,
    pub average_uncertainty: f64,
}

/// Fraction of predictions matching the truth labels.
pub fn accuracy(predicted: &[Diagnosis], truth: &[Diagnosis]) -> f64 {
    assert_eq!(predicted.len(), truth.len());
    if truth.is_empty() {
        return 0.0;
    }
    let hits = predicted.iter().zip(truth).filter(|(p, t)| p == t).count();
    hits as f64 / truth.len() as f64
}

/// Two-by-two confusion matrix, truth rows by predicted columns, with
/// benign first.
pub fn confusion_matrix(predicted: &[Diagnosis], truth: &[Diagnosis]) -> [[usize; 2]; 2] {
    assert_eq!(predicted.len(), truth.len());
    let mut matrix = [[0usize; 2]; 2];
    for (p, t) in predicted.iter().zip(truth) {
        let row = usize::from(*t == Diagnosis::Malignant);
        let col = usize::from(*p == Diagnosis::Malignant);
        matrix[row][col] += 1;
    }
    matrix
}

/// Rank-based ROC AUC of malignant scores against truth labels.
///
/// Ties receive their average rank. Degenerate inputs with only one
/// class present score 0.5, the no-information value.
pub fn roc_auc(scores: &[f64], truth: &[Diagnosis]) -> f64 {
    assert_eq!(scores.len(), truth.len());
    let n_pos = truth
        .iter()
        .filter(|&&t| t == Diagnosis::Malignant)
        .count();
    let n_neg = truth.len() - n_pos;
    if n_pos == 0 || n_neg == 0 {
        return 0.5;
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].total_cmp(&scores[b]));

    // Average ranks within tied score runs, 1-based.
    let mut ranks = vec![0.0f64; scores.len()];
    let mut i = 0;
    while i < order.len() {
        let mut j = i;
        while j + 1 < order.len() && scores[order[j + 1]] == scores[order[i]] {
            j += 1;
        }
        let rank = (i + 1 + j + 1) as f64 / 2.0;
        for &idx in &order[i..=j] {
            ranks[idx] = rank;
        }
        i = j + 1;
    }

    let positive_rank_sum: f64 = truth
        .iter()
        .zip(&ranks)
        .filter(|(t, _)| **t == Diagnosis::Malignant)
        .map(|(_, r)| r)
        .sum();
    let n_pos = n_pos as f64;
    (positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg as f64)
}

/// Evaluate a model set over a labeled dataset.
///
/// Requires a ready set (scaler plus at least one classifier); the vote
/// filtering and weighting match the serving path exactly.
pub fn evaluate(set: &ModelSet, dataset: &Dataset) -> Result<EvaluationReport, EnsembleError> {
    if !set.is_ready() || dataset.is_empty() {
        return Err(EnsembleError::EnsembleUnavailable);
    }
    let scaler = set
        .scaler
        .as_ref()
        .ok_or(EnsembleError::EnsembleUnavailable)?;
    let aggregator = Aggregator::new(set.ensemble_weights());

    let rows: Vec<Vec<f64>> = dataset
        .x
        .rows()
        .into_iter()
        .map(|row| row.to_vec())
        .collect();

    let results: Result<Vec<_>, EnsembleError> = rows
        .par_iter()
        .map(|row| {
            let vector = FeatureVector::from_ordered(row)
                .ok_or(EnsembleError::EnsembleUnavailable)?;
            let normalized = scaler.transform(&vector);
            let votes: Vec<(String, [f64; 2])> = set
                .classifiers
                .iter()
                .map(|(name, model)| (name.clone(), model.predict_proba(&normalized)))
                .filter(|(_, p)| p.iter().all(|v| v.is_finite() && (0.0..=1.0).contains(v)))
                .collect();
            aggregator.aggregate(&votes, false)
        })
        .collect();
    let results = results?;

    let predicted: Vec<Diagnosis> = results.iter().map(|r| r.diagnosis).collect();
    let scores: Vec<f64> = results.iter().map(|r| r.probabilities.malignant).collect();
    let n = results.len() as f64;

    let report = EvaluationReport {
        n_samples: results.len(),
        accuracy: accuracy(&predicted, &dataset.y),
        roc_auc: roc_auc(&scores, &dataset.y),
        confusion: confusion_matrix(&predicted, &dataset.y),
        average_confidence: results.iter().map(|r| r.confidence).sum::<f64>() / n,
        average_uncertainty: results.iter().map(|r| r.uncertainty).sum::<f64>() / n,
    };
    log::info!(
        "evaluation over {} samples: accuracy {:.4}, auc {:.4}",
        report.n_samples,
        report.accuracy,
        report.roc_auc
    );
    Ok(report)
}

/// Per-member feature importances, for the members whose fitted form
/// exposes them. Each vector is normalized to sum to one and follows the
/// canonical feature order.
pub fn feature_importances(set: &ModelSet) -> Vec<(String, Vec<f64>)> {
    set.classifiers
        .iter()
        .filter_map(|(name, model)| {
            model
                .feature_importance()
                .map(|scores| (name.clone(), scores))
        })
        .collect()
}

/// Ensemble-level importance: the mean of the per-member importances,
/// renormalized. `None` when no loaded member exposes importances.
pub fn aggregate_importance(set: &ModelSet) -> Option<Vec<f64>> {
    let per_member = feature_importances(set);
    let first = per_member.first()?;
    let mut sums = vec![0.0f64; first.1.len()];
    for (_, scores) in &per_member {
        for (acc, s) in sums.iter_mut().zip(scores) {
            *acc += s;
        }
    }
    let n = per_member.len() as f64;
    for acc in sums.iter_mut() {
        *acc /= n;
    }
    Some(sums)
}

/// Evaluate a single loaded member by name, without the ensemble
/// weighting. Fails with `ModelUnavailable` when the member did not load.
pub fn evaluate_member(
    set: &ModelSet,
    name: &str,
    dataset: &Dataset,
) -> Result<EvaluationReport, EnsembleError> {
    if dataset.is_empty() {
        return Err(EnsembleError::EnsembleUnavailable);
    }
    let scaler = set
        .scaler
        .as_ref()
        .ok_or(EnsembleError::EnsembleUnavailable)?;
    let model = set.classifier(name)?;

    let mut predicted = Vec::with_capacity(dataset.len());
    let mut scores = Vec::with_capacity(dataset.len());
    let mut confidence_sum = 0.0f64;
    for row in dataset.x.rows() {
        let row = row.to_vec();
        let vector =
            FeatureVector::from_ordered(&row).ok_or(EnsembleError::EnsembleUnavailable)?;
        let probs = model.predict_proba(&scaler.transform(&vector));
        predicted.push(if probs[1] > 0.5 {
            Diagnosis::Malignant
        } else {
            Diagnosis::Benign
        });
        scores.push(probs[1]);
        confidence_sum += probs[0].max(probs[1]);
    }

    let n = dataset.len() as f64;
    Ok(EvaluationReport {
        n_samples: dataset.len(),
        accuracy: accuracy(&predicted, &dataset.y),
        roc_auc: roc_auc(&scores, &dataset.y),
        confusion: confusion_matrix(&predicted, &dataset.y),
        average_confidence: confidence_sum / n,
        average_uncertainty: 0.0,
    })
}
