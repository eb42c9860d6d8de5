pub mod ada_boost;
pub mod forest;
pub mod gradient_boosting;
pub mod linear;
pub mod neural_net;
pub mod svm;
pub mod tree;

pub mod classifier_trait;
pub mod factory;

pub use classifier_trait::Classifier;
pub use factory::ClassifierArtifact;

/// Scale raw importance scores so they sum to one. `None` when the
/// scores carry no mass to distribute.
pub(crate) fn normalize_importance(scores: Vec<f64>) -> Option<Vec<f64>> {
    let total: f64 = scores.iter().sum();
    if !total.is_finite() || total <= 0.0 {
        return None;
    }
    Some(scores.into_iter().map(|s| s / total).collect())
}

/// Numerically safe logistic function shared by the margin-based models.
pub(crate) fn sigmoid(raw: f64) -> f64 {
    if raw >= 0.0 {
        1.0 / (1.0 + (-raw).exp())
    } else {
        let e = raw.exp();
        e / (1.0 + e)
    }
}
