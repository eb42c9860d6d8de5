use crate::preprocessing::NormalizedVector;

/// Uniform contract over the heterogeneous fitted classifiers. The
/// aggregator only ever needs the two-class probability output; internal
/// algorithm differences stay behind this trait.
pub trait Classifier: Send + Sync {
    /// Class probabilities `[p_benign, p_malignant]` for one scaled
    /// sample. Implementations are pure and read-only over the fitted
    /// parameters; outputs are in [0, 1] and sum to 1.
    fn predict_proba(&self, x: &NormalizedVector) -> [f64; 2];

    /// Algorithm family, for logs and reports.
    fn family(&self) -> &'static str;

    /// Feature count the model was fitted on. Anything other than the
    /// canonical thirty marks the artifact as corrupt at load time.
    fn n_features(&self) -> usize;

    /// Per-feature importance scores, normalized to sum to one, for
    /// families whose fitted form exposes them (split usage for trees,
    /// coefficient magnitude for linear models). `None` otherwise.
    fn feature_importance(&self) -> Option<Vec<f64>> {
        None
    }
}
