//! wisconsin-ensemble: breast-cancer risk prediction over the Wisconsin
//! diagnostic feature set.
//!
//! This crate provides the full serving path for a fitted eight-member
//! classification ensemble: named-feature validation against the dataset
//! ranges, feature scaling, per-family inference (tree ensembles, kernel
//! machines, a feed-forward network, logistic regression), weighted
//! probability aggregation with a risk label, and a durable JSON artifact
//! store that degrades gracefully when members are missing or corrupt.
//!
//! Training is out of scope; models arrive as artifacts from an offline
//! fitting pipeline. The design favors small, testable modules with pure
//! inference cores behind the [`models::Classifier`] trait.
pub mod dataset;
pub mod ensemble;
pub mod error;
pub mod evaluation;
pub mod features;
pub mod models;
pub mod predictor;
pub mod preprocessing;
pub mod store;
pub mod validation;

pub use ensemble::{Diagnosis, PredictionResult, RiskLevel};
pub use error::EnsembleError;
pub use predictor::{PredictOptions, Predictor};
