//! Error taxonomy for the prediction core.
//!
//! Validation problems are recoverable and carry field-level detail; a
//! single missing or corrupt model degrades the ensemble but does not fail
//! a request; an empty ensemble is a service-not-ready condition distinct
//! from bad input.

use std::error::Error;
use std::fmt;

use crate::validation::FieldError;

#[derive(Debug)]
pub enum EnsembleError {
    /// Malformed or out-of-range input, with per-field detail.
    Validation(Vec<FieldError>),
    /// A specific classifier artifact failed to load or is missing.
    ModelUnavailable { name: String },
    /// Zero classifiers (or no scaler) loaded; the service is not ready.
    EnsembleUnavailable,
    /// A loaded artifact failed a sanity check (wrong shape, bad encoding).
    ArtifactCorrupt { name: String, reason: String },
    Io(std::io::Error),
}

impl fmt::Display for EnsembleError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            EnsembleError::Validation(errors) => {
                write!(f, "invalid feature input ({} field error", errors.len())?;
                if errors.len() != 1 {
                    write!(f, "s")?;
                }
                write!(f, ")")?;
                for e in errors {
                    write!(f, "; {}", e)?;
                }
                Ok(())
            }
            EnsembleError::ModelUnavailable { name } => {
                write!(f, "model '{}' is not available", name)
            }
            EnsembleError::EnsembleUnavailable => {
                write!(f, "no classifiers loaded; ensemble service is not ready")
            }
            EnsembleError::ArtifactCorrupt { name, reason } => {
                write!(f, "artifact '{}' is corrupt: {}", name, reason)
            }
            EnsembleError::Io(e) => write!(f, "artifact I/O error: {}", e),
        }
    }
}

impl Error for EnsembleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            EnsembleError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for EnsembleError {
    fn from(e: std::io::Error) -> Self {
        EnsembleError::Io(e)
    }
}
