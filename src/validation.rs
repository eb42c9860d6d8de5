//! Feature-vector validation against the fixed Wisconsin feature set.
//!
//! A submitted mapping of feature name to value is checked for
//! completeness (all thirty names present), for unknown names, for
//! non-finite values, and against the recorded dataset ranges. Range
//! violations are warning-class by default and can be escalated to hard
//! rejections via [`RangePolicy`].

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EnsembleError;
use crate::features::{FeatureRange, FeatureVector, FEATURE_COUNT, FEATURE_NAMES, FEATURE_RANGES};

/// What went wrong with a single field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum FieldErrorKind {
    Missing,
    Unknown,
    NotFinite,
    OutOfRange { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub feature: String,
    /// The offending value, absent for missing features.
    pub value: Option<f64>,
    pub kind: FieldErrorKind,
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            FieldErrorKind::Missing => write!(f, "{}: missing feature", self.feature),
            FieldErrorKind::Unknown => write!(f, "{}: unknown feature", self.feature),
            FieldErrorKind::NotFinite => {
                write!(f, "{}: value is not a finite number", self.feature)
            }
            FieldErrorKind::OutOfRange { min, max } => write!(
                f,
                "{}: value {} is outside the dataset range [{:.4}, {:.4}]",
                self.feature,
                self.value.unwrap_or(f64::NAN),
                min,
                max
            ),
        }
    }
}

/// How to treat values outside the recorded dataset range.
///
/// The dataset extremes are soft bounds; real samples occasionally fall
/// slightly outside them, so the default is to proceed and attach the
/// violation as a warning on the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RangePolicy {
    #[default]
    WarnAndProceed,
    Reject,
}

/// A vector that passed validation, with any range warnings attached.
#[derive(Debug, Clone)]
pub struct ValidatedVector {
    pub vector: FeatureVector,
    pub warnings: Vec<FieldError>,
}

/// Checks named feature mappings against the canonical feature table.
#[derive(Debug, Clone)]
pub struct Validator {
    ranges: [FeatureRange; FEATURE_COUNT],
    policy: RangePolicy,
}

impl Default for Validator {
    fn default() -> Self {
        Validator::new(RangePolicy::default())
    }
}

impl Validator {
    /// Validator over the built-in dataset ranges.
    pub fn new(policy: RangePolicy) -> Self {
        Validator {
            ranges: FEATURE_RANGES,
            policy,
        }
    }

    /// Validator over ranges recorded in an artifact set, e.g. ranges
    /// recomputed from a newer training snapshot.
    pub fn with_ranges(ranges: [FeatureRange; FEATURE_COUNT], policy: RangePolicy) -> Self {
        Validator { ranges, policy }
    }

    pub fn policy(&self) -> RangePolicy {
        self.policy
    }

    /// Validate a named mapping into a canonical [`FeatureVector`].
    ///
    /// All thirty names must be present, no extra names are accepted, and
    /// every value must be finite. Range violations are returned as
    /// warnings under [`RangePolicy::WarnAndProceed`] and as errors under
    /// [`RangePolicy::Reject`].
    pub fn validate(
        &self,
        features: &HashMap<String, f64>,
    ) -> Result<ValidatedVector, EnsembleError> {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut values = [0.0f64; FEATURE_COUNT];

        for name in features.keys() {
            if !FEATURE_NAMES.contains(&name.as_str()) {
                errors.push(FieldError {
                    feature: name.clone(),
                    value: features.get(name).copied(),
                    kind: FieldErrorKind::Unknown,
                });
            }
        }

        for (i, name) in FEATURE_NAMES.iter().enumerate() {
            let value = match features.get(*name) {
                Some(&v) => v,
                None => {
                    errors.push(FieldError {
                        feature: name.to_string(),
                        value: None,
                        kind: FieldErrorKind::Missing,
                    });
                    continue;
                }
            };

            if !value.is_finite() {
                errors.push(FieldError {
                    feature: name.to_string(),
                    value: Some(value),
                    kind: FieldErrorKind::NotFinite,
                });
                continue;
            }

            let range = &self.ranges[i];
            if value < range.min || value > range.max {
                let violation = FieldError {
                    feature: name.to_string(),
                    value: Some(value),
                    kind: FieldErrorKind::OutOfRange {
                        min: range.min,
                        max: range.max,
                    },
                };
                match self.policy {
                    RangePolicy::WarnAndProceed => warnings.push(violation),
                    RangePolicy::Reject => errors.push(violation),
                }
            }

            values[i] = value;
        }

        if !errors.is_empty() {
            return Err(EnsembleError::Validation(errors));
        }

        for w in &warnings {
            log::warn!("feature range violation: {}", w);
        }

        let vector = FeatureVector::from_ordered(&values)
            .expect("canonical value buffer always has thirty entries");
        Ok(ValidatedVector { vector, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::FEATURE_RANGES;

    fn midrange_features() -> HashMap<String, f64> {
        FEATURE_NAMES
            .iter()
            .zip(FEATURE_RANGES.iter())
            .map(|(name, r)| (name.to_string(), (r.typical.0 + r.typical.1) / 2.0))
            .collect()
    }

    #[test]
    fn accepts_a_complete_in_range_vector() {
        let validated = Validator::default().validate(&midrange_features()).unwrap();
        assert!(validated.warnings.is_empty());
        assert_eq!(validated.vector.as_slice().len(), FEATURE_COUNT);
    }

    #[test]
    fn rejects_missing_feature() {
        let mut features = midrange_features();
        features.remove("radius_mean");
        let err = Validator::default().validate(&features).unwrap_err();
        match err {
            EnsembleError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].feature, "radius_mean");
                assert_eq!(errors[0].kind, FieldErrorKind::Missing);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn rejects_unknown_feature() {
        let mut features = midrange_features();
        features.insert("extra_feature".to_string(), 1.0);
        let err = Validator::default().validate(&features).unwrap_err();
        match err {
            EnsembleError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].feature, "extra_feature");
                assert_eq!(errors[0].kind, FieldErrorKind::Unknown);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn rejects_non_finite_value() {
        let mut features = midrange_features();
        features.insert("area_mean".to_string(), f64::NAN);
        let err = Validator::default().validate(&features).unwrap_err();
        match err {
            EnsembleError::Validation(errors) => {
                assert_eq!(errors[0].kind, FieldErrorKind::NotFinite);
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn out_of_range_warns_by_default() {
        let mut features = midrange_features();
        features.insert("radius_mean".to_string(), 999.0);
        let validated = Validator::default().validate(&features).unwrap();
        assert_eq!(validated.warnings.len(), 1);
        assert_eq!(validated.warnings[0].feature, "radius_mean");
        assert!(matches!(
            validated.warnings[0].kind,
            FieldErrorKind::OutOfRange { .. }
        ));
        // The vector is still returned with the submitted value.
        assert_eq!(validated.vector.get("radius_mean"), Some(999.0));
    }

    #[test]
    fn out_of_range_rejects_under_strict_policy() {
        let mut features = midrange_features();
        features.insert("radius_mean".to_string(), 999.0);
        let err = Validator::new(RangePolicy::Reject)
            .validate(&features)
            .unwrap_err();
        assert!(matches!(err, EnsembleError::Validation(_)));
    }
}
