//! Validation behavior as seen through the serving facade.

mod common;

use wisconsin_ensemble::error::EnsembleError;
use wisconsin_ensemble::features::FEATURE_COUNT;
use wisconsin_ensemble::predictor::{PredictOptions, Predictor};
use wisconsin_ensemble::validation::{FieldErrorKind, RangePolicy};

#[test]
fn unknown_feature_is_rejected_before_any_model_runs() {
    let dir = tempfile::tempdir().unwrap();
    common::populate_store(dir.path());
    let (predictor, _) = Predictor::open(dir.path(), RangePolicy::default());

    let mut features = common::benign_example();
    features.insert("radius_median".to_string(), 12.0);
    match predictor.predict(&features, PredictOptions::default()) {
        Err(EnsembleError::Validation(errors)) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].feature, "radius_median");
            assert_eq!(errors[0].kind, FieldErrorKind::Unknown);
        }
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn an_empty_request_lists_every_missing_feature() {
    let dir = tempfile::tempdir().unwrap();
    common::populate_store(dir.path());
    let (predictor, _) = Predictor::open(dir.path(), RangePolicy::default());

    match predictor.predict(&Default::default(), PredictOptions::default()) {
        Err(EnsembleError::Validation(errors)) => {
            assert_eq!(errors.len(), FEATURE_COUNT);
            assert!(errors.iter().all(|e| e.kind == FieldErrorKind::Missing));
        }
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn strict_policy_turns_range_warnings_into_rejections() {
    let dir = tempfile::tempdir().unwrap();
    common::populate_store(dir.path());
    let (predictor, _) = Predictor::open(dir.path(), RangePolicy::Reject);

    let mut features = common::benign_example();
    features.insert("area_worst".to_string(), 99999.0);
    match predictor.predict(&features, PredictOptions::default()) {
        Err(EnsembleError::Validation(errors)) => {
            assert_eq!(errors[0].feature, "area_worst");
            assert!(matches!(
                errors[0].kind,
                FieldErrorKind::OutOfRange { .. }
            ));
        }
        other => panic!("expected a validation error, got {:?}", other.map(|_| ())),
    }

    // The same request passes under the default policy.
    let (lenient, _) = Predictor::open(dir.path(), RangePolicy::default());
    let result = lenient
        .predict(&features, PredictOptions::default())
        .unwrap();
    assert_eq!(result.warnings.len(), 1);
}
