#![allow(clippy::float_cmp)]

use super::*;

// =============================================================
// RenderHandle <-> JS number
// =============================================================

#[test]
fn whole_numbers_become_handles() {
    assert_eq!(RenderHandle::from_f64(0.0), Some(RenderHandle(0)));
    assert_eq!(RenderHandle::from_f64(42.0), Some(RenderHandle(42)));
    assert_eq!(RenderHandle::from_f64(9_007_199_254_740_991.0), Some(RenderHandle(9_007_199_254_740_991)));
}

#[test]
fn invalid_numbers_are_rejected() {
    assert_eq!(RenderHandle::from_f64(-1.0), None);
    assert_eq!(RenderHandle::from_f64(2.5), None);
    assert_eq!(RenderHandle::from_f64(f64::NAN), None);
    assert_eq!(RenderHandle::from_f64(f64::INFINITY), None);
    assert_eq!(RenderHandle::from_f64(f64::NEG_INFINITY), None);
    assert_eq!(RenderHandle::from_f64(1e300), None);
}

#[test]
fn handle_survives_trip_through_js_number() {
    let handle = RenderHandle(1234);
    assert_eq!(handle.to_f64(), 1234.0);
    assert_eq!(RenderHandle::from_f64(handle.to_f64()), Some(handle));
}

// =============================================================
// Host failures
// =============================================================

#[test]
fn host_error_named_unsupported_type_is_unsupported() {
    let err = BackendError::from_host(PrimitiveKind::Torus, Some("UnsupportedType"), "no torus".into());
    assert_eq!(err, BackendError::UnsupportedType("torus".into()));
    assert_eq!(err.error_code(), "E_UNSUPPORTED_TYPE");
}

#[test]
fn other_host_errors_are_engine_faults() {
    let err = BackendError::from_host(PrimitiveKind::Cube, Some("TypeError"), "gl context lost".into());
    assert_eq!(err, BackendError::Engine("gl context lost".into()));
    assert_eq!(err.error_code(), "E_ENGINE");

    let thrown_string = BackendError::from_host(PrimitiveKind::Cube, None, "boom".into());
    assert_eq!(thrown_string.error_code(), "E_ENGINE");
}
