//! Integration tests for full measurement passes.

use super::operator_mock::MockOperator;
use specimen_rig::acquisition::ReaderError;
use specimen_rig::config::{load_config_from, save_config_to, RigConfig};
use specimen_rig::input::ScriptedInput;
use specimen_rig::sensors::SensorError;
use specimen_rig::MeasurementSession;
use tempfile::tempdir;

fn config() -> RigConfig {
    let mut config = RigConfig::default();
    config.laser.channel = "COM1".to_string();
    config.camera.channel = "COM2".to_string();
    config.specimen.anatomical_site = "Left forearm".to_string();
    config
}

#[test]
fn test_session_summary() {
    let mut session = MeasurementSession::from_config(&config()).unwrap();
    let mut operator = MockOperator::default();

    let summary = session.run(&mut operator).unwrap();

    assert!((summary.precision - 0.75).abs() < 1e-9);
    assert_eq!(summary.reference.height, 10.0);
    assert_eq!(summary.specimen.anatomical_site(), "Left forearm");
    assert_eq!(operator.prompts.len(), 5);
    assert_eq!(session.laser().precision(), Some(summary.precision));
}

#[test]
fn test_summary_serializes() {
    let mut session = MeasurementSession::from_config(&config()).unwrap();
    let summary = session.run(&mut MockOperator::default()).unwrap();

    let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
    assert_eq!(json["laser_samples"]["height"], 191);
    assert_eq!(json["specimen"]["collection_type"], "Biopsy");
    assert!(json["precision"].as_f64().unwrap() > 0.7);
}

#[test]
fn test_config_drives_session() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("rig.toml");

    let mut rig = config();
    rig.laser.nominal_speed = 0.1;
    save_config_to(&rig, &path).unwrap();

    let loaded = load_config_from(&path).unwrap();
    let mut session = MeasurementSession::from_config(&loaded).unwrap();
    let mut input = ScriptedInput::from_values(&[11.0, 21.0, 1.0, 1.0, 2.0]);

    let summary = session.run(&mut input).unwrap();
    assert!((summary.laser.height - 1.0).abs() < 1e-9);
    assert!((summary.laser.length - 2.0).abs() < 1e-9);
    assert!(summary.precision.abs() < 1e-9);
}

#[test]
fn test_legacy_range_accepts_large_reference() {
    let mut rig = config();
    rig.range.reject_above_max = false;

    let mut session = MeasurementSession::from_config(&rig).unwrap();
    let mut operator = MockOperator {
        camera: (700.0, 20.0),
        ..Default::default()
    };

    let summary = session.run(&mut operator).unwrap();
    assert_eq!(summary.reference.height, 700.0);
}

#[test]
fn test_bounded_range_rejects_large_reference() {
    let mut session = MeasurementSession::from_config(&config()).unwrap();
    let mut operator = MockOperator {
        camera: (700.0, 20.0),
        ..Default::default()
    };

    let err = session.run(&mut operator).unwrap_err();
    assert!(matches!(
        err,
        ReaderError::Sensor(SensorError::OutOfRange { .. })
    ));
}

#[test]
fn test_cancelled_camera_leaves_precision_unset() {
    let mut session = MeasurementSession::from_config(&config()).unwrap();
    let mut operator = MockOperator::cancelling("Camera length");

    assert!(session.run(&mut operator).is_err());
    assert!(session.laser().precision().is_none());
    assert!(session.camera().reference().is_none());
}
