//! Integration tests for reader acquisition cycles.

use super::operator_mock::MockOperator;
use specimen_rig::acquisition::{CycleState, Reader, ReaderError, ReferenceReading};
use specimen_rig::input::ScriptedInput;
use specimen_rig::sensors::{
    Axis, CameraSensor, LaserSensor, RangePolicy, Sensor, SensorDevice, SensorError, SensorKind,
};
use specimen_rig::{MeasurementSink, Specimen};
use std::sync::{Arc, Mutex};

fn specimen() -> Arc<Mutex<Specimen>> {
    Arc::new(Mutex::new(
        Specimen::new("Clinic B", "Excision", "Scalp").unwrap(),
    ))
}

#[test]
fn test_laser_and_camera_share_specimen() {
    let sink = specimen();
    let mut laser = Reader::new(
        SensorDevice::new(SensorKind::Laser, "/dev/ttyUSB0").unwrap(),
        Arc::clone(&sink),
        RangePolicy::default(),
    );
    let mut camera = Reader::new(
        SensorDevice::new(SensorKind::Camera, "/dev/ttyUSB1").unwrap(),
        Arc::clone(&sink),
        RangePolicy::default(),
    );
    let mut operator = MockOperator::default();

    let laser_report = laser.run_cycle(&mut operator).unwrap();
    let camera_report = camera.run_cycle(&mut operator).unwrap();

    assert_eq!(laser_report.sensor, SensorKind::Laser);
    assert_eq!(camera_report.sensor, SensorKind::Camera);
    assert_eq!(laser_report.sample_counts.get(Axis::Length), 381);

    laser.adopt_reference(camera_report.reference.unwrap());
    let precision = laser.calc_precision().unwrap();
    assert!((precision - 0.75).abs() < 1e-9);

    let specimen = sink.lock().unwrap();
    assert!((specimen.height() - 9.5).abs() < 1e-9);
    assert!((specimen.length() - 19.0).abs() < 1e-9);
    assert!((specimen.depth() - 2.0).abs() < 1e-9);
}

#[test]
fn test_laser_prompts_one_window_per_axis() {
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        specimen(),
        RangePolicy::default(),
    );
    let mut operator = MockOperator::default();
    laser.run_cycle(&mut operator).unwrap();

    assert_eq!(operator.prompts.len(), 3);
    assert!(operator.prompts[0].contains("height"));
    assert!(operator.prompts[1].contains("length"));
    assert!(operator.prompts[2].contains("depth"));
}

#[test]
fn test_cancelled_window_aborts_cycle() {
    let sink = specimen();
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        Arc::clone(&sink),
        RangePolicy::default(),
    );
    let mut operator = MockOperator::cancelling("length");

    let err = laser.run_cycle(&mut operator).unwrap_err();

    assert!(matches!(err, ReaderError::Sensor(SensorError::Cancelled)));
    assert_eq!(laser.state(), CycleState::Idle);
    assert!(laser.readings().is_none());
    assert!(laser.last_acquisition().is_none());
    assert!(!laser.sensor().is_active());
    // Nothing was pushed for the height window captured before the cancel.
    assert_eq!(sink.lock().unwrap().height(), 0.0);
}

#[test]
fn test_repeated_cycles_start_from_scratch() {
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        specimen(),
        RangePolicy::default(),
    );

    let mut first = ScriptedInput::from_values(&[11.0, 11.0, 11.0]);
    laser.run_cycle(&mut first).unwrap();

    let mut second = ScriptedInput::from_values(&[3.0, 2.0, 0.0]);
    let report = laser.run_cycle(&mut second).unwrap();

    // Samples from the first cycle must not leak into the second.
    assert_eq!(report.sample_counts.get(Axis::Height), 3);
    let readings = laser.readings().unwrap();
    assert!((readings.height - 0.1).abs() < 1e-9);
    assert!((readings.length - 0.05).abs() < 1e-9);
    assert_eq!(readings.depth, 0.0);
}

#[test]
fn test_cycle_toggles_sensor_each_run() {
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        specimen(),
        RangePolicy::default(),
    );
    let mut input = ScriptedInput::from_values(&[1.0, 1.0, 1.0, 1.0, 1.0, 1.0]);

    laser.run_cycle(&mut input).unwrap();
    assert!(!laser.sensor().is_active());
    laser.run_cycle(&mut input).unwrap();
    assert!(!laser.sensor().is_active());
}

#[test]
fn test_precision_with_adopted_reference_only() {
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        specimen(),
        RangePolicy::default(),
    );
    laser.adopt_reference(ReferenceReading::new(1.0, 1.0));

    assert!(matches!(
        laser.calc_precision(),
        Err(ReaderError::IncompletePrecisionInput)
    ));
}

#[test]
fn test_push_to_sink_boundaries() {
    let sink = specimen();
    let camera = Reader::new(
        CameraSensor::new("COM8").unwrap(),
        Arc::clone(&sink),
        RangePolicy::default(),
    );

    assert!(camera.push_to_sink(Axis::Length, 600.0).is_err());
    assert!(camera.push_to_sink(Axis::Length, -0.5).is_err());
    camera.push_to_sink(Axis::Length, 500.0).unwrap();
    camera.push_to_sink(Axis::Depth, 150.0).unwrap();

    let specimen = sink.lock().unwrap();
    assert_eq!(specimen.length(), 500.0);
    assert_eq!(specimen.depth(), 150.0);
}

#[test]
fn test_specimen_validates_independently() {
    let mut specimen = Specimen::new("Clinic B", "Excision", "Scalp").unwrap();
    assert!(specimen.set_height(-3.0).is_err());
    // The specimen itself has no upper bound.
    specimen.set_height(600.0).unwrap();
    assert_eq!(specimen.height(), 600.0);
}

#[test]
fn test_oversized_window_fails_fast() {
    let sink = specimen();
    let mut laser = Reader::new(
        LaserSensor::new("COM5").unwrap(),
        Arc::clone(&sink),
        RangePolicy::default(),
    );
    let mut operator = MockOperator {
        windows: [1e12, 1.0, 1.0],
        ..Default::default()
    };

    let err = laser.run_cycle(&mut operator).unwrap_err();

    assert!(matches!(
        err,
        ReaderError::Sensor(SensorError::InvalidWindow(_))
    ));
    assert_eq!(operator.prompts.len(), 1);
    assert!(!laser.sensor().is_active());
}
