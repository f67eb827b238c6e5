//! Integration test driving a session through console input.

use specimen_rig::config::RigConfig;
use specimen_rig::input::ConsoleInput;
use specimen_rig::MeasurementSession;
use std::io::Cursor;

#[test]
fn test_console_reprompts_then_completes() {
    let mut rig = RigConfig::default();
    rig.laser.channel = "COM1".to_string();
    rig.camera.channel = "COM2".to_string();

    // Bad window, then bad camera height, each corrected on the next line.
    let lines = "2.5\n5\n3\n1\nten\n600\n10\n20\n";
    let mut console = ConsoleInput::new(Cursor::new(lines.as_bytes().to_vec()), Vec::new(), 3);

    let mut session = MeasurementSession::from_config(&rig).unwrap();
    let summary = session.run(&mut console).unwrap();

    assert!((summary.laser.height - 0.2).abs() < 1e-9);
    assert_eq!(summary.reference.height, 10.0);

    let transcript = String::from_utf8(console.into_writer()).unwrap();
    assert!(transcript.contains("Value must be a whole number between 0 and"));
    assert!(transcript.contains("Please enter numbers only."));
    assert!(transcript.contains("Value must be between 0 and 500."));
}

#[test]
fn test_console_cancel_aborts_session() {
    let mut rig = RigConfig::default();
    rig.laser.channel = "COM1".to_string();
    rig.camera.channel = "COM2".to_string();

    let mut console = ConsoleInput::new(Cursor::new(b"5\nq\n".to_vec()), Vec::new(), 3);
    let mut session = MeasurementSession::from_config(&rig).unwrap();

    assert!(session.run(&mut console).is_err());
    assert!(session.laser().readings().is_none());
}
