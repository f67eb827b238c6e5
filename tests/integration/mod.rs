//! Integration test modules.

mod acquisition_test;
mod console_session_test;
mod operator_mock;
mod session_test;
