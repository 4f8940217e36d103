//! Snapshot tests for pipeline error messages.

use insta::assert_snapshot;
use trafficmanager_errors::{TrafficManagerError, ValidationError};
use trafficmanager_pipeline::PipelineError;

#[test]
fn test_spawn_failed() {
    let err = PipelineError::spawn_failed("collision", std::io::Error::other("thread limit"));
    assert_snapshot!(err.to_string(), @"Failed to spawn stage 'collision': thread limit");
}

#[test]
fn test_shut_down() {
    assert_snapshot!(PipelineError::ShutDown.to_string(), @"Session is shut down");
}

#[test]
fn test_invalid_configuration() {
    let err = PipelineError::from(ValidationError::out_of_range("stage_backoff_ms", 0_u64, 1, 1000));
    assert_snapshot!(
        err.to_string(),
        @"Invalid configuration: stage_backoff_ms value 0 is out of range [1, 1000]"
    );
}

#[test]
fn test_config_io() {
    let err = PipelineError::config_io("tm.json", std::io::Error::other("denied"));
    assert_snapshot!(err.to_string(), @"Config file tm.json: denied");
}

#[test]
fn test_lifted_into_top_level() {
    let err: TrafficManagerError = PipelineError::ShutDown.into();
    assert_snapshot!(err.to_string(), @"Pipeline error: Session is shut down");
}
