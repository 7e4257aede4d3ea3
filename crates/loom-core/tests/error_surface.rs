use std::path::Path;

use loom_core::errors::{ErrorInfo, LoomError};

#[test]
fn missing_input_carries_path() {
    let err = LoomError::missing_input(Path::new("data/model.pb.gz"));
    assert!(matches!(err, LoomError::MissingInputArtifact(_)));
    assert_eq!(err.info().code, "loom.missing_input");
    assert_eq!(err.path(), Some("data/model.pb.gz"));
    assert_eq!(err.exit_code(), None);
}

#[test]
fn missing_output_carries_path() {
    let err = LoomError::missing_output(Path::new("out/groups"));
    assert!(matches!(err, LoomError::MissingOutputArtifact(_)));
    assert_eq!(err.path(), Some("out/groups"));
}

#[test]
fn process_failure_carries_exit_code_and_command() {
    let err = LoomError::process_failed(Some(3), "build/release/src/infer model.pb.gz");
    assert_eq!(err.exit_code(), Some(3));
    assert_eq!(err.command(), Some("build/release/src/infer model.pb.gz"));
    assert!(err.to_string().contains("exit_code=3"));
}

#[test]
fn errors_serialize_with_family_tag() {
    let err = LoomError::Configuration(
        ErrorInfo::new("loom.build_variant", "unknown build variant").with_context("value", "fast"),
    );
    let json = serde_json::to_value(&err).expect("json");
    assert_eq!(json["family"], "Configuration");
    assert_eq!(json["detail"]["context"]["value"], "fast");
    let parsed: LoomError = serde_json::from_value(json).expect("roundtrip");
    assert_eq!(parsed, err);
}
