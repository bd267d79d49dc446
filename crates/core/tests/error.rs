// Unit tests for error handling
use std::error::Error;
use std::io;
use kiln_core::error::KilnError;

#[test]
fn test_error_from_io() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let kiln_err: KilnError = io_err.into();

    assert!(matches!(kiln_err, KilnError::Io(_)));
    assert!(kiln_err.to_string().contains("I/O error"));
}

#[test]
fn test_error_config() {
    let err = KilnError::config("distDir must not be empty");
    assert_eq!(
        err.to_string(),
        "Invalid configuration: distDir must not be empty"
    );
}

#[test]
fn test_error_phase_keeps_source() {
    let err = KilnError::phase("styles:main", KilnError::tool("sass", "undefined variable"));

    assert_eq!(err.failed_phase(), Some("styles:main"));
    assert_eq!(
        err.to_string(),
        "Phase 'styles:main' failed: Tool 'sass' failed: undefined variable"
    );
    assert!(err.source().is_some());
}

#[test]
fn test_error_pipe() {
    let err = KilnError::pipe("wrap-content", "missing footer");
    assert!(matches!(err, KilnError::Pipe { .. }));
    assert_eq!(err.to_string(), "Config pipe 'wrap-content' failed: missing footer");
    assert_eq!(err.failed_phase(), None);
}

#[test]
fn test_error_from_string() {
    let err: KilnError = "boom".into();
    assert!(matches!(err, KilnError::Other(_)));
    assert_eq!(err.to_string(), "boom");
}
