//! Logging tests

use std::time::Duration;
use tracing::Level;
use weft_domain::{BuildReport, Diagnostic, GeneratedSource, GenerationObserver};
use weft_infrastructure::logging::{parse_log_level, TracingObserver};

#[test]
fn test_parse_log_level_accepts_known_levels() {
    assert_eq!(parse_log_level("trace").unwrap(), Level::TRACE);
    assert_eq!(parse_log_level("DEBUG").unwrap(), Level::DEBUG);
    assert_eq!(parse_log_level("info").unwrap(), Level::INFO);
    assert_eq!(parse_log_level("warning").unwrap(), Level::WARN);
    assert_eq!(parse_log_level("error").unwrap(), Level::ERROR);
}

#[test]
fn test_parse_log_level_rejects_unknown_level() {
    let error = parse_log_level("loud").unwrap_err();
    assert!(error.to_string().contains("Invalid log level: loud"));
}

#[test]
fn test_tracing_observer_accepts_listings_and_reports() {
    let observer = TracingObserver::new(true);
    let source = GeneratedSource {
        contract: "tests::Greeter".to_string(),
        implementation: "Hello".to_string(),
        type_name: "GreeterProxy<Hello>".to_string(),
        source: "struct GreeterProxy<Hello> {}\n".to_string(),
    };
    assert!(observer.on_code_generated(&source).is_ok());

    observer.on_build_complete(&BuildReport {
        contract: "tests::Greeter".to_string(),
        implementation: "Hello".to_string(),
        success: false,
        diagnostics: vec![Diagnostic::error(None, "no weaver")],
        elapsed: Duration::from_micros(12),
    });
}
