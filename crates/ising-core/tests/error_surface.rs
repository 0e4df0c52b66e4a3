use ising_core::errors::{ErrorInfo, IsingError};

fn sample_info(code: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new(code, message)
        .with_context("size", "16")
        .with_context("bias", "-1")
}

#[test]
fn lattice_error_surface() {
    let err = IsingError::Lattice(sample_info("invalid-bias", "bias must be positive"));
    assert_eq!(err.code(), "invalid-bias");
    assert!(err.info().context.contains_key("bias"));
}

#[test]
fn config_error_surface() {
    let err = IsingError::Config(sample_info("invalid-eval-cycles", "eval_cycles must be at least 1"));
    assert_eq!(err.info().code, "invalid-eval-cycles");
    assert_eq!(err.info().context.get("size").map(String::as_str), Some("16"));
}

#[test]
fn io_error_records_path_and_kind() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
    let err = IsingError::io("series-open", io, "results/run.dat");
    assert_eq!(err.code(), "series-open");
    let context = &err.info().context;
    assert_eq!(context.get("path").map(String::as_str), Some("results/run.dat"));
    assert_eq!(context.get("kind").map(String::as_str), Some("NotFound"));
}

#[test]
fn display_includes_context_and_hint() {
    let err = IsingError::Serde(
        ErrorInfo::new("config-parse", "unexpected key")
            .with_context("path", "sweep.yaml")
            .with_context("line", "3")
            .with_hint("check the field names"),
    );
    assert_eq!(
        err.to_string(),
        "serde error: [config-parse] unexpected key (line=3, path=sweep.yaml); hint: check the field names"
    );
}

#[test]
fn display_without_context() {
    let err = IsingError::Lattice(ErrorInfo::new("invalid-size", "size must be at least 1"));
    assert_eq!(err.to_string(), "lattice error: [invalid-size] size must be at least 1");
}
