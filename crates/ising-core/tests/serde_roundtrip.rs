use ising_core::errors::{ErrorInfo, IsingError};
use ising_core::stats::Summary;

#[test]
fn error_round_trips_json_with_family_tag() {
    let err = IsingError::Config(
        ErrorInfo::new("invalid-beta", "beta must be finite and non-negative")
            .with_context("beta", "-0.5"),
    );

    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Config\""));
    let decoded: IsingError = serde_json::from_str(&json).expect("deserialize");

    assert_eq!(decoded, err);
}

#[test]
fn summary_round_trips_json() {
    let summary = Summary::of(&[0.5, 0.75, 1.0]);
    let json = serde_json::to_string(&summary).expect("serialize");
    let decoded: Summary = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, summary);
}
