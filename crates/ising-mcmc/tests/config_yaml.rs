use std::path::PathBuf;

use ising_mcmc::config::{default_cycles_budget, default_frame_interval};
use ising_mcmc::{RunConfig, SimulationConfig};

#[test]
fn empty_document_yields_reference_defaults() {
    let config = SimulationConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, SimulationConfig::default());
    assert_eq!(config.lattice_size, 256);
    assert_eq!(config.run.min_cycles, 2000);
    assert_eq!(config.run.eval_cycles, 1);
    assert_eq!(config.run.averaging_over(), 1000);
    assert_eq!(config.run.slope_threshold, 1e-6);
    assert_eq!(config.biases.count, 10);
    assert!(config.seed_policy.master_seed.is_none());
    assert_eq!(config.output.results_dir, PathBuf::from("results"));
    assert!(config.output.time_series);
    assert!(!config.output.frames);
}

#[test]
fn yaml_overrides_nested_fields() {
    let yaml = r#"
lattice_size: 32
run:
  eval_cycles: 4
  cycles: 500
biases:
  count: 3
seed_policy:
  master_seed: 99
output:
  results_dir: out/runs
  frames: true
"#;
    let config = SimulationConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.lattice_size, 32);
    assert_eq!(config.run.eval_cycles, 4);
    assert_eq!(config.run.averaging_over(), 250);
    assert_eq!(config.run.cycles_budget(32), 500);
    assert_eq!(config.run.min_cycles, 2000);
    assert_eq!(config.biases.count, 3);
    assert_eq!(config.biases.exponent_step, 0.2);
    assert_eq!(config.seed_policy.master_seed, Some(99));
    assert_eq!(config.output.results_dir, PathBuf::from("out/runs"));
    assert!(config.output.frames);
    assert!(config.output.time_series);
}

#[test]
fn bias_schedule_is_exponential() {
    let biases = SimulationConfig::default().biases.values();
    assert_eq!(biases.len(), 10);
    assert!((biases[0] - 0.2f64.exp()).abs() < 1e-12);
    assert!((biases[9] - 2.0f64.exp()).abs() < 1e-12);
    assert!(biases.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn size_dependent_defaults() {
    assert_eq!(default_cycles_budget(256), 2000);
    assert_eq!(default_cycles_budget(512), 1000);
    assert_eq!(default_cycles_budget(128), 4000);
    assert_eq!(default_cycles_budget(16), 3_200_000);
    assert_eq!(default_frame_interval(256), 20);
    assert_eq!(default_frame_interval(512), 40);
    assert_eq!(default_frame_interval(128), 32);
    assert_eq!(default_frame_interval(16), 2048);

    let run = RunConfig {
        frame_cycles: Some(7),
        ..RunConfig::default()
    };
    assert_eq!(run.frame_interval(16), 7);
    assert_eq!(run.cycles_budget(256), 2000);
}

#[test]
fn invalid_settings_are_rejected() {
    let cases = [
        ("lattice_size: 0", "invalid-lattice-size"),
        ("biases: { count: 0 }", "invalid-bias-count"),
        ("biases: { exponent_step: -710.0 }", "invalid-bias-step"),
        ("biases: { exponent_step: 710.0 }", "invalid-bias-step"),
        ("biases: { exponent_step: 71.0, count: 10 }", "invalid-bias-step"),
        ("run: { eval_cycles: 0 }", "invalid-eval-cycles"),
        ("run: { cycles: 0 }", "invalid-cycles"),
        ("run: { frame_cycles: 0 }", "invalid-frame-cycles"),
        ("run: { window_base: 1 }", "invalid-window"),
        ("run: { window_base: 100, eval_cycles: 60 }", "invalid-window"),
        ("run: { slope_threshold: -1.0 }", "invalid-slope-threshold"),
    ];
    for (yaml, code) in cases {
        let err = SimulationConfig::from_yaml_str(yaml).unwrap_err();
        assert_eq!(err.info().code, code, "yaml: {yaml}");
    }
}

#[test]
fn malformed_yaml_is_a_serde_error() {
    let err = SimulationConfig::from_yaml_str("lattice_size: [1, 2").unwrap_err();
    assert_eq!(err.info().code, "config-parse");
    assert!(err.to_string().starts_with("serde error"));
}
