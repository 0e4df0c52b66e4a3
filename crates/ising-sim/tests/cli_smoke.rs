use std::fs;
use std::process::Command;
use std::thread;
use std::time::{Duration, Instant};

use serde_json::Value;
use tempfile::tempdir;

const SMALL_RUN: &str = r#"
lattice_size: 6
biases:
  count: 2
run:
  min_cycles: 5
  cycles: 20
  frame_cycles: 10
  window_base: 10
  slope_threshold: 0.5
"#;

fn ising_sim() -> Command {
    Command::new(env!("CARGO_BIN_EXE_ising-sim"))
}

#[test]
fn malformed_invocation_prints_usage_and_succeeds() {
    let output = ising_sim().output().expect("run ising-sim");
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn sweep_writes_tables_manifest_and_series() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("small.yaml"), SMALL_RUN).unwrap();

    let output = ising_sim()
        .current_dir(dir.path())
        .args([
            "--config",
            "small.yaml",
            "--seed",
            "5",
            "--frames",
            "--log-level",
            "warn",
            "sweep",
            "1.0",
            "2.0",
            "0.5",
        ])
        .output()
        .expect("run ising-sim");
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let dist = fs::read_to_string(dir.path().join("sweep_dist.dat")).unwrap();
    assert_eq!(dist.lines().count(), 1 + 3 * 2);
    assert!(dist.starts_with("L\tT\tbias\tmag"));
    let stdev = fs::read_to_string(dir.path().join("sweep_stdev.dat")).unwrap();
    let temperatures: Vec<&str> = stdev
        .lines()
        .skip(1)
        .map(|line| line.split('\t').nth(1).unwrap())
        .collect();
    assert_eq!(temperatures, ["1", "1.5", "2"]);

    let manifest: Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join("sweep_manifest.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(manifest["temperatures"], serde_json::json!([1.0, 1.5, 2.0]));
    assert_eq!(manifest["config"]["seed_policy"]["master_seed"], 5);
    assert_eq!(manifest["config"]["lattice_size"], 6);

    let results = dir.path().join("results");
    assert!(results.join("beta=1.0000_N=6_bias=1.22.dat").is_file());
    assert!(results.join("beta=0.5000_N=6_bias=1.49.dat").is_file());
    assert!(results
        .join("beta=0.6667_N=6_bias=1.22_frames")
        .join("frame_000000.pgm")
        .is_file());
}

#[test]
fn seeded_sweeps_are_reproducible() {
    let run = |name: &str| {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("small.yaml"), SMALL_RUN).unwrap();
        let status = ising_sim()
            .current_dir(dir.path())
            .args(["--config", "small.yaml", "--seed", "77", "--no-series", name, "1.8"])
            .status()
            .expect("run ising-sim");
        assert!(status.success());
        assert!(!dir.path().join("results").exists());
        fs::read_to_string(dir.path().join(format!("{name}_dist.dat"))).unwrap()
    };
    assert_eq!(run("a"), run("a"));
}

#[test]
fn invalid_configuration_fails() {
    let dir = tempdir().unwrap();
    let status = ising_sim()
        .current_dir(dir.path())
        .args(["--size", "0", "sweep", "2.0"])
        .status()
        .expect("run ising-sim");
    assert!(!status.success());
}

#[cfg(unix)]
#[test]
fn interrupt_cancels_and_flushes_partial_tables() {
    const NEVER_SETTLES: &str = r#"
lattice_size: 8
biases:
  count: 2
run:
  frame_cycles: 1
  window_base: 1000000
"#;
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("endless.yaml"), NEVER_SETTLES).unwrap();
    let mut child = ising_sim()
        .current_dir(dir.path())
        .args(["--config", "endless.yaml", "--seed", "4", "sweep", "2.0", "3.0"])
        .spawn()
        .expect("spawn ising-sim");

    let series = dir.path().join("results").join("beta=0.5000_N=8_bias=1.22.dat");
    let deadline = Instant::now() + Duration::from_secs(60);
    while !series.exists() {
        assert!(Instant::now() < deadline, "first run never started");
        thread::sleep(Duration::from_millis(20));
    }
    thread::sleep(Duration::from_millis(200));

    let killed = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .expect("send SIGINT");
    assert!(killed.success());
    let status = child.wait().expect("wait for ising-sim");
    assert!(status.success(), "exit status {status:?}");

    let dist = fs::read_to_string(dir.path().join("sweep_dist.dat")).unwrap();
    let rows: Vec<&str> = dist.lines().skip(1).collect();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].starts_with("8\t2\t"));
    let stdev = fs::read_to_string(dir.path().join("sweep_stdev.dat")).unwrap();
    assert_eq!(stdev.lines().count(), 2);
    assert!(fs::read_to_string(&series).unwrap().lines().count() > 1);
}
