//! End-to-end tests for the tlm binary.
//!
//! Recordings are encoded with the test stream builder into a temp dir,
//! and every invocation is isolated from the user's config.

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;
use tlm_common::{TypedValue, Unit, ValueType};
use tlm_telemetry::test_utils::StreamBuilder;
use tlm_telemetry::{MAX_EVENT_DEPTH, TIMING_PROVIDER};

/// Get a Command for the tlm binary with no ambient config.
fn tlm(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("tlm").expect("tlm binary should exist");
    cmd.env_remove("TLM_CONFIG")
        .env_remove("TLM_LOG")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", home);
    cmd
}

/// Engine rpm 10..50 at t = 0..4, two timing channels, one statistic and a
/// three-event tree.
fn session_stream() -> Vec<u8> {
    let mut builder = StreamBuilder::new();
    builder.register_provider(
        1,
        "com.example.engine",
        "Engine",
        1,
        &[(0, ValueType::F64, Unit::Value, "rpm")],
    );
    for (i, rpm) in [10.0, 20.0, 30.0, 40.0, 50.0].iter().enumerate() {
        builder.packet(1, i as f64, &[(0, TypedValue::F64(*rpm))]);
    }

    builder
        .register_provider(
            2,
            TIMING_PROVIDER,
            "Frame timing",
            1,
            &[
                (0, ValueType::F64, Unit::Time, "cpu"),
                (1, ValueType::F64, Unit::Time, "gpu"),
            ],
        )
        .packet(2, 1.0, &[(0, TypedValue::F64(0.010)), (1, TypedValue::F64(0.008))])
        .packet(2, 2.0, &[(0, TypedValue::F64(0.020)), (1, TypedValue::F64(0.012))])
        .statistic("session", &[("aircraft", TypedValue::String("C172".into()))])
        .span_event(1, 0.0, 4.0, None)
        .span_event(2, 0.5, 1.5, Some(1))
        .span_event(3, 2.0, 3.0, Some(1));
    builder.finish()
}

struct Fixture {
    dir: TempDir,
    recording: PathBuf,
}

impl Fixture {
    fn new(bytes: &[u8]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let recording = dir.path().join("session.tlm");
        fs::write(&recording, bytes).unwrap();
        Fixture { dir, recording }
    }

    fn session() -> Self {
        Self::new(&session_stream())
    }

    fn cmd(&self) -> Command {
        tlm(self.dir.path())
    }

    fn write_config(&self, name: &str, text: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, text).unwrap();
        path
    }

    fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(["-f", "json"])
            .args(args)
            .arg(&self.recording)
            .output()
            .unwrap();
        assert!(output.status.success(), "{:?}", output);
        serde_json::from_slice(&output.stdout).unwrap()
    }
}

fn provider<'a>(report: &'a Value, identifier: &str) -> &'a Value {
    report["providers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["identifier"] == identifier)
        .unwrap()
}

// ============================================================================
// Argument Handling
// ============================================================================

mod arguments {
    use super::*;

    #[test]
    fn help_exits_clean() {
        let dir = tempfile::tempdir().unwrap();
        tlm(dir.path())
            .arg("--help")
            .assert()
            .code(0)
            .stdout(predicate::str::contains("inspect"));
    }

    #[test]
    fn unknown_command_is_args_error() {
        let dir = tempfile::tempdir().unwrap();
        tlm(dir.path())
            .arg("nonexistent-command")
            .assert()
            .code(10)
            .stderr(predicate::str::contains("error"));
    }

    #[test]
    fn provider_requires_field() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .args(["stats", "--provider", "com.example.engine"])
            .arg(&fixture.recording)
            .assert()
            .code(10);
    }
}

// ============================================================================
// inspect
// ============================================================================

mod inspect {
    use super::*;

    #[test]
    fn summary_lists_providers_and_statistics() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .arg("inspect")
            .arg(&fixture.recording)
            .assert()
            .success()
            .stdout(predicate::str::contains("com.example.engine"))
            .stdout(predicate::str::contains("statistic \"session\""))
            .stdout(predicate::str::contains("aircraft = C172"))
            .stdout(predicate::str::contains("3 events"));
    }

    #[test]
    fn json_report_reflects_padded_series() {
        let fixture = Fixture::session();
        let report = fixture.json(&["inspect"]);

        assert_eq!(report["version"], 2);
        assert_eq!(report["start_time"], 0.0);
        assert_eq!(report["end_time"], 4.0);
        assert_eq!(report["event_count"], 3);

        let engine = provider(&report, "com.example.engine");
        assert_eq!(engine["fields"][0]["samples"], 5);
        assert_eq!(engine["fields"][0]["unit"], "value");
        assert!(engine["fields"][0]["color"].as_str().unwrap().starts_with("hsl("));

        // Two timing samples, edge-padded to [0, 4].
        let timing = provider(&report, TIMING_PROVIDER);
        assert_eq!(timing["fields"][0]["samples"], 4);
    }

    #[test]
    fn config_can_disable_post_processing() {
        let fixture = Fixture::session();
        let config = fixture.write_config(
            "plain.toml",
            "decimation_target = 0\npad_to_range = false\n",
        );
        let output = fixture
            .cmd()
            .arg("--config")
            .arg(&config)
            .args(["-f", "json", "inspect"])
            .arg(&fixture.recording)
            .output()
            .unwrap();
        assert!(output.status.success());

        let report: Value = serde_json::from_slice(&output.stdout).unwrap();
        assert_eq!(provider(&report, TIMING_PROVIDER)["fields"][0]["samples"], 2);
    }

    #[test]
    fn xdg_config_is_picked_up() {
        let fixture = Fixture::session();
        fs::create_dir_all(fixture.dir.path().join("tlm")).unwrap();
        fixture.write_config("tlm/config.toml", "pad_to_range = false\n");

        let report = fixture.json(&["inspect"]);
        assert_eq!(provider(&report, TIMING_PROVIDER)["fields"][0]["samples"], 2);
    }
}

// ============================================================================
// stats
// ============================================================================

mod stats {
    use super::*;

    #[test]
    fn field_statistics_use_raw_samples() {
        let fixture = Fixture::session();
        let report = fixture.json(&["stats", "--provider", "com.example.engine", "--field", "0"]);
        let entry = &report[0];

        assert_eq!(entry["samples"], 5);
        assert_eq!(entry["minimum"], 10.0);
        assert_eq!(entry["maximum"], 50.0);
        assert_eq!(entry["average"], 30.0);
        // Odd count: midpoint averaged with its left neighbour.
        assert_eq!(entry["median"], 25.0);
        assert_eq!(entry["rank_percentiles"][0], serde_json::json!([0.5, 20.0]));
        assert_eq!(entry["rank_percentiles"][1], serde_json::json!([0.9, 40.0]));
        assert_eq!(entry["smoothed_peak"], 30.0);
        assert_eq!(entry["window"], 30);
    }

    #[test]
    fn window_and_range_options() {
        let fixture = Fixture::session();
        let report = fixture.json(&[
            "stats",
            "--provider",
            "com.example.engine",
            "--field",
            "0",
            "--start",
            "1",
            "--end",
            "3",
            "--window",
            "2",
        ]);
        let entry = &report[0];

        assert_eq!(entry["samples"], 3);
        assert_eq!(entry["minimum"], 20.0);
        assert_eq!(entry["maximum"], 40.0);
        assert_eq!(entry["smoothed_peak"], 35.0);
    }

    #[test]
    fn timing_channels_by_default() {
        let fixture = Fixture::session();
        let report = fixture.json(&["stats"]);
        let titles: Vec<&str> = report
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, vec!["cpu", "gpu"]);
        assert_eq!(report[0]["maximum"], 0.020);
    }

    #[test]
    fn summary_formats_units() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .arg("stats")
            .arg(&fixture.recording)
            .assert()
            .success()
            .stdout(predicate::str::contains("cpu [Time]"))
            .stdout(predicate::str::contains("20.00ms"));
    }

    #[test]
    fn unknown_provider_is_args_error() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .args(["stats", "--provider", "com.example.none", "--field", "0"])
            .arg(&fixture.recording)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("provider 'com.example.none' not found"));
    }

    #[test]
    fn unknown_field_is_args_error() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .args(["stats", "--provider", "com.example.engine", "--field", "7"])
            .arg(&fixture.recording)
            .assert()
            .code(10);
    }

    #[test]
    fn inverted_window_is_args_error() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .args(["stats", "--start", "3", "--end", "1"])
            .arg(&fixture.recording)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("invalid time window"));
    }

    #[test]
    fn no_timing_provider() {
        let fixture = Fixture::new(&StreamBuilder::new().finish());
        fixture
            .cmd()
            .arg("stats")
            .arg(&fixture.recording)
            .assert()
            .code(10)
            .stderr(predicate::str::contains("no timing provider"));
    }
}

// ============================================================================
// events
// ============================================================================

mod events {
    use super::*;

    #[test]
    fn summary_prints_nested_tree() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .arg("events")
            .arg(&fixture.recording)
            .assert()
            .success()
            .stdout(predicate::str::contains("#1 [0.000, 4.000]"))
            .stdout(predicate::str::contains("\n  #2 [0.500, 1.500]"))
            .stdout(predicate::str::contains("\n  #3 [2.000, 3.000]"));
    }

    #[test]
    fn json_nests_children() {
        let fixture = Fixture::session();
        let report = fixture.json(&["events"]);

        assert_eq!(report["count"], 3);
        let roots = report["events"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        let children = roots[0]["children"].as_array().unwrap();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0]["id"], 2);
        assert_eq!(children[1]["id"], 3);
    }
}

// ============================================================================
// check and exit codes
// ============================================================================

mod check {
    use super::*;

    #[test]
    fn valid_recording() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .arg("check")
            .arg(&fixture.recording)
            .assert()
            .code(0)
            .stdout(predicate::str::starts_with("ok: "))
            .stdout(predicate::str::contains("3 events"));
    }

    #[test]
    fn json_counts() {
        let fixture = Fixture::session();
        let report = fixture.json(&["check"]);
        assert_eq!(report["status"], "ok");
        assert_eq!(report["providers"], 2);
        assert_eq!(report["fields"], 3);
        assert_eq!(report["samples"], 9);
        assert_eq!(report["fingerprint"].as_str().unwrap().len(), 64);
    }

    #[test]
    fn unsupported_version() {
        let fixture = Fixture::new(&StreamBuilder::with_header(3, 8).finish());
        fixture
            .cmd()
            .arg("check")
            .arg(&fixture.recording)
            .assert()
            .code(13);
    }

    #[test]
    fn malformed_stream() {
        let fixture = Fixture::new(&StreamBuilder::new().raw(&[9]).finish());
        fixture
            .cmd()
            .args(["-f", "json", "check"])
            .arg(&fixture.recording)
            .assert()
            .code(14)
            .stdout(predicate::str::contains("ERR_MALFORMED_STREAM"))
            .stderr(predicate::str::contains("unknown command 9 at offset 8"));
    }

    #[test]
    fn over_nested_events_are_malformed() {
        let mut builder = StreamBuilder::new();
        builder.span_event(1, 0.0, 1.0, None);
        for id in 2..=MAX_EVENT_DEPTH as u64 + 1 {
            builder.span_event(id, 0.0, 1.0, Some(id - 1));
        }
        let fixture = Fixture::new(&builder.finish());
        fixture
            .cmd()
            .arg("events")
            .arg(&fixture.recording)
            .assert()
            .code(14)
            .stderr(predicate::str::contains("nested deeper than"));
    }

    #[test]
    fn file_over_size_bound() {
        let fixture = Fixture::session();
        let config = fixture.write_config("small.toml", "max_file_size = 16\n");
        fixture
            .cmd()
            .arg("--config")
            .arg(&config)
            .arg("check")
            .arg(&fixture.recording)
            .assert()
            .code(13);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        tlm(dir.path())
            .arg("check")
            .arg(dir.path().join("absent.tlm"))
            .assert()
            .code(21);
    }

    #[test]
    fn invalid_config_from_env() {
        let fixture = Fixture::session();
        let config = fixture.write_config("bad.toml", "decimation_target = 1\n");
        fixture
            .cmd()
            .env("TLM_CONFIG", &config)
            .arg("check")
            .arg(&fixture.recording)
            .assert()
            .code(12)
            .stderr(predicate::str::contains("decimation_target"));
    }

    #[test]
    fn missing_explicit_config() {
        let fixture = Fixture::session();
        fixture
            .cmd()
            .arg("--config")
            .arg(fixture.dir.path().join("nope.toml"))
            .arg("check")
            .arg(&fixture.recording)
            .assert()
            .code(12);
    }
}
