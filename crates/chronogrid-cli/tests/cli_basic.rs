//! Basic CLI E2E tests.
//!
//! Tests invoke the built binary with a throwaway config file and verify
//! outputs.

mod common;

use common::{parse_json, run_cli_failure, run_cli_success, write_file};
use serde_json::Value;
use tempfile::TempDir;

const ALL_DAY_ITEMS: &str = r#"[
  {"id": "A", "start": "2025-06-02T00:00:00", "end": "2025-06-02T23:59:00", "all_day": true},
  {"id": "B", "start": "2025-06-02T00:00:00", "end": "2025-06-04T23:59:00", "all_day": true},
  {"id": "C", "start": "2025-06-03T00:00:00", "end": "2025-06-03T23:59:00", "all_day": true}
]"#;

const TIMED_ITEMS: &str = r#"[
  {"id": "planning", "start": "2025-06-02T09:00:00", "end": "2025-06-02T09:45:00"},
  {"id": "sync", "start": "2025-06-02T09:10:00", "end": "2025-06-02T09:40:00"}
]"#;

struct Fixture {
    dir: TempDir,
    config: String,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("config.toml").display().to_string();
        Self { dir, config }
    }

    fn file(&self, name: &str, content: &str) -> String {
        write_file(self.dir.path(), name, content).display().to_string()
    }

    fn run(&self, args: &[&str]) -> String {
        let mut full = vec!["--config", self.config.as_str()];
        full.extend_from_slice(args);
        run_cli_success(&full)
    }
}

#[test]
fn test_lanes_packs_multi_day_items() {
    let fx = Fixture::new();
    let input = fx.file("items.json", ALL_DAY_ITEMS);

    let out = fx.run(&["lanes", "--input", &input, "--from", "2025-06-01", "--to", "2025-06-07"]);
    let json: Value = parse_json(&out);

    assert_eq!(json["total_lanes"], 2);
    assert_eq!(json["active_lanes"], 2);
    let b = json["items"]
        .as_array()
        .unwrap()
        .iter()
        .find(|item| item["id"] == "B")
        .unwrap();
    assert_eq!(b["lane"], 0);
    assert_eq!(b["start_index"], 1);
    assert_eq!(b["span"], 3);
}

#[test]
fn test_lanes_overflow_with_small_header() {
    let fx = Fixture::new();
    let items = r#"[
      {"id": "x", "start": "2025-06-02T00:00:00", "end": "2025-06-03T23:59:00", "all_day": true},
      {"id": "y", "start": "2025-06-02T00:00:00", "end": "2025-06-03T23:59:00", "all_day": true},
      {"id": "z", "start": "2025-06-02T00:00:00", "end": "2025-06-03T23:59:00", "all_day": true}
    ]"#;
    let input = fx.file("items.json", items);

    let out = fx.run(&[
        "lanes", "--input", &input, "--from", "2025-06-01", "--to", "2025-06-07", "--height", "56",
    ]);
    let json: Value = parse_json(&out);

    assert_eq!(json["total_lanes"], 3);
    assert_eq!(json["visible_lanes"], 1);
    assert_eq!(json["overflow"].as_array().unwrap().len(), 2);
}

#[test]
fn test_day_splits_close_meetings() {
    let fx = Fixture::new();
    let input = fx.file("timed.json", TIMED_ITEMS);

    let out = fx.run(&["day", "--input", &input, "--date", "2025-06-02"]);
    let placed: Vec<Value> = parse_json(&out);

    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0]["id"], "planning");
    assert_eq!(placed[0]["width"], 0.5);
    assert_eq!(placed[1]["left"], 0.5);
    assert_eq!(placed[1]["z_index"], 11);
}

#[test]
fn test_day_rejects_reversed_item() {
    let fx = Fixture::new();
    let input = fx.file(
        "bad.json",
        r#"[{"id": "bad", "start": "2025-06-02T10:00:00", "end": "2025-06-02T09:00:00"}]"#,
    );

    let (_, stderr, _) = run_cli_failure(&[
        "--config", &fx.config, "day", "--input", &input, "--date", "2025-06-02",
    ]);
    assert!(stderr.contains("Invalid range"), "{stderr}");
}

#[test]
fn test_window_replays_scroll_steps() {
    let fx = Fixture::new();
    let out = fx.run(&[
        "window", "--anchor", "2025-01-10", "--columns", "3", "--buffer", "2", "--steps", "2,-2",
    ]);

    let lines: Vec<Value> = out.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["op"], "seed");
    assert_eq!(lines[0]["capacity"], 7);
    assert_eq!(lines[1]["op"], "shift-right");
    assert_eq!(lines[1]["delta"], 2);
    assert_eq!(lines[2]["op"], "shift-left");
    assert_eq!(lines[2]["start"], lines[0]["start"]);
}

#[test]
fn test_window_week_view_shifts_rows() {
    let fx = Fixture::new();
    let out = fx.run(&[
        "window", "--view", "week", "--anchor", "2025-01-15", "--columns", "6", "--buffer", "1",
        "--steps", "1",
    ]);

    let lines: Vec<Value> = out.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["entries"], 8);
    assert_eq!(lines[1]["op"], "shift-right");
    assert_eq!(lines[1]["start"], "2025-01-13");
}

#[test]
fn test_window_far_scroll_fails_cleanly() {
    let fx = Fixture::new();

    let (_, stderr, code) = run_cli_failure(&[
        "--config", &fx.config, "window", "--anchor", "2025-01-01", "--steps", "200000000",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("outside the supported date range"), "{stderr}");

    let (_, stderr, code) = run_cli_failure(&[
        "--config", &fx.config, "window", "--anchor", "2025-01-01", "--steps",
        "-9223372036854775808",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("overflows the base index"), "{stderr}");
}

#[test]
fn test_window_rejects_oversized_buffer() {
    let fx = Fixture::new();
    let (_, stderr, code) = run_cli_failure(&[
        "--config", &fx.config, "window", "--anchor", "2025-01-01", "--buffer", "1000000000",
    ]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Invalid value for 'window'"), "{stderr}");
}

#[test]
fn test_window_carries_side_items() {
    let fx = Fixture::new();
    let side = fx.file(
        "side.json",
        r#"[{"id": "train", "start": "2025-01-11T22:00:00", "end": "2025-01-12T01:30:00"}]"#,
    );

    let out = fx.run(&[
        "window", "--anchor", "2025-01-10", "--columns", "3", "--buffer", "2", "--side-input",
        &side, "--steps", "1,30",
    ]);
    let lines: Vec<Value> = out.lines().map(parse_json).collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["side_entries"], 2);
    assert_eq!(lines[1]["op"], "shift-right");
    assert_eq!(lines[1]["side_entries"], 2);
    assert_eq!(lines[2]["op"], "replace");
    assert_eq!(lines[2]["side_entries"], 0);
}

#[test]
fn test_day_rejects_bad_settings_and_missing_input() {
    let fx = Fixture::new();
    let input = fx.file("timed.json", TIMED_ITEMS);

    let (_, stderr, _) = run_cli_failure(&[
        "--config", &fx.config, "day", "--input", &input, "--date", "2025-06-02",
        "--cell-height", "0",
    ]);
    assert!(stderr.contains("Invalid value for 'cell_height'"), "{stderr}");

    let missing = fx.dir.path().join("missing.json").display().to_string();
    let (_, stderr, _) = run_cli_failure(&[
        "--config", &fx.config, "day", "--input", &missing, "--date", "2025-06-02",
    ]);
    assert!(stderr.contains("IO error"), "{stderr}");
}

#[test]
fn test_config_set_then_get() {
    let fx = Fixture::new();
    assert_eq!(fx.run(&["config", "get", "lanes.reuse_policy"]).trim(), "soonest-reuse");

    fx.run(&["config", "set", "lanes.reuse_policy", "most-recent-reuse"]);
    assert_eq!(
        fx.run(&["config", "get", "lanes.reuse_policy"]).trim(),
        "most-recent-reuse"
    );

    fx.run(&["config", "reset"]);
    assert_eq!(fx.run(&["config", "get", "lanes.reuse_policy"]).trim(), "soonest-reuse");
}

#[test]
fn test_config_rejects_unknown_key() {
    let fx = Fixture::new();
    run_cli_failure(&["--config", &fx.config, "config", "set", "lanes.nope", "1"]);
    run_cli_failure(&["--config", &fx.config, "config", "get", "lanes.nope"]);
}

#[test]
fn test_config_list_and_path() {
    let fx = Fixture::new();
    let listed: Value = parse_json(&fx.run(&["config", "list", "--json"]));
    assert_eq!(listed["window"]["day_buffer_count"], 14);

    assert_eq!(fx.run(&["config", "path"]).trim(), fx.config);
}

#[test]
fn test_completions_mention_binary() {
    let out = run_cli_success(&["completions", "bash"]);
    assert!(out.contains("chronogrid-cli"));
}
