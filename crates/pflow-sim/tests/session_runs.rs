use std::fs;
use std::path::PathBuf;

use pflow_core::errors::FlowError;
use pflow_core::RunConfig;
use pflow_sim::{load_config, Header, RunReport, Session};

fn fixture() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/dimacs_maxf.txt")
}

const FLOW_LINES: [&str; 8] = [
    "a 1 2 5",
    "a 1 3 10",
    "a 2 4 5",
    "a 2 5 0",
    "a 3 4 5",
    "a 3 5 5",
    "a 4 6 10",
    "a 5 6 5",
];

#[test]
fn header_is_echoed_first_under_every_policy() {
    for config in RunConfig::policy_grid(false) {
        let mut session = Session::new(config);
        let lines = session.run_file(fixture(), "my customer header").unwrap();
        assert_eq!(lines[0], "c my customer header");
        assert_eq!(&lines[1..], &FLOW_LINES, "{config:?}");
    }
}

#[test]
fn header_can_be_omitted_or_taken_from_input() {
    let mut session = Session::new(RunConfig::default());
    let lines = session.run_file(fixture(), Header::Omit).unwrap();
    assert_eq!(lines, FLOW_LINES);

    let lines = session.run_file(fixture(), Header::FirstComment).unwrap();
    assert_eq!(lines[0], "c six node reference network");
}

#[test]
fn display_cut_lists_source_side_and_crossing_arcs() {
    for config in RunConfig::policy_grid(true) {
        let mut session = Session::new(config);
        let lines = session.run_file(fixture(), "cut").unwrap();
        assert_eq!(
            lines,
            vec![
                "c cut",
                "c Nodes in source set of min s-t cut:",
                "n 1",
                "n 3",
                "c Arcs crossing the min s-t cut:",
                "a 1 2 5",
                "a 3 4 5",
                "a 3 5 5",
            ]
        );
    }
}

#[test]
fn json_result_parses_back() {
    let mut session = Session::new(RunConfig {
        display_cut: true,
        ..RunConfig::default()
    });
    let json = session.run_json_file(fixture(), Header::FirstComment).unwrap();
    let report: RunReport = serde_json::from_str(&json).unwrap();
    assert_eq!(report.max_flow, 15);
    assert_eq!(report.num_nodes, 6);
    assert_eq!(report.num_arcs, 8);
    assert_eq!(report.network_hash.len(), 64);
    assert!(report.flows.is_none());
    assert_eq!(report.cut.as_ref().map(|cut| cut.capacity), Some(15));
    assert_eq!(report.header.as_deref(), Some("six node reference network"));

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert!(value.get("flows").is_none());
}

#[test]
fn stats_and_timers_describe_the_last_run() {
    let mut session = Session::new(RunConfig::default());
    let before: serde_json::Value = serde_json::from_str(&session.stats_json().unwrap()).unwrap();
    assert_eq!(before["pushes"], 0);

    session.run_file(fixture(), Header::Omit).unwrap();
    let stats: serde_json::Value = serde_json::from_str(&session.stats_json().unwrap()).unwrap();
    assert!(stats["pushes"].as_u64().unwrap() > 0);
    assert!(stats["arc_scans"].as_u64().unwrap() > 0);
    for key in ["mergers", "relabels", "gaps", "splits", "recovery_pushes", "recovery_relabels"] {
        assert!(stats[key].is_u64(), "counter {key}");
    }

    let timers: serde_json::Value = serde_json::from_str(&session.timer_json().unwrap()).unwrap();
    for key in ["read_data", "initialize", "min_cut", "max_flow"] {
        assert!(timers[key].as_f64().unwrap() >= 0.0, "timer {key}");
    }
}

#[test]
fn runs_do_not_share_counters() {
    let text = fs::read_to_string(fixture()).unwrap();
    let mut session = Session::new(RunConfig::default());
    session.run_str(&text, Header::Omit).unwrap();
    let first = session.last_run().unwrap().stats;
    session.run_str(&text, Header::Omit).unwrap();
    assert_eq!(session.last_run().unwrap().stats, first);
}

#[test]
fn unknown_node_fails_before_solving() {
    let text = fs::read_to_string(fixture()).unwrap().replace("a 5 6 5", "a 5 7 5");
    let mut session = Session::new(RunConfig::default());
    let err = session.run_str(&text, "never printed").unwrap_err();
    assert!(matches!(err, FlowError::UnknownNodeReference(_)));
    assert!(session.last_run().is_none());
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = Session::new(RunConfig::default());
    let err = session
        .run_file(dir.path().join("absent.txt"), Header::Omit)
        .unwrap_err();
    assert!(matches!(err, FlowError::Io(_)));
}

#[test]
fn yaml_config_fills_missing_keys_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.yaml");
    fs::write(&path, "lowest_label: true\ndisplay_cut: true\n").unwrap();
    let config = load_config(&path).unwrap();
    assert_eq!(
        config,
        RunConfig {
            lowest_label: true,
            fifo_buckets: false,
            display_cut: true,
        }
    );

    fs::write(&path, "lowest_label: [oops\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, FlowError::Serde(ref info) if info.code == "config-yaml"));
}
