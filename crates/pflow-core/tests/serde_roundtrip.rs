use pflow_core::{BucketOrder, FlowError, LabelOrder, RunConfig, SchemaVersion};

#[test]
fn run_config_round_trip_json() {
    let config = RunConfig {
        lowest_label: true,
        fifo_buckets: false,
        display_cut: true,
    };
    let json = serde_json::to_string_pretty(&config).expect("serialize");
    let decoded: RunConfig = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, config);
}

#[test]
fn run_config_yaml_fills_defaults() {
    let decoded: RunConfig = serde_yaml::from_str("fifo_buckets: true\n").expect("yaml");
    assert!(decoded.fifo_buckets);
    assert!(!decoded.lowest_label);
    assert!(!decoded.display_cut);
    assert_eq!(decoded.label_order(), LabelOrder::Highest);
    assert_eq!(decoded.bucket_order(), BucketOrder::Fifo);
}

#[test]
fn policy_grid_covers_all_combinations() {
    let grid = RunConfig::policy_grid(false);
    let mut seen: Vec<(bool, bool)> = grid
        .iter()
        .map(|config| (config.lowest_label, config.fifo_buckets))
        .collect();
    seen.sort();
    seen.dedup();
    assert_eq!(seen.len(), 4);
    assert!(grid.iter().all(|config| !config.display_cut));
}

#[test]
fn schema_versions_accept_older_minor() {
    let current = SchemaVersion::new(1, 2, 0);
    assert!(current.accepts(&SchemaVersion::new(1, 1, 5)));
    assert!(!current.accepts(&SchemaVersion::new(2, 0, 0)));
    assert_eq!(current.to_string(), "1.2.0");
}

#[test]
fn schema_versions_parse_and_check() {
    let current: SchemaVersion = "1.2.0".parse().unwrap();
    assert_eq!(current, SchemaVersion::new(1, 2, 0));
    assert!(current.check(&SchemaVersion::new(1, 0, 3)).is_ok());

    let err = current.check(&SchemaVersion::new(1, 3, 0)).unwrap_err();
    assert!(matches!(err, FlowError::Serde(ref info) if info.code == "schema-mismatch"));
    assert_eq!(err.info().context.get("found").map(String::as_str), Some("1.3.0"));

    for bad in ["1.2", "1.2.x", "1.2.0.4", ""] {
        assert!(bad.parse::<SchemaVersion>().is_err(), "{bad:?}");
    }
}
