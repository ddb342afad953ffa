use std::fs;
use std::time::Duration;

use gtop::core::config::{Config, DEFAULT_COLORS};
use gtop::core::system_monitor::MonitorKind;
use tempfile::TempDir;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.interval(MonitorKind::Cpu), Duration::from_millis(1000));
    assert_eq!(config.interval(MonitorKind::Disk), Duration::from_millis(10000));
    assert!(MonitorKind::ALL.iter().all(|kind| config.is_enabled(*kind)));
    assert!(!config.export.enabled);
    assert_eq!(config.palette().len(), DEFAULT_COLORS.len());
}

#[test]
fn test_partial_file_merges_over_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".gtoprc");
    fs::write(
        &path,
        r#"{
            "updateIntervals": { "cpu": 250 },
            "monitors": { "disk": false },
            "export": { "enabled": true, "format": "csv" },
            "processFilter": "  Chrome "
        }"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config.update_intervals.cpu, 250);
    assert_eq!(config.update_intervals.memory, 1000);
    assert!(!config.is_enabled(MonitorKind::Disk));
    assert!(config.is_enabled(MonitorKind::Cpu));
    assert!(config.export.enabled);
    assert_eq!(config.export.format, "csv");
    assert_eq!(config.export.interval, 60000);
    assert_eq!(config.process_filter, "chrome");
    assert_eq!(config.keybindings.sort_by_pid, "p");
}

#[test]
fn test_invalid_file_falls_back_to_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join(".gtoprc");
    fs::write(&path, "{ not json").unwrap();

    assert!(Config::load_from(&path).is_err());
    assert_eq!(Config::load_or_default(&path), Config::default());
}

#[test]
fn test_missing_and_empty_files() {
    let temp_dir = TempDir::new().unwrap();

    let missing = temp_dir.path().join("missing.json");
    assert_eq!(Config::load_or_default(&missing), Config::default());

    let empty = temp_dir.path().join("empty.json");
    fs::write(&empty, "  \n").unwrap();
    assert_eq!(Config::load_from(&empty).unwrap(), Config::default());
}

#[test]
fn test_save_and_reload() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.json");

    let mut config = Config::default();
    config.update_intervals.process = 5000;
    config.colors = vec!["white".to_string()];
    config.save_to(&path).unwrap();

    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_sample_parses_back_to_defaults() {
    let sample = Config::sample();
    let parsed: Config = serde_json::from_str(&sample).unwrap();
    assert_eq!(parsed, Config::default());
}
