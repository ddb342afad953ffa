use std::fs;
use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use gtop::core::config::{Config, ExportConfig};
use gtop::core::exporter::{ExportFormat, Exporter};
use gtop::core::system_monitor::{MonitorSet, Surfaces};
use tempfile::TempDir;

use super::common::ScriptedProvider;

fn job(dir: &TempDir) -> ExportConfig {
    ExportConfig {
        path: dir.path().join("metrics"),
        ..ExportConfig::default()
    }
}

async fn running_set(config: &Config) -> MonitorSet {
    let set = MonitorSet::start(config, Arc::new(ScriptedProvider::healthy()), Surfaces::detached());
    tokio::time::sleep(Duration::from_millis(10)).await;
    set
}

#[tokio::test(start_paused = true)]
async fn test_json_export_of_live_monitors() {
    let dir = TempDir::new().unwrap();
    let set = running_set(&Config::default()).await;
    let exporter = Exporter::new(job(&dir), set.sources());

    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let path = exporter.export_at(Some("json"), now).unwrap();
    assert_eq!(
        path.file_name().unwrap().to_str().unwrap(),
        "metrics-2024-01-02T03-04-05-000Z.json"
    );

    let value: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(value["timestamp"], "2024-01-02T03:04:05.000Z");
    assert_eq!(value["cpu"][1]["load"], 60.0);
    assert_eq!(value["memory"]["usage"], 75.0);
    assert_eq!(value["network"]["rx"], 2048.0);
    assert_eq!(value["disk"]["percent"], 50.0);
    assert_eq!(value["processes"].as_array().unwrap().len(), 2);

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_csv_export_skips_disabled_categories() {
    let dir = TempDir::new().unwrap();
    let mut config = Config::default();
    config.monitors.cpu = false;
    config.monitors.network = false;
    let set = running_set(&config).await;
    let exporter = Exporter::new(job(&dir), set.sources());

    let path = exporter.export(Some("CSV")).unwrap();
    let body = fs::read_to_string(&path).unwrap();
    let metrics: Vec<&str> = body
        .lines()
        .skip(1)
        .map(|row| row.split(',').nth(1).unwrap())
        .collect();

    assert_eq!(body.lines().next(), Some("timestamp,metric,value"));
    assert_eq!(metrics, vec!["memory_usage", "swap_usage", "disk_usage"]);
    assert!(body.contains(",memory_usage,75\n"));

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_prometheus_export_shares_one_timestamp() {
    let dir = TempDir::new().unwrap();
    let set = running_set(&Config::default()).await;
    let exporter = Exporter::new(job(&dir), set.sources());

    let now = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    let path = exporter.export_at(Some("prometheus"), now).unwrap();
    assert_eq!(path.extension().unwrap(), "prom");

    let body = fs::read_to_string(&path).unwrap();
    let ts = now.timestamp_millis().to_string();
    let samples: Vec<&str> = body.lines().filter(|l| !l.starts_with('#')).collect();
    assert!(!samples.is_empty());
    assert!(samples.iter().all(|l| l.ends_with(&ts)));
    assert!(body.contains("cpu_usage_percent{cpu=\"1\"} 60 "));

    set.cleanup();
}

#[test]
fn test_unknown_format_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(job(&dir), Vec::new());

    assert!(exporter.export(Some("xml")).is_err());
    assert!(!dir.path().join("metrics").exists());
}

#[test]
fn test_configured_format_is_the_fallback() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(
        ExportConfig {
            format: "prometheus".to_string(),
            ..job(&dir)
        },
        Vec::new(),
    );

    let path = exporter.export(None).unwrap();
    assert_eq!(path.extension().unwrap(), ExportFormat::Prometheus.extension());
}

#[test]
fn test_write_failure_is_reported() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("metrics");
    fs::write(&blocker, "not a directory").unwrap();

    let exporter = Exporter::new(job(&dir), Vec::new());
    assert!(exporter.export(Some("json")).is_err());
}

#[tokio::test(start_paused = true)]
async fn test_periodic_export_runs_until_cleanup() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(
        ExportConfig {
            enabled: true,
            interval: 1000,
            ..job(&dir)
        },
        Vec::new(),
    );

    exporter.start();
    assert!(exporter.is_running());
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(fs::read_dir(dir.path().join("metrics")).unwrap().count() >= 1);

    exporter.cleanup();
    assert!(!exporter.is_running());
}

#[tokio::test(start_paused = true)]
async fn test_disabled_export_has_no_timer() {
    let dir = TempDir::new().unwrap();
    let exporter = Exporter::new(job(&dir), Vec::new());

    exporter.start();
    assert!(!exporter.is_running());
}
