use std::sync::Arc;
use std::time::Duration;

use gtop::core::config::Config;
use gtop::core::system_monitor::{MetricsSource, MonitorSet, SortKey, Surfaces};

use super::common::ScriptedProvider;

/// Let the freshly spawned poll tasks take their initial readings.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(10)).await;
}

#[tokio::test(start_paused = true)]
async fn test_all_monitors_expose_initial_readings() {
    let provider = Arc::new(ScriptedProvider::healthy());
    let set = MonitorSet::start(&Config::default(), provider, Surfaces::detached());
    settle().await;

    let cpu = set.cpu.as_ref().unwrap().lock().exposes_cpu().unwrap();
    assert_eq!(cpu.len(), 2);
    assert_eq!(cpu[0].title, "CPU1  20.0%");
    assert_eq!(cpu[1].load, 60.0);

    let memory = set.memory.as_ref().unwrap().lock().exposes_memory().unwrap();
    assert_eq!(memory.usage, 75.0);
    assert_eq!(memory.swap, 25.0);

    let network = set.network.as_ref().unwrap().lock().exposes_network().unwrap();
    assert_eq!(network.rx, 2048.0);
    assert_eq!(network.tx, 1024.0);

    let disk = set.disk.as_ref().unwrap().lock().exposes_disk().unwrap();
    assert_eq!(disk.percent, 50.0);
    assert_eq!(disk.label, "250.00 GB of 500.00 GB");

    let processes = set.process.as_ref().unwrap().lock().exposes_processes().unwrap();
    assert_eq!(processes.len(), 2);

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_disabled_monitors_are_not_constructed() {
    let mut config = Config::default();
    config.monitors.cpu = false;
    config.monitors.network = false;
    config.monitors.process = false;

    let set = MonitorSet::start(&config, Arc::new(ScriptedProvider::healthy()), Surfaces::detached());
    settle().await;

    assert!(set.cpu.is_none());
    assert!(set.network.is_none());
    assert!(set.process.is_none());
    assert_eq!(set.sources().len(), 2);

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_malformed_readings_leave_nothing_to_export() {
    let set = MonitorSet::start(&Config::default(), Arc::new(ScriptedProvider::broken()), Surfaces::detached());
    settle().await;

    assert!(set.cpu.as_ref().unwrap().lock().exposes_cpu().is_none());
    assert!(set.memory.as_ref().unwrap().lock().exposes_memory().is_none());
    assert!(set.network.as_ref().unwrap().lock().exposes_network().is_none());
    assert!(set.disk.as_ref().unwrap().lock().exposes_disk().is_none());
    assert!(set.process.as_ref().unwrap().lock().exposes_processes().is_none());

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_cpu_polling_follows_configured_interval() {
    let mut config = Config::default();
    config.update_intervals.cpu = 500;

    let provider = Arc::new(ScriptedProvider::healthy());
    let set = MonitorSet::start(&config, provider.clone(), Surfaces::detached());

    // Initial reading, then ticks at 500, 1000 and 1500ms.
    tokio::time::sleep(Duration::from_millis(1750)).await;
    assert_eq!(provider.load_calls(), 4);

    set.cleanup();
    tokio::time::sleep(Duration::from_millis(2000)).await;
    assert_eq!(provider.load_calls(), 4);
}

#[tokio::test(start_paused = true)]
async fn test_broken_cpu_reading_stops_polling() {
    let provider = Arc::new(ScriptedProvider::broken());
    let set = MonitorSet::start(&Config::default(), provider.clone(), Surfaces::detached());

    tokio::time::sleep(Duration::from_millis(5000)).await;
    assert_eq!(provider.load_calls(), 1);

    set.cleanup();
}

#[tokio::test(start_paused = true)]
async fn test_search_and_sort_reach_the_process_monitor() {
    let mut config = Config::default();
    config.process_filter = "  FIRE ".to_string();

    let set = MonitorSet::start(&config, Arc::new(ScriptedProvider::healthy()), Surfaces::detached());
    settle().await;

    let process = set.process.as_ref().unwrap();
    assert_eq!(process.lock().state().search_term(), "fire");

    process.lock().handle_sort(SortKey::Pid);
    assert!(process.lock().clear_search());
    settle().await;

    let state = process.lock().state().clone();
    assert_eq!(state.sort_key(), SortKey::Pid);
    assert_eq!(state.search_term(), "");

    set.cleanup();
}
