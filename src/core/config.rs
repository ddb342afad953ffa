use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::system_monitor::MonitorKind;
use crate::error::{GtopError, Result};

/// Default palette, assigned round-robin to chart series.
pub const DEFAULT_COLORS: [&str; 6] = ["magenta", "cyan", "blue", "yellow", "green", "red"];

/// Resolved dashboard configuration.
///
/// Every section carries `#[serde(default)]`, so a partial user file is
/// merged over the built-in defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub update_intervals: UpdateIntervals,
    pub theme: String,
    pub colors: Vec<String>,
    pub monitors: MonitorToggles,
    pub export: ExportConfig,
    pub process_filter: String,
    pub keybindings: KeyBindings,
}

/// Poll intervals in milliseconds, per monitor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdateIntervals {
    pub cpu: u64,
    pub memory: u64,
    pub network: u64,
    pub disk: u64,
    pub process: u64,
}

impl Default for UpdateIntervals {
    fn default() -> Self {
        Self {
            cpu: 1000,
            memory: 1000,
            network: 1000,
            disk: 10000,
            process: 3000,
        }
    }
}

/// Which monitors get constructed at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorToggles {
    pub cpu: bool,
    pub memory: bool,
    pub network: bool,
    pub disk: bool,
    pub process: bool,
}

impl Default for MonitorToggles {
    fn default() -> Self {
        Self {
            cpu: true,
            memory: true,
            network: true,
            disk: true,
            process: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub enabled: bool,
    /// One of `json`, `csv`, `prometheus`. Kept as text so an unknown
    /// value can be reported at export time instead of failing the load.
    pub format: String,
    pub path: PathBuf,
    /// Milliseconds between periodic exports; 0 disables the timer.
    pub interval: u64,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            format: "json".to_string(),
            path: PathBuf::from("./metrics"),
            interval: 60000,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KeyBindings {
    pub quit: Vec<String>,
    pub sort_by_pid: String,
    pub sort_by_cpu: String,
    pub sort_by_mem: String,
    pub search: String,
    pub export: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: vec!["q".to_string(), "escape".to_string(), "C-c".to_string()],
            sort_by_pid: "p".to_string(),
            sort_by_cpu: "c".to_string(),
            sort_by_mem: "m".to_string(),
            search: "/".to_string(),
            export: "e".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            update_intervals: UpdateIntervals::default(),
            theme: "default".to_string(),
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
            monitors: MonitorToggles::default(),
            export: ExportConfig::default(),
            process_filter: String::new(),
            keybindings: KeyBindings::default(),
        }
    }
}

impl Config {
    /// Discover and load the configuration, falling back to defaults.
    ///
    /// Read or parse failures are logged once and never propagated.
    pub fn load() -> Self {
        match Self::discover() {
            Some(path) => Self::load_or_default(&path),
            None => Config::default(),
        }
    }

    /// Load from an explicit path, falling back to defaults on failure.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Error loading config {}: {}; using defaults", path.display(), e);
                Config::default()
            }
        }
    }

    /// Strictly load and merge a config file over the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;

        // An empty file means "all defaults"
        if data.trim().is_empty() {
            return Ok(Config::default());
        }

        let config: Config = serde_json::from_str(&data)
            .map_err(|e| GtopError::config(format!("{}: {}", path.display(), e)))?;

        Ok(config.normalized())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_string_pretty(self)?;
        fs::write(path, data)?;

        Ok(())
    }

    /// Save to the discovered config file, or `~/.gtoprc.json` if none exists.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::discover()
            .or_else(Self::default_path)
            .ok_or_else(|| GtopError::config("Could not determine home directory"))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Pretty-printed defaults, suitable as a starting config file.
    pub fn sample() -> String {
        serde_json::to_string_pretty(&Config::default()).unwrap_or_default()
    }

    /// Locations searched for a config file, in priority order.
    pub fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(".gtoprc"));
            paths.push(cwd.join(".gtoprc.json"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".gtoprc"));
            paths.push(home.join(".gtoprc.json"));
        }

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("gtop").join("config.json"));
        }

        paths
    }

    /// First existing candidate path.
    pub fn discover() -> Option<PathBuf> {
        Self::candidate_paths().into_iter().find(|p| p.is_file())
    }

    fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".gtoprc.json"))
    }

    fn normalized(mut self) -> Self {
        self.process_filter = self.process_filter.trim().to_lowercase();
        if self.colors.is_empty() {
            self.colors = DEFAULT_COLORS.iter().map(|c| c.to_string()).collect();
        }
        self
    }

    /// Poll interval for a monitor; a zero value falls back to the default.
    pub fn interval(&self, kind: MonitorKind) -> Duration {
        let defaults = UpdateIntervals::default();
        let (value, default) = match kind {
            MonitorKind::Cpu => (self.update_intervals.cpu, defaults.cpu),
            MonitorKind::Memory => (self.update_intervals.memory, defaults.memory),
            MonitorKind::Network => (self.update_intervals.network, defaults.network),
            MonitorKind::Disk => (self.update_intervals.disk, defaults.disk),
            MonitorKind::Process => (self.update_intervals.process, defaults.process),
        };
        Duration::from_millis(if value == 0 { default } else { value })
    }

    pub fn is_enabled(&self, kind: MonitorKind) -> bool {
        match kind {
            MonitorKind::Cpu => self.monitors.cpu,
            MonitorKind::Memory => self.monitors.memory,
            MonitorKind::Network => self.monitors.network,
            MonitorKind::Disk => self.monitors.disk,
            MonitorKind::Process => self.monitors.process,
        }
    }

    /// The chart palette, never empty.
    pub fn palette(&self) -> Vec<String> {
        if self.colors.is_empty() {
            DEFAULT_COLORS.iter().map(|c| c.to_string()).collect()
        } else {
            self.colors.clone()
        }
    }
}
