use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::config::KeyBindings;
use crate::core::system_monitor::SortKey;

/// Events that can occur in the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardEvent {
    /// Quit the application
    Quit,
    /// Escape: clears an active process search, otherwise quits
    Escape,
    /// Sort the process table
    Sort(SortKey),
    /// Open the process search prompt
    OpenSearch,
    /// Export a snapshot now
    Export,
    /// Toggle help overlay
    ToggleHelp,
    /// Navigate process list up
    SelectUp,
    /// Navigate process list down
    SelectDown,
    /// No action
    None,
}

/// A single key as written in the config file: `"q"`, `"escape"`, `"C-c"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub ctrl: bool,
}

impl KeyBinding {
    pub fn parse(name: &str) -> Option<Self> {
        let (ctrl, rest) = match name.strip_prefix("C-") {
            Some(rest) => (true, rest),
            None => (false, name),
        };

        let code = match rest.to_ascii_lowercase().as_str() {
            "escape" | "esc" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "tab" => KeyCode::Tab,
            "space" => KeyCode::Char(' '),
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            _ => {
                let mut chars = rest.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeyCode::Char(c),
                    _ => return None,
                }
            }
        };

        Some(Self { code, ctrl })
    }

    pub fn matches(&self, key: &KeyEvent) -> bool {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl != self.ctrl {
            return false;
        }
        match (self.code, key.code) {
            (KeyCode::Char(a), KeyCode::Char(b)) if ctrl => a.eq_ignore_ascii_case(&b),
            (a, b) => a == b,
        }
    }
}

/// Resolved key bindings for normal (non-prompt) mode.
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    quit: Vec<KeyBinding>,
    sort_by_pid: Option<KeyBinding>,
    sort_by_cpu: Option<KeyBinding>,
    sort_by_mem: Option<KeyBinding>,
    search: Option<KeyBinding>,
    export: Option<KeyBinding>,
}

impl KeyMap {
    pub fn from_bindings(bindings: &KeyBindings) -> Self {
        let parse = |name: &str| {
            let binding = KeyBinding::parse(name);
            if binding.is_none() {
                log::warn!("Ignoring unrecognised key binding {:?}", name);
            }
            binding
        };

        Self {
            quit: bindings.quit.iter().filter_map(|k| parse(k.as_str())).collect(),
            sort_by_pid: parse(bindings.sort_by_pid.as_str()),
            sort_by_cpu: parse(bindings.sort_by_cpu.as_str()),
            sort_by_mem: parse(bindings.sort_by_mem.as_str()),
            search: parse(bindings.search.as_str()),
            export: parse(bindings.export.as_str()),
        }
    }

    pub fn resolve(&self, key: &KeyEvent) -> DashboardEvent {
        let hit = |binding: &Option<KeyBinding>| binding.is_some_and(|b| b.matches(key));

        if hit(&self.sort_by_pid) {
            return DashboardEvent::Sort(SortKey::Pid);
        }
        if hit(&self.sort_by_cpu) {
            return DashboardEvent::Sort(SortKey::Cpu);
        }
        if hit(&self.sort_by_mem) {
            return DashboardEvent::Sort(SortKey::Mem);
        }
        if hit(&self.search) {
            return DashboardEvent::OpenSearch;
        }
        if hit(&self.export) {
            return DashboardEvent::Export;
        }

        if key.code == KeyCode::Esc {
            return DashboardEvent::Escape;
        }
        if self.quit.iter().any(|b| b.matches(key)) {
            return DashboardEvent::Quit;
        }

        match key.code {
            KeyCode::Char('?') | KeyCode::Char('h') => DashboardEvent::ToggleHelp,
            KeyCode::Up | KeyCode::Char('k') => DashboardEvent::SelectUp,
            KeyCode::Down | KeyCode::Char('j') => DashboardEvent::SelectDown,
            _ => DashboardEvent::None,
        }
    }

    /// Whether Escape also quits once no search is active.
    pub fn escape_quits(&self) -> bool {
        self.quit.iter().any(|b| b.code == KeyCode::Esc && !b.ctrl)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_parse_bindings() {
        assert_eq!(
            KeyBinding::parse("escape"),
            Some(KeyBinding {
                code: KeyCode::Esc,
                ctrl: false
            })
        );
        assert_eq!(
            KeyBinding::parse("C-c"),
            Some(KeyBinding {
                code: KeyCode::Char('c'),
                ctrl: true
            })
        );
        assert_eq!(KeyBinding::parse("/").unwrap().code, KeyCode::Char('/'));
        assert_eq!(KeyBinding::parse("banana"), None);
        assert_eq!(KeyBinding::parse(""), None);
    }

    #[test]
    fn test_default_key_map() {
        let map = KeyMap::from_bindings(&KeyBindings::default());

        assert_eq!(map.resolve(&key(KeyCode::Char('p'))), DashboardEvent::Sort(SortKey::Pid));
        assert_eq!(map.resolve(&key(KeyCode::Char('c'))), DashboardEvent::Sort(SortKey::Cpu));
        assert_eq!(map.resolve(&key(KeyCode::Char('m'))), DashboardEvent::Sort(SortKey::Mem));
        assert_eq!(map.resolve(&key(KeyCode::Char('/'))), DashboardEvent::OpenSearch);
        assert_eq!(map.resolve(&key(KeyCode::Char('e'))), DashboardEvent::Export);
        assert_eq!(map.resolve(&key(KeyCode::Char('q'))), DashboardEvent::Quit);
        assert_eq!(map.resolve(&key(KeyCode::Esc)), DashboardEvent::Escape);
        assert_eq!(map.resolve(&key(KeyCode::Down)), DashboardEvent::SelectDown);
        assert_eq!(map.resolve(&key(KeyCode::Char('x'))), DashboardEvent::None);
        assert!(map.escape_quits());
    }

    #[test]
    fn test_ctrl_c_is_not_the_cpu_sort_key() {
        let map = KeyMap::from_bindings(&KeyBindings::default());
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(map.resolve(&ctrl_c), DashboardEvent::Quit);
    }
}
