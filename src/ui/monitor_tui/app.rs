use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::core::config::{Config, KeyBindings, MonitorToggles};
use crate::core::exporter::Exporter;
use crate::core::system_monitor::{MetricsProvider, MetricsRuntime, MonitorSet, SysinfoProvider};

use super::event_handler::{DashboardEvent, KeyMap};
use super::render::render_dashboard;
use super::surface::Panels;

/// How often the input loop wakes up to check for redraw requests.
const POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Redraw at least this often, so resizes and the clock stay current.
const FORCED_REDRAW: Duration = Duration::from_millis(1000);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Search prompt open; holds the text typed so far.
    Search(String),
}

/// Dashboard application state
pub struct DashboardApp {
    pub panels: Panels,
    pub keys: KeyMap,
    bindings: KeyBindings,
    pub mode: InputMode,
    pub toggles: MonitorToggles,
    pub show_help: bool,
    pub status: Option<String>,
    pub should_quit: bool,
}

impl DashboardApp {
    pub fn new(config: &Config, panels: Panels) -> Self {
        Self {
            panels,
            keys: KeyMap::from_bindings(&config.keybindings),
            bindings: config.keybindings.clone(),
            mode: InputMode::Normal,
            toggles: config.monitors.clone(),
            show_help: false,
            status: None,
            should_quit: false,
        }
    }

    /// One line per binding, for the help overlay.
    pub fn keys_help(&self) -> Vec<String> {
        let b = &self.bindings;
        vec![
            format!("{:<12}Quit", b.quit.join(" / ")),
            format!("{:<12}Sort processes by PID", b.sort_by_pid),
            format!("{:<12}Sort processes by CPU", b.sort_by_cpu),
            format!("{:<12}Sort processes by memory", b.sort_by_mem),
            format!("{:<12}Search processes (escape clears)", b.search),
            format!("{:<12}Export metrics now", b.export),
            format!("{:<12}Move selection", "↑↓ / k j"),
            format!("{:<12}Toggle this help screen", "? / h"),
        ]
    }

    /// Route one key press. While the search prompt is open it receives
    /// every key; polling carries on in the background meanwhile.
    pub fn handle_key(&mut self, key: KeyEvent, monitors: &MonitorSet, exporter: &Exporter) {
        if let InputMode::Search(_) = self.mode {
            self.handle_prompt_key(key, monitors);
            return;
        }

        if self.show_help {
            self.show_help = false;
            return;
        }

        let event = self.keys.resolve(&key);
        self.handle_event(event, monitors, exporter);
    }

    pub fn handle_event(&mut self, event: DashboardEvent, monitors: &MonitorSet, exporter: &Exporter) {
        match event {
            DashboardEvent::Quit => self.should_quit = true,
            DashboardEvent::Escape => {
                let cleared = monitors
                    .process
                    .as_ref()
                    .is_some_and(|process| process.lock().clear_search());
                if cleared {
                    self.status = Some("Search cleared".to_string());
                } else if self.keys.escape_quits() {
                    self.should_quit = true;
                }
            }
            DashboardEvent::Sort(key) => {
                if let Some(process) = &monitors.process {
                    process.lock().handle_sort(key);
                }
            }
            DashboardEvent::OpenSearch => {
                if monitors.process.is_some() {
                    self.mode = InputMode::Search(String::new());
                }
            }
            DashboardEvent::Export => {
                self.status = Some(match exporter.export(None) {
                    Ok(path) => format!("Exported metrics to {}", path.display()),
                    Err(e) => {
                        log::error!("Export failed: {}", e);
                        format!("Export failed: {}", e)
                    }
                });
            }
            DashboardEvent::ToggleHelp => self.show_help = !self.show_help,
            DashboardEvent::SelectUp => self.panels.processes.move_up(),
            DashboardEvent::SelectDown => self.panels.processes.move_down(),
            DashboardEvent::None => {}
        }
    }

    fn handle_prompt_key(&mut self, key: KeyEvent, monitors: &MonitorSet) {
        let InputMode::Search(input) = &mut self.mode else {
            return;
        };

        match key.code {
            KeyCode::Char(c) => input.push(c),
            KeyCode::Backspace => {
                input.pop();
            }
            KeyCode::Enter => {
                let submitted = std::mem::take(input);
                self.mode = InputMode::Normal;
                if let Some(process) = &monitors.process {
                    if process.lock().apply_search(&submitted) {
                        self.status = Some(format!("Filtering by {:?}", submitted.trim()));
                    }
                }
            }
            KeyCode::Esc => self.mode = InputMode::Normal,
            _ => {}
        }
    }
}

/// Run the dashboard until the user quits or the process is signalled.
pub fn run_dashboard(config: &Config) -> Result<()> {
    let interrupted = Arc::new(AtomicBool::new(false));
    let flag = interrupted.clone();
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        log::warn!("Could not install signal handler: {}", e);
    }

    let panels = Panels::new();
    let provider: Arc<dyn MetricsProvider> = Arc::new(SysinfoProvider::new());
    let runtime = MetricsRuntime::new(config, provider, panels.surfaces())
        .context("Failed to start metrics runtime")?;
    let mut app = DashboardApp::new(config, panels);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    let result = event_loop(&mut terminal, &mut app, &runtime, &interrupted);

    runtime.shutdown();

    // Restore terminal
    disable_raw_mode().context("Failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("Failed to leave alternate screen")?;
    terminal.show_cursor().context("Failed to show cursor")?;

    result
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut DashboardApp,
    runtime: &MetricsRuntime,
    interrupted: &AtomicBool,
) -> Result<()> {
    let mut last_draw: Option<Instant> = None;

    loop {
        let due = last_draw.map_or(true, |t| t.elapsed() >= FORCED_REDRAW);
        if app.panels.screen.take() || due {
            terminal.draw(|frame| render_dashboard(frame, app))?;
            last_draw = Some(Instant::now());
        }

        if event::poll(POLL_INTERVAL).context("Event poll failed")? {
            match event::read().context("Event read failed")? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.handle_key(key, runtime.monitors(), runtime.exporter());
                    last_draw = None;
                }
                Event::Resize(_, _) => last_draw = None,
                _ => {}
            }
        }

        if app.should_quit || interrupted.load(Ordering::SeqCst) {
            log::info!("Dashboard closing");
            return Ok(());
        }
    }
}
