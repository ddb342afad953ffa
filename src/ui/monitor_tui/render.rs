use ratatui::{
    symbols,
    prelude::*,
    widgets::{
        Axis, Block, Borders, Cell, Chart, Clear, Dataset, GraphType, Paragraph, Row,
        Sparkline as SparklineWidget, Table, TableState,
    },
};

use super::app::{DashboardApp, InputMode};
use super::surface::SparklineData;
use super::widgets::{colored_gauge, palette_color, truncate_to_width};
use crate::core::system_monitor::{DonutSegment, SeriesDescriptor};

const PID_WIDTH: u16 = 8;
const PERCENT_WIDTH: u16 = 7;

/// Main render function
pub fn render_dashboard(frame: &mut Frame, app: &DashboardApp) {
    let area = frame.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(33), // CPU history
            Constraint::Percentage(33), // Memory history + donuts
            Constraint::Min(6),         // Network, disk, processes
            Constraint::Length(1),      // Footer / prompt
        ])
        .split(area);

    render_line_chart(
        frame,
        rows[0],
        " CPU History ",
        &app.panels.cpu.series(),
        app.toggles.cpu,
    );
    render_memory_row(frame, rows[1], app);
    render_bottom_row(frame, rows[2], app);
    render_footer(frame, rows[3], app);

    if app.show_help {
        render_help_overlay(frame, area, app);
    }
}

fn disabled_block(frame: &mut Frame, area: Rect, title: &str) {
    let block = Block::default()
        .title(format!("{}(disabled) ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    frame.render_widget(block, area);
}

fn render_line_chart(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    series: &[SeriesDescriptor],
    enabled: bool,
) {
    if !enabled {
        disabled_block(frame, area, title);
        return;
    }

    let points: Vec<Vec<(f64, f64)>> = series
        .iter()
        .map(|s| s.y.iter().enumerate().map(|(i, y)| (i as f64, *y)).collect())
        .collect();

    let datasets: Vec<Dataset> = series
        .iter()
        .zip(points.iter())
        .map(|(s, data)| {
            Dataset::default()
                .name(s.title.clone())
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(palette_color(&s.color).unwrap_or(Color::White)))
                .data(data)
        })
        .collect();

    let oldest = series.first().and_then(|s| s.x.first()).copied().unwrap_or(0);
    let x_max = series.first().map(|s| s.y.len().saturating_sub(1)).unwrap_or(0) as f64;

    let chart = Chart::new(datasets)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .x_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, x_max.max(1.0)])
                .labels([format!("{}s", oldest), "0s".to_string()]),
        )
        .y_axis(
            Axis::default()
                .style(Style::default().fg(Color::DarkGray))
                .bounds([0.0, 100.0])
                .labels(["0", "50", "100"]),
        );

    frame.render_widget(chart, area);
}

fn render_memory_row(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(67), Constraint::Percentage(33)])
        .split(area);

    render_line_chart(
        frame,
        columns[0],
        " Memory and Swap History ",
        &app.panels.memory.series(),
        app.toggles.memory,
    );

    let donuts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    if app.toggles.memory {
        render_donut(frame, donuts[0], " Memory ", app.panels.mem_donut.segment());
        render_donut(frame, donuts[1], " Swap ", app.panels.swap_donut.segment());
    } else {
        disabled_block(frame, donuts[0], " Memory ");
        disabled_block(frame, donuts[1], " Swap ");
    }
}

/// Donuts render as a labelled gauge.
fn render_donut(frame: &mut Frame, area: Rect, title: &str, segment: Option<DonutSegment>) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height == 0 || inner.width == 0 {
        return;
    }

    let Some(segment) = segment else {
        let waiting = Paragraph::new("waiting for data").style(Style::default().fg(Color::DarkGray));
        frame.render_widget(waiting, inner);
        return;
    };

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    let percent = format!("{:.1}%", segment.percent * 100.0);
    frame.render_widget(colored_gauge(segment.percent, &percent, &segment.color), layout[0]);
    frame.render_widget(
        Paragraph::new(segment.label.clone()).alignment(Alignment::Center),
        layout[1],
    );
}

fn render_bottom_row(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(columns[0]);

    if app.toggles.network {
        render_network(frame, left[0], &app.panels.network.data());
    } else {
        disabled_block(frame, left[0], " Network History ");
    }

    if app.toggles.disk {
        render_donut(frame, left[1], " Disk usage ", app.panels.disk.segment());
    } else {
        disabled_block(frame, left[1], " Disk usage ");
    }

    if app.toggles.process {
        render_processes(frame, columns[1], app);
    } else {
        disabled_block(frame, columns[1], " Processes ");
    }
}

fn render_network(frame: &mut Frame, area: Rect, data: &SparklineData) {
    let block = Block::default().title(" Network History ").borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 || data.series.is_empty() {
        return;
    }

    let halves = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(inner);

    let colors = [Color::Yellow, Color::Green];
    for (i, half) in halves.iter().enumerate() {
        let (Some(label), Some(values)) = (data.labels.get(i), data.series.get(i)) else {
            continue;
        };

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(2), Constraint::Min(0)])
            .split(*half);

        frame.render_widget(Paragraph::new(label.clone()), parts[0]);

        // Newest samples on the right, as many as fit
        let width = parts[1].width as usize;
        let bars: Vec<u64> = values
            .iter()
            .skip(values.len().saturating_sub(width))
            .map(|v| v.max(0.0) as u64)
            .collect();
        let sparkline = SparklineWidget::default()
            .data(bars)
            .style(Style::default().fg(colors[i % colors.len()]));
        frame.render_widget(sparkline, parts[1]);
    }
}

fn render_processes(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let view = app.panels.processes.view();

    let block = Block::default()
        .title(" Processes ")
        .borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if inner.height < 2 {
        return; // Not enough space for header + at least one row
    }

    let header = Row::new(
        view.data
            .headers
            .iter()
            .map(|h| Cell::from(h.clone()).style(Style::default().add_modifier(Modifier::BOLD))),
    )
    .height(1);

    let command_width = inner
        .width
        .saturating_sub(PID_WIDTH + 2 * PERCENT_WIDTH + 3) as usize;

    let rows: Vec<Row> = view
        .data
        .rows
        .iter()
        .map(|row| {
            Row::new(row.iter().enumerate().map(|(col, text)| {
                if col == 1 {
                    Cell::from(truncate_to_width(text, command_width))
                } else {
                    Cell::from(text.clone())
                }
            }))
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(PID_WIDTH),
            Constraint::Min(10),
            Constraint::Length(PERCENT_WIDTH),
            Constraint::Length(PERCENT_WIDTH),
        ],
    )
    .header(header)
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut state = TableState::default();
    if !view.data.rows.is_empty() {
        state.select(Some(view.selected));
    }
    frame.render_stateful_widget(table, inner, &mut state);
}

fn render_footer(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let (text, style) = match &app.mode {
        InputMode::Search(input) => (
            format!(" Search: {}_", input),
            Style::default().fg(Color::Yellow),
        ),
        InputMode::Normal => match &app.status {
            Some(status) => (format!(" {}", status), Style::default().fg(Color::Cyan)),
            None => (
                " q: Quit │ ?: Help │ /: Search │ p/c/m: Sort │ e: Export ".to_string(),
                Style::default().fg(Color::DarkGray),
            ),
        },
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_help_overlay(frame: &mut Frame, area: Rect, app: &DashboardApp) {
    let keys = &app.keys_help();
    let help_text = format!(
        r#"
    gtop - Help

    Keyboard Shortcuts:
    ─────────────────────────────────────
    {}

    Press any key to close this help
    "#,
        keys.join("\n    ")
    );

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::DarkGray));

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left);

    // Center the help popup
    let popup_area = centered_rect(60, 60, area);
    frame.render_widget(Clear, popup_area);
    frame.render_widget(paragraph, popup_area);
}

/// Helper function to create a centered rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::Config;
    use crate::core::system_monitor::{TableData, WINDOW_SIZE};
    use crate::ui::monitor_tui::surface::Panels;
    use ratatui::backend::TestBackend;

    fn draw(app: &DashboardApp) -> String {
        let backend = TestBackend::new(120, 40);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render_dashboard(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_renders_panel_contents() {
        let panels = Panels::new();
        let mut surfaces = panels.surfaces();

        surfaces.cpu_chart.set_data(&[SeriesDescriptor {
            title: "CPU1  12.0%".to_string(),
            color: "magenta".to_string(),
            x: (0..WINDOW_SIZE as u32).rev().collect(),
            y: vec![12.0; WINDOW_SIZE],
        }]);
        surfaces.disk_donut.set_data(&[DonutSegment {
            percent: 0.24,
            label: "120.00 GB of 500.00 GB".to_string(),
            color: "red".to_string(),
        }]);
        surfaces.process_table.set_data(TableData {
            headers: vec!["PID".into(), "Command".into(), "%CPU▼".into(), "%MEM".into()],
            rows: vec![vec!["42".into(), "cargo".into(), "12.0".into(), "3.0".into()]],
        });

        let app = DashboardApp::new(&Config::default(), panels);
        let screen = draw(&app);

        assert!(screen.contains("CPU History"));
        assert!(screen.contains("120.00 GB of 500.00 GB"));
        assert!(screen.contains("cargo"));
        assert!(screen.contains("%CPU▼"));
    }

    #[test]
    fn test_search_prompt_in_footer() {
        let mut app = DashboardApp::new(&Config::default(), Panels::new());
        app.mode = InputMode::Search("fire".to_string());
        assert!(draw(&app).contains("Search: fire_"));
    }

    #[test]
    fn test_disabled_monitor_is_marked() {
        let mut config = Config::default();
        config.monitors.disk = false;
        let app = DashboardApp::new(&config, Panels::new());
        assert!(draw(&app).contains("Disk usage (disabled)"));
    }
}
