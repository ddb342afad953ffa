use std::str::FromStr;

use ratatui::{prelude::*, widgets::Gauge};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Resolve a palette entry (`"magenta"`, `"lightred"`, `"#ff8800"`).
pub fn palette_color(name: &str) -> Option<Color> {
    Color::from_str(name).ok()
}

/// Colour for a usage percentage when no palette colour applies
pub fn usage_color(percent: f64) -> Color {
    match percent {
        v if v < 50.0 => Color::Cyan,
        v if v < 75.0 => Color::LightYellow,
        v if v < 90.0 => Color::LightRed,
        _ => Color::Red,
    }
}

/// Create a gauge for a `0.0..=1.0` fraction, in the palette colour if it
/// parses, otherwise coloured by threshold.
pub fn colored_gauge<'a>(ratio: f64, label: &'a str, color: &str) -> Gauge<'a> {
    let ratio = if ratio.is_finite() {
        ratio.clamp(0.0, 1.0)
    } else {
        0.0
    };
    let color = palette_color(color).unwrap_or_else(|| usage_color(ratio * 100.0));

    Gauge::default()
        .gauge_style(Style::default().fg(color).bg(Color::Black))
        .ratio(ratio)
        .label(label)
}

/// Cut `text` to at most `max_width` terminal columns, marking the cut
/// with an ellipsis.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut width = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if width + w > max_width - 1 {
            break;
        }
        out.push(c);
        width += w;
    }
    out.push('…');
    out
}
