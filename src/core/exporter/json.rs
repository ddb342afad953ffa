use super::MetricsSnapshot;
use crate::error::Result;

/// Pretty-printed snapshot. Categories without a live monitor are `null`.
pub fn render(snapshot: &MetricsSnapshot) -> Result<String> {
    Ok(serde_json::to_string_pretty(snapshot)?)
}
