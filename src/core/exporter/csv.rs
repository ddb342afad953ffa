use std::fmt::Write;

use super::MetricsSnapshot;

pub const HEADER: &str = "timestamp,metric,value";

/// Long-format CSV: one `timestamp,metric,value` row per reading.
///
/// Absent categories contribute no rows at all.
pub fn render(snapshot: &MetricsSnapshot) -> String {
    let ts = &snapshot.timestamp;
    let mut out = String::new();
    let _ = writeln!(out, "{}", HEADER);

    if let Some(cpus) = &snapshot.cpu {
        for cpu in cpus {
            let _ = writeln!(out, "{},{},{}", ts, cpu.title, cpu.load);
        }
    }

    if let Some(memory) = &snapshot.memory {
        let _ = writeln!(out, "{},memory_usage,{}", ts, memory.usage);
        let _ = writeln!(out, "{},swap_usage,{}", ts, memory.swap);
    }

    if let Some(network) = &snapshot.network {
        let _ = writeln!(out, "{},network_rx,{}", ts, network.rx);
        let _ = writeln!(out, "{},network_tx,{}", ts, network.tx);
    }

    if let Some(disk) = snapshot.disk.as_ref().filter(|d| d.percent.is_finite()) {
        let _ = writeln!(out, "{},disk_usage,{}", ts, disk.percent);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::exporter::tests::sample_snapshot;

    fn rows(out: &str) -> Vec<&str> {
        out.lines().skip(1).collect()
    }

    #[test]
    fn test_cpu_and_disk_only() {
        let mut snapshot = sample_snapshot();
        snapshot.memory = None;
        snapshot.network = None;

        let out = render(&snapshot);
        assert_eq!(out.lines().next(), Some(HEADER));
        let rows = rows(&out);
        assert_eq!(rows.len(), 2 + 1);
        assert_eq!(rows[0], "2024-05-01T12:30:45.123Z,CPU1  10.0%,10");
        assert_eq!(rows[2], "2024-05-01T12:30:45.123Z,disk_usage,24");
    }

    #[test]
    fn test_full_snapshot_row_order() {
        let out = render(&sample_snapshot());
        let metrics: Vec<&str> = rows(&out)
            .iter()
            .map(|row| row.split(',').nth(1).unwrap())
            .collect();
        assert_eq!(
            metrics,
            vec![
                "CPU1  10.0%",
                "CPU2  42.5%",
                "memory_usage",
                "swap_usage",
                "network_rx",
                "network_tx",
                "disk_usage"
            ]
        );
    }

    #[test]
    fn test_empty_snapshot_is_header_only() {
        let mut snapshot = sample_snapshot();
        snapshot.cpu = None;
        snapshot.memory = None;
        snapshot.network = None;
        snapshot.disk = None;
        assert_eq!(render(&snapshot), "timestamp,metric,value\n");
    }
}
