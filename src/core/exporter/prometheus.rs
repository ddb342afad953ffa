use std::fmt::Write;

use super::MetricsSnapshot;

/// Append one gauge block: HELP, TYPE, then `(labels, value)` samples.
fn gauge(out: &mut String, name: &str, help: &str, samples: &[(String, f64)], ts_ms: i64) {
    let _ = writeln!(out, "# HELP {} {}", name, help);
    let _ = writeln!(out, "# TYPE {} gauge", name);
    for (labels, value) in samples {
        let _ = writeln!(out, "{}{} {} {}", name, labels, value, ts_ms);
    }
}

/// Prometheus text exposition. Every sample carries the same millisecond
/// timestamp.
pub fn render(snapshot: &MetricsSnapshot) -> String {
    let ts = snapshot.timestamp_ms;
    let mut out = String::new();

    if let Some(cpus) = &snapshot.cpu {
        let samples: Vec<(String, f64)> = cpus
            .iter()
            .enumerate()
            .map(|(i, cpu)| (format!("{{cpu=\"{}\"}}", i), cpu.load))
            .collect();
        gauge(&mut out, "cpu_usage_percent", "CPU usage percentage", &samples, ts);
    }

    if let Some(memory) = &snapshot.memory {
        gauge(
            &mut out,
            "memory_usage_percent",
            "Memory usage percentage",
            &[(String::new(), memory.usage)],
            ts,
        );
        gauge(
            &mut out,
            "swap_usage_percent",
            "Swap usage percentage",
            &[(String::new(), memory.swap)],
            ts,
        );
    }

    if let Some(network) = &snapshot.network {
        gauge(
            &mut out,
            "network_rx_bytes",
            "Network received bytes per second",
            &[(String::new(), network.rx)],
            ts,
        );
        gauge(
            &mut out,
            "network_tx_bytes",
            "Network transmitted bytes per second",
            &[(String::new(), network.tx)],
            ts,
        );
    }

    if let Some(disk) = snapshot.disk.as_ref().filter(|d| d.percent.is_finite()) {
        gauge(
            &mut out,
            "disk_usage_percent",
            "Disk usage percentage",
            &[(String::new(), disk.percent)],
            ts,
        );
    }

    out
}
