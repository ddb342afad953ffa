use serde::{Deserialize, Serialize, Serializer};

/// Whole numbers go out as integers (`75`, not `75.0`), matching how the
/// CSV and Prometheus writers print them.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    const EXACT: f64 = 9_007_199_254_740_992.0; // 2^53

    if value.is_finite() && value.fract() == 0.0 && value.abs() < EXACT {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// Latest load of one core, as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CpuLoad {
    pub title: String,
    #[serde(serialize_with = "whole_as_integer")]
    pub load: f64,
}

/// Latest memory and swap usage, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryUsage {
    #[serde(serialize_with = "whole_as_integer")]
    pub usage: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub swap: f64,
}

/// Latest per-second network rates, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkRates {
    #[serde(serialize_with = "whole_as_integer")]
    pub rx: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub tx: f64,
}

/// Usage of the primary filesystem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiskUsage {
    /// Percent used, `0..=100`.
    #[serde(serialize_with = "whole_as_integer")]
    pub percent: f64,
    /// e.g. `"120.00 GB of 500.00 GB"`
    pub label: String,
}

/// One row of the provider's process list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub command: String,
    #[serde(serialize_with = "whole_as_integer")]
    pub cpu: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub mem: f64,
}
