//! Server metrics (time series) types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Metric families exposed by the remote system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    Cpu,
    Disk,
    Network,
}

impl MetricKind {
    pub const ALL: [MetricKind; 3] = [MetricKind::Cpu, MetricKind::Disk, MetricKind::Network];

    pub fn as_str(&self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Disk => "disk",
            MetricKind::Network => "network",
        }
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cpu" => Ok(MetricKind::Cpu),
            "disk" => Ok(MetricKind::Disk),
            "network" => Ok(MetricKind::Network),
            other => Err(format!("unknown metric type '{}'", other)),
        }
    }
}

/// Parameters of a metrics request
#[derive(Debug, Clone)]
pub struct MetricsQuery {
    pub kinds: Vec<MetricKind>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Resolution in seconds
    pub step: u32,
}

impl MetricsQuery {
    /// Comma separated `type` parameter
    pub fn type_param(&self) -> String {
        self.kinds
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Metrics returned for one server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerMetrics {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub step: f64,
    #[serde(default)]
    pub time_series: BTreeMap<String, TimeSeries>,
}

impl ServerMetrics {
    /// Series whose name belongs to the given metric family
    ///
    /// Series are named like `cpu`, `disk.0.iops.read` or
    /// `network.0.bandwidth.in`.
    pub fn series_for(&self, kind: MetricKind) -> impl Iterator<Item = (&String, &TimeSeries)> {
        self.time_series
            .iter()
            .filter(move |(name, _)| name.starts_with(kind.as_str()))
    }
}

/// Samples of one series as `(unix timestamp, value)` pairs
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeSeries {
    #[serde(default)]
    pub values: Vec<(f64, String)>,
}

impl TimeSeries {
    /// Most recent sample value
    pub fn latest(&self) -> Option<f64> {
        self.values.last().and_then(|(_, v)| v.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
