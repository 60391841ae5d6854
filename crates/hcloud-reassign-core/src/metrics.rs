//! Server metrics report
//!
//! Read-only counterpart of a reassignment: fetches the time series of the
//! source or destination server of a resource section.

use crate::error::MetricsError;
use crate::model::{Direction, OptionKind, ResourceSection, ResourceType};
use crate::validator::validate_section;
use chrono::{DateTime, Duration, Utc};
use hcloud_reassign_cloud::{CloudApi, MetricKind, MetricsQuery, TimeSeries};

/// Shortest interval the report accepts, and the span of [`Interval::Now`]
pub const MIN_INTERVAL_SECS: i64 = 1800;

pub const DEFAULT_STEP: u32 = 60;

/// Time window of a metrics request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Interval {
    /// The last [`MIN_INTERVAL_SECS`] seconds
    Now,
    Range {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

impl Interval {
    /// Build a range from two RFC 3339 timestamps
    pub fn from_bounds(start: &str, end: &str) -> Result<Self, MetricsError> {
        Ok(Interval::Range {
            start: parse_timestamp(start)?,
            end: parse_timestamp(end)?,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MetricsError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|_| MetricsError::InvalidTimestamp(value.to_string()))
}

/// Resolve the window and check that it spans at least `step` seconds and
/// at least [`MIN_INTERVAL_SECS`]
pub fn resolve_interval(
    interval: &Interval,
    step: u32,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>), MetricsError> {
    let (start, end) = match interval {
        Interval::Now => (now - Duration::seconds(MIN_INTERVAL_SECS), now),
        Interval::Range { start, end } => (*start, *end),
    };

    let seconds = (end - start).num_seconds();
    let minimum = MIN_INTERVAL_SECS.max(i64::from(step));
    if seconds < minimum {
        return Err(MetricsError::IntervalTooShort { seconds, minimum });
    }

    Ok((start, end))
}

/// What to fetch for each section
#[derive(Debug, Clone)]
pub struct MetricsRequest {
    pub kinds: Vec<MetricKind>,
    pub interval: Interval,
    pub step: u32,
    pub side: Direction,
}

impl Default for MetricsRequest {
    fn default() -> Self {
        Self {
            kinds: MetricKind::ALL.to_vec(),
            interval: Interval::Now,
            step: DEFAULT_STEP,
            side: Direction::default(),
        }
    }
}

/// Series fetched for one section
#[derive(Debug, Clone)]
pub struct SectionMetrics {
    /// Server the series belong to
    pub server: String,
    pub series: Vec<(String, TimeSeries)>,
}

/// Fetch the metrics of the server on the requested side of `section`
///
/// Returns `Ok(None)` for sections that do not enable `metrics`.
pub async fn collect_metrics(
    api: &dyn CloudApi,
    section: &ResourceSection,
    request: &MetricsRequest,
    now: DateTime<Utc>,
) -> Result<Option<SectionMetrics>, MetricsError> {
    let Some(ty) = section.section_type().and_then(ResourceType::from_type) else {
        return Ok(None);
    };
    if ty.option_kind("metrics") != Some(OptionKind::Flag) {
        return Ok(None);
    }
    validate_section(section, ty.as_str(), ty.schema())?;
    if section.flag("metrics") != Some(true) {
        return Ok(None);
    }

    let (start, end) = resolve_interval(&request.interval, request.step, now)?;

    let source = section.text("source").unwrap_or_default();
    let destination = section.text("destination").unwrap_or_default();
    let server_name = request.side.target(source, destination).trim();

    let server = api
        .find_server_by_name(server_name)
        .await?
        .ok_or_else(|| MetricsError::ServerNotFound(server_name.to_string()))?;

    let query = MetricsQuery {
        kinds: request.kinds.clone(),
        start,
        end,
        step: request.step,
    };
    tracing::debug!(
        server = %server.name,
        types = %query.type_param(),
        %start,
        %end,
        "Fetching metrics"
    );
    let metrics = api.server_metrics(server.id, &query).await?;

    let series = request
        .kinds
        .iter()
        .flat_map(|kind| metrics.series_for(*kind))
        .map(|(name, series)| (name.clone(), series.clone()))
        .collect();

    Ok(Some(SectionMetrics {
        server: server.name,
        series,
    }))
}
