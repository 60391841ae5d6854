use super::build_client;
use chrono::Utc;
use colored::Colorize;
use hcloud_reassign_cloud::MetricKind;
use hcloud_reassign_core::metrics::{
    Interval, MetricsRequest, SectionMetrics, collect_metrics, resolve_interval,
};
use hcloud_reassign_core::{Direction, ReassignConfig, ReassignError, StatusCode};

pub struct MetricsOptions<'a> {
    pub resources: &'a [String],
    pub side: Direction,
    pub kinds: Vec<MetricKind>,
    pub interval: Interval,
    pub step: u32,
}

pub async fn handle(mut config: ReassignConfig, options: MetricsOptions<'_>) -> anyhow::Result<i32> {
    let now = Utc::now();
    resolve_interval(&options.interval, options.step, now)?;

    let client = build_client(&mut config)?;
    let names = if options.resources.is_empty() {
        config.sections.names()
    } else {
        options.resources.to_vec()
    };
    let request = MetricsRequest {
        kinds: options.kinds,
        interval: options.interval,
        step: options.step,
        side: options.side,
    };

    let mut status = StatusCode::Success;
    for name in names {
        let Some(section) = config.sections.get(&name) else {
            eprintln!("{}: {}", name.red(), ReassignError::UnknownResource(name.clone()));
            status = status.worst(StatusCode::Error);
            continue;
        };

        match collect_metrics(&client, section, &request, now).await {
            Ok(Some(report)) => print_metrics(&name, &report),
            Ok(None) => println!("{}: {}", name, "metrics not enabled, skipped".dimmed()),
            Err(e) => {
                eprintln!("{}: {}", name.red(), e);
                status = status.worst(StatusCode::Error);
            }
        }
    }

    Ok(status.code())
}

fn print_metrics(name: &str, report: &SectionMetrics) {
    println!("{} ({})", name.cyan().bold(), report.server);
    if report.series.is_empty() {
        println!("  {}", "no series returned".dimmed());
    }
    for (series, values) in &report.series {
        match values.latest() {
            Some(latest) => println!(
                "{}/{}: {} ({} samples)",
                name,
                series,
                latest,
                values.len()
            ),
            None => println!("{}/{}: no data", name, series),
        }
    }
}
