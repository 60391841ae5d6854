use super::build_client;
use colored::Colorize;
use hcloud_reassign_core::{
    Direction, Orchestrator, PollConfig, ReassignConfig, RunReport, StatusCode, TokioSleeper,
};

pub struct ReassignOptions<'a> {
    pub resources: &'a [String],
    pub direction: Direction,
    pub source: Option<&'a str>,
    pub destination: Option<&'a str>,
    pub poll: PollConfig,
}

pub async fn handle(mut config: ReassignConfig, options: ReassignOptions<'_>) -> anyhow::Result<i32> {
    config.override_servers(options.resources, options.source, options.destination);
    let client = build_client(&mut config)?;

    let sleeper = TokioSleeper;
    let report = Orchestrator::new(&config.sections, &client, &sleeper)
        .with_poll_config(options.poll)
        .run(options.resources, options.direction)
        .await;

    print_report(&report);
    Ok(report.exit_status().code())
}

fn print_report(report: &RunReport) {
    if report.is_empty() {
        println!("{}", "No resource sections configured".yellow());
        return;
    }

    for result in report.iter() {
        let status = result.status();
        let label = match status {
            StatusCode::Success => status.as_str().green(),
            StatusCode::Running => status.as_str().cyan(),
            StatusCode::Timeout => status.as_str().yellow(),
            StatusCode::Error => status.as_str().red(),
        };
        println!("{}: {}", result.name, label);

        if let Some(e) = result.error() {
            eprintln!("  {} {}", "✗".red(), e);
        }
    }
}
