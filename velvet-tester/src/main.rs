mod reports;
mod scenarios;
mod simulation;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;

use scenarios::{Scenario, ScenarioResult, run_scenario};
use velvet_game::decode_to_seed;

#[derive(Debug, Parser)]
#[command(name = "velvet-tester", version)]
#[command(about = "Automated QA testing for the Velvet Trail engine - headless logic only")]
struct Args {
    /// Scenarios to run (comma-separated)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run: numbers or share codes like VT-VELVET42 (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per seed (full-game scenario only)
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Abort a simulated game after this many turns
    #[arg(long, default_value_t = 200)]
    max_turns: u32,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_scenarios {
        println!("Available scenarios:");
        for scenario in Scenario::ALL {
            println!("  {:<12} {}", scenario.name(), scenario.description());
        }
        return Ok(());
    }

    let scenarios = parse_scenarios(&args.scenarios)?;
    let seeds = parse_seeds(&args.seeds)?;
    if args.verbose {
        println!("Seeds: {seeds:?}");
    }

    let started = Instant::now();
    let mut results = Vec::new();
    for scenario in scenarios {
        if args.verbose {
            println!("{} {}", "Running".bright_blue(), scenario.name().bold());
        }
        results.push(run_scenario(scenario, &seeds, args.iterations, args.max_turns).await);
    }
    let total_duration = started.elapsed();

    emit_report(&args, &results, total_duration)?;

    let failed = results.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        bail!("{failed} scenario(s) failed");
    }
    Ok(())
}

fn parse_scenarios(input: &str) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();
    for token in split_csv(input) {
        match Scenario::from_name(&token) {
            Some(scenario) => scenarios.push(scenario),
            None => bail!(
                "unknown scenario '{token}'; available: {}",
                Scenario::ALL
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ),
        }
    }
    if scenarios.is_empty() {
        bail!("no scenarios requested");
    }
    Ok(scenarios)
}

fn parse_seeds(input: &str) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    for token in split_csv(input) {
        if let Ok(seed) = token.parse::<u64>() {
            seeds.push(seed);
        } else {
            let seed = decode_to_seed(&token)
                .with_context(|| format!("invalid seed or share code: {token}"))?;
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("no seeds requested");
    }
    Ok(seeds)
}

fn split_csv(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn emit_report(
    args: &Args,
    results: &[ScenarioResult],
    total_duration: std::time::Duration,
) -> Result<()> {
    let rendered = match args.report.as_str() {
        "json" => Some(reports::render_json_report(results)?),
        "markdown" => Some(reports::render_markdown_report(results)),
        _ => {
            reports::print_console_report(results, total_duration);
            None
        }
    };

    match (&args.output, rendered) {
        (Some(path), Some(body)) => {
            fs::write(path, body).with_context(|| format!("writing {}", path.display()))?;
        }
        (Some(path), None) => {
            // Console format has no file representation; fall back to markdown.
            fs::write(path, reports::render_markdown_report(results))
                .with_context(|| format!("writing {}", path.display()))?;
        }
        (None, Some(body)) => println!("{body}"),
        (None, None) => {}
    }
    Ok(())
}
