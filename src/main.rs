use std::path::PathBuf;

use anyhow::Context;
use chrono::{Duration, NaiveDate};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info};

use syllabus_to_plan::{dates, extract, report, workload};

#[derive(Parser)]
#[command(name = "syllabus-to-plan")]
#[command(about = "Turn extracted syllabus deadlines into a weekly workload forecast", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Markdown,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a weekly workload forecast from extraction output
    Analyze {
        /// Extraction response (JSON, optionally fenced) or CSV file; repeatable
        #[arg(long = "input", required = true)]
        inputs: Vec<PathBuf>,
        /// Course code applied to every record, replacing the extracted one
        #[arg(long)]
        course: Option<String>,
        /// Year source for MM-DD due dates (defaults to today)
        #[arg(long)]
        reference_date: Option<NaiveDate>,
        #[arg(long, value_enum, default_value = "markdown")]
        format: OutputFormat,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Resolve a single due-date token
    Normalize {
        token: String,
        #[arg(long)]
        reference_date: Option<NaiveDate>,
    },
    /// Show the Monday-to-Sunday week containing a date
    Week { date: NaiveDate },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Analyze {
            inputs,
            course,
            reference_date,
            format,
            out,
        } => {
            let reference = reference_date.unwrap_or_else(dates::today);
            debug!(%reference, sources = inputs.len(), "analyzing extraction output");

            let mut batches = Vec::with_capacity(inputs.len());
            for path in inputs.iter() {
                let records = extract::load_records(path)
                    .with_context(|| format!("failed to load {}", path.display()))?;
                let source = path.display().to_string();
                batches.push(extract::resolve_records(
                    &source,
                    &records,
                    course.as_deref(),
                    reference,
                ));
            }

            let plan = workload::build_plan(batches);
            if !plan.dropped.is_empty() {
                info!(
                    dropped = plan.dropped.len(),
                    "some extracted records were skipped"
                );
            }

            let rendered = match format {
                OutputFormat::Markdown => report::build_report(course.as_deref(), reference, &plan),
                OutputFormat::Json => {
                    report::render_json(&plan).context("failed to serialize plan")?
                }
            };

            match out {
                Some(out) => {
                    std::fs::write(&out, rendered)
                        .with_context(|| format!("failed to write {}", out.display()))?;
                    println!("Forecast written to {}.", out.display());
                }
                None => print!("{rendered}"),
            }
        }
        Commands::Normalize {
            token,
            reference_date,
        } => {
            let reference = reference_date.unwrap_or_else(dates::today);
            let resolved = dates::normalize_date(&token, reference)?;
            println!("{resolved}");
        }
        Commands::Week { date } => {
            let start = workload::get_week_start(date);
            println!("{} to {}", start, start + Duration::days(6));
        }
    }

    Ok(())
}
