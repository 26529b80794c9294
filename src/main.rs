use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;

use lifetrack::config::{DashboardConfig, FontConfig, Layout, Locale};
use lifetrack::{ingest, models, render, report, stats};

#[derive(Parser)]
#[command(name = "lifetrack")]
#[command(about = "Lifestyle analytics: daily sleep/study/exercise summaries", long_about = None)]
struct Cli {
    /// CSV input; built-in sample data when omitted
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Trailing window for trends and charts
    #[arg(long, global = true, default_value_t = 30)]
    window: usize,

    #[arg(long, global = true, value_enum, default_value = "en")]
    locale: Locale,

    /// Dashboard page title
    #[arg(long, global = true, default_value = "Life Tracker")]
    title: String,

    /// Narrow page layout instead of wide
    #[arg(long, global = true)]
    narrow: bool,

    /// Font file handed to the rendering surface
    #[arg(long, global = true)]
    font: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the key summary numbers
    Stats,
    /// Write a markdown report
    Report {
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Emit the full dashboard render plan as JSON
    Render {
        /// Output path; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write the built-in sample dataset as a CSV
    Sample {
        #[arg(long, default_value = "lifestyle.csv")]
        out: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    let cli = Cli::parse();

    let dashboard_config = DashboardConfig {
        title: cli.title.clone(),
        layout: if cli.narrow { Layout::Narrow } else { Layout::Wide },
        locale: cli.locale,
        font: cli
            .font
            .map(|path| FontConfig {
                path,
                ..FontConfig::default()
            })
            .unwrap_or_default(),
        window_size: cli.window.max(1),
    };

    if let Commands::Sample { out } = &cli.command {
        let file = std::fs::File::create(out)
            .with_context(|| format!("cannot create {}", out.display()))?;
        ingest::write_csv(file, &ingest::sample_records())?;
        println!("Sample data written to {}.", out.display());
        return Ok(());
    }

    let records = match ingest::load_records(cli.csv.as_deref()) {
        Ok(records) => records,
        Err(error) => {
            // every load failure maps to one readable line, no partial output
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    info!(count = records.len(), "records loaded");

    let summary = stats::compute_summary(&records, dashboard_config.window_size)?;

    match cli.command {
        Commands::Stats => {
            let labels = dashboard_config.labels();
            let h = labels.hours_suffix;
            println!(
                "{}: {} ~ {} ({})",
                labels.period_label,
                summary.first_date,
                summary.last_date,
                (labels.days_count)(summary.total_days)
            );
            for metric in models::Metric::ALL {
                let stats = summary.stats(metric);
                let trend = summary.trend(metric);
                println!(
                    "- {}: avg {:.1}{h}, total {:.0}{h}, trend {:?}",
                    labels.metric(metric),
                    stats.mean,
                    stats.sum,
                    trend.direction
                );
            }
            println!(
                "- {}: {:.0}% ({})",
                labels.card_good_ratio,
                summary.good_mood.ratio * 100.0,
                (labels.days_count)(summary.good_mood.count)
            );
        }
        Commands::Report { out } => {
            let report = report::build_report(&summary, &dashboard_config);
            std::fs::write(&out, report)
                .with_context(|| format!("cannot write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Render { out } => {
            let plan = render::build_render_plan(&records, &summary, &dashboard_config);
            let json = serde_json::to_string_pretty(&plan)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("cannot write {}", path.display()))?;
                    println!("Render plan written to {}.", path.display());
                }
                None => println!("{json}"),
            }
        }
        Commands::Sample { .. } => unreachable!("handled above"),
    }

    Ok(())
}
