/// Command-line entry point for the clinic scheduling system.
///
/// Loads configuration, builds the single scheduling service and runs the
/// interactive menu on stdin/stdout.

use anyhow::{Context, Result};
use clap::Parser;
use clinicdesk::{AppConfig, ConsoleApp, DateFormat, SchedulingService};
use dotenv::dotenv;
use std::io;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "clinicdesk", version, about = "Clinic doctor/patient/appointment desk")]
struct Args {
    /// Start with empty collections instead of the demo doctors and patients
    #[arg(long)]
    no_seed: bool,

    /// Accepted appointment date layout: datetime, date or any
    #[arg(long, value_name = "FORMAT")]
    date_format: Option<DateFormat>,
}

fn main() -> Result<()> {
    dotenv().ok();

    // Logs go to stderr so they never interleave with the menu.
    tracing_subscriber::registry()
        .with(EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env().apply_overrides(args.no_seed, args.date_format);
    info!(?config, "starting clinic desk");

    let mut service = SchedulingService::with_date_format(config.date_format);
    if config.seed_demo_data {
        service
            .seed_demo_data()
            .context("failed to seed demo data")?;
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    ConsoleApp::new(&mut service, stdin.lock(), stdout.lock())
        .run()
        .context("console session failed")?;

    Ok(())
}
