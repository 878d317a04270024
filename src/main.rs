use std::{error::Error as _, path::PathBuf, process::ExitCode};

use clap::Parser;
use dues::config::{Config, Layout, Period};

#[derive(Parser, Debug)]
#[command(
    name = "dues",
    about = "Reconcile bank credits against the membership roster"
)]
struct Args {
    /// Base directory holding the `in` and `out` folders
    base_dir: PathBuf,

    /// Month to process as YYYYMM, defaults to the current month
    #[arg(long)]
    period: Option<Period>,

    /// TOML file overriding the membership fee amounts
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dues=info".into());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            let mut source = err.source();
            while let Some(cause) = source {
                tracing::error!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> dues::Result<()> {
    let config = match &args.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };
    let layout = Layout::new(args.base_dir, args.period.unwrap_or_else(Period::current));

    let summary = dues::report::run(&layout, &config.fee_schedule())?;
    tracing::info!(
        "{} paying members, {} members in total for {}.",
        summary.paying,
        summary.all_members,
        layout.period()
    );
    Ok(())
}
