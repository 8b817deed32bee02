pub mod acquire;
pub mod cli;
pub mod dashboard;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod models;
pub mod render;
pub mod sources;

use anyhow::{Context, Result};
use cli::{Cli, Commands, DashboardArgs, OutputFormat, ShowArgs};
use indicatif::{ProgressBar, ProgressStyle};
use sources::HttpSource;
use std::time::Duration;

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Show(args)) => show(args).await,
        Some(Commands::Dashboard(args)) => dashboard(args).await,
        None => dashboard(DashboardArgs::default()).await,
    }
}

async fn dashboard(args: DashboardArgs) -> Result<()> {
    let path = args
        .log_path()
        .context("No log file given and no cache directory to default to")?;
    logging::init_file(&path, &args.log_level)?;
    dashboard::run_dashboard(args).await
}

/// Fetch one view once and print its cards
pub async fn show(args: ShowArgs) -> Result<()> {
    logging::init_stderr();
    let source = HttpSource::new(args.source.to_config())?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .context("Invalid spinner template")?,
    );
    spinner.set_message(format!("Fetching {} data...", args.view));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = acquire::acquire(&source, args.view).await;
    spinner.finish_and_clear();

    let acquired = match result {
        Ok(acquired) => acquired,
        Err(err) => {
            tracing::error!("Error loading {} data: {:#}", args.view, anyhow::Error::from(err));
            anyhow::bail!(args.view.error_message());
        }
    };
    let (cards, _chart) = render::build(&acquired);

    match args.format {
        OutputFormat::Table => println!("{}", formatters::format_table(&cards)),
        OutputFormat::Json => println!("{}", formatters::format_json(&cards)?),
        OutputFormat::Csv => print!("{}", formatters::format_csv(&cards)?),
        OutputFormat::Markdown => print!("{}", formatters::format_markdown(&cards)),
    }

    if args.summary {
        formatters::print_summary(&cards);
    }

    Ok(())
}
