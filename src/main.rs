use std::time::Duration;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use docket::app::AppContext;
use docket::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(cli.config.as_deref())?;

    match cli.command {
        Commands::Search {
            case_type,
            case_number,
            year,
            deadline_secs,
        } => {
            let query = commands::build_query(&case_type, &case_number, year)?;
            commands::search(&ctx, &query, deadline_secs.map(Duration::from_secs)).await?;
        }
        Commands::Probe => {
            commands::probe(&ctx).await?;
        }
        Commands::CaseTypes => {
            commands::case_types(&ctx).await?;
        }
    }

    Ok(())
}
