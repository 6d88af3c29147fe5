use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rss_checker::app::AppContext;
use rss_checker::cli::{commands, Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => {
            let ctx = AppContext::new(commands::smtp_config(&args))?;
            commands::check(&ctx, args).await?;
        }
        Commands::Daemon { config } => {
            commands::daemon(config.as_deref()).await?;
        }
    }

    Ok(())
}
