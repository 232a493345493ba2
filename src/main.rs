use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use memestream::app::AppContext;
use memestream::cli::{commands, Cli, Commands};
use memestream::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;
    let ctx = AppContext::new(config)?;

    match cli.command {
        Commands::Serve { bind } => {
            commands::serve(Arc::new(ctx), bind).await?;
        }
        Commands::Feed { after } => {
            commands::print_feed(&ctx, after).await?;
        }
        Commands::Caption { template, texts } => {
            commands::caption(&ctx, &template, texts).await?;
        }
        Commands::Positions { template_id } => {
            commands::positions(&ctx, &template_id).await?;
        }
    }

    Ok(())
}
