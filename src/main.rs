mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cpp_type_index=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Resolve {
            name,
            path,
            context,
            format,
        } => {
            cli::resolve(config, &path, &name, context.as_deref(), &format)?;
        }
        Commands::Tree { path, format } => {
            cli::print_tree(config, &path, &format)?;
        }
        Commands::Stats { path } => {
            cli::show_stats(config, &path)?;
        }
    }

    Ok(())
}
