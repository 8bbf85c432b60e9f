//! minerkit CLI - inspect devices and render BMiner launches

mod cli;
mod commands;
mod context;
mod error;
mod output;
mod selector;

use clap::Parser;
use cli::{Cli, Commands};
use context::CliContext;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so json output stays parseable
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let ctx = CliContext::new(&cli)?;

    match cli.command {
        Commands::Devices { save } => {
            commands::devices::run(&ctx, save.as_deref())?;
        }

        Commands::Algorithms => {
            commands::algorithms::run(&ctx)?;
        }

        Commands::Launch {
            algorithm,
            pool,
            user,
            api_port,
            extra,
            devices,
        } => {
            commands::launch::run(
                &ctx,
                commands::launch::LaunchArgs {
                    algorithm: &algorithm,
                    pool: &pool,
                    user: &user,
                    api_port,
                    extra: &extra,
                    devices: &devices,
                },
            )?;
        }

        Commands::Check { strict } => {
            commands::check::run(&ctx, strict)?;
        }
    }

    Ok(())
}
