mod commands;
mod environment;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "labstack")]
#[command(version)]
#[command(about = "Declarative lab environment builder for AWS", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Provision a new environment
    Mkenv {
        /// A unique name for the environment (also its directory)
        #[arg(default_value = "labstack")]
        environment: PathBuf,
        /// Plan template used to shape the environment
        #[arg(long, default_value = "aws_with_subnets")]
        plan: String,
        /// Generate the CloudFormation template but do not provision
        #[arg(long)]
        no_provision: bool,
    },
    /// Update an existing environment in place
    Update {
        /// Name of the environment to update
        #[arg(default_value = "labstack")]
        environment: PathBuf,
        /// Plan template used to shape the environment
        #[arg(long, default_value = "aws_with_subnets")]
        plan: String,
        /// Regenerate the CloudFormation template but do not touch the stack
        #[arg(long)]
        no_provision: bool,
    },
    /// Tear down an environment and remove its directory
    Rmenv {
        /// Name of the environment to remove
        #[arg(default_value = "labstack")]
        environment: PathBuf,
    },
    /// Print a starter configuration file
    Sample,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Sample needs no configuration file or logging
    if matches!(cli.command, Commands::Sample) {
        commands::sample::handle();
        return Ok(());
    }

    tracing_subscriber::fmt::init();

    let config = labstack_core::load_config(Path::new(labstack_core::CONFIG_FILE_NAME))?;

    match cli.command {
        Commands::Mkenv {
            environment,
            plan,
            no_provision,
        } => {
            commands::mkenv::handle(config, &environment, &plan, !no_provision, false).await?;
        }
        Commands::Update {
            environment,
            plan,
            no_provision,
        } => {
            commands::mkenv::handle(config, &environment, &plan, !no_provision, true).await?;
        }
        Commands::Rmenv { environment } => {
            commands::rmenv::handle(config, &environment).await?;
        }
        Commands::Sample => {
            unreachable!("Sample is handled before config loading");
        }
    }

    Ok(())
}
