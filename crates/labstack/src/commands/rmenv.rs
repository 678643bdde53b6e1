//! `rmenv`: tear down a lab environment
//!
//! Teardown is tolerant: remote resources that are already gone (deleted
//! out-of-band, or never provisioned) must not keep the local directory
//! alive, so provider failures are logged and skipped.

use crate::environment::Environment;
use anyhow::Result;
use colored::Colorize;
use labstack_cloud_aws::AwsCli;
use labstack_core::LabConfig;
use std::path::Path;
use tracing::{info, warn};

pub async fn handle(config: LabConfig, environment: &Path) -> Result<()> {
    let env = Environment::new(environment)?;
    let aws = AwsCli::new(&config.region);

    match aws.delete_stack(env.name()).await {
        Ok(()) => info!("Deleted CloudFormation stack: {}", env.name()),
        Err(e) => warn!("Could not delete stack {}: {}", env.name(), e),
    }

    match aws.delete_key_pair(env.name()).await {
        Ok(()) => info!("Deleted key pair: {}", env.name()),
        Err(e) => warn!("Could not delete key pair {}: {}", env.name(), e),
    }

    env.remove_dir();
    println!("{} Removed environment {}", "✓".green(), env.name().cyan());

    Ok(())
}
