//! `mkenv` / `update`: provision or update a lab environment
//!
//! Both subcommands share one flow; `update` reuses the existing directory
//! and key pair and watches only the events produced after its watermark.

use crate::environment::Environment;
use anyhow::{Result, bail};
use colored::Colorize;
use labstack_cloud_aws::{
    AwsCli, StackOperation, UpdateOutcome, build_inventory, normalize, wait_for_stack,
};
use labstack_core::{LabConfig, PlanRenderer};
use std::path::Path;
use tracing::info;

pub async fn handle(
    mut config: LabConfig,
    environment: &Path,
    plan: &str,
    provision: bool,
    update: bool,
) -> Result<()> {
    if !PlanRenderer::has_plan(plan) {
        bail!("plan not found: {plan}");
    }

    let env = Environment::new(environment)?;
    if update {
        env.ensure_exists()?;
    } else {
        env.ensure_absent()?;
    }

    let aws = AwsCli::new(&config.region);
    normalize(&mut config, &aws).await?;

    if !update {
        env.create_dir()?;
        info!("Created directory {}", env.dir().display());
    }

    // the environment name doubles as the key pair name inside the template
    config.key_pair_name = Some(env.name().to_string());

    let template_path = env.template_path();
    let mut renderer = PlanRenderer::new();
    renderer.render_to_file(plan, &config, &template_path)?;
    println!(
        "{} Generated CloudFormation template: {}",
        "✓".green(),
        template_path.display()
    );

    if !provision {
        return Ok(());
    }

    if !update {
        let material = aws.create_key_pair(env.name()).await?;
        env.write_key_material(&material)?;
        info!(
            "Created key pair {} and saved the private key to {}",
            env.name(),
            env.key_file_path().display()
        );
    }

    let description = if update {
        // capture the watermark before submitting, so events from the
        // previous operation are never mistaken for this one
        let watermark = aws.latest_event_timestamp(env.name()).await?;

        match aws.update_stack(env.name(), &template_path).await? {
            UpdateOutcome::AlreadyUpToDate => {
                info!("The stack is already up to date");
                aws.describe_stack(env.name()).await?
            }
            UpdateOutcome::Accepted => {
                info!("Waiting for stack update to complete");
                wait_for_stack(&aws, env.name(), StackOperation::Update, watermark).await?
            }
        }
    } else {
        aws.create_stack(env.name(), &template_path).await?;
        info!("Stack submitted, waiting for provisioning to complete");
        wait_for_stack(&aws, env.name(), StackOperation::Create, None).await?
    };

    let inventory = build_inventory(&config, &description, &env.key_file_path())?;
    inventory.write(&env.inventory_path())?;

    println!(
        "{} Environment {} is ready, inventory written to {}",
        "✓".green(),
        env.name().cyan(),
        env.inventory_path().display()
    );

    Ok(())
}
