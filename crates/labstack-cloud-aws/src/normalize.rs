//! Configuration normalization
//!
//! Fills in the computed fields the plan templates and the inventory builder
//! rely on: concrete image ids for roles declared by image name, and full
//! private addresses for every server group. Apart from the image lookup this
//! is a pure transformation of the configuration tree.

use crate::awscli::AwsCli;
use crate::error::Result;
use labstack_core::{ConfigError, LabConfig, address};
use tracing::info;

/// Normalize the configuration in place.
///
/// Roles that already carry an `ami_id` are left alone; roles with only an
/// `ami_name` are resolved through the provider in the target region. A role
/// with neither is rejected before any template is rendered.
pub async fn normalize(config: &mut LabConfig, aws: &AwsCli) -> Result<()> {
    for (name, role) in &mut config.roles {
        if role.ami_id.is_some() {
            continue;
        }

        let ami_name = role
            .ami_name
            .as_deref()
            .ok_or_else(|| ConfigError::MissingImage(name.clone()))?;

        let ami_id = aws.resolve_image_id(ami_name).await?;
        info!(role = %name, ami_name, ami_id, "Resolved machine image");
        role.ami_id = Some(ami_id);
    }

    address::resolve_addresses(config)?;
    Ok(())
}
