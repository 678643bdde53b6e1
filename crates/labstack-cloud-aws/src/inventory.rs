//! Inventory derivation
//!
//! Once the stack is stable, every host's addresses are read back from the
//! stack's declared outputs and grouped by role into an Ansible-style
//! inventory. Built once, written once.

use crate::error::{AwsError, Result};
use crate::stack::StackDescription;
use labstack_core::LabConfig;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Role-grouped host inventory, serialized to `inventory.yaml`.
#[derive(Debug, Serialize)]
pub struct Inventory {
    pub ansible_ssh_private_key_file: String,

    #[serde(flatten)]
    pub roles: BTreeMap<String, RoleHosts>,
}

#[derive(Debug, Default, Serialize)]
pub struct RoleHosts {
    pub hosts: BTreeMap<String, Host>,
}

#[derive(Debug, Serialize)]
pub struct Host {
    pub private_ip: String,
    pub ansible_user: String,
}

impl Inventory {
    /// Write the inventory artifact. Called exactly once per successful run.
    pub fn write(&self, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml)?;
        info!("Wrote inventory to {}", path.display());
        Ok(())
    }
}

/// Assemble the inventory from the stack's outputs.
///
/// Each host is published by the plan template as an
/// `Instance{AZ}{suffix}Attributes` output whose value joins the public
/// address, private address and public DNS name with `|`. An absent output
/// key means the template and the configuration disagree, which is fatal.
pub fn build_inventory(
    config: &LabConfig,
    description: &StackDescription,
    key_file: &Path,
) -> Result<Inventory> {
    let mut roles: BTreeMap<String, RoleHosts> = BTreeMap::new();

    for subnet in &config.subnets {
        for group in &subnet.servers {
            let role = config
                .role(&group.role)
                .ok_or_else(|| AwsError::UnknownRole(group.role.clone()))?;

            for suffix in &group.private_ip_suffixes {
                let key = format!("Instance{}{}Attributes", subnet.az.to_uppercase(), suffix);
                let value = description
                    .output(&key)
                    .ok_or_else(|| AwsError::MissingOutput(key.clone()))?;

                let mut attributes = value.split('|');
                let (public_ip, private_ip) = match (attributes.next(), attributes.next()) {
                    (Some(public_ip), Some(private_ip)) => (public_ip, private_ip),
                    _ => {
                        return Err(AwsError::MalformedOutput {
                            key,
                            value: value.to_string(),
                        });
                    }
                };

                roles.entry(group.role.clone()).or_default().hosts.insert(
                    public_ip.to_string(),
                    Host {
                        private_ip: private_ip.to_string(),
                        ansible_user: role.ssh_user.clone(),
                    },
                );
            }
        }
    }

    Ok(Inventory {
        ansible_ssh_private_key_file: key_file.display().to_string(),
        roles,
    })
}
