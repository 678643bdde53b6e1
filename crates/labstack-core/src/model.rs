//! Declarative configuration model
//!
//! Mirrors the shape of `labstack.yaml`: roles describe what runs on a host,
//! subnets describe where hosts live, server groups tie the two together by
//! listing the private address suffixes each role occupies.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Top-level configuration tree.
///
/// `key_pair_name` is not read from the file; it is stamped with the
/// environment name before the plan template is rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabConfig {
    /// Target AWS region (e.g. "us-east-1")
    pub region: String,

    /// CIDR block of the environment VPC
    pub vpc_cidr: String,

    /// Set to the environment name before rendering
    #[serde(default)]
    pub key_pair_name: Option<String>,

    /// Host roles indexed by name
    pub roles: HashMap<String, Role>,

    /// Subnets with their server groups
    pub subnets: Vec<Subnet>,
}

impl LabConfig {
    /// Look up a role by name.
    pub fn role(&self, name: &str) -> Option<&Role> {
        self.roles.get(name)
    }
}

/// A host role: which machine image it boots and how to log in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Role {
    /// Image name pattern, resolved to an ami_id during normalization
    #[serde(default)]
    pub ami_name: Option<String>,

    /// Concrete image id; takes precedence over ami_name
    #[serde(default)]
    pub ami_id: Option<String>,

    /// Login user for the inventory (e.g. "ec2-user")
    pub ssh_user: String,

    #[serde(default = "default_instance_type")]
    pub instance_type: String,
}

fn default_instance_type() -> String {
    "t3.micro".to_string()
}

/// A subnet and the server groups placed in it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subnet {
    /// Subnet CIDR block; the first three octets are the address prefix
    /// shared by every host in the subnet
    pub cidr: String,

    /// Availability zone letter ("a", "b", ...), appended to the region
    pub az: String,

    pub servers: Vec<ServerGroup>,
}

/// A group of hosts with the same role inside one subnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerGroup {
    /// Role name; must exist in `LabConfig::roles`
    pub role: String,

    /// Last-octet suffixes of the hosts in this group
    pub private_ip_suffixes: Vec<u16>,

    /// Full private addresses, filled in by normalization
    #[serde(default)]
    pub private_ip_addresses: Vec<String>,
}
