//! labstack core
//!
//! Declarative model for disposable AWS lab environments: the configuration
//! tree loaded from `labstack.yaml`, private address derivation, and the
//! embedded CloudFormation plan templates.
//!
//! The provisioning side (talking to the `aws` CLI, tailing stack events,
//! building the inventory) lives in the `labstack-cloud-aws` crate.

pub mod address;
pub mod error;
pub mod loader;
pub mod model;
pub mod template;

pub use error::{ConfigError, Result};
pub use loader::{CONFIG_FILE_NAME, load_config, sample_config};
pub use model::{LabConfig, Role, ServerGroup, Subnet};
pub use template::PlanRenderer;
