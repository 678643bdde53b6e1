//! AWS provisioning backend for labstack
//!
//! Drives CloudFormation through the `aws` command line tool: no SDK, no
//! client-side credentials handling, just the same fixed-shape invocations an
//! operator would type. The crate covers the full stack lifecycle:
//!
//! - [`normalize`]: resolve image names and private addresses in the
//!   configuration tree
//! - [`AwsCli`]: the gateway every provider call goes through
//! - stack submission and classification ([`UpdateOutcome`])
//! - [`EventTail`] / [`wait_for_stack`]: tail the stack's event stream until
//!   the operation settles
//! - [`build_inventory`]: derive the role-grouped host inventory from the
//!   stack's outputs
//!
//! # Requirements
//!
//! - the `aws` CLI must be installed and configured with credentials for the
//!   target region

pub mod awscli;
pub mod error;
pub mod events;
pub mod inventory;
pub mod normalize;
pub mod stack;

pub use awscli::AwsCli;
pub use error::{AwsError, Result};
pub use events::{EventTail, POLL_INTERVAL, wait_for_stack};
pub use inventory::{Host, Inventory, RoleHosts, build_inventory};
pub use normalize::normalize;
pub use stack::{
    STACK_RESOURCE_TYPE, StackDescription, StackEvent, StackOperation, StackOutput, UpdateOutcome,
};
