//! CloudFormation stack operations
//!
//! Create, update and delete submissions plus the describe calls the event
//! monitor and the inventory builder read from. A submission only starts the
//! remote operation; completion is observed through the event stream.

use crate::awscli::{AwsCli, RawOutput};
use crate::error::{AwsError, Result};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::Path;

/// Resource type of the stack itself in the event stream.
pub const STACK_RESOURCE_TYPE: &str = "AWS::CloudFormation::Stack";

/// Marker the provider returns when an update would change nothing.
const NO_UPDATES_MARKER: &str = "No updates are to be performed";

/// The kind of stack operation in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackOperation {
    Create,
    Update,
}

impl StackOperation {
    /// Whether a final stack status counts as success for this operation.
    ///
    /// Creates settle on exactly `CREATE_COMPLETE`. Updates accept any
    /// status with an `UPDATE_COMPLETE` prefix, since the provider
    /// parameterizes some update-complete substates.
    pub fn is_stable(&self, status: &str) -> bool {
        match self {
            StackOperation::Create => status == "CREATE_COMPLETE",
            StackOperation::Update => status.starts_with("UPDATE_COMPLETE"),
        }
    }
}

/// Classification of an update submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The provider accepted the update; the caller tails events until done.
    Accepted,
    /// Nothing to change; the stack is already current and there is no
    /// operation to wait for.
    AlreadyUpToDate,
}

/// One record from the stack's append-only event sequence.
#[derive(Debug, Clone, Deserialize)]
pub struct StackEvent {
    #[serde(rename = "EventId")]
    pub event_id: String,

    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,

    #[serde(rename = "ResourceType")]
    pub resource_type: String,

    #[serde(rename = "LogicalResourceId")]
    pub logical_resource_id: String,

    #[serde(rename = "ResourceStatus")]
    pub resource_status: String,
}

impl StackEvent {
    /// Whether this event belongs to the stack itself rather than a nested
    /// resource.
    pub fn is_stack_level(&self) -> bool {
        self.resource_type == STACK_RESOURCE_TYPE
    }
}

#[derive(Debug, Deserialize)]
struct DescribeStackEvents {
    #[serde(rename = "StackEvents", default)]
    stack_events: Vec<StackEvent>,
}

/// Stack status and declared outputs from `describe-stacks`.
#[derive(Debug, Clone, Deserialize)]
pub struct StackDescription {
    #[serde(rename = "StackStatus")]
    pub stack_status: String,

    #[serde(rename = "Outputs", default)]
    pub outputs: Vec<StackOutput>,
}

impl StackDescription {
    /// Look up a declared output value by key.
    pub fn output(&self, key: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|output| output.key == key)
            .map(|output| output.value.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StackOutput {
    #[serde(rename = "OutputKey")]
    pub key: String,

    #[serde(rename = "OutputValue")]
    pub value: String,
}

#[derive(Debug, Deserialize)]
struct DescribeStacks {
    #[serde(rename = "Stacks", default)]
    stacks: Vec<StackDescription>,
}

impl AwsCli {
    /// Submit a create for a new stack. The caller has already ruled out a
    /// pre-existing environment; a name collision surfaces as a provider
    /// error.
    pub async fn create_stack(&self, name: &str, template_path: &Path) -> Result<()> {
        let stack_name = format!("--stack-name={name}");
        let template_body = format!("--template-body=file://{}", template_path.display());
        self.run(&["cloudformation", "create-stack", &stack_name, &template_body])
            .await?;
        Ok(())
    }

    /// Submit an update and classify the immediate response.
    pub async fn update_stack(&self, name: &str, template_path: &Path) -> Result<UpdateOutcome> {
        let stack_name = format!("--stack-name={name}");
        let template_body = format!("--template-body=file://{}", template_path.display());
        let args = ["cloudformation", "update-stack", &stack_name, &template_body];

        let raw = self.run_raw(&args).await?;
        classify_update(&format!("aws {}", args.join(" ")), &raw)
    }

    pub async fn delete_stack(&self, name: &str) -> Result<()> {
        let stack_name = format!("--stack-name={name}");
        self.run(&["cloudformation", "delete-stack", &stack_name])
            .await?;
        Ok(())
    }

    /// Fetch the stack's full event list, newest first as the provider
    /// returns it.
    pub async fn stack_events(&self, name: &str) -> Result<Vec<StackEvent>> {
        let stack_name = format!("--stack-name={name}");
        let value = self
            .run(&["cloudformation", "describe-stack-events", &stack_name])
            .await?;

        let response: DescribeStackEvents = serde_json::from_value(value)?;
        Ok(response.stack_events)
    }

    /// Timestamp of the most recent existing event, used as the watermark
    /// separating a new update from the operation that came before it.
    pub async fn latest_event_timestamp(&self, name: &str) -> Result<Option<DateTime<Utc>>> {
        let events = self.stack_events(name).await?;
        Ok(events.first().map(|event| event.timestamp))
    }

    pub async fn describe_stack(&self, name: &str) -> Result<StackDescription> {
        let stack_name = format!("--stack-name={name}");
        let value = self
            .run(&["cloudformation", "describe-stacks", &stack_name])
            .await?;

        let response: DescribeStacks = serde_json::from_value(value)?;
        response
            .stacks
            .into_iter()
            .next()
            .ok_or_else(|| AwsError::StackNotFound(name.to_string()))
    }
}

/// Classify the raw result of an update submission.
///
/// A rejection carrying the no-updates marker means the stack is already
/// current, which is not an error; any other rejection is fatal.
fn classify_update(command: &str, raw: &RawOutput) -> Result<UpdateOutcome> {
    if raw.success {
        return Ok(UpdateOutcome::Accepted);
    }

    if raw.text.contains(NO_UPDATES_MARKER) {
        return Ok(UpdateOutcome::AlreadyUpToDate);
    }

    Err(AwsError::CommandFailed {
        command: command.to_string(),
        output: raw.text.clone(),
    })
}
