//! Stack event tailing
//!
//! A stack operation settles asynchronously; the provider exposes progress as
//! an append-only event sequence, newest first. [`EventTail`] replays each
//! poll's full event list, keeps track of what it has already processed, and
//! reports when a stack-level terminal event shows up. The async loop around
//! it re-polls on a fixed interval until then.

use crate::awscli::AwsCli;
use crate::error::{AwsError, Result};
use crate::stack::{StackDescription, StackEvent, StackOperation};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::time::Duration;
use tracing::info;

/// Delay between successive event polls.
pub const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Incremental view over a stack's growing event sequence.
///
/// Each poll returns a superset of the previous poll's events, so the tail
/// de-duplicates by event id. For updates, events at or before the watermark
/// belong to an earlier operation and are never processed.
pub struct EventTail {
    environment: String,
    watermark: Option<DateTime<Utc>>,
    seen: HashSet<String>,
}

impl EventTail {
    pub fn new(environment: impl Into<String>, watermark: Option<DateTime<Utc>>) -> Self {
        Self {
            environment: environment.into(),
            watermark,
            seen: HashSet::new(),
        }
    }

    /// Process one poll's event list (newest first, as the provider returns
    /// it) and report whether a stack-level terminal event was observed.
    ///
    /// Events still in progress are recorded but not surfaced; everything
    /// else is logged with its logical resource id, or with the environment
    /// label when the event belongs to the stack itself.
    pub fn observe(&mut self, events: &[StackEvent]) -> bool {
        let mut done = false;

        for event in events.iter().rev() {
            if let Some(watermark) = self.watermark {
                if event.timestamp <= watermark {
                    continue;
                }
            }

            if !self.seen.insert(event.event_id.clone()) {
                continue;
            }

            if !event.resource_status.ends_with("IN_PROGRESS") {
                let label = if event.is_stack_level() {
                    format!("environment {}", self.environment)
                } else {
                    event.logical_resource_id.clone()
                };
                info!("Provisioning event: {} {}", label, event.resource_status);
            }

            if event.is_stack_level() && event.resource_status.contains("COMPLETE") {
                done = true;
            }
        }

        done
    }

    /// Number of distinct events processed so far.
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

/// Poll the event stream until the operation settles, then confirm the final
/// stack status and return the stack's description for inventory building.
///
/// There is no timeout: runs are human-supervised and an operation that never
/// produces a terminal event keeps polling until interrupted.
pub async fn wait_for_stack(
    aws: &AwsCli,
    name: &str,
    operation: StackOperation,
    watermark: Option<DateTime<Utc>>,
) -> Result<StackDescription> {
    let mut tail = EventTail::new(name, watermark);

    loop {
        tokio::time::sleep(POLL_INTERVAL).await;

        let events = aws.stack_events(name).await?;
        if tail.observe(&events) {
            break;
        }
    }

    let description = aws.describe_stack(name).await?;
    if !operation.is_stable(&description.stack_status) {
        return Err(AwsError::StackNotStable {
            stack: name.to_string(),
            status: description.stack_status,
        });
    }

    Ok(description)
}
