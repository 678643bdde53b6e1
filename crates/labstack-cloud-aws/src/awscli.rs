//! aws CLI wrapper
//!
//! Every provider call goes through one fixed-shape invocation of the `aws`
//! command line tool with `--region` and `--output=json` appended. Non-empty
//! stdout is parsed as JSON; a non-zero exit is surfaced together with the
//! combined stdout/stderr text.

use crate::error::{AwsError, Result};
use serde::Deserialize;
use std::process::Stdio;
use tokio::process::Command;

/// aws CLI wrapper bound to one region.
pub struct AwsCli {
    region: String,
}

/// Raw result of an aws invocation, before success/failure classification.
pub(crate) struct RawOutput {
    pub success: bool,
    pub text: String,
}

impl AwsCli {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    /// Run an aws command without classifying the exit status.
    ///
    /// Callers that need to inspect a failure (the update no-op case) use
    /// this directly; everything else goes through [`AwsCli::run`].
    pub(crate) async fn run_raw(&self, args: &[&str]) -> Result<RawOutput> {
        let region_arg = format!("--region={}", self.region);

        let mut cmd = Command::new("aws");
        cmd.args(args);
        cmd.arg(&region_arg);
        cmd.arg("--output=json");
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!("Running: aws {} {} --output=json", args.join(" "), region_arg);

        let output = cmd.output().await?;

        let mut text = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(stderr.trim_end());
        }

        Ok(RawOutput {
            success: output.status.success(),
            text,
        })
    }

    /// Run an aws command; non-zero exit is fatal, non-empty stdout is JSON.
    pub(crate) async fn run(&self, args: &[&str]) -> Result<serde_json::Value> {
        let output = self.run_raw(args).await?;

        if !output.success {
            return Err(AwsError::CommandFailed {
                command: format!("aws {}", args.join(" ")),
                output: output.text,
            });
        }

        if output.text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }

        Ok(serde_json::from_str(&output.text)?)
    }

    /// Resolve an image name to a concrete image id in this region.
    ///
    /// Name patterns can match more than one image; the newest one by
    /// creation date wins so repeated runs resolve the same id.
    pub async fn resolve_image_id(&self, ami_name: &str) -> Result<String> {
        let filter = format!("Name=name,Values={ami_name}");
        let value = self
            .run(&["ec2", "describe-images", "--filters", &filter])
            .await?;

        let response: DescribeImages = serde_json::from_value(value)?;
        newest_image(&response.images)
            .map(|image| image.image_id.clone())
            .ok_or_else(|| AwsError::ImageNotFound(ami_name.to_string()))
    }

    /// Create an EC2 key pair and return its private key material.
    pub async fn create_key_pair(&self, name: &str) -> Result<String> {
        let key_name = format!("--key-name={name}");
        let value = self
            .run(&["ec2", "create-key-pair", &key_name])
            .await?;

        let response: CreatedKeyPair = serde_json::from_value(value)?;
        Ok(response.key_material)
    }

    pub async fn delete_key_pair(&self, name: &str) -> Result<()> {
        let key_name = format!("--key-name={name}");
        self.run(&["ec2", "delete-key-pair", &key_name]).await?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct DescribeImages {
    #[serde(rename = "Images", default)]
    images: Vec<Image>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Image {
    #[serde(rename = "ImageId")]
    pub image_id: String,

    #[serde(rename = "CreationDate", default)]
    pub creation_date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CreatedKeyPair {
    #[serde(rename = "KeyMaterial")]
    key_material: String,
}

/// Pick the image with the lexicographically greatest creation date; the
/// timestamps are ISO 8601 so that ordering is chronological.
pub(crate) fn newest_image(images: &[Image]) -> Option<&Image> {
    images.iter().max_by(|a, b| a.creation_date.cmp(&b.creation_date))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(id: &str, date: Option<&str>) -> Image {
        Image {
            image_id: id.to_string(),
            creation_date: date.map(|d| d.to_string()),
        }
    }

    #[test]
    fn test_newest_image_empty() {
        assert!(newest_image(&[]).is_none());
    }

    #[test]
    fn test_newest_image_picks_latest() {
        let images = vec![
            image("ami-old", Some("2023-01-01T00:00:00.000Z")),
            image("ami-new", Some("2024-06-01T00:00:00.000Z")),
            image("ami-mid", Some("2023-09-01T00:00:00.000Z")),
        ];
        assert_eq!(newest_image(&images).unwrap().image_id, "ami-new");
    }

    #[test]
    fn test_newest_image_missing_dates_rank_last() {
        let images = vec![
            image("ami-undated", None),
            image("ami-dated", Some("2023-01-01T00:00:00.000Z")),
        ];
        assert_eq!(newest_image(&images).unwrap().image_id, "ami-dated");
    }

    #[test]
    fn test_describe_images_parse() {
        let value: serde_json::Value = serde_json::from_str(
            r#"{"Images": [{"ImageId": "ami-0123", "CreationDate": "2024-01-01T00:00:00.000Z"}]}"#,
        )
        .unwrap();
        let response: DescribeImages = serde_json::from_value(value).unwrap();
        assert_eq!(response.images.len(), 1);
        assert_eq!(response.images[0].image_id, "ami-0123");
    }
}
