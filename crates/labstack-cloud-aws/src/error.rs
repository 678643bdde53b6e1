//! AWS provisioning error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AwsError {
    #[error("aws command failed: {command}\noutput: {output}")]
    CommandFailed { command: String, output: String },

    #[error("no image found matching name: {0}")]
    ImageNotFound(String),

    #[error("stack not found: {0}")]
    StackNotFound(String),

    #[error("stack {stack} did not stabilize: status is {status}")]
    StackNotStable { stack: String, status: String },

    #[error("expected stack output is not present: {0}")]
    MissingOutput(String),

    #[error("stack output {key} has an unexpected shape: {value}")]
    MalformedOutput { key: String, value: String },

    #[error("server group references unknown role: {0}")]
    UnknownRole(String),

    #[error(transparent)]
    Config(#[from] labstack_core::ConfigError),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, AwsError>;
