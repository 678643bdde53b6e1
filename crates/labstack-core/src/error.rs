//! Core configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration file not found: {path}\nhint: run `labstack sample > {path}` for a starter configuration")]
    ConfigFileNotFound { path: String },

    #[error("failed to read {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("invalid configuration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("cidr \"{0}\" does not have the expected a.b.c.d/n format")]
    InvalidCidr(String),

    #[error("private ip suffix \"{0}\" must be a decimal number of at most three digits")]
    InvalidSuffix(String),

    #[error("role '{0}' specifies neither ami_id nor ami_name")]
    MissingImage(String),

    #[error("plan not found: {0}")]
    PlanNotFound(String),

    #[error("failed to render plan '{plan}': {message}")]
    TemplateRender { plan: String, message: String },
}

pub type Result<T> = std::result::Result<T, ConfigError>;
