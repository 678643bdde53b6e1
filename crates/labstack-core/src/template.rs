//! Plan template rendering
//!
//! Plans are CloudFormation documents with Tera placeholders, compiled into
//! the binary. A plan consumes the normalized configuration tree and produces
//! the template body submitted to the provider.

use crate::error::{ConfigError, Result};
use crate::model::LabConfig;
use std::path::Path;
use tera::{Context, Tera};
use tracing::debug;

/// Plan templates shipped with the tool, by plan name.
const PLANS: &[(&str, &str)] = &[(
    "aws_with_subnets",
    include_str!("plans/aws_with_subnets.yaml.tera"),
)];

/// Renders embedded plan templates against a configuration tree.
pub struct PlanRenderer {
    tera: Tera,
}

impl PlanRenderer {
    pub fn new() -> Self {
        Self {
            tera: Tera::default(),
        }
    }

    /// Whether a plan with this name is shipped.
    pub fn has_plan(name: &str) -> bool {
        PLANS.iter().any(|(plan, _)| *plan == name)
    }

    /// Render the named plan with the configuration as template context.
    pub fn render(&mut self, plan: &str, config: &LabConfig) -> Result<String> {
        let source = PLANS
            .iter()
            .find(|(name, _)| *name == plan)
            .map(|(_, source)| *source)
            .ok_or_else(|| ConfigError::PlanNotFound(plan.to_string()))?;

        let context =
            Context::from_serialize(config).map_err(|e| ConfigError::TemplateRender {
                plan: plan.to_string(),
                message: e.to_string(),
            })?;

        self.tera
            .render_str(source, &context)
            .map_err(|e| ConfigError::TemplateRender {
                plan: plan.to_string(),
                message: render_error_detail(&e),
            })
    }

    /// Render the named plan and write the template body to `path`.
    pub fn render_to_file(&mut self, plan: &str, config: &LabConfig, path: &Path) -> Result<()> {
        let body = self.render(plan, config)?;
        std::fs::write(path, body).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!(plan, path = %path.display(), "Rendered plan template");
        Ok(())
    }
}

impl Default for PlanRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Flatten the Tera error chain; the top-level message alone usually just
/// says "Failed to render ..." without the cause.
fn render_error_detail(e: &tera::Error) -> String {
    use std::error::Error;

    let mut details = vec![e.to_string()];
    let mut source = e.source();
    while let Some(err) = source {
        details.push(err.to_string());
        source = err.source();
    }

    details.join(": ")
}
