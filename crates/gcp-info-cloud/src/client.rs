use crate::executor::{GcloudExecutor, RealExecutor};
use crate::source::{MetadataSource, SourceError};
use gcp_info_core::{ProjectId, ProjectMetadata};

/// Project metadata via the gcloud CLI, parameterized over the executor for testability.
pub struct GcloudClient<E: GcloudExecutor = RealExecutor> {
    executor: E,
}

impl GcloudClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::new(),
        }
    }

    /// Use the gcloud binary at `program` instead of the one on `PATH`.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            executor: RealExecutor::with_program(program),
        }
    }
}

impl Default for GcloudClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: GcloudExecutor> GcloudClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    /// `gcloud config get-value <property>`; unset properties come back empty
    /// or as `(unset)`.
    async fn config_value(&self, property: &str) -> Result<Option<String>, SourceError> {
        let out = self
            .executor
            .exec(&args(["config", "get-value", property]))
            .await?;
        Ok(first_value(&out).filter(|v| v != "(unset)"))
    }
}

impl<E: GcloudExecutor> MetadataSource for GcloudClient<E> {
    async fn default_project(&self) -> Result<Option<ProjectId>, SourceError> {
        let value = self.config_value("project").await?;
        Ok(value.as_deref().and_then(ProjectId::parse))
    }

    async fn project_metadata(&self, project: &ProjectId) -> Result<ProjectMetadata, SourceError> {
        let out = self
            .executor
            .exec(&args([
                "projects",
                "describe",
                project.as_str(),
                "--format",
                "json",
            ]))
            .await?;

        Ok(ProjectMetadata::from_resource_json(&out)?)
    }

    async fn running_instance_zone(
        &self,
        project: &ProjectId,
    ) -> Result<Option<String>, SourceError> {
        let out = self
            .executor
            .exec(&args([
                "compute",
                "instances",
                "list",
                "--project",
                project.as_str(),
                "--filter",
                "status=RUNNING",
                "--format",
                "value(zone)",
                "--limit",
                "1",
            ]))
            .await?;

        Ok(first_value(&out))
    }

    async fn metadata_value(
        &self,
        project: &ProjectId,
        key: &str,
    ) -> Result<Option<String>, SourceError> {
        let out = self
            .executor
            .exec(&args([
                "compute",
                "project-info",
                "describe",
                "--project",
                project.as_str(),
                "--format",
                "json",
            ]))
            .await?;

        Ok(gcp_info_core::metadata_value(&out, key)?)
    }

    async fn first_zone(&self, project: &ProjectId) -> Result<Option<String>, SourceError> {
        let out = self
            .executor
            .exec(&args([
                "compute",
                "zones",
                "list",
                "--project",
                project.as_str(),
                "--format",
                "value(name)",
                "--limit",
                "1",
            ]))
            .await?;

        Ok(first_value(&out))
    }

    async fn local_default_region(&self) -> Result<Option<String>, SourceError> {
        self.config_value("compute/region").await
    }
}

// ── Helpers ──

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}

/// First non-blank line of `value(...)` formatted output.
fn first_value(out: &str) -> Option<String> {
    out.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_owned)
}
