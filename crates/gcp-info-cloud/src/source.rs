use crate::api::ApiError;
use crate::gcloud::GcloudError;
use gcp_info_core::{ProjectId, ProjectMetadata};

/// Everything the resolver needs to know about a project, independent of how
/// it is fetched.
///
/// Implemented by [`GcloudClient`](crate::GcloudClient) (subprocess) and
/// [`ApiClient`](crate::ApiClient) (REST). Each call is attempted once; the
/// resolver decides how a failure degrades.
#[allow(async_fn_in_trait)]
pub trait MetadataSource: Send + Sync {
    /// Project the local client or credentials point at, if any.
    async fn default_project(&self) -> Result<Option<ProjectId>, SourceError>;

    /// Project number and labels.
    async fn project_metadata(&self, project: &ProjectId) -> Result<ProjectMetadata, SourceError>;

    /// Zone of the first running compute instance, searched across all zones.
    async fn running_instance_zone(
        &self,
        project: &ProjectId,
    ) -> Result<Option<String>, SourceError>;

    /// Value of a key in the project's common instance metadata.
    async fn metadata_value(
        &self,
        project: &ProjectId,
        key: &str,
    ) -> Result<Option<String>, SourceError>;

    /// Any zone visible to the project.
    async fn first_zone(&self, project: &ProjectId) -> Result<Option<String>, SourceError>;

    /// Region configured in the local client. Sources without local
    /// configuration return `Ok(None)`.
    async fn local_default_region(&self) -> Result<Option<String>, SourceError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error(transparent)]
    Gcloud(#[from] GcloudError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Decode(#[from] gcp_info_core::Error),

    #[error("overall deadline exceeded")]
    Timeout,
}

/// Render an error with its whole `source()` chain on one line.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut out = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let msg = cause.to_string();
        if !out.ends_with(&msg) {
            out.push_str(": ");
            out.push_str(&msg);
        }
        source = cause.source();
    }
    out
}
