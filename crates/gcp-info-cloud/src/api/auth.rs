//! Access tokens for the REST source.

use super::ApiError;
use gcp_auth::TokenProvider;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Scopes for Cloud Resource Manager `projects.get`.
pub const RESOURCE_MANAGER_SCOPES: &[&str] =
    &["https://www.googleapis.com/auth/cloud-platform.read-only"];

/// Scopes for the Compute Engine calls. Compute rejects
/// `cloud-platform.read-only`.
pub const COMPUTE_SCOPES: &[&str] = &["https://www.googleapis.com/auth/compute.readonly"];

/// Supplies bearer tokens and the credentials' own project.
#[allow(async_fn_in_trait)]
pub trait TokenSource: Send + Sync {
    /// A token valid for `scopes`.
    async fn access_token(&self, scopes: &[&str]) -> Result<String, ApiError>;

    /// Project associated with the credentials, if they carry one.
    async fn default_project(&self) -> Result<Option<String>, ApiError>;
}

/// Application Default Credentials via `gcp_auth`.
///
/// The provider is looked up on first use, so a machine without credentials
/// still gets a client whose calls fail individually.
#[derive(Default)]
pub struct AdcTokens {
    provider: OnceCell<Arc<dyn TokenProvider>>,
}

impl AdcTokens {
    pub fn new() -> Self {
        Self::default()
    }

    async fn provider(&self) -> Result<&Arc<dyn TokenProvider>, ApiError> {
        self.provider
            .get_or_try_init(|| async {
                tracing::debug!("initializing application default credentials");
                gcp_auth::provider()
                    .await
                    .map_err(|e| ApiError::Credentials { source: e })
            })
            .await
    }
}

impl TokenSource for AdcTokens {
    async fn access_token(&self, scopes: &[&str]) -> Result<String, ApiError> {
        let token = self
            .provider()
            .await?
            .token(scopes)
            .await
            .map_err(|e| ApiError::Token { source: e })?;
        Ok(token.as_str().to_owned())
    }

    async fn default_project(&self) -> Result<Option<String>, ApiError> {
        let project = self
            .provider()
            .await?
            .project_id()
            .await
            .map_err(|e| ApiError::Credentials { source: e })?;
        Ok(Some(project.to_string()))
    }
}

/// A pre-issued OAuth access token, e.g. from `gcloud auth print-access-token`.
#[derive(Clone)]
pub struct StaticToken {
    token: String,
}

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for StaticToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticToken").finish_non_exhaustive()
    }
}

impl TokenSource for StaticToken {
    async fn access_token(&self, _scopes: &[&str]) -> Result<String, ApiError> {
        Ok(self.token.clone())
    }

    async fn default_project(&self) -> Result<Option<String>, ApiError> {
        Ok(None)
    }
}
