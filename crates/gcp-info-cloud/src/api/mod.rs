//! Google Cloud REST API metadata source
//!
//! Talks to Resource Manager and Compute Engine directly instead of shelling
//! out to gcloud.
//!
//! - [`auth`] - access tokens from Application Default Credentials or a static token
//! - [`http`] - GET helper with status and body handling
//! - [`client`] - [`ApiClient`], the [`MetadataSource`](crate::MetadataSource) implementation

pub mod auth;
pub mod client;
pub mod http;

pub use auth::{AdcTokens, COMPUTE_SCOPES, RESOURCE_MANAGER_SCOPES, StaticToken, TokenSource};
pub use client::{ApiClient, Endpoints};
pub use http::GcpHttpClient;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(
        "failed to initialize GCP credentials; run: gcloud auth application-default login"
    )]
    Credentials { source: gcp_auth::Error },

    #[error("failed to get access token")]
    Token { source: gcp_auth::Error },

    #[error("failed to create HTTP client")]
    Client { source: reqwest::Error },

    #[error("request to {url} failed")]
    Request { url: String, source: reqwest::Error },

    #[error("{url} returned HTTP {status}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },

    #[error("failed to parse {what} response")]
    Decode {
        what: &'static str,
        source: serde_json::Error,
    },
}

impl ApiError {
    /// HTTP status for responses the API rejected.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
