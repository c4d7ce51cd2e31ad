//! REST implementation of [`MetadataSource`].

use super::auth::{AdcTokens, COMPUTE_SCOPES, RESOURCE_MANAGER_SCOPES, TokenSource};
use super::http::GcpHttpClient;
use super::ApiError;
use crate::source::{MetadataSource, SourceError};
use gcp_info_core::{ProjectId, ProjectMetadata};
use serde::Deserialize;
use std::collections::BTreeMap;

/// Base URLs of the APIs gcp-info calls. Overridable so tests can point at a
/// local mock server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub resource_manager: String,
    pub compute: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            resource_manager: "https://cloudresourcemanager.googleapis.com".to_owned(),
            compute: "https://compute.googleapis.com".to_owned(),
        }
    }
}

impl Endpoints {
    /// Serve every API from one base URL.
    pub fn single(base: &str) -> Self {
        let base = base.trim_end_matches('/').to_owned();
        Self {
            resource_manager: base.clone(),
            compute: base,
        }
    }

    fn project(&self, project: &ProjectId) -> String {
        format!("{}/v1/projects/{project}", self.resource_manager)
    }

    fn compute(&self, project: &ProjectId, path: &str) -> String {
        let base = format!("{}/compute/v1/projects/{project}", self.compute);
        if path.is_empty() {
            base
        } else {
            format!("{base}/{path}")
        }
    }
}

/// Project metadata via Resource Manager and Compute Engine REST APIs.
pub struct ApiClient<T: TokenSource = AdcTokens> {
    http: GcpHttpClient,
    tokens: T,
    endpoints: Endpoints,
}

impl ApiClient<AdcTokens> {
    /// Client authenticated with Application Default Credentials.
    pub fn new() -> Result<Self, ApiError> {
        Self::with_tokens(AdcTokens::new())
    }
}

impl<T: TokenSource> ApiClient<T> {
    pub fn with_tokens(tokens: T) -> Result<Self, ApiError> {
        Ok(Self {
            http: GcpHttpClient::new()?,
            tokens,
            endpoints: Endpoints::default(),
        })
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    async fn get(
        &self,
        url: &str,
        scopes: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, ApiError> {
        let token = self.tokens.access_token(scopes).await?;
        self.http.get(url, &token, query).await
    }
}

// ── Response shapes ──

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AggregatedInstances {
    #[serde(default)]
    items: BTreeMap<String, InstancesScopedList>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct InstancesScopedList {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Deserialize)]
struct Instance {
    #[serde(default)]
    zone: String,
    #[serde(default)]
    status: String,
}

#[derive(Deserialize)]
struct ZoneList {
    #[serde(default)]
    items: Vec<Zone>,
}

#[derive(Deserialize)]
struct Zone {
    name: String,
}

fn decode<'a, D: Deserialize<'a>>(what: &'static str, body: &'a str) -> Result<D, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode { what, source: e })
}

impl<T: TokenSource> MetadataSource for ApiClient<T> {
    async fn default_project(&self) -> Result<Option<ProjectId>, SourceError> {
        let project = self.tokens.default_project().await?;
        Ok(project.as_deref().and_then(ProjectId::parse))
    }

    async fn project_metadata(&self, project: &ProjectId) -> Result<ProjectMetadata, SourceError> {
        let body = self
            .get(&self.endpoints.project(project), RESOURCE_MANAGER_SCOPES, &[])
            .await?;
        Ok(ProjectMetadata::from_resource_json(&body)?)
    }

    async fn running_instance_zone(
        &self,
        project: &ProjectId,
    ) -> Result<Option<String>, SourceError> {
        let url = self.endpoints.compute(project, "aggregated/instances");
        let mut page_token: Option<String> = None;

        loop {
            let mut query = vec![("filter", "status = \"RUNNING\""), ("maxResults", "50")];
            if let Some(token) = page_token.as_deref() {
                query.push(("pageToken", token));
            }

            let body = self.get(&url, COMPUTE_SCOPES, &query).await?;
            let page: AggregatedInstances = decode("instance list", &body)?;

            let zone = page
                .items
                .into_values()
                .flat_map(|scoped| scoped.instances)
                .find(|instance| instance.status == "RUNNING" && !instance.zone.is_empty())
                .map(|instance| instance.zone);
            if zone.is_some() {
                return Ok(zone);
            }

            match page.next_page_token.filter(|t| !t.is_empty()) {
                Some(next) => page_token = Some(next),
                None => return Ok(None),
            }
        }
    }

    async fn metadata_value(
        &self,
        project: &ProjectId,
        key: &str,
    ) -> Result<Option<String>, SourceError> {
        let body = self
            .get(&self.endpoints.compute(project, ""), COMPUTE_SCOPES, &[])
            .await?;
        Ok(gcp_info_core::metadata_value(&body, key)?)
    }

    async fn first_zone(&self, project: &ProjectId) -> Result<Option<String>, SourceError> {
        let body = self
            .get(
                &self.endpoints.compute(project, "zones"),
                COMPUTE_SCOPES,
                &[("maxResults", "1")],
            )
            .await?;
        let zones: ZoneList = decode("zone list", &body)?;
        Ok(zones.items.into_iter().next().map(|z| z.name))
    }

    async fn local_default_region(&self) -> Result<Option<String>, SourceError> {
        // No client-side configuration when talking to the APIs directly.
        Ok(None)
    }
}
