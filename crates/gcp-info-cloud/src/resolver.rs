//! Project identity, metadata, and region resolution.
//!
//! Every external call is attempted once. Failures are logged and degrade the
//! affected field to `N/A` (or move region lookup to the next step); nothing
//! here aborts the run.

use crate::source::{MetadataSource, SourceError, error_chain};
use gcp_info_core::{
    GcpInfoConfig, OutputRecord, ProjectId, ProjectMetadata, RegionSource, region_from_zone,
};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Resolves an [`OutputRecord`] from any [`MetadataSource`].
pub struct Resolver<S: MetadataSource> {
    source: S,
    region_label: String,
    region_metadata_key: String,
    deadline: Option<Instant>,
}

impl<S: MetadataSource> Resolver<S> {
    pub fn new(source: S) -> Self {
        let defaults = GcpInfoConfig::default();
        Self {
            source,
            region_label: defaults.region_label,
            region_metadata_key: defaults.region_metadata_key,
            deadline: None,
        }
    }

    /// Take the label and metadata key names from the config.
    pub fn with_config(mut self, config: &GcpInfoConfig) -> Self {
        self.region_label = config.region_label.clone();
        self.region_metadata_key = config.region_metadata_key.clone();
        self
    }

    /// Bound the total time spent in external calls, starting now. A call
    /// still running at the deadline fails with [`SourceError::Timeout`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.deadline = Some(Instant::now() + timeout);
        self
    }

    async fn call<T>(
        &self,
        fut: impl Future<Output = Result<T, SourceError>>,
    ) -> Result<T, SourceError> {
        match self.deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, fut).await {
                Ok(result) => result,
                Err(elapsed) => {
                    tracing::debug!(%elapsed, "external call cut off by deadline");
                    Err(SourceError::Timeout)
                }
            },
            None => fut.await,
        }
    }

    // ── Identity ──

    /// Pick the project to report on: `explicit`, then `configured`, then the
    /// source's own default. `None` only when all three come up empty.
    pub async fn resolve_project(
        &self,
        explicit: Option<&str>,
        configured: Option<&str>,
    ) -> Option<ProjectId> {
        if let Some(project) = explicit.and_then(ProjectId::parse) {
            return Some(project);
        }
        if let Some(project) = configured.and_then(ProjectId::parse) {
            tracing::info!(project = %project, "using project from config file");
            return Some(project);
        }

        match self.call(self.source.default_project()).await {
            Ok(Some(project)) => {
                tracing::info!(project = %project, "using default project");
                Some(project)
            }
            Ok(None) => {
                tracing::info!("no default project configured");
                None
            }
            Err(e) => {
                tracing::info!(error = %error_chain(&e), "could not read default project");
                None
            }
        }
    }

    // ── Metadata ──

    /// Project number and labels, or `None` after logging why not.
    pub async fn fetch_metadata(&self, project: &ProjectId) -> Option<ProjectMetadata> {
        match self.call(self.source.project_metadata(project)).await {
            Ok(metadata) => {
                tracing::debug!(project = %project, number = metadata.number, "fetched project info");
                Some(metadata)
            }
            Err(e) => {
                tracing::error!(
                    project = %project,
                    error = %error_chain(&e),
                    "error getting project info"
                );
                None
            }
        }
    }

    // ── Region ──

    /// Walk [`RegionSource::CHAIN`] and return the first region found.
    ///
    /// The label step only runs when `metadata` is available.
    pub async fn resolve_region(
        &self,
        project: &ProjectId,
        metadata: Option<&ProjectMetadata>,
    ) -> Option<(String, RegionSource)> {
        let mut steps = RegionSource::CHAIN.into_iter().peekable();
        while let Some(step) = steps.next() {
            let then = match steps.peek() {
                Some(next) => format!("trying {next}"),
                None => "no fallbacks left".to_owned(),
            };
            match self.attempt(step, project, metadata).await {
                Ok(Some(region)) => {
                    tracing::info!(project = %project, %region, source = %step, "resolved region");
                    return Some((region, step));
                }
                Ok(None) => {
                    tracing::info!(project = %project, source = %step, "no region from {step}, {then}");
                }
                // arch-lint: allow(no-error-swallowing) reason="a failed step is logged and the chain moves on; the region degrades to N/A only after every step misses"
                Err(e) => {
                    tracing::info!(
                        project = %project,
                        source = %step,
                        error = %error_chain(&e),
                        "region lookup via {step} failed, {then}"
                    );
                }
            }
        }

        tracing::warn!(project = %project, "region not found, reporting N/A");
        None
    }

    async fn attempt(
        &self,
        step: RegionSource,
        project: &ProjectId,
        metadata: Option<&ProjectMetadata>,
    ) -> Result<Option<String>, SourceError> {
        match step {
            RegionSource::Label => {
                let Some(metadata) = metadata else {
                    tracing::debug!("project info unavailable, skipping label lookup");
                    return Ok(None);
                };
                Ok(metadata.label(&self.region_label).map(str::to_owned))
            }
            RegionSource::RunningInstance => {
                let zone = self
                    .call(self.source.running_instance_zone(project))
                    .await?;
                Ok(zone.as_deref().and_then(region_of_zone))
            }
            RegionSource::ProjectMetadata => {
                let value = self
                    .call(self.source.metadata_value(project, &self.region_metadata_key))
                    .await?;
                Ok(value.filter(|v| !v.trim().is_empty()))
            }
            RegionSource::AvailableZone => {
                let zone = self.call(self.source.first_zone(project)).await?;
                Ok(zone.as_deref().and_then(region_of_zone))
            }
            RegionSource::LocalDefault => {
                let region = self.call(self.source.local_default_region()).await?;
                Ok(region.filter(|v| !v.trim().is_empty()))
            }
        }
    }

    /// Fetch everything for `project`. Always returns a complete record.
    pub async fn resolve(&self, project: &ProjectId) -> OutputRecord {
        tracing::info!(project = %project, "fetching info for project");

        let metadata = self.fetch_metadata(project).await;
        let region = self
            .resolve_region(project, metadata.as_ref())
            .await
            .map(|(region, _)| region);

        OutputRecord::new(project, metadata.map(|m| m.number), region)
    }
}

fn region_of_zone(zone: &str) -> Option<String> {
    let region = region_from_zone(zone);
    if region.is_none() {
        tracing::debug!(%zone, "zone name has no region prefix");
    }
    region
}
