use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

/// A user-facing project identifier such as `my-project-123`.
///
/// Opaque apart from being non-empty; surrounding whitespace is dropped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProjectId(String);

impl ProjectId {
    /// Returns `None` for empty input and for gcloud's `(unset)` marker.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == "(unset)" {
            None
        } else {
            Some(Self(trimmed.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Project number and labels, as reported by Resource Manager.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectMetadata {
    pub number: u64,
    pub labels: BTreeMap<String, String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectResource {
    project_number: NumberRepr,
    #[serde(default)]
    labels: BTreeMap<String, String>,
}

/// Resource Manager encodes int64 fields as strings; gcloud passes that through.
#[derive(Deserialize)]
#[serde(untagged)]
enum NumberRepr {
    Int(u64),
    Text(String),
}

impl ProjectMetadata {
    /// Parse a Resource Manager v1 project resource
    /// (`GET /v1/projects/{id}` or `gcloud projects describe --format json`).
    pub fn from_resource_json(json: &str) -> crate::Result<Self> {
        let resource: ProjectResource =
            serde_json::from_str(json).map_err(|e| crate::Error::ResourceDecode {
                resource: "project",
                source: e,
            })?;

        let number = match resource.project_number {
            NumberRepr::Int(n) => n,
            NumberRepr::Text(s) => s.trim().parse().map_err(|e| {
                crate::Error::InvalidProjectNumber {
                    value: s.clone(),
                    source: e,
                }
            })?,
        };

        Ok(Self {
            number,
            labels: resource.labels,
        })
    }

    /// Non-empty value of the given label.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ComputeProject {
    #[serde(default)]
    common_instance_metadata: Option<InstanceMetadata>,
}

#[derive(Deserialize)]
struct InstanceMetadata {
    #[serde(default)]
    items: Vec<MetadataItem>,
}

#[derive(Deserialize)]
struct MetadataItem {
    key: String,
    #[serde(default)]
    value: Option<String>,
}

/// Look up a key in a Compute Engine project's common instance metadata
/// (`GET compute/v1/projects/{id}` or `gcloud compute project-info describe`).
///
/// Empty values are reported as absent.
pub fn metadata_value(json: &str, key: &str) -> crate::Result<Option<String>> {
    let project: ComputeProject =
        serde_json::from_str(json).map_err(|e| crate::Error::ResourceDecode {
            resource: "compute project",
            source: e,
        })?;

    let value = project
        .common_instance_metadata
        .into_iter()
        .flat_map(|m| m.items)
        .find(|item| item.key == key)
        .and_then(|item| item.value)
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty());

    Ok(value)
}
