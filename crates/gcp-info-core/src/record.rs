use crate::ProjectId;
use std::fmt;

/// Placeholder printed for any field that could not be resolved.
pub const NOT_AVAILABLE: &str = "N/A";

/// Where a resolved region came from, in fallback order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// Project label (`cloud.googleapis.com/location` by default).
    Label,
    /// Zone of the first running compute instance.
    RunningInstance,
    /// Common instance metadata key on the project.
    ProjectMetadata,
    /// First zone visible to the project.
    AvailableZone,
    /// Region configured in the local client (`gcloud config`).
    LocalDefault,
}

impl RegionSource {
    /// The region fallback chain, tried front to back.
    pub const CHAIN: [RegionSource; 5] = [
        RegionSource::Label,
        RegionSource::RunningInstance,
        RegionSource::ProjectMetadata,
        RegionSource::AvailableZone,
        RegionSource::LocalDefault,
    ];
}

impl fmt::Display for RegionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Label => "project location label",
            Self::RunningInstance => "running compute instance",
            Self::ProjectMetadata => "project metadata",
            Self::AvailableZone => "available zone",
            Self::LocalDefault => "local client default",
        };
        f.write_str(s)
    }
}

/// The three fields printed on stdout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRecord {
    pub project_id: String,
    pub project_number: String,
    pub region: String,
}

impl OutputRecord {
    pub fn new(project_id: &ProjectId, number: Option<u64>, region: Option<String>) -> Self {
        Self {
            project_id: project_id.to_string(),
            project_number: number.map_or_else(|| NOT_AVAILABLE.to_owned(), |n| n.to_string()),
            region: match region {
                Some(region) => region,
                None => NOT_AVAILABLE.to_owned(),
            },
        }
    }
}

impl fmt::Display for OutputRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "google_cloud_project: {}", single_line(&self.project_id))?;
        writeln!(
            f,
            "google_cloud_project_number: {}",
            single_line(&self.project_number)
        )?;
        write!(f, "google_cloud_region_name: {}", single_line(&self.region))
    }
}

/// Keep a value on one line so the output stays exactly three lines.
fn single_line(value: &str) -> String {
    let flat: String = value
        .split(['\r', '\n'])
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    if flat.trim().is_empty() {
        NOT_AVAILABLE.to_owned()
    } else {
        flat
    }
}
