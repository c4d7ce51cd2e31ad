use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// File name looked up in the working directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "gcp-info.toml";

/// gcp-info.toml configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcpInfoConfig {
    /// How project data is fetched (defaults to the REST APIs)
    pub backend: Backend,
    /// Project used when none is given on the command line
    pub project: Option<String>,
    /// Overall deadline for API calls, in seconds
    pub timeout_secs: u64,
    /// gcloud binary used by the gcloud backend
    pub gcloud_path: String,
    /// Project label holding the preferred region
    pub region_label: String,
    /// Common instance metadata key holding the default region
    pub region_metadata_key: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Resource Manager and Compute Engine REST APIs
    #[default]
    Api,
    /// Pre-authenticated gcloud CLI
    Gcloud,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Api => f.write_str("api"),
            Self::Gcloud => f.write_str("gcloud"),
        }
    }
}

impl Default for GcpInfoConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            project: None,
            timeout_secs: default_timeout_secs(),
            gcloud_path: default_gcloud_path(),
            region_label: default_region_label(),
            region_metadata_key: default_region_metadata_key(),
        }
    }
}

impl GcpInfoConfig {
    /// Load from gcp-info.toml in the given directory, or return defaults if not found.
    pub fn load(dir: &Path) -> crate::Result<Self> {
        Self::load_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path, or return defaults if it does not exist.
    pub fn load_file(config_path: &Path) -> crate::Result<Self> {
        if !config_path.exists() {
            tracing::debug!(path = %config_path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|e| crate::Error::ConfigLoad {
                path: config_path.to_path_buf(),
                source: e,
            })?;
        let config: Self = toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
            path: PathBuf::from(config_path),
            source: e,
        })?;

        tracing::debug!(path = %config_path.display(), backend = %config.backend, "loaded config");
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_gcloud_path() -> String {
    "gcloud".to_owned()
}

fn default_region_label() -> String {
    "cloud.googleapis.com/location".to_owned()
}

fn default_region_metadata_key() -> String {
    "google-compute-default-region".to_owned()
}
