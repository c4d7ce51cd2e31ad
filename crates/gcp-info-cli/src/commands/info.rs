use gcp_info_cloud::{ApiClient, GcloudClient, MetadataSource, Resolver, StaticToken};
use gcp_info_core::{Backend, GcpInfoConfig, OutputRecord};
use std::path::{Path, PathBuf};

const USAGE: &str = "Usage: gcp-info [OPTIONS] [PROJECT_ID]";

/// Command-line values; `None` means "not given, use the config file".
pub struct InfoOptions {
    pub project_id: Option<String>,
    pub backend: Option<Backend>,
    pub timeout_secs: Option<u64>,
    pub config_path: Option<PathBuf>,
    pub gcloud_path: Option<String>,
    pub access_token: Option<String>,
}

/// Resolve and print the project ID, number, and region.
pub async fn info(options: InfoOptions) -> anyhow::Result<()> {
    let config = load_config(&options)?;
    tracing::debug!(backend = %config.backend, "selected backend");

    let explicit = options.project_id.as_deref();
    let configured = config.project.as_deref();

    let record = match config.backend {
        Backend::Gcloud => {
            let resolver =
                Resolver::new(GcloudClient::with_program(&config.gcloud_path)).with_config(&config);
            resolve(&resolver, explicit, configured).await?
        }
        Backend::Api => match options.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => {
                let resolver = Resolver::new(ApiClient::with_tokens(StaticToken::new(token))?)
                    .with_config(&config)
                    .with_timeout(config.timeout());
                resolve(&resolver, explicit, configured).await?
            }
            _ => {
                let resolver = Resolver::new(ApiClient::new()?)
                    .with_config(&config)
                    .with_timeout(config.timeout());
                resolve(&resolver, explicit, configured).await?
            }
        },
    };

    println!("{record}");
    Ok(())
}

async fn resolve<S: MetadataSource>(
    resolver: &Resolver<S>,
    explicit: Option<&str>,
    configured: Option<&str>,
) -> anyhow::Result<OutputRecord> {
    let Some(project) = resolver.resolve_project(explicit, configured).await else {
        anyhow::bail!("no project ID given and no default project configured\n\n{USAGE}");
    };
    Ok(resolver.resolve(&project).await)
}

/// Config file values overridden by whatever was given on the command line.
fn load_config(options: &InfoOptions) -> anyhow::Result<GcpInfoConfig> {
    let mut config = match &options.config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("config file {} does not exist", path.display());
            }
            GcpInfoConfig::load_file(path)?
        }
        None => GcpInfoConfig::load(Path::new("."))?,
    };

    if let Some(backend) = options.backend {
        config.backend = backend;
    }
    if let Some(secs) = options.timeout_secs {
        config.timeout_secs = secs;
    }
    if let Some(path) = &options.gcloud_path {
        config.gcloud_path = path.clone();
    }

    Ok(config)
}
