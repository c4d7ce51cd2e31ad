mod commands;

use clap::{Parser, ValueEnum};
use gcp_info_core::Backend;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "gcp-info",
    about = "Print the project ID, project number, and region of a Google Cloud project"
)]
#[command(version)]
struct Cli {
    /// Project ID (falls back to the config file, then the backend's default project)
    #[arg(env = "GOOGLE_CLOUD_PROJECT")]
    project_id: Option<String>,

    /// How to query Google Cloud
    #[arg(long, value_enum)]
    backend: Option<BackendArg>,

    /// Overall deadline for API calls, in seconds
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Config file [default: ./gcp-info.toml]
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// gcloud binary for the gcloud backend
    #[arg(long, value_name = "PATH", env = "GCP_INFO_GCLOUD")]
    gcloud_path: Option<String>,

    /// OAuth access token for the api backend instead of Application Default Credentials
    #[arg(long, env = "GOOGLE_OAUTH_ACCESS_TOKEN", hide_env_values = true)]
    access_token: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum BackendArg {
    /// Resource Manager and Compute Engine REST APIs
    Api,
    /// Pre-authenticated gcloud CLI
    Gcloud,
}

impl From<BackendArg> for Backend {
    fn from(arg: BackendArg) -> Self {
        match arg {
            BackendArg::Api => Backend::Api,
            BackendArg::Gcloud => Backend::Gcloud,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // stdout carries only the three result lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let options = commands::InfoOptions {
        project_id: cli.project_id,
        backend: cli.backend.map(Backend::from),
        timeout_secs: cli.timeout,
        config_path: cli.config,
        gcloud_path: cli.gcloud_path,
        access_token: cli.access_token,
    };
    commands::info(options).await?;

    Ok(())
}
