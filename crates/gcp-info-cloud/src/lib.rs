pub mod api;
pub mod client;
pub mod executor;
pub mod gcloud;
pub mod resolver;
pub mod source;

pub use api::{AdcTokens, ApiClient, ApiError, Endpoints, StaticToken, TokenSource};
pub use client::GcloudClient;
pub use executor::{GcloudExecutor, RealExecutor};
pub use gcloud::GcloudError;
pub use resolver::Resolver;
pub use source::{MetadataSource, SourceError, error_chain};
