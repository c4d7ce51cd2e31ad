//! Core types and configuration for gcp-info.
//!
//! This crate defines the `gcp-info.toml` schema ([`GcpInfoConfig`]), the
//! project resource model ([`ProjectId`], [`ProjectMetadata`]), zone to region
//! derivation, and the three-line [`OutputRecord`] printed by the CLI.

pub mod config;
pub mod error;
pub mod project;
pub mod record;
pub mod zone;

pub use config::{Backend, CONFIG_FILE_NAME, GcpInfoConfig};
pub use error::{Error, Result};
pub use project::{ProjectId, ProjectMetadata, metadata_value};
pub use record::{NOT_AVAILABLE, OutputRecord, RegionSource};
pub use zone::{region_from_zone, zone_name};
