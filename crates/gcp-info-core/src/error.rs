use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to load config from {path}")]
    ConfigLoad {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config at {path}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    // ── Resource decoding ──
    #[error("failed to decode {resource} resource")]
    ResourceDecode {
        resource: &'static str,
        source: serde_json::Error,
    },

    #[error("invalid project number {value:?}")]
    InvalidProjectNumber {
        value: String,
        source: std::num::ParseIntError,
    },
}
