#[derive(Debug, thiserror::Error)]
pub enum GcloudError {
    #[error("gcloud CLI not found at {program:?}; install: https://cloud.google.com/sdk/docs/install")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("gcloud command failed: {args:?}\n{stderr}")]
    CommandFailed { args: Vec<String>, stderr: String },

    #[error("I/O error while running {program:?}")]
    Io {
        program: String,
        source: std::io::Error,
    },

    #[error("gcloud output was not valid UTF-8")]
    InvalidUtf8 { source: std::string::FromUtf8Error },
}

impl GcloudError {
    /// Classify a spawn/wait failure: a missing binary is reported separately
    /// from other I/O errors.
    pub(crate) fn from_io(program: &str, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound {
                program: program.to_owned(),
                source,
            }
        } else {
            Self::Io {
                program: program.to_owned(),
                source,
            }
        }
    }
}
