use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::host::HostError;

/// Errors raised while extracting ranges, building or replaying a mapping.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("preset {path} has no `settings` object")]
    MissingSettings { path: PathBuf },
    #[error("parameter `{name}` has an invalid bound `{value}`")]
    InvalidBound { name: String, value: String },
    #[error("preset path {0} has no file name")]
    InvalidPresetPath(PathBuf),
    #[error(transparent)]
    Host(#[from] HostError),
}

impl MapError {
    pub(crate) fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn parse(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Parse {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    pub(crate) fn serialize(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
        Self::Serialize {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde::ser::Error as _;

    use super::*;

    #[test]
    fn write_and_read_failures_are_worded_apart() {
        let write = MapError::serialize("out/helm-pad.json", serde_json::Error::custom("boom"));
        assert!(write.to_string().starts_with("failed to serialize out/helm-pad.json"));

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let read = MapError::parse("out/helm-pad.json", source);
        assert!(read.to_string().starts_with("failed to parse out/helm-pad.json"));
    }
}
