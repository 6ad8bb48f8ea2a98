use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::MapError;
use crate::mapping::sibling_path;

/// How an existing mapping document is judged reusable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CachePolicy {
    /// Any existing document is reused as-is, even if the preset changed.
    #[default]
    Existence,
    /// The document is reused only when the preset, the parameter-info
    /// resource and the plugin identity hash to the recorded fingerprint.
    Fingerprint,
}

/// SHA-256 over the inputs that determine a mapping document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn compute(preset: &[u8], parameter_info: &[u8], plugin_identity: &str) -> Self {
        let mut hasher = Sha256::new();
        for part in [preset, parameter_info, plugin_identity.as_bytes()] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part);
        }
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Sidecar path holding the fingerprint of `document`.
    pub fn sidecar_path(document: &Path) -> PathBuf {
        sibling_path(document, ".sha256")
    }

    /// Fingerprint recorded for `document`, if any.
    pub fn read(document: &Path) -> Option<Self> {
        let raw = fs::read_to_string(Self::sidecar_path(document)).ok()?;
        let value = raw.trim();
        (!value.is_empty()).then(|| Self(value.to_string()))
    }

    pub fn write(&self, document: &Path) -> Result<(), MapError> {
        let path = Self::sidecar_path(document);
        fs::write(&path, format!("{}\n", self.0)).map_err(|err| MapError::io(&path, err))
    }
}
