use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::host::{HostError, ParameterDescriptor, ParameterHost};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ManifestFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default)]
    parameters: Vec<ManifestParameter>,
}

/// A parameter slot declared by a plugin manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestParameter {
    pub name: String,
    pub index: usize,
    #[serde(default)]
    pub value: f64,
}

/// Parameter host backed by a JSON manifest listing the plugin's parameters.
///
/// Stands in for a live plugin instance when mapping or replaying presets
/// outside of an audio host.
#[derive(Debug, Clone)]
pub struct ManifestHost {
    id: String,
    name: Option<String>,
    parameters: Vec<ManifestParameter>,
}

impl ManifestHost {
    pub fn new(id: impl Into<String>, parameters: Vec<ManifestParameter>) -> Self {
        let mut host = Self {
            id: id.into(),
            name: None,
            parameters,
        };
        host.parameters.sort_by_key(|param| param.index);
        host
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, HostError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let manifest: ManifestFile = serde_json::from_str(&raw)?;
        let id = manifest.id.unwrap_or_else(|| {
            path.file_stem()
                .unwrap_or_default()
                .to_string_lossy()
                .into()
        });
        let mut host = Self::new(id, manifest.parameters);
        host.name = manifest.name;
        Ok(host)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), HostError> {
        let manifest = ManifestFile {
            id: Some(self.id.clone()),
            name: self.name.clone(),
            parameters: self.parameters.clone(),
        };
        let json = serde_json::to_string_pretty(&manifest)?;
        fs::write(path, json)?;
        Ok(())
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current parameter values, ordered by index.
    pub fn parameters(&self) -> &[ManifestParameter] {
        &self.parameters
    }

    pub fn value(&self, index: usize) -> Option<f64> {
        self.parameters
            .iter()
            .find(|param| param.index == index)
            .map(|param| param.value)
    }
}

impl ParameterHost for ManifestHost {
    fn identity(&self) -> String {
        self.id.clone()
    }

    fn parameter_descriptors(&self) -> Result<Vec<ParameterDescriptor>, HostError> {
        Ok(self
            .parameters
            .iter()
            .map(|param| ParameterDescriptor::new(param.name.clone(), param.index))
            .collect())
    }

    fn set_parameter(&mut self, index: usize, value: f64) -> Result<(), HostError> {
        let count = self.parameters.len();
        let param = self
            .parameters
            .iter_mut()
            .find(|param| param.index == index)
            .ok_or(HostError::InvalidIndex { index, count })?;
        param.value = value.clamp(0.0, 1.0);
        Ok(())
    }
}
