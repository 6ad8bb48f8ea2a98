use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A controllable parameter exposed by a hosted plugin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDescriptor {
    pub name: String,
    pub index: usize,
}

impl ParameterDescriptor {
    pub fn new(name: impl Into<String>, index: usize) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// Errors surfaced by a parameter host.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("parameter index {index} is out of range ({count} parameters)")]
    InvalidIndex { index: usize, count: usize },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid plugin manifest: {0}")]
    Manifest(#[from] serde_json::Error),
}

/// Capability set the mapper and loader need from a hosted plugin.
pub trait ParameterHost {
    /// Stable identifier of the hosted plugin, folded into cache fingerprints.
    fn identity(&self) -> String {
        String::new()
    }

    fn parameter_descriptors(&self) -> Result<Vec<ParameterDescriptor>, HostError>;

    /// Set the parameter at `index` to a normalized value.
    fn set_parameter(&mut self, index: usize, value: f64) -> Result<(), HostError>;
}
