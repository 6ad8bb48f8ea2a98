use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cache::CachePolicy;
use crate::error::MapError;

/// Settings shared by the mapper and the command line front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Directory receiving the mapping documents.
    pub output_dir: PathBuf,
    /// Parameter-info dump holding the `{ "NAME", MIN, MAX, ...}` records.
    pub parameter_info: PathBuf,
    /// Leading component of every mapping document name.
    pub prefix: String,
    pub cache: CachePolicy,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("helm_json_presets"),
            parameter_info: PathBuf::from("helm_parameter_info.txt"),
            prefix: "helm".into(),
            cache: CachePolicy::default(),
        }
    }
}

impl MapperConfig {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
        serde_json::from_str(&raw).map_err(|err| MapError::parse(path, err))
    }

    /// `<config dir>/presetmap/config.json`, when the platform has a config dir.
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("presetmap").join("config.json"))
    }

    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    pub fn with_parameter_info(mut self, parameter_info: impl Into<PathBuf>) -> Self {
        self.parameter_info = parameter_info.into();
        self
    }

    pub fn with_cache(mut self, cache: CachePolicy) -> Self {
        self.cache = cache;
        self
    }

    /// `{output_dir}/{prefix}-{preset base name}-parameter-mapping.json`.
    ///
    /// The base name is the preset's file name up to its first `.`.
    pub fn output_path(&self, preset: &Path) -> Result<PathBuf, MapError> {
        let base = preset_base_name(preset)
            .ok_or_else(|| MapError::InvalidPresetPath(preset.to_path_buf()))?;
        Ok(self
            .output_dir
            .join(format!("{}-{base}-parameter-mapping.json", self.prefix)))
    }
}

fn preset_base_name(preset: &Path) -> Option<String> {
    let file_name = preset.file_name()?.to_string_lossy();
    let base = file_name.split('.').next().unwrap_or_default();
    (!base.is_empty()).then(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn output_path_uses_prefix_and_base_name() {
        let config = MapperConfig::default().with_output_dir("out");
        assert_eq!(
            config.output_path(Path::new("presets/Bright Pad.helm")).unwrap(),
            PathBuf::from("out/helm-Bright Pad-parameter-mapping.json")
        );
    }

    #[test]
    fn base_name_stops_at_first_dot() {
        let config = MapperConfig::default().with_output_dir("out");
        assert_eq!(
            config.output_path(Path::new("lib/Glass.Keys.v2.helm")).unwrap(),
            PathBuf::from("out/helm-Glass-parameter-mapping.json")
        );
    }

    #[test]
    fn path_without_base_name_is_rejected() {
        let config = MapperConfig::default();
        assert!(matches!(
            config.output_path(Path::new("presets/.hidden")),
            Err(MapError::InvalidPresetPath(_))
        ));
        assert!(matches!(
            config.output_path(Path::new("/")),
            Err(MapError::InvalidPresetPath(_))
        ));
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"prefix": "obxd", "cache": "fingerprint"}"#).unwrap();
        let config = MapperConfig::open(&path).unwrap();
        assert_eq!(config.prefix, "obxd");
        assert_eq!(config.cache, CachePolicy::Fingerprint);
        assert_eq!(config.output_dir, PathBuf::from("helm_json_presets"));
    }
}
