use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::host::ParameterHost;

/// One preset parameter resolved against the hosted plugin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterMappingEntry {
    #[serde(rename = "match", default)]
    pub matched: String,
    pub value: f64,
    pub index: usize,
}

impl ParameterMappingEntry {
    pub fn new(name: impl Into<String>, value: f64, index: usize) -> Self {
        Self {
            matched: name.into(),
            value,
            index,
        }
    }
}

/// Persisted mapping of parameter names to plugin indices and normalized
/// values. Entries iterate in name order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MappingDocument {
    entries: BTreeMap<String, ParameterMappingEntry>,
}

impl MappingDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, entry: ParameterMappingEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&ParameterMappingEntry> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParameterMappingEntry)> {
        self.entries.iter().map(|(name, entry)| (name.as_str(), entry))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, MapError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|err| MapError::io(path, err))?;
        serde_json::from_str(&raw).map_err(|err| MapError::parse(path, err))
    }

    /// Write the document, replacing any existing file at `path` only once the
    /// new contents are fully on disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), MapError> {
        let path = path.as_ref();
        let json =
            serde_json::to_string_pretty(self).map_err(|err| MapError::serialize(path, err))?;
        let staging = sibling_path(path, ".tmp");
        fs::write(&staging, json).map_err(|err| MapError::io(&staging, err))?;
        fs::rename(&staging, path).map_err(|err| MapError::io(path, err))?;
        Ok(())
    }

    /// Set every mapped parameter on `host`, in name order.
    ///
    /// Stops at the first host error; parameters already set stay set.
    pub fn apply_to<H: ParameterHost + ?Sized>(&self, host: &mut H) -> Result<usize, MapError> {
        for entry in self.entries.values() {
            host.set_parameter(entry.index, entry.value)?;
        }
        Ok(self.entries.len())
    }
}

/// `path` with `suffix` appended to its file name.
pub(crate) fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| OsString::from("mapping"));
    name.push(suffix);
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn writes_match_value_index_objects() {
        let mut document = MappingDocument::new();
        document.insert("volume", ParameterMappingEntry::new("volume", 0.25, 7));
        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"volume": {"match": "volume", "value": 0.25, "index": 7}})
        );
    }

    #[test]
    fn reads_entries_without_match_field() {
        let document: MappingDocument =
            serde_json::from_str(r#"{"P1":{"index":0,"value":0.5}}"#).unwrap();
        let entry = document.get("P1").unwrap();
        assert_eq!(entry.index, 0);
        assert_eq!(entry.value, 0.5);
        assert_eq!(entry.matched, "");
    }

    #[test]
    fn save_replaces_existing_file_and_leaves_no_staging_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("helm-pad-parameter-mapping.json");
        fs::write(&path, "stale").unwrap();

        let mut document = MappingDocument::new();
        document.insert("stutter_on", ParameterMappingEntry::new("stutter_on", 1.0, 3));
        document.save(&path).unwrap();

        assert_eq!(MappingDocument::load(&path).unwrap(), document);
        assert!(!sibling_path(&path, ".tmp").exists());
    }

    #[test]
    fn sibling_path_appends_to_file_name() {
        assert_eq!(
            sibling_path(Path::new("out/helm-pad-parameter-mapping.json"), ".sha256"),
            PathBuf::from("out/helm-pad-parameter-mapping.json.sha256")
        );
        assert_eq!(
            sibling_path(Path::new("/"), ".tmp"),
            PathBuf::from("/mapping.tmp")
        );
    }

    #[test]
    fn load_rejects_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(
            MappingDocument::load(&path),
            Err(MapError::Parse { .. })
        ));
    }
}
