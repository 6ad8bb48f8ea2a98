use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use once_cell::unsync::OnceCell;
use serde_json::Value;

use crate::cache::{CachePolicy, Fingerprint};
use crate::config::MapperConfig;
use crate::diagnostics::Diagnostic;
use crate::error::MapError;
use crate::host::ParameterHost;
use crate::mapping::{MappingDocument, ParameterMappingEntry};
use crate::normalize::normalize;
use crate::ranges::RangeTable;

/// Result of mapping a single preset.
#[derive(Debug, Clone, PartialEq)]
pub struct MappingOutcome {
    pub path: PathBuf,
    pub status: MappingStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MappingStatus {
    /// An existing document was reused; nothing was read from the preset or
    /// the host.
    Cached,
    Built {
        entries: usize,
        diagnostics: Vec<Diagnostic>,
    },
}

impl MappingOutcome {
    pub fn is_cached(&self) -> bool {
        matches!(self.status, MappingStatus::Cached)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match &self.status {
            MappingStatus::Cached => &[],
            MappingStatus::Built { diagnostics, .. } => diagnostics,
        }
    }
}

/// Builds mapping documents for presets against a hosted plugin.
///
/// The range table is loaded from [`MapperConfig::parameter_info`] the first
/// time it is needed and reused for every later preset.
#[derive(Debug)]
pub struct PresetMapper {
    config: MapperConfig,
    ranges: OnceCell<RangeTable>,
}

impl PresetMapper {
    pub fn new(config: MapperConfig) -> Self {
        Self {
            config,
            ranges: OnceCell::new(),
        }
    }

    /// Mapper with an already extracted range table.
    pub fn with_ranges(config: MapperConfig, ranges: RangeTable) -> Self {
        Self {
            config,
            ranges: OnceCell::from(ranges),
        }
    }

    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    pub fn ranges(&self) -> Result<&RangeTable, MapError> {
        self.ranges
            .get_or_try_init(|| RangeTable::load(&self.config.parameter_info))
    }

    pub fn build<H: ParameterHost + ?Sized>(
        &self,
        host: &H,
        preset: impl AsRef<Path>,
    ) -> Result<MappingOutcome, MapError> {
        let preset = preset.as_ref();
        let output_dir = &self.config.output_dir;
        fs::create_dir_all(output_dir).map_err(|err| MapError::io(output_dir, err))?;
        let path = self.config.output_path(preset)?;

        let mut preset_bytes = None;
        let fingerprint = match self.config.cache {
            CachePolicy::Existence => {
                if path.exists() {
                    tracing::debug!("reusing mapping {}", path.display());
                    return Ok(MappingOutcome {
                        path,
                        status: MappingStatus::Cached,
                    });
                }
                None
            }
            CachePolicy::Fingerprint => {
                let bytes = read_preset(preset)?;
                let fingerprint = self.fingerprint(&bytes, host)?;
                if path.exists() && Fingerprint::read(&path).as_ref() == Some(&fingerprint) {
                    tracing::debug!("mapping {} is up to date", path.display());
                    return Ok(MappingOutcome {
                        path,
                        status: MappingStatus::Cached,
                    });
                }
                preset_bytes = Some(bytes);
                Some(fingerprint)
            }
        };

        let bytes = match preset_bytes {
            Some(bytes) => bytes,
            None => read_preset(preset)?,
        };
        let document: Value =
            serde_json::from_slice(&bytes).map_err(|err| MapError::parse(preset, err))?;
        let settings = document
            .get("settings")
            .and_then(Value::as_object)
            .ok_or_else(|| MapError::MissingSettings {
                path: preset.to_path_buf(),
            })?;

        let normalized = normalize(self.ranges()?, settings);
        for diagnostic in &normalized.diagnostics {
            tracing::debug!("{}: {diagnostic}", preset.display());
        }
        let mut diagnostics = normalized.diagnostics;

        let name_to_index: HashMap<String, usize> = host
            .parameter_descriptors()?
            .into_iter()
            .map(|descriptor| (descriptor.name, descriptor.index))
            .collect();

        let mut mapping = MappingDocument::new();
        for (name, value) in normalized.values {
            match name_to_index.get(&name) {
                Some(&index) => {
                    let entry = ParameterMappingEntry::new(name.clone(), value, index);
                    mapping.insert(name, entry);
                }
                None => {
                    tracing::warn!(
                        "parameter `{name}` was not found in the plugin parameters, skipping"
                    );
                    diagnostics.push(Diagnostic::Unmapped { name });
                }
            }
        }

        mapping.save(&path)?;
        if let Some(fingerprint) = fingerprint {
            fingerprint.write(&path)?;
        }
        tracing::debug!(
            "wrote {} parameters for {} to {}",
            mapping.len(),
            preset.display(),
            path.display()
        );

        Ok(MappingOutcome {
            path,
            status: MappingStatus::Built {
                entries: mapping.len(),
                diagnostics,
            },
        })
    }

    fn fingerprint<H: ParameterHost + ?Sized>(
        &self,
        preset: &[u8],
        host: &H,
    ) -> Result<Fingerprint, MapError> {
        let path = &self.config.parameter_info;
        // Hash the extracted table rather than the raw text so formatting-only
        // edits of the resource keep the cache valid.
        let table = serde_json::to_vec(self.ranges()?)
            .map_err(|err| MapError::serialize(path, err))?;
        Ok(Fingerprint::compute(preset, &table, &host.identity()))
    }
}

fn read_preset(preset: &Path) -> Result<Vec<u8>, MapError> {
    fs::read(preset).map_err(|err| MapError::io(preset, err))
}

/// Build (or reuse) the mapping document for `preset` inside `output_dir`,
/// using the default configuration otherwise.
pub fn build_mapping<H: ParameterHost + ?Sized>(
    host: &H,
    preset: impl AsRef<Path>,
    output_dir: impl Into<PathBuf>,
) -> Result<PathBuf, MapError> {
    let config = MapperConfig::default().with_output_dir(output_dir);
    PresetMapper::new(config)
        .build(host, preset)
        .map(|outcome| outcome.path)
}
