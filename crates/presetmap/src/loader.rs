use std::path::Path;

use crate::error::MapError;
use crate::host::ParameterHost;
use crate::mapping::MappingDocument;

/// Replay the mapping document at `mapping` on `host`.
///
/// Returns the number of parameters set. Indices are not checked here; a host
/// rejecting one aborts the replay with [`MapError::Host`].
pub fn apply_mapping<H: ParameterHost + ?Sized>(
    host: &mut H,
    mapping: impl AsRef<Path>,
) -> Result<usize, MapError> {
    let mapping = mapping.as_ref();
    let document = MappingDocument::load(mapping)?;
    let applied = document.apply_to(host)?;
    tracing::debug!("applied {applied} parameters from {}", mapping.display());
    Ok(applied)
}
