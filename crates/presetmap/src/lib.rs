//! Maps Helm preset exports onto a hosted plugin's parameter table.
//!
//! The pipeline has three stages. [`RangeTable`] extracts per-parameter bounds
//! from the synth's parameter-info dump, [`PresetMapper`] normalizes a preset
//! against those bounds and reconciles it with the plugin's descriptor table,
//! persisting a [`MappingDocument`], and [`apply_mapping`] replays a document
//! through any [`ParameterHost`].

mod cache;
mod config;
mod diagnostics;
mod error;
mod host;
mod loader;
mod manifest;
mod mapper;
mod mapping;
mod normalize;
mod ranges;

pub use cache::*;
pub use config::*;
pub use diagnostics::*;
pub use error::*;
pub use host::*;
pub use loader::*;
pub use manifest::*;
pub use mapper::*;
pub use mapping::*;
pub use normalize::*;
pub use ranges::*;
