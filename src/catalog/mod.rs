//! Backstage catalog reading.
//!
//! - [`entity`]: the normalized entity record and its techdocs source
//! - [`descriptor`]: YAML descriptor parsing and validation
//! - [`walker`]: frontier construction for Path and File mode

pub mod descriptor;
pub mod entity;
pub mod walker;

pub use descriptor::DescriptorError;
pub use entity::{Entity, EntityKey, TechdocsSource, UnsupportedReferenceType};
pub use walker::{Catalog, walk_file, walk_path};
