//! Documentation generator and publisher capability.
//!
//! The pipeline only sees the [`Techdocs`] trait. [`TechdocsCli`] backs it
//! with the external `techdocs-cli` tool.

mod cli;

pub use cli::TechdocsCli;

use crate::{
    catalog::{EntityKey, TechdocsSource},
    config::{StorageConfig, StorageDriver},
};
use anyhow::Result;
use std::path::{Path, PathBuf};

/// The validated storage selection a site is uploaded to.
#[derive(Debug, Clone, Copy)]
pub struct StorageTarget<'a> {
    pub driver: StorageDriver,
    pub config: &'a StorageConfig,
}

/// Turns documentation sources into static sites and uploads them.
pub trait Techdocs {
    /// Build the site for `source`, returning the directory it was written to.
    fn generate(&self, source: &TechdocsSource) -> Result<PathBuf>;

    /// Upload `site_dir` under the `entity` prefix of `storage`.
    fn publish(&self, site_dir: &Path, entity: &EntityKey, storage: &StorageTarget<'_>)
    -> Result<()>;
}
