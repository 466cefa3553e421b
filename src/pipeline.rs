//! Per-entity generate-then-publish orchestration.
//!
//! # Flow
//!
//! ```text
//! Catalog (outcomes + policy)
//!     │
//!     ├── resolve()      Strict: first failed descriptor aborts
//!     │                  Lenient: failed descriptors are logged and skipped
//!     │
//!     └── publish_all()  for each entity, in discovery order:
//!             generate(source) ──► site dir ──► publish(site, ns/kind/name)
//! ```
//!
//! The policy only covers discovery. Unsupported techdocs references and
//! generator or publisher failures always abort the run.

use crate::{
    catalog::{Catalog, DescriptorError, Entity, EntityKey, UnsupportedReferenceType},
    log,
    logger::{Annotation, annotate},
    techdocs::{StorageTarget, Techdocs},
};
use std::path::PathBuf;
use thiserror::Error;

/// How descriptor read and validation failures are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Any failure aborts the run before anything is published.
    Strict,
    /// Failures are logged and the file is skipped.
    Lenient,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    #[error(transparent)]
    UnsupportedReferenceType(#[from] UnsupportedReferenceType),

    #[error("failed to generate docs for {entity}")]
    Generation {
        entity: EntityKey,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to publish docs for {entity}")]
    Publish {
        entity: EntityKey,
        #[source]
        source: anyhow::Error,
    },
}

/// What a completed run did.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PublishReport {
    pub published: Vec<EntityKey>,
    /// Descriptor files ignored under [`ErrorPolicy::Lenient`].
    pub skipped: Vec<PathBuf>,
}

/// Drives generation and publication through a [`Techdocs`] capability.
pub struct PublicationPipeline<'a> {
    techdocs: &'a dyn Techdocs,
    storage: StorageTarget<'a>,
}

impl<'a> PublicationPipeline<'a> {
    pub const fn new(techdocs: &'a dyn Techdocs, storage: StorageTarget<'a>) -> Self {
        Self { techdocs, storage }
    }

    /// Resolve the catalog under its policy, then publish every entity.
    pub fn run(&self, catalog: Catalog) -> Result<PublishReport, PipelineError> {
        let (entities, skipped) = Self::resolve(catalog)?;
        let published = self.publish_all(&entities)?;

        Ok(PublishReport { published, skipped })
    }

    /// Flatten descriptor outcomes into entities, applying the policy.
    fn resolve(catalog: Catalog) -> Result<(Vec<Entity>, Vec<PathBuf>), PipelineError> {
        let mut entities = Vec::new();
        let mut skipped = Vec::new();

        for outcome in catalog.outcomes {
            match (outcome, catalog.policy) {
                (Ok(descriptor), _) => entities.extend(descriptor.entities),
                (Err(err), ErrorPolicy::Strict) => return Err(err.into()),
                (Err(err), ErrorPolicy::Lenient) => {
                    log!("skip"; "Ignoring {err}");
                    annotate(Annotation::Notice, &format!("Ignoring {err}"));
                    skipped.push(err.path().to_path_buf());
                }
            }
        }

        Ok((entities, skipped))
    }

    /// Generate then publish each entity, strictly one after another.
    pub fn publish_all(&self, entities: &[Entity]) -> Result<Vec<EntityKey>, PipelineError> {
        entities
            .iter()
            .map(|entity| self.publish_entity(entity))
            .collect()
    }

    fn publish_entity(&self, entity: &Entity) -> Result<EntityKey, PipelineError> {
        let key = entity.key();
        let source = entity.source()?;

        log!("generate"; "{key} from {} in {}", entity.techdocs_ref(), entity.path().display());
        let site_dir = self
            .techdocs
            .generate(&source)
            .map_err(|source| PipelineError::Generation {
                entity: key.clone(),
                source,
            })?;

        self.techdocs
            .publish(&site_dir, &key, &self.storage)
            .map_err(|source| PipelineError::Publish {
                entity: key.clone(),
                source,
            })?;

        Ok(key)
    }
}
