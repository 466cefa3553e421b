//! Normalized Backstage entities.

use std::{
    fmt,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Annotation pointing at the documentation source of an entity.
pub const TECHDOCS_REF_ANNOTATION: &str = "backstage.io/techdocs-ref";

/// Namespace used when a descriptor does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// A validated, publishable catalog entity.
///
/// Only the descriptor reader constructs these, after `kind`, `metadata.name`
/// and the techdocs-ref annotation were all found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    name: String,
    namespace: String,
    kind: String,
    techdocs_ref: String,
    path: PathBuf,
}

impl Entity {
    pub(super) fn new(
        name: String,
        namespace: Option<String>,
        kind: String,
        techdocs_ref: String,
        path: PathBuf,
    ) -> Self {
        Self {
            name,
            namespace: namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
            kind,
            techdocs_ref,
            path,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn techdocs_ref(&self) -> &str {
        &self.techdocs_ref
    }

    /// Directory of the descriptor this entity came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Storage key `namespace/kind/name`.
    pub fn key(&self) -> EntityKey {
        EntityKey::from_parts(self.namespace(), self.kind(), self.name())
    }

    /// Resolve the techdocs-ref annotation into a generator source.
    ///
    /// `dir:` refs are relative to [`Entity::path`].
    pub fn source(&self) -> Result<TechdocsSource, UnsupportedReferenceType> {
        let (scheme, target) = self
            .techdocs_ref
            .split_once(':')
            .unwrap_or((self.techdocs_ref.as_str(), ""));

        match scheme {
            "dir" => Ok(TechdocsSource::Dir(self.path.join(target))),
            "url" => Ok(TechdocsSource::Url(self.techdocs_ref.clone())),
            _ => Err(UnsupportedReferenceType(self.techdocs_ref.clone())),
        }
    }
}

/// Composite `namespace/kind/name` identifier used as the storage prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey(String);

impl EntityKey {
    pub fn from_parts(namespace: &str, kind: &str, name: &str) -> Self {
        Self(format!("{namespace}/{kind}/{name}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the generator reads documentation from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TechdocsSource {
    /// Local directory holding `mkdocs.yml`.
    Dir(PathBuf),
    /// Full `url:<location>` reference, passed through untouched.
    Url(String),
}

/// The techdocs-ref annotation uses a scheme other than `dir` or `url`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported techdocs reference annotation type `{0}`")]
pub struct UnsupportedReferenceType(pub String);
