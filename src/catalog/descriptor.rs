//! Descriptor file reading.
//!
//! A descriptor is a YAML stream holding one or more Backstage entities.
//! Each document is validated and normalized into an [`Entity`]; documents
//! of kind `Location` also contribute the descriptor paths they point at.

use super::entity::{Entity, TECHDOCS_REF_ANNOTATION};
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::{
    fs,
    path::{Component, Path, PathBuf},
};
use thiserror::Error;

/// Extensions accepted as descriptor files.
const YAML_EXTENSIONS: [&str; 2] = ["yml", "yaml"];

/// Entity kind whose `spec.target(s)` reference further descriptors.
const LOCATION_KIND: &str = "Location";

/// Why a descriptor file could not be turned into entities.
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("{}: file isn't a yaml type", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("{}: failed to read descriptor", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("{}: invalid yaml", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("{}: necessary field `{field}` is missing", .path.display())]
    MissingField { path: PathBuf, field: &'static str },
}

impl DescriptorError {
    /// The descriptor file the error refers to.
    pub fn path(&self) -> &Path {
        match self {
            Self::UnsupportedFileType(path) | Self::Io(path, _) => path,
            Self::Parse { path, .. } | Self::MissingField { path, .. } => path,
        }
    }
}

/// Everything read out of one descriptor file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descriptor {
    pub path: PathBuf,
    /// Entities in document order, Location entities included.
    pub entities: Vec<Entity>,
    /// Descriptor paths referenced by Location entities, in discovery order.
    pub targets: Vec<PathBuf>,
}

// ============================================================================
// Raw YAML shape
// ============================================================================

#[derive(Debug, Default, Deserialize)]
struct RawEntity {
    kind: Option<String>,
    metadata: Option<RawMetadata>,
    spec: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    name: Option<String>,
    namespace: Option<String>,
    /// Only the techdocs-ref value has to be a string.
    #[serde(default)]
    annotations: Mapping,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LocationSpec {
    target: Option<String>,
    targets: Vec<String>,
}

// ============================================================================
// Reading
// ============================================================================

/// Read every entity of a multi-document descriptor.
///
/// One invalid document fails the whole file; nothing is yielded partially.
pub fn read_all(path: &Path) -> Result<Descriptor, DescriptorError> {
    let content = read_yaml(path)?;
    let dir = parent_dir(path);

    let mut entities = Vec::new();
    let mut targets = Vec::new();

    for document in serde_yaml::Deserializer::from_str(&content) {
        let value = Value::deserialize(document).map_err(|source| DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        let Some(raw) = into_raw(path, value)? else {
            continue;
        };

        let (entity, located) = normalize(path, &dir, raw)?;
        entities.push(entity);
        targets.extend(located);
    }

    Ok(Descriptor {
        path: path.to_path_buf(),
        entities,
        targets,
    })
}

/// Read the first entity of a descriptor, ignoring any further documents.
#[allow(unused)]
pub fn read_one(path: &Path) -> Result<Entity, DescriptorError> {
    let content = read_yaml(path)?;
    let value: Value = serde_yaml::from_str(&content).map_err(|source| DescriptorError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    let raw = into_raw(path, value)?.unwrap_or_default();
    normalize(path, &parent_dir(path), raw).map(|(entity, _)| entity)
}

/// Check the extension, then load the file.
fn read_yaml(path: &Path) -> Result<String, DescriptorError> {
    if !is_yaml(path) {
        return Err(DescriptorError::UnsupportedFileType(path.to_path_buf()));
    }
    fs::read_to_string(path).map_err(|err| DescriptorError::Io(path.to_path_buf(), err))
}

pub fn is_yaml(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| YAML_EXTENSIONS.contains(&ext))
}

/// Empty documents yield nothing. Non-mapping documents carry no fields.
fn into_raw(path: &Path, value: Value) -> Result<Option<RawEntity>, DescriptorError> {
    match value {
        Value::Null => Ok(None),
        Value::Mapping(_) => serde_yaml::from_value(value)
            .map(Some)
            .map_err(|source| DescriptorError::Parse {
                path: path.to_path_buf(),
                source,
            }),
        _ => Ok(Some(RawEntity::default())),
    }
}

/// Validate required fields and build the entity plus its Location targets.
fn normalize(
    path: &Path,
    dir: &Path,
    raw: RawEntity,
) -> Result<(Entity, Vec<PathBuf>), DescriptorError> {
    let missing = |field| DescriptorError::MissingField {
        path: path.to_path_buf(),
        field,
    };

    let kind = raw.kind.ok_or_else(|| missing("kind"))?;
    let metadata = raw.metadata.unwrap_or_default();
    let name = metadata
        .name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| missing("metadata.name"))?;
    let techdocs_ref = metadata
        .annotations
        .get(TECHDOCS_REF_ANNOTATION)
        .and_then(Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| missing("metadata.annotations.backstage.io/techdocs-ref"))?;

    let targets = if kind == LOCATION_KIND {
        location_targets(path, dir, raw.spec)?
    } else {
        Vec::new()
    };

    let entity = Entity::new(name, metadata.namespace, kind, techdocs_ref, dir.to_path_buf());
    Ok((entity, targets))
}

/// `spec.targets` in order, then `spec.target`, each joined onto `dir`.
fn location_targets(
    path: &Path,
    dir: &Path,
    spec: Option<Value>,
) -> Result<Vec<PathBuf>, DescriptorError> {
    let spec: LocationSpec = match spec {
        Some(value) => serde_yaml::from_value(value).map_err(|source| DescriptorError::Parse {
            path: path.to_path_buf(),
            source,
        })?,
        None => LocationSpec::default(),
    };

    Ok(spec
        .targets
        .iter()
        .chain(spec.target.iter())
        .map(|target| join_normalized(dir, Path::new(target)))
        .collect())
}

/// Directory containing `path`.
fn parent_dir(path: &Path) -> PathBuf {
    path.parent().map(Path::to_path_buf).unwrap_or_default()
}

/// Join and lexically resolve `.` and `..` without touching the filesystem.
pub fn join_normalized(base: &Path, relative: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in base.join(relative).components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(Component::ParentDir),
            },
            other => out.push(other),
        }
    }
    out
}
