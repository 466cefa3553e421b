//! `[publish]` section configuration.
//!
//! Chooses how descriptor files are discovered.

use super::{defaults, error::ConfigError};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// `[publish]` section in techdocs.toml.
///
/// Exactly one of the two fields must be set.
///
/// # Example
/// ```toml
/// [publish]
/// looking_file = "catalog-info.yaml"
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct PublishConfig {
    /// Directory walked recursively; bad descriptors are skipped.
    #[serde(default = "defaults::publish::looking_path")]
    #[educe(Default = defaults::publish::looking_path())]
    pub looking_path: Option<PathBuf>,

    /// Root catalog file expanded through its Location targets; any bad
    /// descriptor aborts the run.
    #[serde(default = "defaults::publish::looking_file")]
    #[educe(Default = defaults::publish::looking_file())]
    pub looking_file: Option<PathBuf>,
}

/// Discovery mode resolved from `[publish]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublicationMode<'a> {
    /// Walk a directory tree.
    Path(&'a Path),
    /// Expand a root catalog file.
    File(&'a Path),
}

impl PublishConfig {
    pub fn mode(&self) -> Result<PublicationMode<'_>, ConfigError> {
        match (self.looking_path.as_deref(), self.looking_file.as_deref()) {
            (Some(path), None) => Ok(PublicationMode::Path(path)),
            (None, Some(file)) => Ok(PublicationMode::File(file)),
            (None, None) => Err(ConfigError::NoPublicationMode),
            (Some(_), Some(_)) => Err(ConfigError::ConflictingPublicationMode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::ActionConfig;
    use super::*;

    #[test]
    fn test_publish_mode_path() {
        let config: ActionConfig = toml::from_str(
            r#"
            [publish]
            looking_path = "docs"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.publish.mode().unwrap(),
            PublicationMode::Path(Path::new("docs"))
        );
    }

    #[test]
    fn test_publish_mode_file() {
        let config: ActionConfig = toml::from_str(
            r#"
            [publish]
            looking_file = "catalog-info.yaml"
        "#,
        )
        .unwrap();
        assert_eq!(
            config.publish.mode().unwrap(),
            PublicationMode::File(Path::new("catalog-info.yaml"))
        );
    }

    #[test]
    fn test_publish_mode_missing() {
        let config = PublishConfig::default();
        let err = config.mode().unwrap_err();
        assert!(matches!(err, ConfigError::NoPublicationMode));
        assert_eq!(err.to_string(), "error no publication type was specified");
    }

    #[test]
    fn test_publish_mode_conflict() {
        let config = PublishConfig {
            looking_path: Some("docs".into()),
            looking_file: Some("catalog-info.yaml".into()),
        };
        assert!(matches!(
            config.mode(),
            Err(ConfigError::ConflictingPublicationMode)
        ));
    }
}
