//! Action configuration management for `techdocs.toml`.
//!
//! # Sections
//!
//! | Section      | Purpose                                        |
//! |--------------|------------------------------------------------|
//! | `[storage]`  | Cloud storage driver, bucket and credentials   |
//! | `[publish]`  | Discovery mode (directory walk or catalog file)|
//! | `[techdocs]` | techdocs-cli invocation and generator options  |
//!
//! The file is optional. Action inputs (CLI flags or `INPUT_*` variables)
//! override whatever it sets.
//!
//! # Example
//!
//! ```toml
//! [storage]
//! driver = "awsS3"
//! name = "techdocs-bucket"
//!
//! [publish]
//! looking_file = "catalog-info.yaml"
//!
//! [techdocs]
//! no_pull = true
//! ```

mod defaults;
mod error;
mod publish;
mod storage;
mod techdocs;

pub use error::ConfigError;
pub use publish::{PublicationMode, PublishConfig};
pub use storage::{StorageConfig, StorageDriver};
pub use techdocs::TechdocsConfig;

use crate::cli::Cli;
use anyhow::{Context, Result, bail};
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// Root Configuration
// ============================================================================

/// Root configuration structure representing techdocs.toml
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct ActionConfig {
    /// Absolute workspace root (set after loading)
    #[serde(skip)]
    pub workspace: PathBuf,

    /// Absolute path to the config file (set after loading)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Cloud storage settings
    #[serde(default)]
    pub storage: StorageConfig,

    /// Discovery settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Generator and publisher settings
    #[serde(default)]
    pub techdocs: TechdocsConfig,
}

impl ActionConfig {
    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: ActionConfig = toml::from_str(content).map_err(ConfigError::Toml)?;
        Ok(config)
    }

    /// Load configuration from file path
    pub fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content).with_context(|| format!("Failed to parse `{}`", path.display()))
    }

    /// Build the effective configuration: file (if any) overlaid with CLI/env.
    pub fn load(cli: &Cli) -> Result<Self> {
        let workspace = normalize_path(&expand_tilde(&cli.workspace));
        let config_path = normalize_path(&workspace.join(&cli.config));

        let mut config = if config_path.is_file() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };
        config.config_path = config_path;
        config.update_with_cli(cli);
        config.update_path_with_root(&workspace);

        Ok(config)
    }

    /// Overlay action inputs. Empty inputs leave the file value untouched.
    pub fn update_with_cli(&mut self, cli: &Cli) {
        let storage = &mut self.storage;
        Self::update_option(&mut storage.driver, cli.cloud_storage.as_ref());
        Self::update_option(&mut storage.name, cli.storage_name.as_ref());

        let creds = &cli.credentials;
        Self::update_option(&mut storage.google_gcs.bucket_root_path, creds.gcs_bucket_root_path.as_ref());
        Self::update_option(&mut storage.azure_blob_storage.account_name, creds.azure_account_name.as_ref());
        Self::update_option(&mut storage.azure_blob_storage.account_key, creds.azure_account_key.as_ref());
        Self::update_option(&mut storage.aws_s3.role_arn, creds.aws_role_arn.as_ref());
        Self::update_option(&mut storage.aws_s3.endpoint, creds.aws_endpoint.as_ref());
        Self::update_option(&mut storage.aws_s3.sse, creds.aws_s3_sse.as_ref());
        Self::update_option(&mut storage.aws_s3.force_path_style, creds.aws_s3_force_path_style.as_ref());
        Self::update_option(&mut storage.open_stack_swift.credential_id, creds.os_credential_id.as_ref());
        Self::update_option(&mut storage.open_stack_swift.secret, creds.os_secret.as_ref());
        Self::update_option(&mut storage.open_stack_swift.auth_url, creds.os_auth_url.as_ref());
        Self::update_option(&mut storage.open_stack_swift.swift_url, creds.os_swift_url.as_ref());

        Self::update_option(&mut self.techdocs.docker_image, cli.docker_image.as_ref());

        if let Some(path) = cli.publish_looking_path.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            self.publish.looking_path = Some(path.clone());
        }
        if let Some(file) = cli.publish_looking_file.as_ref().filter(|p| !p.as_os_str().is_empty()) {
            self.publish.looking_file = Some(file.clone());
        }
    }

    /// Update config option if a non-empty CLI value is provided
    fn update_option(config_option: &mut String, cli_option: Option<&String>) {
        if let Some(option) = cli_option.filter(|s| !s.is_empty()) {
            config_option.clone_from(option);
        }
    }

    /// Resolve every configured path against the workspace root
    fn update_path_with_root(&mut self, root: &Path) {
        self.workspace = root.to_path_buf();

        let resolve = |path: &Path| normalize_path(&root.join(expand_tilde(path)));

        self.publish.looking_path = self.publish.looking_path.as_deref().map(resolve);
        self.publish.looking_file = self.publish.looking_file.as_deref().map(resolve);
        self.techdocs.output_dir = resolve(&self.techdocs.output_dir);
    }

    /// Validate configuration before any descriptor is touched.
    ///
    /// Returns the selected storage driver on success.
    pub fn validate(&self) -> Result<StorageDriver> {
        let driver = self.storage.validate()?;
        self.publish.mode()?;

        Self::check_command_installed("[techdocs.command]", &self.techdocs.command)?;

        Ok(driver)
    }

    /// Check if a command is installed and available
    fn check_command_installed(field: &str, command: &[String]) -> Result<()> {
        let Some(cmd) = command.first() else {
            bail!(ConfigError::Validation(format!(
                "{field} must have at least one element"
            )));
        };

        which::which(cmd)
            .with_context(|| format!("`{cmd}` not found. Please install it first."))?;

        Ok(())
    }
}

/// Expand a leading `~` to the home directory
fn expand_tilde(path: &Path) -> PathBuf {
    match path.to_str() {
        Some(s) => PathBuf::from(shellexpand::tilde(s).into_owned()),
        None => path.to_path_buf(),
    }
}

/// Normalize a path to absolute, using canonicalize if the path exists
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir()
                .map(|cwd| cwd.join(path))
                .unwrap_or_else(|_| path.to_path_buf())
        }
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CredentialArgs;
    use tempfile::TempDir;

    fn cli_in(workspace: &Path) -> Cli {
        Cli {
            workspace: workspace.to_path_buf(),
            config: PathBuf::from("techdocs.toml"),
            ..Default::default()
        }
    }

    #[test]
    fn test_from_str_invalid_toml() {
        let result = ActionConfig::from_str("[storage\ndriver = \"awsS3\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ActionConfig::default();

        assert_eq!(config.workspace, PathBuf::new());
        assert!(config.storage.driver.is_empty());
        assert!(config.publish.looking_path.is_none());
        assert_eq!(config.techdocs.command, vec!["techdocs-cli".to_string()]);
    }

    #[test]
    fn test_unknown_top_level_field_rejection() {
        let result = ActionConfig::from_str("[deploy]\nprovider = \"github\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_without_config_file() {
        let dir = TempDir::new().unwrap();
        let mut cli = cli_in(dir.path());
        cli.cloud_storage = Some("awsS3".into());
        cli.publish_looking_path = Some("docs".into());

        let config = ActionConfig::load(&cli).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.workspace, root);
        assert_eq!(config.storage.driver, "awsS3");
        assert_eq!(config.publish.looking_path, Some(root.join("docs")));
        assert_eq!(config.techdocs.output_dir, root.join("site"));
    }

    #[test]
    fn test_cli_overrides_config_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("techdocs.toml"),
            r#"
            [storage]
            driver = "googleGcs"
            name = "from-file"

            [storage.azure_blob_storage]
            account_key = "file-key"

            [publish]
            looking_file = "catalog-info.yaml"
        "#,
        )
        .unwrap();

        let mut cli = cli_in(dir.path());
        cli.cloud_storage = Some("azureBlobStorage".into());
        cli.storage_name = Some(String::new());
        cli.credentials = CredentialArgs {
            azure_account_name: Some("mycompany".into()),
            ..Default::default()
        };

        let config = ActionConfig::load(&cli).unwrap();
        let root = dir.path().canonicalize().unwrap();

        assert_eq!(config.storage.driver, "azureBlobStorage");
        // empty inputs leave the file value alone
        assert_eq!(config.storage.name, "from-file");
        assert_eq!(config.storage.azure_blob_storage.account_name, "mycompany");
        assert_eq!(config.storage.azure_blob_storage.account_key, "file-key");
        assert_eq!(
            config.publish.looking_file,
            Some(root.join("catalog-info.yaml"))
        );
        assert_eq!(config.config_path, root.join("techdocs.toml"));
    }

    #[test]
    fn test_validate_rejects_bad_storage_first() {
        let mut config = ActionConfig::default();
        config.storage.driver = "dropbox".into();
        config.publish.looking_path = Some("docs".into());

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::UnsupportedStorage(_))
        ));
    }

    #[test]
    fn test_validate_requires_publication_mode() {
        let mut config = ActionConfig::default();
        config.storage.driver = "awsS3".into();

        let err = config.validate().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::NoPublicationMode)
        ));
    }

    #[test]
    fn test_validate_rejects_empty_command() {
        let mut config = ActionConfig::default();
        config.storage.driver = "awsS3".into();
        config.publish.looking_path = Some("docs".into());
        config.techdocs.command.clear();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("[techdocs.command]"));
    }
}
