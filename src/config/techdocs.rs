//! `[techdocs]` section configuration.
//!
//! Options forwarded to the external `techdocs-cli` for both the
//! `generate` and `publish` subcommands.

use super::defaults;
use educe::Educe;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// `[techdocs]` section in techdocs.toml.
///
/// # Example
/// ```toml
/// [techdocs]
/// command = ["npx", "@techdocs/cli"]
/// docker_image = "spotify/techdocs:v1.2.3"
/// no_pull = true
/// ```
#[derive(Debug, Clone, Educe, Serialize, Deserialize)]
#[educe(Default)]
#[serde(deny_unknown_fields)]
pub struct TechdocsConfig {
    /// Program (and leading arguments) used to invoke techdocs-cli.
    #[serde(default = "defaults::techdocs::command")]
    #[educe(Default = defaults::techdocs::command())]
    pub command: Vec<String>,

    /// Image the generator runs mkdocs in.
    #[serde(default = "defaults::techdocs::docker_image")]
    #[educe(Default = defaults::techdocs::docker_image())]
    pub docker_image: String,

    /// Directory generated sites are written to, relative to the workspace.
    #[serde(default = "defaults::techdocs::output_dir")]
    #[educe(Default = defaults::techdocs::output_dir())]
    pub output_dir: PathBuf,

    /// Run mkdocs on the host instead of in docker.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub no_docker: bool,

    /// Skip `docker pull` of the generator image.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub no_pull: bool,

    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub omit_techdocs_core_mkdocs_plugin: bool,

    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub legacy_copy_readme_md_to_index_md: bool,

    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub legacy_use_case_sensitive_triplet_paths: bool,

    /// Pass `--verbose` to techdocs-cli.
    #[serde(default = "defaults::r#false")]
    #[educe(Default = defaults::r#false())]
    pub verbose: bool,
}

#[cfg(test)]
mod tests {
    use super::super::ActionConfig;
    use std::path::PathBuf;

    #[test]
    fn test_techdocs_config_defaults() {
        let config: ActionConfig = toml::from_str("").unwrap();

        assert_eq!(config.techdocs.command, vec!["techdocs-cli".to_string()]);
        assert_eq!(config.techdocs.docker_image, "spotify/techdocs:v1.1.0");
        assert_eq!(config.techdocs.output_dir, PathBuf::from("site"));
        assert!(!config.techdocs.no_docker);
        assert!(!config.techdocs.legacy_use_case_sensitive_triplet_paths);
    }

    #[test]
    fn test_techdocs_config_custom() {
        let config: ActionConfig = toml::from_str(
            r#"
            [techdocs]
            command = ["npx", "@techdocs/cli"]
            output_dir = "build/site"
            no_docker = true
            verbose = true
        "#,
        )
        .unwrap();

        assert_eq!(config.techdocs.command, vec!["npx", "@techdocs/cli"]);
        assert_eq!(config.techdocs.output_dir, PathBuf::from("build/site"));
        assert!(config.techdocs.no_docker);
        assert!(config.techdocs.verbose);
    }

    #[test]
    fn test_techdocs_unknown_field_rejection() {
        let result: Result<ActionConfig, _> = toml::from_str(
            r#"
            [techdocs]
            mkdocs_version = "1.5"
        "#,
        );
        assert!(result.is_err());
    }
}
