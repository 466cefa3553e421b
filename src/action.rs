//! Action entry point: validate, discover, publish.

use crate::{
    catalog::{walk_file, walk_path},
    config::{ActionConfig, PublicationMode, StorageDriver},
    log,
    pipeline::{PublicationPipeline, PublishReport},
    techdocs::{StorageTarget, Techdocs, TechdocsCli},
};
use anyhow::Result;

/// Run the whole action with the `techdocs-cli` backend.
pub fn run(config: &ActionConfig) -> Result<PublishReport> {
    let driver = config.validate()?;
    log!(
        "config";
        "publishing to {driver} `{}` from {}",
        config.storage.name,
        config.workspace.display()
    );

    let techdocs = TechdocsCli::new(&config.techdocs, &config.workspace);
    publish(config, driver, &techdocs)
}

/// Discover descriptors in the configured mode and publish every entity.
pub fn publish(
    config: &ActionConfig,
    driver: StorageDriver,
    techdocs: &dyn Techdocs,
) -> Result<PublishReport> {
    let catalog = match config.publish.mode()? {
        PublicationMode::Path(root) => walk_path(root)?,
        PublicationMode::File(file) => walk_file(file)?,
    };

    let storage = StorageTarget {
        driver,
        config: &config.storage,
    };
    let report = PublicationPipeline::new(techdocs, storage).run(catalog)?;

    log!(
        "publish";
        "done: {} published, {} skipped",
        report.published.len(),
        report.skipped.len()
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        catalog::DescriptorError,
        pipeline::PipelineError,
        techdocs::testing::RecordingTechdocs,
    };
    use std::{fs, path::Path};
    use tempfile::TempDir;

    fn config(storage: &str) -> ActionConfig {
        let mut config = ActionConfig::default();
        config.storage.driver = storage.into();
        config.storage.name = "techdocs".into();
        config
    }

    fn write(dir: &Path, name: &str, content: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_path_mode_publishes_valid_and_skips_rest() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "services/svc/catalog-info.yaml",
            "kind: Component\nmetadata:\n  name: svc\n  annotations:\n    backstage.io/techdocs-ref: dir:.\n",
        );
        write(dir.path(), "services/svc/README.md", "# svc");

        let mut config = config("googleGcs");
        config.publish.looking_path = Some(dir.path().to_path_buf());

        let techdocs = RecordingTechdocs::default();
        let report = publish(&config, StorageDriver::GoogleGcs, &techdocs).unwrap();

        assert_eq!(techdocs.published(), vec!["default/Component/svc"]);
        assert_eq!(report.skipped, vec![dir.path().join("services/svc/README.md")]);
    }

    #[test]
    fn test_file_mode_invalid_target_is_fatal() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "catalog-info.yaml",
            "kind: Location\nmetadata:\n  name: root\n  annotations:\n    backstage.io/techdocs-ref: dir:.\nspec:\n  targets: [ok.yaml, team/broken.yaml]\n",
        );
        write(
            dir.path(),
            "ok.yaml",
            "kind: Component\nmetadata:\n  name: ok\n  annotations:\n    backstage.io/techdocs-ref: dir:.\n",
        );
        write(dir.path(), "team/broken.yaml", "kind: Component\nmetadata:\n  name: broken\n");

        let mut config = config("awsS3");
        config.publish.looking_file = Some(dir.path().join("catalog-info.yaml"));

        let techdocs = RecordingTechdocs::default();
        let err = publish(&config, StorageDriver::AwsS3, &techdocs).unwrap_err();

        let Some(PipelineError::Descriptor(DescriptorError::MissingField { path, .. })) =
            err.downcast_ref::<PipelineError>()
        else {
            panic!("unexpected error: {err:#}");
        };
        assert_eq!(path, &dir.path().join("team/broken.yaml"));
        assert!(techdocs.calls.borrow().is_empty());
    }

    #[test]
    fn test_missing_publication_mode() {
        let config = config("awsS3");
        let techdocs = RecordingTechdocs::default();

        let err = publish(&config, StorageDriver::AwsS3, &techdocs).unwrap_err();
        assert_eq!(err.to_string(), "error no publication type was specified");
    }

    #[test]
    fn test_run_rejects_unsupported_storage() {
        let dir = TempDir::new().unwrap();
        let mut config = config("dropbox");
        config.publish.looking_path = Some(dir.path().to_path_buf());

        let err = run(&config).unwrap_err();
        assert!(err.to_string().starts_with("cloud storage not supported"));
    }
}
