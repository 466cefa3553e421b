//! [`Techdocs`] backed by the `techdocs-cli` executable.
//!
//! ```text
//! techdocs-cli generate --source-dir <dir> --output-dir <site> --docker-image <img> [...]
//! techdocs-cli publish  --publisher-type <driver> --storage-name <bucket>
//!                       --entity <ns/kind/name> --directory <site> [--<credential> <value>...]
//! ```

use super::{StorageTarget, Techdocs};
use crate::{
    catalog::{EntityKey, TechdocsSource},
    config::TechdocsConfig,
    log,
    utils::command::exec,
};
use anyhow::{Context, Result};
use std::{
    ffi::OsString,
    path::{Path, PathBuf},
};

/// Runs `techdocs-cli` from the workspace root.
pub struct TechdocsCli<'a> {
    config: &'a TechdocsConfig,
    workspace: &'a Path,
}

impl<'a> TechdocsCli<'a> {
    pub const fn new(config: &'a TechdocsConfig, workspace: &'a Path) -> Self {
        Self { config, workspace }
    }

    fn generate_args(&self, source: &TechdocsSource) -> Vec<OsString> {
        let config = self.config;
        let mut args: Vec<OsString> = vec!["generate".into()];

        match source {
            TechdocsSource::Dir(dir) => {
                args.extend([OsString::from("--source-dir"), OsString::from(dir)]);
            }
            TechdocsSource::Url(reference) => {
                args.extend([
                    OsString::from("--source-dir"),
                    OsString::from(self.workspace),
                    OsString::from("--techdocs-ref"),
                    OsString::from(reference),
                ]);
            }
        }

        args.extend([
            OsString::from("--output-dir"),
            OsString::from(&config.output_dir),
            OsString::from("--docker-image"),
            OsString::from(&config.docker_image),
        ]);

        let toggles = [
            (config.no_docker, "--no-docker"),
            (config.no_pull, "--no-pull"),
            (
                config.omit_techdocs_core_mkdocs_plugin,
                "--omit-techdocs-core-mkdocs-plugin",
            ),
            (
                config.legacy_copy_readme_md_to_index_md,
                "--legacyCopyReadmeMdToIndexMd",
            ),
            (config.verbose, "--verbose"),
        ];
        args.extend(
            toggles
                .into_iter()
                .filter(|(enabled, _)| *enabled)
                .map(|(_, flag)| OsString::from(flag)),
        );

        args
    }

    fn publish_args(
        &self,
        site_dir: &Path,
        entity: &EntityKey,
        storage: &StorageTarget<'_>,
    ) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "publish".into(),
            "--publisher-type".into(),
            storage.driver.as_str().into(),
            "--storage-name".into(),
            OsString::from(&storage.config.name),
            "--entity".into(),
            entity.as_str().into(),
            "--directory".into(),
            site_dir.into(),
        ];

        for field in storage
            .config
            .credentials(storage.driver)
            .iter()
            .filter(|field| field.is_set())
        {
            args.extend([
                OsString::from(format!("--{}", field.flag)),
                OsString::from(field.value),
            ]);
        }

        if self.config.legacy_use_case_sensitive_triplet_paths {
            args.push("--legacyUseCaseSensitiveTripletPaths".into());
        }
        if self.config.verbose {
            args.push("--verbose".into());
        }

        args
    }
}

impl Techdocs for TechdocsCli<'_> {
    fn generate(&self, source: &TechdocsSource) -> Result<PathBuf> {
        let args = self.generate_args(source);
        exec(Some(self.workspace), &self.config.command, &args)
            .context("techdocs generate failed")?;
        Ok(self.config.output_dir.clone())
    }

    fn publish(
        &self,
        site_dir: &Path,
        entity: &EntityKey,
        storage: &StorageTarget<'_>,
    ) -> Result<()> {
        let args = self.publish_args(site_dir, entity, storage);
        exec(Some(self.workspace), &self.config.command, &args)
            .context("techdocs publish failed")?;
        log!("publish"; "{entity} uploaded to {} `{}`", storage.driver, storage.config.name);
        Ok(())
    }
}
