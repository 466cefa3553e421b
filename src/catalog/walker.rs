//! Descriptor discovery.
//!
//! Builds the frontier of descriptor files to read, either from a directory
//! tree (Path mode) or from a root catalog file (File mode).
//!
//! # Traversal
//!
//! ```text
//! frontier: [root.yaml]
//!              │ read_all → Location targets a.yml, b.yml
//!              ▼
//! frontier: [root.yaml, a.yml, b.yml]
//!                         │ read_all → Location target c.yml
//!                         ▼
//! frontier: [root.yaml, a.yml, b.yml, c.yml]
//! ```
//!
//! Targets are appended to the end of the queue, so a path is never read
//! before anything discovered earlier. A path already in the frontier is
//! not queued again, which also ends cyclic Location chains.

use super::descriptor::{self, Descriptor, DescriptorError};
use crate::{
    log,
    logger::{Annotation, annotate},
    pipeline::ErrorPolicy,
};
use anyhow::{Result, bail};
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};
use walkdir::WalkDir;

/// Files never treated as descriptor candidates
const IGNORED_FILES: &[&str] = &[".DS_Store"];

/// Directories never descended into during the Path mode walk
const IGNORED_DIRS: &[&str] = &[".git"];

/// Result of reading one frontier entry.
pub type DescriptorOutcome = Result<Descriptor, DescriptorError>;

/// Every descriptor file discovered, with the tolerance its mode implies.
#[derive(Debug)]
pub struct Catalog {
    pub policy: ErrorPolicy,
    /// One outcome per frontier path, in frontier order.
    pub outcomes: Vec<DescriptorOutcome>,
}

#[cfg(test)]
impl Catalog {
    /// The frontier paths in the order they were read.
    pub fn frontier(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                Ok(descriptor) => descriptor.path.as_path(),
                Err(err) => err.path(),
            })
            .collect()
    }
}

/// Append-only queue of descriptor paths with a visited set.
#[derive(Debug, Default)]
struct Frontier {
    queue: Vec<PathBuf>,
    seen: HashSet<PathBuf>,
}

impl Frontier {
    /// Queue `path` unless it is already known. Returns whether it was added.
    fn push(&mut self, path: PathBuf) -> bool {
        if self.seen.insert(path.clone()) {
            self.queue.push(path);
            true
        } else {
            false
        }
    }

    /// Read every queued path, following Location targets as they appear.
    fn drain(mut self) -> Vec<DescriptorOutcome> {
        let mut outcomes = Vec::with_capacity(self.queue.len());
        let mut next = 0;

        while let Some(path) = self.queue.get(next).cloned() {
            next += 1;

            let outcome = descriptor::read_all(&path);
            if let Ok(descriptor) = &outcome {
                log!(
                    "catalog";
                    "{}: {} entities",
                    descriptor.path.display(),
                    descriptor.entities.len()
                );
                for target in &descriptor.targets {
                    if !self.push(target.clone()) {
                        let message =
                            format!("{} already queued, not following it again", target.display());
                        log!("catalog"; "{message}");
                        annotate(Annotation::Warning, &message);
                    }
                }
            }
            outcomes.push(outcome);
        }

        outcomes
    }
}

/// Path mode: every regular file under `root`, in lexicographic order.
///
/// Failures are kept as outcomes; the pipeline skips them. Entries the walk
/// itself could not read come first.
pub fn walk_path(root: &Path) -> Result<Catalog> {
    if !root.is_dir() {
        bail!("publish-looking-path `{}` is not a directory", root.display());
    }

    let mut frontier = Frontier::default();
    let mut outcomes = Vec::new();
    for entry in collect_all_files(root) {
        match entry {
            Ok(path) => {
                frontier.push(path);
            }
            Err(err) => outcomes.push(Err(err)),
        }
    }
    log!("catalog"; "found {} files under {}", frontier.queue.len(), root.display());

    outcomes.extend(frontier.drain());
    Ok(Catalog {
        policy: ErrorPolicy::Lenient,
        outcomes,
    })
}

/// File mode: `catalog` followed by every descriptor reachable through its
/// Location entities.
///
/// Any failed outcome aborts the run before publication.
pub fn walk_file(catalog: &Path) -> Result<Catalog> {
    let mut frontier = Frontier::default();
    frontier.push(catalog.to_path_buf());

    let outcomes = frontier.drain();
    log!("catalog"; "expanded {} into {} descriptors", catalog.display(), outcomes.len());

    Ok(Catalog {
        policy: ErrorPolicy::Strict,
        outcomes,
    })
}

/// Collect regular files recursively, sorted for a stable frontier order.
///
/// Unreadable entries become [`DescriptorError::Io`] instead of vanishing.
fn collect_all_files(dir: &Path) -> Vec<Result<PathBuf, DescriptorError>> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            !(e.file_type().is_dir()
                && e.depth() > 0
                && IGNORED_DIRS.contains(&e.file_name().to_str().unwrap_or_default()))
        })
        .filter_map(|entry| match entry {
            Ok(e) => {
                let name = e.file_name().to_str().unwrap_or_default();
                (e.file_type().is_file() && !IGNORED_FILES.contains(&name))
                    .then(|| Ok(e.into_path()))
            }
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                Some(Err(DescriptorError::Io(path, err.into())))
            }
        })
        .collect()
}
