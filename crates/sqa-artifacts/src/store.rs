use std::collections::HashSet;
use std::path::{Path, PathBuf};

use sqa_core::{Artifact, ArtifactKind, StageError, TestCase};
use tracing::info;

use crate::report::render_report;

/// Write sink for run outputs.
pub trait OutputStore: Send + Sync {
    /// Overwrites the text report at `path`.
    fn write_report(&self, path: &Path, cases: &[TestCase]) -> Result<(), StageError>;
    /// Writes one file per artifact under `<root>/<run_id>/<kind dir>/`.
    fn write_artifacts(&self, run_id: &str, kind: ArtifactKind, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, StageError>;
}

#[derive(Clone)]
pub struct FsOutputStore {
    pub root: Option<PathBuf>,
}

impl FsOutputStore {
    /// Store that writes reports only.
    pub fn report_only() -> Self {
        Self { root: None }
    }

    pub fn new(root: PathBuf) -> Self {
        Self { root: Some(root) }
    }

    pub fn run_dir(&self, run_id: &str) -> Option<PathBuf> {
        self.root.as_ref().map(|r| r.join(run_id))
    }
}

/// Keeps story keys usable as file names.
pub fn file_stem(story_id: &str) -> String {
    let stem: String = story_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();
    if stem.is_empty() || stem.chars().all(|c| c == '.') {
        return "_".to_string();
    }
    stem
}

/// `stem`, or `stem-2`, `stem-3`, ... when an earlier artifact already claimed it.
fn unique_stem(stem: String, taken: &mut HashSet<String>) -> String {
    if taken.insert(stem.clone()) {
        return stem;
    }
    let mut n = 2;
    loop {
        let candidate = format!("{stem}-{n}");
        if taken.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

impl OutputStore for FsOutputStore {
    fn write_report(&self, path: &Path, cases: &[TestCase]) -> Result<(), StageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StageError::io(parent, e))?;
        }
        std::fs::write(path, render_report(cases)).map_err(|e| StageError::io(path, e))?;
        info!("test cases saved to {}", path.display());
        Ok(())
    }

    fn write_artifacts(&self, run_id: &str, kind: ArtifactKind, artifacts: &[Artifact]) -> Result<Vec<PathBuf>, StageError> {
        let Some(run_dir) = self.run_dir(run_id) else {
            return Ok(vec![]);
        };
        let dir = run_dir.join(kind.dir_name());
        std::fs::create_dir_all(&dir).map_err(|e| StageError::io(&dir, e))?;

        let mut taken = HashSet::new();
        let mut written = Vec::with_capacity(artifacts.len());
        for artifact in artifacts {
            let stem = unique_stem(file_stem(&artifact.story_id), &mut taken);
            let path = dir.join(format!("{stem}.{}", kind.file_extension()));
            std::fs::write(&path, &artifact.content).map_err(|e| StageError::io(&path, e))?;
            written.push(path);
        }
        info!("wrote {} {:?} artifacts to {}", written.len(), kind, dir.display());
        Ok(written)
    }
}
