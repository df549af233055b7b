//! Persisted directory layout (spec §6):
//!
//! ```text
//! cache/
//!   datasets/<datasetId>/{train.txt, valid.txt, meta.json, latest.json}
//!   models/<engine>/<datasetId>/<modelId>/{model.json, meta.json, facts.json, checkpoint.json?}
//!   models/<engine>/<datasetId>/latest.json
//! ```
//!
//! Directory creation follows the teacher's `ExistingDir` idiom: canonicalize,
//! auto-create missing components, reject anything that isn't a directory.

use std::path::{Path, PathBuf};

use crate::error::CoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingDir(PathBuf);

impl ExistingDir {
    pub fn new(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let canonical = match path.canonicalize() {
            Ok(p) => p,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                std::fs::create_dir_all(path)
                    .map_err(|e| CoreError::io("create directory", path, e))?;
                path.canonicalize()
                    .map_err(|e| CoreError::io("canonicalize path", path, e))?
            }
            Err(e) => return Err(CoreError::io("canonicalize path", path, e)),
        };
        if !canonical.is_dir() {
            return Err(CoreError::Content(format!(
                "{} exists but is not a directory",
                canonical.display()
            )));
        }
        Ok(ExistingDir(canonical))
    }

    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn join(&self, child: impl AsRef<Path>) -> PathBuf {
        self.0.join(child)
    }
}

pub struct CacheLayout {
    root: ExistingDir,
}

impl CacheLayout {
    pub fn new(root: impl AsRef<Path>) -> Result<Self, CoreError> {
        Ok(CacheLayout {
            root: ExistingDir::new(root)?,
        })
    }

    pub fn dataset_dir(&self, dataset_id: &str) -> Result<ExistingDir, CoreError> {
        ExistingDir::new(self.root.join("datasets").join(dataset_id))
    }

    pub fn model_dir(
        &self,
        engine: &str,
        dataset_id: &str,
        model_id: &str,
    ) -> Result<ExistingDir, CoreError> {
        ExistingDir::new(
            self.root
                .join("models")
                .join(engine)
                .join(dataset_id)
                .join(model_id),
        )
    }

    pub fn engine_dataset_dir(
        &self,
        engine: &str,
        dataset_id: &str,
    ) -> Result<ExistingDir, CoreError> {
        ExistingDir::new(self.root.join("models").join(engine).join(dataset_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_creates_nested_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = CacheLayout::new(tmp.path()).unwrap();
        let model_dir = layout
            .model_dir("mum", "wikitext_tiny", "k4_mu512")
            .unwrap();
        assert!(model_dir.as_path().is_dir());
        assert!(model_dir.as_path().ends_with("models/mum/wikitext_tiny/k4_mu512"));
    }

    #[test]
    fn existing_dir_rejects_regular_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        assert!(ExistingDir::new(tmp.path()).is_err());
    }
}
