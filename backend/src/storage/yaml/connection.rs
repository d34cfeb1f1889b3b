use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Handle to the on-disk data directory.
///
/// Collections live in one YAML file each, grouped per organisation
/// (`{base}/{organisation_id}/children.yaml`, ...). Global collections such
/// as affiliate applications sit directly under the base directory. The
/// per-organisation layout is what enforces tenant isolation: a repository
/// can only ever read the directory it asked the connection for.
pub struct Connection {
    base_directory: PathBuf,
}

impl Connection {
    pub fn new(base_directory: impl Into<PathBuf>) -> Result<Self> {
        let base_directory = base_directory.into();
        fs::create_dir_all(&base_directory)
            .with_context(|| format!("Failed to create data directory {:?}", base_directory))?;
        Ok(Self { base_directory })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    pub fn organisation_file(&self, organisation_id: &str, file_name: &str) -> PathBuf {
        self.base_directory.join(organisation_id).join(file_name)
    }

    pub fn global_file(&self, file_name: &str) -> PathBuf {
        self.base_directory.join(file_name)
    }

    /// Load a whole collection. A missing file is an empty collection.
    pub fn read_collection<T: DeserializeOwned>(&self, path: &Path) -> Result<Vec<T>> {
        if !path.exists() {
            debug!("Collection file {:?} does not exist yet, returning empty", path);
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read collection file {:?}", path))?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse collection file {:?}", path))
    }

    /// Replace a whole collection. Atomic write via temp file + rename.
    pub fn write_collection<T: Serialize>(&self, path: &Path, items: &[T]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {:?}", parent))?;
        }
        let content = serde_yaml::to_string(items)
            .context("Failed to serialize collection")?;
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write temp file {:?}", temp_path))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace collection file {:?}", path))?;
        Ok(())
    }
}
