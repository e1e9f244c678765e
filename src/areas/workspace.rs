use crate::artifacts::checkout::migration::{ActionType, Migration};
use crate::artifacts::objects::blob::Blob;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use bytes::Bytes;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory holding the repository itself; never part of the working tree
pub const REPOSITORY_DIR: &str = ".gitlet";

const IGNORED_PATHS: [&str; 1] = [REPOSITORY_DIR];

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn parse_blob(&self, path: &Path) -> Result<Blob> {
        let data = self.read_file(path)?;
        Ok(Blob::new(data))
    }

    /// Files below `root` (the whole working tree when `None`), relative to the workspace
    /// root and sorted by path
    ///
    /// A `root` naming a single file yields just that file.
    pub fn list_files(&self, root: Option<&Path>) -> Result<Vec<PathBuf>> {
        let root_path = match root {
            Some(path) => self.path.join(path),
            None => self.path.to_path_buf(),
        };

        if !root_path.exists() {
            return Err(RepositoryError::FileNotFound(
                root.map(Path::to_path_buf).unwrap_or_default(),
            ));
        }

        let mut files = vec![];
        let walker = WalkDir::new(&root_path)
            .into_iter()
            .filter_entry(|entry| !Self::is_ignored(entry.file_name().to_string_lossy().as_ref()));

        for entry in walker {
            let entry = entry.context("Unable to walk the working directory")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(self.path.as_ref())
                .context("file outside of the working directory")?;
            files.push(relative_path.to_path_buf());
        }
        files.sort();

        Ok(files)
    }

    fn is_ignored(name: &str) -> bool {
        IGNORED_PATHS.contains(&name)
    }

    pub fn file_exists(&self, file_path: &Path) -> bool {
        self.path.join(file_path).is_file()
    }

    pub fn is_dir(&self, path: &Path) -> bool {
        self.path.join(path).is_dir()
    }

    pub fn read_file(&self, file_path: &Path) -> Result<Bytes> {
        let full_path = self.path.join(file_path);
        if !full_path.is_file() {
            return Err(RepositoryError::FileNotFound(file_path.to_path_buf()));
        }

        let content = std::fs::read(&full_path)
            .with_context(|| format!("Failed to read file: {}", file_path.display()))?;

        Ok(content.into())
    }

    /// Replace the content of `file_path`, creating missing parent directories
    pub fn write_file(&self, file_path: &Path, data: &[u8]) -> Result<()> {
        let full_path = self.path.join(file_path);

        if full_path.is_dir() {
            std::fs::remove_dir_all(&full_path).with_context(|| {
                format!("Failed to remove existing directory: {}", file_path.display())
            })?;
        }
        if let Some(parent) = full_path.parent() {
            self.make_directory(parent)?;
        }

        std::fs::write(&full_path, data)
            .with_context(|| format!("Failed to write to file: {}", file_path.display()))?;

        Ok(())
    }

    /// Delete `file_path` if present, then prune parent directories it left empty
    pub fn delete_file(&self, file_path: &Path) -> Result<()> {
        let full_path = self.path.join(file_path);
        if !full_path.is_file() {
            return Ok(());
        }

        std::fs::remove_file(&full_path)
            .with_context(|| format!("Failed to remove file: {}", file_path.display()))?;
        self.prune_empty_parent_dirs(&full_path)
    }

    /// Carry out a planned checkout: deletions first, then writes
    pub fn apply_migration(&self, migration: &Migration) -> Result<()> {
        for (file_path, _) in migration.actions_of(ActionType::Delete) {
            self.delete_file(file_path)?;
        }

        for action in [ActionType::Modify, ActionType::Add] {
            for (file_path, blob) in migration.actions_of(action) {
                let blob = blob.as_ref().with_context(|| {
                    format!("No content planned for {}", file_path.display())
                })?;
                self.write_file(file_path, blob.content())?;
            }
        }

        Ok(())
    }

    fn make_directory(&self, dir_path: &Path) -> Result<()> {
        // a file standing where a directory is needed is replaced
        for ancestor in dir_path.ancestors() {
            if ancestor == self.path.as_ref() {
                break;
            }
            if ancestor.is_file() {
                std::fs::remove_file(ancestor).with_context(|| {
                    format!("Failed to remove file in the way: {}", ancestor.display())
                })?;
            }
        }

        std::fs::create_dir_all(dir_path)
            .with_context(|| format!("Failed to create directory: {}", dir_path.display()))?;

        Ok(())
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.path.as_ref()
            && parent.starts_with(self.path.as_ref())
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!("Failed to remove empty directory: {}", parent.display())
            })?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }
}
