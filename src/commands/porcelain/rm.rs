use crate::areas::repository::Repository;
use crate::artifacts::index::staged_entry::StagedEntry;
use crate::errors::{RepositoryError, Result};
use std::path::Path;

impl Repository {
    /// Unstage `path`, or stop tracking it and delete the working file
    ///
    /// A path staged for addition is only unstaged and its working file is kept. A path tracked
    /// by HEAD is staged for removal and deleted from the working directory.
    pub fn rm(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_initialized()?;

        let path = self.relative_path(path.as_ref())?;
        let head_tree = self.head_tree()?;
        let mut index = self.load_index()?;

        match index.entry(&path) {
            Some(StagedEntry::Add(_)) => {
                index.unstage(&path);
                tracing::debug!(path = %path.display(), "unstaged");
            }
            _ if head_tree.contains(&path) => {
                self.workspace().delete_file(&path)?;
                tracing::debug!(path = %path.display(), "staged removal");
                index.mark_removed(path);
            }
            _ => return Err(RepositoryError::NothingToRemove),
        }

        index.write_updates()
    }
}
