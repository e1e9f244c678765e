use crate::areas::repository::Repository;
use crate::artifacts::objects::object::Object;
use crate::errors::{RepositoryError, Result};
use std::path::Path;

impl Repository {
    /// Stage the current content of `path`, or of every file below it for a directory
    ///
    /// Content identical to HEAD's version is not staged, and any earlier staging of the path
    /// is dropped.
    pub fn add(&self, path: impl AsRef<Path>) -> Result<()> {
        self.ensure_initialized()?;

        let path = self.relative_path(path.as_ref())?;
        if !self.workspace().file_exists(&path) && !self.workspace().is_dir(&path) {
            return Err(RepositoryError::FileNotFound(path));
        }

        let head_tree = self.head_tree()?;
        let mut index = self.load_index()?;

        for file in self.workspace().list_files(Some(path.as_path()))? {
            let blob = self.workspace().parse_blob(&file)?;
            let blob_id = blob.object_id()?;

            if head_tree.entry(&file).is_some_and(|entry| entry.oid == blob_id) {
                if index.unstage(&file).is_some() {
                    tracing::debug!(path = %file.display(), "content matches HEAD, unstaged");
                }
            } else {
                tracing::debug!(path = %file.display(), oid = %blob_id, "staged");
                index.add(file, blob);
            }
        }

        index.write_updates()
    }
}
