use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::index::staged_entry::StagedEntry;
use crate::artifacts::objects::commit::{Commit, load_timestamp_from_env};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::errors::{RepositoryError, Result};

impl Repository {
    /// Snapshot the staged changes on top of the current branch tip
    pub fn commit(&self, message: &str) -> Result<ObjectId> {
        self.ensure_initialized()?;

        if message.is_empty() {
            return Err(RepositoryError::EmptyMessage);
        }

        let mut index = self.load_index()?;
        if index.is_empty() {
            return Err(RepositoryError::NothingToCommit);
        }

        let parent = self.refs().read_head()?;
        self.write_commit(&mut index, parent, None, message)
    }

    /// Write a commit from `parent`'s tree with the staged entries applied, move the current
    /// branch to it and clear the staging area
    ///
    /// Staged blobs, the tree and the commit are stored in that order, so the branch only ever
    /// points at a commit whose objects are all present.
    pub(crate) fn write_commit(
        &self,
        index: &mut Index,
        parent: ObjectId,
        second_parent: Option<ObjectId>,
        message: &str,
    ) -> Result<ObjectId> {
        let mut tree = self.commit_tree(&parent)?;

        for (path, entry) in index.entries() {
            match entry {
                StagedEntry::Add(blob) => {
                    let blob_id = self.database().store(blob)?;
                    tree.add_entry(TreeEntry::new(path.clone(), blob_id));
                }
                StagedEntry::Remove => {
                    tree.remove_entry(path);
                }
            }
        }

        let tree_oid = if tree.is_empty() {
            None
        } else {
            Some(self.database().store(&tree)?)
        };

        let branch = self.refs().current_branch()?;
        let commit = Commit::new(
            tree_oid,
            Some(parent),
            second_parent,
            load_timestamp_from_env()?,
            branch.to_string(),
            message.to_string(),
        );
        let commit_id = self.database().store(&commit)?;
        self.refs().update_branch(&branch, &commit_id)?;

        index.clear();
        index.write_updates()?;

        tracing::info!(oid = %commit_id, %branch, files = tree.len(), "committed");

        Ok(commit_id)
    }
}
