use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::{inspect_paths, untracked_paths};
use crate::errors::{RepositoryError, Result};
use std::path::PathBuf;

/// What `checkout` restores
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutTarget {
    /// A file as of HEAD
    File(PathBuf),
    /// A file as of the given (possibly abbreviated) commit
    CommitFile { commit: String, path: PathBuf },
    /// Every file of a branch tip, making it the current branch
    Branch(String),
}

impl Repository {
    pub fn checkout(&self, target: CheckoutTarget) -> Result<()> {
        self.ensure_initialized()?;

        match target {
            CheckoutTarget::File(path) => {
                let head = self.refs().read_head()?;
                self.restore_file(&head, path)
            }
            CheckoutTarget::CommitFile { commit, path } => {
                let commit_id = self.database().resolve_commit(&commit)?;
                self.restore_file(&commit_id, path)
            }
            CheckoutTarget::Branch(name) => self.checkout_branch(&name),
        }
    }

    fn restore_file(&self, commit_id: &ObjectId, path: PathBuf) -> Result<()> {
        let path = self.relative_path(&path)?;
        let tree = self.commit_tree(commit_id)?;

        let entry = tree
            .entry(&path)
            .ok_or_else(|| RepositoryError::FileNotInCommit(path.clone()))?;
        let blob = self.database().get_referenced::<Blob>(&entry.oid)?;
        self.workspace().write_file(&path, blob.content())?;

        let mut index = self.load_index()?;
        index.unstage(&path);
        index.write_updates()?;

        tracing::info!(path = %path.display(), commit = %commit_id, "restored file");
        Ok(())
    }

    fn checkout_branch(&self, name: &str) -> Result<()> {
        let (branch_name, tip) = self.resolve_branch(name)?;
        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::AlreadyOnBranch(name.to_string()));
        }

        self.switch_to(&tip)?;
        self.refs().set_head(&branch_name)?;

        tracing::info!(branch = %branch_name, "switched branch");
        Ok(())
    }

    /// Replace the tracked files of HEAD with those of `target` and clear the staging area
    ///
    /// Fails before touching anything when an untracked working file would be overwritten.
    pub(crate) fn switch_to(&self, target: &ObjectId) -> Result<()> {
        let head_tree = self.head_tree()?;
        let target_tree = self.commit_tree(target)?;
        let mut index = self.load_index()?;

        let labels = inspect_paths(self.workspace(), &head_tree, &index)?;
        if let Some(path) =
            Migration::find_untracked_obstruction(&target_tree, &untracked_paths(&labels))
        {
            return Err(RepositoryError::UntrackedObstruction(path));
        }

        let migration = Migration::plan(self.database(), &head_tree, &target_tree)?;
        self.workspace().apply_migration(&migration)?;

        index.clear();
        index.write_updates()
    }
}
