use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::{Commit, DEFAULT_BRANCH};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use std::fs;

impl Repository {
    /// Create the repository directory with the initial commit on `master`
    pub fn init(&self) -> Result<ObjectId> {
        if self.is_initialized() {
            return Err(RepositoryError::AlreadyInitialized);
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .gitlet/objects directory")?;
        fs::create_dir_all(self.refs().branches_path())
            .context("Failed to create .gitlet/branches directory")?;
        fs::write(self.index_path(), b"").context("Failed to create .gitlet/index file")?;

        let root_oid = self.database().store(&Commit::initial())?;
        let master = BranchName::try_parse(DEFAULT_BRANCH.to_string())?;
        self.refs().update_branch(&master, &root_oid)?;
        self.refs().set_head(&master)?;

        tracing::info!(path = %self.path().display(), root = %root_oid, "initialized repository");

        Ok(root_oid)
    }
}
