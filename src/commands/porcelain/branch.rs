use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::errors::{RepositoryError, Result};

impl Repository {
    /// Create a branch pointing at the current tip; HEAD does not move
    pub fn branch(&self, name: &str) -> Result<()> {
        self.ensure_initialized()?;

        let branch_name = BranchName::try_parse(name.to_string())
            .map_err(|_| RepositoryError::InvalidBranchName(name.to_string()))?;
        if let Some(existing) = self.refs().conflicting_branch(&branch_name)? {
            return Err(RepositoryError::BranchAlreadyExists(existing));
        }

        let head = self.refs().read_head()?;
        self.refs().update_branch(&branch_name, &head)?;

        tracing::info!(branch = %branch_name, oid = %head, "created branch");
        Ok(())
    }

    /// Delete the branch pointer `name`; its commits stay in the store
    pub fn delete_branch(&self, name: &str) -> Result<()> {
        self.ensure_initialized()?;

        let (branch_name, _) = self.resolve_branch(name)?;
        if self.refs().is_current_branch(&branch_name)? {
            return Err(RepositoryError::CannotRemoveCurrentBranch);
        }

        let oid = self.refs().delete_branch(&branch_name)?;

        tracing::info!(branch = %branch_name, %oid, "deleted branch");
        Ok(())
    }
}
