use crate::areas::repository::Repository;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

impl Repository {
    /// Check out every file of `commit` and move the current branch to it
    pub fn reset(&self, commit: &str) -> Result<ObjectId> {
        self.ensure_initialized()?;

        let commit_id = self.database().resolve_commit(commit)?;
        self.switch_to(&commit_id)?;

        let branch = self.refs().current_branch()?;
        self.refs().update_branch(&branch, &commit_id)?;

        tracing::info!(%branch, oid = %commit_id, "reset");
        Ok(commit_id)
    }
}
