use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{BranchStatus, StatusInfo, inspect_paths};
use crate::errors::Result;

impl Repository {
    pub fn status(&self) -> Result<StatusInfo> {
        self.ensure_initialized()?;

        let current_branch = self.refs().current_branch()?;
        let branches = self
            .refs()
            .list_branches()?
            .into_iter()
            .map(|name| BranchStatus {
                current: name == current_branch,
                name,
            })
            .collect();

        let head_tree = self.head_tree()?;
        let index = self.load_index()?;
        let labels = inspect_paths(self.workspace(), &head_tree, &index)?;

        Ok(StatusInfo::new(branches, &labels, &index))
    }
}
