//! Branch pointers and HEAD
//!
//! ## File Format
//!
//! - `HEAD` holds the name of the current branch
//! - `branches/<name>` holds the 40-character ID of the branch tip
//!
//! Hierarchical names (`feature/x`) map to nested directories; directories left empty by a
//! deleted branch are pruned.

use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use derive_new::new;
use std::path::Path;
use walkdir::WalkDir;

/// Name of the file holding the current branch
pub const HEAD_REF_NAME: &str = "HEAD";

/// Directory holding one file per branch
pub const BRANCHES_DIR: &str = "branches";

#[derive(Debug, new)]
pub struct Refs {
    /// Path to the repository directory (`.gitlet`)
    path: Box<Path>,
}

impl Refs {
    /// Name of the current branch
    pub fn current_branch(&self) -> Result<BranchName> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path)
            .with_context(|| format!("failed to read {}", head_path.display()))?;

        BranchName::try_parse(content.trim().to_string())
            .map_err(|e| RepositoryError::corrupted(HEAD_REF_NAME, format!("{e:#}")))
    }

    pub fn is_current_branch(&self, branch_name: &BranchName) -> Result<bool> {
        Ok(branch_name == &self.current_branch()?)
    }

    /// Make `branch_name` the current branch
    pub fn set_head(&self, branch_name: &BranchName) -> Result<()> {
        self.write_ref_file(&self.head_path(), branch_name.as_ref())?;
        tracing::debug!(branch = %branch_name, "moved HEAD");
        Ok(())
    }

    /// Tip of the current branch
    pub fn read_head(&self) -> Result<ObjectId> {
        let current_branch = self.current_branch()?;

        self.read_branch(&current_branch)?.ok_or_else(|| {
            RepositoryError::corrupted(
                HEAD_REF_NAME,
                format!("current branch {current_branch} has no tip"),
            )
        })
    }

    /// Tip of `branch_name`, `None` when the branch does not exist
    pub fn read_branch(&self, branch_name: &BranchName) -> Result<Option<ObjectId>> {
        let branch_path = self.branches_path().join(branch_name.as_ref());
        if !branch_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&branch_path)
            .with_context(|| format!("failed to read ref file at {}", branch_path.display()))?;

        ObjectId::try_parse(content.trim().to_string())
            .map(Some)
            .map_err(|e| RepositoryError::corrupted(branch_path.display(), format!("{e:#}")))
    }

    /// Existing branch whose file would collide with `branch_name`
    ///
    /// Branch files live at paths built from their names, so `feature` and `feature/x` cannot
    /// both exist. The branch itself, a branch named after one of its parent directories, or a
    /// branch nested below it all count.
    pub fn conflicting_branch(&self, branch_name: &BranchName) -> Result<Option<String>> {
        let branches_path = self.branches_path();

        let taken = Path::new(branch_name.as_ref())
            .ancestors()
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .find(|ancestor| branches_path.join(ancestor).is_file());
        if let Some(taken) = taken {
            return Ok(Some(taken.to_string_lossy().into_owned()));
        }

        if !branches_path.join(branch_name.as_ref()).is_dir() {
            return Ok(None);
        }
        let nested_prefix = format!("{branch_name}/");
        let nested = self
            .list_branches()?
            .into_iter()
            .find(|branch| branch.as_ref().starts_with(&nested_prefix))
            .map(|branch| branch.to_string());

        Ok(nested)
    }

    /// Point `branch_name` at `oid`, creating the branch if needed
    pub fn update_branch(&self, branch_name: &BranchName, oid: &ObjectId) -> Result<()> {
        let branch_path = self.branches_path().join(branch_name.as_ref());
        self.write_ref_file(&branch_path, oid.as_ref())?;

        tracing::debug!(branch = %branch_name, %oid, "updated branch");
        Ok(())
    }

    /// Remove the pointer `branch_name` and return the commit it pointed at
    pub fn delete_branch(&self, branch_name: &BranchName) -> Result<ObjectId> {
        let branch_path = self.branches_path().join(branch_name.as_ref());

        let oid = self
            .read_branch(branch_name)?
            .ok_or_else(|| RepositoryError::NoSuchBranch(branch_name.to_string()))?;
        std::fs::remove_file(&branch_path)
            .with_context(|| format!("failed to delete branch file at {}", branch_path.display()))?;
        self.prune_branch_empty_parent_dirs(&branch_path)?;

        Ok(oid)
    }

    /// All branches, sorted by name
    pub fn list_branches(&self) -> Result<Vec<BranchName>> {
        let branches_path = self.branches_path();
        let mut branches = vec![];

        for entry in WalkDir::new(&branches_path).min_depth(1) {
            let entry = entry.context("failed to list branches")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let relative_path = entry
                .path()
                .strip_prefix(&branches_path)
                .context("branch file outside of the branches directory")?;
            let name = relative_path
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            branches.push(
                BranchName::try_parse(name)
                    .map_err(|e| RepositoryError::corrupted(BRANCHES_DIR, format!("{e:#}")))?,
            );
        }
        branches.sort();

        Ok(branches)
    }

    fn write_ref_file(&self, path: &Path, content: &str) -> Result<()> {
        // create all the parent directories if they don't exist
        let parent = path
            .parent()
            .with_context(|| format!("invalid ref file path {}", path.display()))?;
        std::fs::create_dir_all(parent).with_context(|| {
            format!(
                "failed to create parent directories for ref file at {}",
                path.display()
            )
        })?;

        std::fs::write(path, content)
            .with_context(|| format!("failed to write ref file at {}", path.display()))?;

        Ok(())
    }

    fn prune_branch_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.branches_path().as_ref()
            && parent.read_dir()?.next().is_none()
        {
            std::fs::remove_dir(parent).with_context(|| {
                format!(
                    "failed to remove empty branch directory at {}",
                    parent.display()
                )
            })?;
            self.prune_branch_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join(HEAD_REF_NAME).into_boxed_path()
    }

    pub fn branches_path(&self) -> Box<Path> {
        self.path.join(BRANCHES_DIR).into_boxed_path()
    }
}
