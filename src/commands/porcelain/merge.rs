use crate::areas::index::Index;
use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::merge::conflict::conflict_content;
use crate::artifacts::merge::merge_base::MergeBaseFinder;
use crate::artifacts::merge::tree_merge::{MergePlan, Resolution, diff_trees_with_base};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::{inspect_paths, untracked_paths};
use crate::errors::{DirtyState, RepositoryError, Result};
use std::collections::BTreeSet;
use std::path::PathBuf;

/// What a successful `merge` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Both branches point at the same commit
    NothingToMerge,
    /// The given branch is an ancestor of the current branch
    AlreadyAncestor,
    /// The current branch was behind and now points at the incoming tip
    FastForwarded,
    /// A merge commit was written; `conflicted` is set when conflict markers were staged
    Merged { commit: ObjectId, conflicted: bool },
}

impl Repository {
    /// Merge the branch `branch` into the current branch
    pub fn merge(&self, branch: &str) -> Result<MergeOutcome> {
        self.ensure_initialized()?;

        let current_branch = self.refs().current_branch()?;
        if current_branch.as_ref() == branch {
            return Err(RepositoryError::SelfMerge);
        }

        let mut index = self.load_index()?;
        if !index.is_empty() {
            return Err(RepositoryError::DirtyWorkingTree(DirtyState::PendingChanges));
        }

        let (incoming_branch, incoming_oid) = self.resolve_branch(branch)?;
        let current_oid = self.refs().read_head()?;
        if current_oid == incoming_oid {
            return Ok(MergeOutcome::NothingToMerge);
        }

        let base_oid = self.merge_base(&current_oid, &incoming_oid)?;
        tracing::debug!(
            base = %base_oid,
            current = %current_oid,
            incoming = %incoming_oid,
            "found merge base"
        );

        if base_oid == incoming_oid {
            return Ok(MergeOutcome::AlreadyAncestor);
        }

        let head_tree = self.commit_tree(&current_oid)?;
        let incoming_tree = self.commit_tree(&incoming_oid)?;
        let untracked = untracked_paths(&inspect_paths(self.workspace(), &head_tree, &index)?);

        if base_oid == current_oid {
            if let Some(path) = Migration::find_untracked_obstruction(&incoming_tree, &untracked) {
                return Err(RepositoryError::DirtyWorkingTree(
                    DirtyState::UntrackedInTheWay(path),
                ));
            }

            let migration = Migration::plan(self.database(), &head_tree, &incoming_tree)?;
            self.workspace().apply_migration(&migration)?;
            self.refs().update_branch(&current_branch, &incoming_oid)?;
            index.clear();
            index.write_updates()?;

            tracing::info!(branch = %current_branch, oid = %incoming_oid, "fast-forwarded");
            return Ok(MergeOutcome::FastForwarded);
        }

        let base_tree = self.commit_tree(&base_oid)?;
        let plan = diff_trees_with_base(&base_tree, &incoming_tree, &head_tree);
        if let Some(path) = Self::untracked_overwritten_by(&plan, &untracked) {
            return Err(RepositoryError::DirtyWorkingTree(
                DirtyState::UntrackedInTheWay(path),
            ));
        }

        let conflicted = self.apply_merge_plan(&plan, &mut index)?;
        let message = format!("Merged {incoming_branch} into {current_branch}.");
        let commit = self.write_commit(&mut index, current_oid, Some(incoming_oid), &message)?;

        if conflicted {
            tracing::warn!(oid = %commit, "merge committed with conflicts");
        }
        tracing::info!(oid = %commit, branch = %incoming_branch, "merged");

        Ok(MergeOutcome::Merged { commit, conflicted })
    }

    fn merge_base(&self, current: &ObjectId, incoming: &ObjectId) -> Result<ObjectId> {
        let finder = MergeBaseFinder::new(|oid: &ObjectId| -> Result<SlimCommit> {
            Ok(self.load_commit(oid)?.to_slim(oid.clone()))
        });

        finder.find_merge_base(current, incoming)?.ok_or_else(|| {
            RepositoryError::corrupted(
                current,
                format!("no common ancestor with {incoming}"),
            )
        })
    }

    fn untracked_overwritten_by(
        plan: &MergePlan,
        untracked: &BTreeSet<PathBuf>,
    ) -> Option<PathBuf> {
        plan.iter()
            .filter(|(_, resolution)| {
                matches!(
                    resolution,
                    Resolution::TakeIncoming(_) | Resolution::Conflict { .. }
                )
            })
            .map(|(path, _)| path)
            .find(|path| untracked.contains(*path))
            .cloned()
    }

    /// Write the resolved paths to the working tree and stage them; returns whether any path
    /// conflicted
    fn apply_merge_plan(&self, plan: &MergePlan, index: &mut Index) -> Result<bool> {
        let mut conflicted = false;

        for (path, resolution) in plan {
            tracing::debug!(path = %path.display(), ?resolution, "resolved path");

            match resolution {
                Resolution::KeepCurrent | Resolution::KeepAbsent => {}
                Resolution::TakeIncoming(oid) => {
                    let blob = self.database().get_referenced::<Blob>(oid)?;
                    self.workspace().write_file(path, blob.content())?;
                    index.add(path.clone(), blob);
                }
                Resolution::Remove => {
                    self.workspace().delete_file(path)?;
                    index.mark_removed(path.clone());
                }
                Resolution::Conflict { current, incoming } => {
                    let current = self.blob_content(current.as_ref())?;
                    let incoming = self.blob_content(incoming.as_ref())?;
                    let content = conflict_content(
                        current.as_ref().map(|blob| &blob.content()[..]),
                        incoming.as_ref().map(|blob| &blob.content()[..]),
                    );

                    self.workspace().write_file(path, &content)?;
                    index.add(path.clone(), Blob::new(content));
                    conflicted = true;
                }
            }
        }

        Ok(conflicted)
    }

    fn blob_content(&self, oid: Option<&ObjectId>) -> Result<Option<Blob>> {
        oid.map(|oid| self.database().get_referenced::<Blob>(oid))
            .transpose()
    }
}
