use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::index::staged_entry::StagedEntry;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::artifacts::status::file_change::FileLabel;
use crate::artifacts::status::inspector::{Inspector, PathState};
use crate::errors::Result;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type LabelSet = BTreeMap<PathBuf, FileLabel>;

/// Label of every path known to HEAD's tree, the staging area or the working directory
pub fn inspect_paths(workspace: &Workspace, head_tree: &Tree, index: &Index) -> Result<LabelSet> {
    let mut working = BTreeMap::<PathBuf, ObjectId>::new();
    for path in workspace.list_files(None)? {
        let oid = workspace.parse_blob(&path)?.object_id()?;
        working.insert(path, oid);
    }

    let mut staged = BTreeMap::<&PathBuf, (&StagedEntry, Option<ObjectId>)>::new();
    for (path, entry) in index.entries() {
        staged.insert(path, (entry, entry.blob_oid()?));
    }

    let paths = working
        .keys()
        .chain(head_tree.paths())
        .chain(index.paths())
        .cloned()
        .collect::<BTreeSet<_>>();

    let labels = paths
        .into_iter()
        .map(|path| {
            let state = PathState {
                head: head_tree.entry(&path).map(|entry| &entry.oid),
                staged: staged
                    .get(&path)
                    .map(|(entry, oid)| (*entry, oid.as_ref())),
                working: working.get(&path),
            };
            let label = Inspector::classify(state);
            tracing::trace!(path = %path.display(), ?label, "classified");

            (path, label)
        })
        .collect();

    Ok(labels)
}

/// Working files that are not part of the next commit
pub fn untracked_paths(labels: &LabelSet) -> BTreeSet<PathBuf> {
    labels
        .iter()
        .filter(|(_, label)| **label == FileLabel::Untracked)
        .map(|(path, _)| path.clone())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchStatus {
    pub name: BranchName,
    pub current: bool,
}

/// Everything `status` reports; every list is sorted
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusInfo {
    pub branches: Vec<BranchStatus>,
    /// Staged additions whose working copy still matches
    pub staged: Vec<PathBuf>,
    /// Staged removals
    pub removed: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub untracked: Vec<PathBuf>,
}

impl StatusInfo {
    pub fn new(branches: Vec<BranchStatus>, labels: &LabelSet, index: &Index) -> Self {
        let mut status = StatusInfo {
            branches,
            ..Default::default()
        };

        for (path, label) in labels {
            match label {
                FileLabel::Unmodified => match index.entry(path) {
                    Some(StagedEntry::Add(_)) => status.staged.push(path.clone()),
                    Some(StagedEntry::Remove) => status.removed.push(path.clone()),
                    None => {}
                },
                FileLabel::Modified => status.modified.push(path.clone()),
                FileLabel::Deleted => status.deleted.push(path.clone()),
                FileLabel::Untracked => status.untracked.push(path.clone()),
            }
        }

        status
    }

    pub fn is_clean(&self) -> bool {
        self.staged.is_empty()
            && self.removed.is_empty()
            && self.modified.is_empty()
            && self.deleted.is_empty()
            && self.untracked.is_empty()
    }
}
