//! Three-way tree comparison
//!
//! Each path in the union of the base, current and incoming trees is resolved by comparing the
//! blob IDs on the three sides:
//!
//! | base    | current   | incoming             | resolution     |
//! |---------|-----------|----------------------|----------------|
//! | present | = base    | ≠ base               | take incoming  |
//! | present | ≠ base    | = base               | keep current   |
//! | present | ≠ base    | ≠ base, = current    | keep current   |
//! | present | ≠ base    | ≠ base, ≠ current    | conflict       |
//! | present | = base    | absent               | remove         |
//! | present | absent    | = base               | keep absent    |
//! | present | ≠ base    | absent               | conflict       |
//! | present | absent    | ≠ base               | conflict       |
//! | absent  | present   | absent               | keep current   |
//! | absent  | absent    | present              | take incoming  |
//! | absent  | present   | present              | conflict       |
//!
//! A path added on both sides is a conflict even when both sides added the same content.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing to do; the current side already holds the result
    KeepCurrent,
    /// Neither the current nor the merged result has the path
    KeepAbsent,
    /// Write the incoming blob and stage it
    TakeIncoming(ObjectId),
    /// Delete the path and stage its removal
    Remove,
    /// Write conflict markers around both sides and stage the result
    Conflict {
        current: Option<ObjectId>,
        incoming: Option<ObjectId>,
    },
}

pub type MergePlan = BTreeMap<PathBuf, Resolution>;

/// Resolve every path of the three trees
pub fn diff_trees_with_base(base: &Tree, incoming: &Tree, current: &Tree) -> MergePlan {
    let paths = base
        .paths()
        .chain(incoming.paths())
        .chain(current.paths())
        .collect::<BTreeSet<_>>();

    paths
        .into_iter()
        .map(|path| {
            let resolution = resolve(
                oid_at(base, path),
                oid_at(current, path),
                oid_at(incoming, path),
            );
            tracing::debug!(path = %path.display(), ?resolution, "resolved merge path");

            (path.clone(), resolution)
        })
        .collect()
}

fn oid_at<'t>(tree: &'t Tree, path: &Path) -> Option<&'t ObjectId> {
    tree.entry(path).map(|entry| &entry.oid)
}

fn resolve(
    base: Option<&ObjectId>,
    current: Option<&ObjectId>,
    incoming: Option<&ObjectId>,
) -> Resolution {
    let conflict = || Resolution::Conflict {
        current: current.cloned(),
        incoming: incoming.cloned(),
    };

    match (base, current, incoming) {
        (Some(base), Some(current), Some(incoming)) => {
            if current == base && incoming != base {
                Resolution::TakeIncoming(incoming.clone())
            } else if current == base || incoming == base || incoming == current {
                Resolution::KeepCurrent
            } else {
                conflict()
            }
        }
        (Some(base), Some(current), None) if current == base => Resolution::Remove,
        (Some(_), Some(_), None) => conflict(),
        (Some(base), None, Some(incoming)) if incoming == base => Resolution::KeepAbsent,
        (Some(_), None, Some(_)) => conflict(),
        (Some(_), None, None) | (None, None, None) => Resolution::KeepAbsent,
        (None, Some(_), None) => Resolution::KeepCurrent,
        (None, None, Some(incoming)) => Resolution::TakeIncoming(incoming.clone()),
        (None, Some(_), Some(_)) => conflict(),
    }
}
