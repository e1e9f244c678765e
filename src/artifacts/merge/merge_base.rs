//! Merge base search
//!
//! Both commits are walked breadth-first at the same time, following first and second parents.
//! Every commit records which side reached it. A commit reached from both sides is a common
//! ancestor, and it passes a stale mark on to its own ancestors. Once the walk settles, the
//! common ancestors without a stale mark are the best common ancestors: none of them is an
//! ancestor of another.
//!
//! ```text
//!   A --- B --- C        current
//!          //!           D --- D1     incoming
//! ```
//!
//! Starting from `C` and `D1`, both sides reach `B`, and `A` is stale below it, so `B` is
//! returned. When one commit is an ancestor of the other, that commit is the result.
//!
//! Criss-cross histories can have several best common ancestors. The one that became common
//! first during the walk is returned.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use bitflags::bitflags;
use std::collections::{HashMap, VecDeque};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    struct VisitState: u8 {
        const FROM_CURRENT = 0b001;
        const FROM_INCOMING = 0b010;
        const COMMON = Self::FROM_CURRENT.bits() | Self::FROM_INCOMING.bits();
        /// Ancestor of a common ancestor
        const STALE = 0b100;
    }
}

/// Finds the merge base of two commits
///
/// The commit loader maps a commit ID to its parent links, which keeps the search independent
/// of where commits are stored.
pub struct MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    commit_loader: CommitLoaderFn,
}

impl<CommitLoaderFn> MergeBaseFinder<CommitLoaderFn>
where
    CommitLoaderFn: Fn(&ObjectId) -> Result<SlimCommit>,
{
    pub fn new(commit_loader: CommitLoaderFn) -> Self {
        Self { commit_loader }
    }

    /// Best common ancestor of `current` and `incoming`, `None` when the histories never meet
    pub fn find_merge_base(
        &self,
        current: &ObjectId,
        incoming: &ObjectId,
    ) -> Result<Option<ObjectId>> {
        if current == incoming {
            return Ok(Some(current.clone()));
        }

        let mut states = HashMap::<ObjectId, VisitState>::new();
        states.insert(current.clone(), VisitState::FROM_CURRENT);
        states.insert(incoming.clone(), VisitState::FROM_INCOMING);

        let mut parents_of = HashMap::<ObjectId, Vec<ObjectId>>::new();
        let mut common = Vec::<ObjectId>::new();
        let mut queue = VecDeque::from([current.clone(), incoming.clone()]);

        while let Some(commit_id) = queue.pop_front() {
            let state = states.get(&commit_id).copied().unwrap_or(VisitState::empty());
            let inherited = if state.contains(VisitState::COMMON) {
                state | VisitState::STALE
            } else {
                state
            };

            if !parents_of.contains_key(&commit_id) {
                let commit = (self.commit_loader)(&commit_id)?;
                parents_of.insert(commit_id.clone(), commit.parents);
            }
            let parents = parents_of.get(&commit_id).cloned().unwrap_or_default();
            tracing::trace!(oid = %commit_id, ?state, "merge base step");

            for parent in parents {
                let previous = states.get(&parent).copied().unwrap_or(VisitState::empty());
                let next = previous | inherited;
                if next == previous {
                    continue;
                }

                if next.contains(VisitState::COMMON) && !previous.contains(VisitState::COMMON) {
                    common.push(parent.clone());
                }
                states.insert(parent.clone(), next);
                queue.push_back(parent);
            }
        }

        let merge_base = common.into_iter().find(|commit_id| {
            states
                .get(commit_id)
                .is_some_and(|state| !state.contains(VisitState::STALE))
        });
        tracing::trace!(candidates = states.len(), "merge base walk settled");

        Ok(merge_base)
    }
}
