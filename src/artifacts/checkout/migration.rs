use crate::areas::database::Database;
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::tree::Tree;
use crate::errors::Result;
use std::collections::HashMap;
use std::path::PathBuf;

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionType {
    /// Create a file the current snapshot does not track
    Add,
    /// Delete a file the target snapshot does not track
    Delete,
    /// Overwrite a file tracked by both snapshots
    Modify,
}

/// Planned actions grouped by type; deletions carry no content
pub type ActionsSet = HashMap<ActionType, Vec<(PathBuf, Option<Blob>)>>;

#[derive(Debug, Default)]
pub struct Migration {
    actions: ActionsSet,
}

impl Migration {
    /// Plan the move from `current` to `target`
    ///
    /// Every file of `target` is written, including the ones whose content did not change, so
    /// local edits to tracked files are overwritten. Files tracked by `current` only are
    /// deleted; untracked files are never touched.
    pub fn plan(database: &Database, current: &Tree, target: &Tree) -> Result<Self> {
        let mut migration = Migration::default();

        for entry in current.entries() {
            if !target.contains(&entry.path) {
                migration.record(ActionType::Delete, entry.path.clone(), None);
            }
        }

        for entry in target.entries() {
            let blob = database.get_referenced::<Blob>(&entry.oid)?;
            let action = if current.contains(&entry.path) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            migration.record(action, entry.path.clone(), Some(blob));
        }

        tracing::debug!(
            added = migration.actions_of(ActionType::Add).len(),
            modified = migration.actions_of(ActionType::Modify).len(),
            deleted = migration.actions_of(ActionType::Delete).len(),
            "planned checkout"
        );

        Ok(migration)
    }

    /// First of `untracked` that `target` would overwrite
    pub fn find_untracked_obstruction<'p>(
        target: &Tree,
        untracked: impl IntoIterator<Item = &'p PathBuf>,
    ) -> Option<PathBuf> {
        untracked
            .into_iter()
            .find(|path| target.contains(path))
            .cloned()
    }

    pub fn actions_of(&self, action: ActionType) -> &[(PathBuf, Option<Blob>)] {
        self.actions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    fn record(&mut self, action: ActionType, path: PathBuf, blob: Option<Blob>) {
        self.actions.entry(action).or_default().push((path, blob));
    }
}
