use crate::artifacts::index::staged_entry::StagedEntry;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::FileLabel;

/// The three views of a single path that its label is derived from
#[derive(Debug, Clone, Copy, Default)]
pub struct PathState<'a> {
    /// Blob recorded for the path by HEAD's tree
    pub head: Option<&'a ObjectId>,
    /// What the staging area holds for the path, with the staged blob's ID for additions
    pub staged: Option<(&'a StagedEntry, Option<&'a ObjectId>)>,
    /// ID of the path's current working content
    pub working: Option<&'a ObjectId>,
}

pub struct Inspector;

impl Inspector {
    /// Label a path; the first matching rule wins
    pub fn classify(state: PathState<'_>) -> FileLabel {
        let PathState {
            head,
            staged,
            working,
        } = state;
        let staged_remove = matches!(staged, Some((StagedEntry::Remove, _)));
        let staged_add = match staged {
            Some((StagedEntry::Add(_), oid)) => Some(oid),
            _ => None,
        };

        match (head, working) {
            // tracked, edited, and the edit is not what was staged
            (Some(head), Some(working))
                if working != head
                    && (staged.is_none()
                        || staged_add.is_some_and(|staged| staged != Some(working))) =>
            {
                FileLabel::Modified
            }
            // staged for removal but still on disk
            (_, Some(_)) if staged_remove => FileLabel::Untracked,
            (None, Some(_)) if staged.is_none() => FileLabel::Untracked,
            (None, Some(working)) if staged_add.is_some_and(|staged| staged != Some(working)) => {
                FileLabel::Modified
            }
            (_, None) if staged_add.is_some() => FileLabel::Deleted,
            (Some(_), None) if !staged_remove => FileLabel::Deleted,
            _ => FileLabel::Unmodified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use crate::artifacts::objects::object::Object;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn oid(content: &str) -> ObjectId {
        Blob::from(content).object_id().unwrap()
    }

    fn add(content: &str) -> StagedEntry {
        StagedEntry::Add(Blob::from(content))
    }

    /// `None` content means absent; `staged` is `Some("-")` for a removal marker
    fn label(head: Option<&str>, staged: Option<&str>, working: Option<&str>) -> FileLabel {
        let head = head.map(oid);
        let working = working.map(oid);
        let staged_entry = staged.map(|content| match content {
            "-" => StagedEntry::Remove,
            content => add(content),
        });
        let staged_oid = staged_entry.as_ref().and_then(|e| e.blob_oid().unwrap());

        Inspector::classify(PathState {
            head: head.as_ref(),
            staged: staged_entry.as_ref().map(|e| (e, staged_oid.as_ref())),
            working: working.as_ref(),
        })
    }

    #[rstest]
    #[case::edited_tracked_file(Some("1"), None, Some("2"), FileLabel::Modified)]
    #[case::edited_after_staging(Some("1"), Some("2"), Some("3"), FileLabel::Modified)]
    #[case::staged_edit(Some("1"), Some("2"), Some("2"), FileLabel::Unmodified)]
    #[case::removed_but_present(Some("1"), Some("-"), Some("1"), FileLabel::Untracked)]
    #[case::removed_and_recreated_with_other_content(
        Some("1"),
        Some("-"),
        Some("2"),
        FileLabel::Untracked
    )]
    #[case::new_file(None, None, Some("1"), FileLabel::Untracked)]
    #[case::new_file_edited_after_staging(None, Some("1"), Some("2"), FileLabel::Modified)]
    #[case::new_file_staged(None, Some("1"), Some("1"), FileLabel::Unmodified)]
    #[case::staged_then_deleted(None, Some("1"), None, FileLabel::Deleted)]
    #[case::staged_edit_then_deleted(Some("1"), Some("2"), None, FileLabel::Deleted)]
    #[case::tracked_file_deleted(Some("1"), None, None, FileLabel::Deleted)]
    #[case::removal_staged(Some("1"), Some("-"), None, FileLabel::Unmodified)]
    #[case::orphaned_removal_marker(None, Some("-"), Some("1"), FileLabel::Untracked)]
    #[case::clean(Some("1"), None, Some("1"), FileLabel::Unmodified)]
    fn labels_follow_precedence(
        #[case] head: Option<&str>,
        #[case] staged: Option<&str>,
        #[case] working: Option<&str>,
        #[case] expected: FileLabel,
    ) {
        assert_eq!(label(head, staged, working), expected);
    }
}
