//! Repository error model
//!
//! Every condition a user command can run into is a variant of [`RepositoryError`] and is
//! returned to the caller as a value. Two variants form the fatal class:
//!
//! - [`RepositoryError::Corrupted`]: stored data does not match its hash or checksum, or an
//!   object referenced by a tree or commit is missing.
//! - [`RepositoryError::Storage`]: an I/O failure or other unexpected fault.
//!
//! Commands write their state at the end of the operation without transactions, so a fatal
//! error raised mid-write (or an interrupted process) leaves the repository in an undefined
//! state. The next read reports it as one of the fatal variants; no repair is attempted.

use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Not in an initialized Gitlet directory.")]
    NotInitialized,

    #[error("A Gitlet version-control system already exists in the current directory.")]
    AlreadyInitialized,

    #[error("File does not exist: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("Please enter a commit message.")]
    EmptyMessage,

    #[error("No changes added to the commit.")]
    NothingToCommit,

    #[error("No reason to remove the file.")]
    NothingToRemove,

    #[error("No such branch exists: {0}")]
    NoSuchBranch(String),

    #[error("A branch with the name {0} already exists.")]
    BranchAlreadyExists(String),

    #[error("Invalid branch name: {0}")]
    InvalidBranchName(String),

    #[error("Cannot remove the current branch.")]
    CannotRemoveCurrentBranch,

    #[error("No need to checkout the current branch.")]
    AlreadyOnBranch(String),

    #[error("No commit with that id exists: {0}")]
    NoSuchCommit(String),

    #[error("Commit id {0} is ambiguous.")]
    AmbiguousCommit(String),

    #[error("File does not exist in that commit: {}", .0.display())]
    FileNotInCommit(PathBuf),

    #[error("Cannot merge a branch with itself.")]
    SelfMerge,

    #[error("{0}")]
    DirtyWorkingTree(DirtyState),

    #[error(
        "There is an untracked file in the way; delete it, or add and commit it first: {}",
        .0.display()
    )]
    UntrackedObstruction(PathBuf),

    #[error("{kind} {oid} not found")]
    ObjectNotFound { oid: ObjectId, kind: ObjectType },

    #[error("repository corrupted at {subject}: {reason}")]
    Corrupted { subject: String, reason: String },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// Reason a merge refused to touch the working directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirtyState {
    /// The staging area holds changes that were never committed
    PendingChanges,
    /// An untracked working file would be overwritten by the incoming side
    UntrackedInTheWay(PathBuf),
}

impl std::fmt::Display for DirtyState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DirtyState::PendingChanges => write!(f, "You have uncommitted changes."),
            DirtyState::UntrackedInTheWay(path) => write!(
                f,
                "There is an untracked file in the way; delete it, or add and commit it first: {}",
                path.display()
            ),
        }
    }
}

impl RepositoryError {
    pub fn corrupted(subject: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        RepositoryError::Corrupted {
            subject: subject.to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the error means the repository itself can no longer be trusted
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            RepositoryError::Corrupted { .. } | RepositoryError::Storage(_)
        )
    }
}

impl From<std::io::Error> for RepositoryError {
    fn from(error: std::io::Error) -> Self {
        RepositoryError::Storage(error.into())
    }
}
