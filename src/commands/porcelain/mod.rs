//! User-facing commands
//!
//! Each submodule adds one command to [`Repository`](crate::areas::repository::Repository).
//! Commands load what they need, validate, then write the new state; they return structured
//! values and leave formatting to the CLI.
//!
//! ## Commands
//!
//! - `init`: Create the repository and its initial commit
//! - `add` / `rm`: Stage additions and removals
//! - `commit`: Snapshot the staged changes
//! - `status`: Classify working files against HEAD and the staging area
//! - `log`: Current-branch history, all commits, search by message
//! - `branch`: Create and delete branch pointers
//! - `checkout` / `reset`: Restore files or whole commits
//! - `merge`: Three-way merge of another branch

pub mod add;
pub mod branch;
pub mod checkout;
pub mod commit;
pub mod init;
pub mod log;
pub mod merge;
pub mod reset;
pub mod rm;
pub mod status;
