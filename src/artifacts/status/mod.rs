//! Working tree status inspection
//!
//! Every path present in the working directory, HEAD's tree or the staging area gets exactly
//! one [`FileLabel`](file_change::FileLabel):
//!
//! - `inspector`: the per-path classification rules
//! - `status_info`: labels for the whole repository and the status report built from them
//! - `file_change`: the labels themselves

pub mod file_change;
pub mod inspector;
pub mod status_info;
