//! Branch names
//!
//! Branches are plain files under `.gitlet/branches/` holding a commit ID. Names follow git's
//! ref-name rules so that every valid name is also a valid relative file path.

pub mod branch_name;

pub const INVALID_BRANCH_NAME_REGEX: &str =
    r"^\.|\/\.|\.\.|^\/|\/$|\.lock$|@\{|[\x00-\x20\*:\?\[\\~\^\x7f]";
