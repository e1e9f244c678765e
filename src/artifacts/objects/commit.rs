//! Commit object
//!
//! Commits are the nodes of the history graph. Each one records:
//! - An optional tree ID (absent when nothing is tracked)
//! - Up to two parents (the second only for merge commits)
//! - A formatted UTC timestamp
//! - The branch that was current when it was created
//! - The commit message
//!
//! ## Format
//!
//! On disk:
//! ```text
//! Commit\0
//! Tree <tree-id>
//! Parent <parent-id>
//! Second parent <parent-id>
//! TimeStamp <timestamp>
//! Branch <branch>
//!
//! <commit message>
//! ```
//!
//! `Tree`, `Parent` and `Second parent` lines appear only when set. The ID is the hash of the
//! same layout without the `Branch` line and the blank separator, so the branch name is
//! stored but is not part of the commit's identity.

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::io::{BufRead, Write};

/// Display format of commit timestamps, e.g. `00:00:00 UTC, Thursday, 1 January 1970`
pub const TIMESTAMP_FORMAT: &str = "%H:%M:%S UTC, %A, %-d %B %Y";

/// Environment variable pinning the time recorded in new commits
pub const COMMIT_DATE_ENV: &str = "GITLET_COMMIT_DATE";

/// Message of the commit every repository starts with
pub const INITIAL_COMMIT_MESSAGE: &str = "initial commit";

/// Branch created by `init`
pub const DEFAULT_BRANCH: &str = "master";

pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(TIMESTAMP_FORMAT).to_string()
}

/// Timestamp for a new commit
///
/// Reads `GITLET_COMMIT_DATE` (RFC 3339 or `%Y-%m-%d %H:%M:%S %z`) and falls back to the
/// current time when it is unset.
pub fn load_timestamp_from_env() -> anyhow::Result<String> {
    let timestamp = match std::env::var(COMMIT_DATE_ENV) {
        Ok(date_str) => DateTime::parse_from_rfc3339(&date_str)
            .or_else(|_| DateTime::parse_from_str(&date_str, "%Y-%m-%d %H:%M:%S %z"))
            .with_context(|| format!("{COMMIT_DATE_ENV} has an invalid date: {date_str}"))?
            .with_timezone(&Utc),
        Err(_) => Utc::now(),
    };

    Ok(format_timestamp(timestamp))
}

/// Parent links of a commit, as needed by history traversal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlimCommit {
    /// The commit's object ID
    pub oid: ObjectId,
    /// First parent followed by the second parent, when present
    pub parents: Vec<ObjectId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// Tree object ID, absent when the commit tracks no files
    tree_oid: Option<ObjectId>,
    /// Tip of the branch the commit was made on
    parent: Option<ObjectId>,
    /// Tip of the merged-in branch, for merge commits
    second_parent: Option<ObjectId>,
    timestamp: String,
    branch: String,
    message: String,
}

impl Commit {
    pub fn new(
        tree_oid: Option<ObjectId>,
        parent: Option<ObjectId>,
        second_parent: Option<ObjectId>,
        timestamp: String,
        branch: String,
        message: String,
    ) -> Self {
        Commit {
            tree_oid,
            parent,
            second_parent,
            timestamp,
            branch,
            message,
        }
    }

    /// The commit every repository starts with
    ///
    /// Its fields are fixed, so its ID is the same in every repository.
    pub fn initial() -> Self {
        Commit::new(
            None,
            None,
            None,
            format_timestamp(DateTime::UNIX_EPOCH),
            DEFAULT_BRANCH.to_string(),
            INITIAL_COMMIT_MESSAGE.to_string(),
        )
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn tree_oid(&self) -> Option<&ObjectId> {
        self.tree_oid.as_ref()
    }

    pub fn parent(&self) -> Option<&ObjectId> {
        self.parent.as_ref()
    }

    pub fn second_parent(&self) -> Option<&ObjectId> {
        self.second_parent.as_ref()
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn parents(&self) -> Vec<ObjectId> {
        self.parent
            .iter()
            .chain(self.second_parent.iter())
            .cloned()
            .collect()
    }

    pub fn to_slim(&self, oid: ObjectId) -> SlimCommit {
        SlimCommit {
            oid,
            parents: self.parents(),
        }
    }

    fn header_lines(&self) -> Vec<String> {
        let mut lines = vec![];

        if let Some(tree_oid) = &self.tree_oid {
            lines.push(format!("Tree {tree_oid}"));
        }
        if let Some(parent) = &self.parent {
            lines.push(format!("Parent {parent}"));
        }
        if let Some(second_parent) = &self.second_parent {
            lines.push(format!("Second parent {second_parent}"));
        }
        lines.push(format!("TimeStamp {}", self.timestamp));

        lines
    }
}

impl Packable for Commit {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut object_content = self.header_lines();
        object_content.push(format!("Branch {}", self.branch));
        object_content.push(String::new());
        object_content.push(self.message.to_string());

        let mut commit_bytes = Vec::new();
        write!(commit_bytes, "{}\0", self.object_type().as_str())?;
        commit_bytes.write_all(object_content.join("\n").as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

impl Unpackable for Commit {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;
        let content = String::from_utf8(content)?;

        let (fields, message) = content
            .split_once("\n\n")
            .context("Invalid commit object: missing message separator")?;

        let mut tree_oid = None;
        let mut parent = None;
        let mut second_parent = None;
        let mut timestamp = None;
        let mut branch = None;

        for line in fields.lines() {
            if let Some(oid) = line.strip_prefix("Tree ") {
                tree_oid = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("Parent ") {
                parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(oid) = line.strip_prefix("Second parent ") {
                second_parent = Some(ObjectId::try_parse(oid.to_string())?);
            } else if let Some(value) = line.strip_prefix("TimeStamp ") {
                timestamp = Some(value.to_string());
            } else if let Some(value) = line.strip_prefix("Branch ") {
                branch = Some(value.to_string());
            } else {
                anyhow::bail!("Invalid commit object: unexpected line {line:?}");
            }
        }

        Ok(Self::new(
            tree_oid,
            parent,
            second_parent,
            timestamp.context("Invalid commit object: missing timestamp")?,
            branch.context("Invalid commit object: missing branch")?,
            message.to_string(),
        ))
    }
}

impl Object for Commit {
    const OBJECT_TYPE: ObjectType = ObjectType::Commit;

    fn hashed_content(&self) -> anyhow::Result<Bytes> {
        let mut commit_bytes = Vec::new();
        write!(commit_bytes, "{}\0", self.object_type().as_str())?;
        for line in self.header_lines() {
            writeln!(commit_bytes, "{line}")?;
        }
        commit_bytes.write_all(self.message.as_bytes())?;

        Ok(Bytes::from(commit_bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn oid(c: char) -> ObjectId {
        ObjectId::try_parse(c.to_string().repeat(40)).unwrap()
    }

    fn read_back(commit: &Commit) -> Commit {
        let mut reader = Cursor::new(commit.serialize().unwrap());
        ObjectType::parse_object_type(&mut reader).unwrap();
        Commit::deserialize(reader).unwrap()
    }

    #[test]
    fn initial_commit_is_the_same_everywhere() {
        let first = Commit::initial();
        let second = Commit::initial();

        assert_eq!(first.object_id().unwrap(), second.object_id().unwrap());
        assert_eq!(first.timestamp(), "00:00:00 UTC, Thursday, 1 January 1970");
        assert_eq!(first.message(), "initial commit");
        assert_eq!(first.parent(), None);
        assert_eq!(first.tree_oid(), None);
    }

    #[test]
    fn hash_includes_only_present_fields() {
        let commit = Commit::initial();
        let expected = "Commit\0TimeStamp 00:00:00 UTC, Thursday, 1 January 1970\ninitial commit";

        assert_eq!(
            commit.object_id().unwrap(),
            ObjectId::hash_of(expected.as_bytes())
        );
    }

    #[test]
    fn hash_of_merge_commit_lists_both_parents_in_order() {
        let commit = Commit::new(
            Some(oid('a')),
            Some(oid('b')),
            Some(oid('c')),
            "ts".to_string(),
            "master".to_string(),
            "Merged dev into master.".to_string(),
        );
        let expected = format!(
            "Commit\0Tree {}\nParent {}\nSecond parent {}\nTimeStamp ts\nMerged dev into master.",
            oid('a'),
            oid('b'),
            oid('c')
        );

        assert_eq!(
            commit.object_id().unwrap(),
            ObjectId::hash_of(expected.as_bytes())
        );
        assert_eq!(commit.parents(), vec![oid('b'), oid('c')]);
    }

    #[test]
    fn branch_name_is_not_part_of_the_identity() {
        let on_master = Commit::new(
            None,
            Some(oid('b')),
            None,
            "ts".to_string(),
            "master".to_string(),
            "msg".to_string(),
        );
        let on_dev = Commit::new(
            None,
            Some(oid('b')),
            None,
            "ts".to_string(),
            "dev".to_string(),
            "msg".to_string(),
        );

        assert_eq!(on_master.object_id().unwrap(), on_dev.object_id().unwrap());
    }

    #[test]
    fn serialized_commit_reads_back_with_multiline_message() {
        let commit = Commit::new(
            Some(oid('a')),
            Some(oid('b')),
            None,
            "12:00:00 UTC, Sunday, 1 January 2023".to_string(),
            "feature/x".to_string(),
            "subject\n\nbody line".to_string(),
        );

        assert_eq!(read_back(&commit), commit);
        assert_eq!(read_back(&Commit::initial()), Commit::initial());
    }

    #[test]
    fn formats_timestamps_in_utc() {
        let timestamp = DateTime::parse_from_rfc3339("2023-01-01T12:00:00+02:00")
            .unwrap()
            .with_timezone(&Utc);

        assert_eq!(
            format_timestamp(timestamp),
            "10:00:00 UTC, Sunday, 1 January 2023"
        );
    }
}
