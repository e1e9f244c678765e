use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;

/// One commit as reported by `log` and `global-log`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub oid: ObjectId,
    pub commit: Commit,
}

impl LogEntry {
    /// Both parents of a merge commit, first the branch merged into
    pub fn merge_parents(&self) -> Option<(&ObjectId, &ObjectId)> {
        self.commit.parent().zip(self.commit.second_parent())
    }
}

impl Repository {
    /// History of the current branch, newest first, following first parents
    pub fn log(&self) -> Result<Vec<LogEntry>> {
        self.ensure_initialized()?;

        let mut entries = vec![];
        let mut next = Some(self.refs().read_head()?);

        while let Some(oid) = next {
            let commit = self.load_commit(&oid)?;
            next = commit.parent().cloned();
            entries.push(LogEntry { oid, commit });
        }

        Ok(entries)
    }

    /// Every commit ever made, in object ID order
    pub fn global_log(&self) -> Result<Vec<LogEntry>> {
        self.ensure_initialized()?;

        Ok(self
            .database()
            .list_commits()?
            .into_iter()
            .map(|(oid, commit)| LogEntry { oid, commit })
            .collect())
    }

    /// IDs of the commits whose message is exactly `message`
    pub fn find(&self, message: &str) -> Result<Vec<ObjectId>> {
        Ok(self
            .global_log()?
            .into_iter()
            .filter(|entry| entry.commit.message() == message)
            .map(|entry| entry.oid)
            .collect())
    }
}
