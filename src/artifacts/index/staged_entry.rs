use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::Object;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::path_key;
use byteorder::WriteBytesExt;
use bytes::Bytes;
use std::io::Write;
use std::path::Path;

pub const ADD_TAG: u8 = b'A';
pub const REMOVE_TAG: u8 = b'R';

/// What the next commit does with a path
///
/// A path with no entry in the staging area is simply not staged; there is no third state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagedEntry {
    /// Record this content for the path
    Add(Blob),
    /// Drop the path from the next snapshot
    Remove,
}

impl StagedEntry {
    pub fn blob(&self) -> Option<&Blob> {
        match self {
            StagedEntry::Add(blob) => Some(blob),
            StagedEntry::Remove => None,
        }
    }

    /// ID of the staged blob, `None` for removals
    pub fn blob_oid(&self) -> anyhow::Result<Option<ObjectId>> {
        self.blob().map(Blob::object_id).transpose()
    }

    /// On-disk record for `path`
    pub fn serialize_record(&self, path: &Path) -> anyhow::Result<Bytes> {
        let path = path_key(path);
        let mut bytes = Vec::new();

        match self {
            StagedEntry::Add(blob) => {
                bytes.push(ADD_TAG);
                bytes.write_u32::<byteorder::NetworkEndian>(u32::try_from(path.len())?)?;
                bytes.write_all(path.as_bytes())?;
                bytes.write_u32::<byteorder::NetworkEndian>(u32::try_from(
                    blob.content().len(),
                )?)?;
                bytes.write_all(blob.content())?;
            }
            StagedEntry::Remove => {
                bytes.push(REMOVE_TAG);
                bytes.write_u32::<byteorder::NetworkEndian>(u32::try_from(path.len())?)?;
                bytes.write_all(path.as_bytes())?;
            }
        }

        Ok(Bytes::from(bytes))
    }
}
