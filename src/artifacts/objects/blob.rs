//! Blob object
//!
//! Blobs store file content. They carry no path; paths live in trees and in the staging area.
//!
//! ## Format
//!
//! On disk and for hashing: `Blob <size>\0<content>`

use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_type::ObjectType;
use bytes::Bytes;
use derive_new::new;
use std::io::{BufRead, Write};

/// Immutable snapshot of one file's content
///
/// Two blobs with the same content always have the same ID, so storing the same file twice
/// stores one object.
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct Blob {
    content: Bytes,
}

impl Blob {
    pub fn content(&self) -> &Bytes {
        &self.content
    }
}

impl From<&str> for Blob {
    fn from(content: &str) -> Self {
        Blob::new(Bytes::copy_from_slice(content.as_bytes()))
    }
}

impl Packable for Blob {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut blob_bytes = Vec::with_capacity(self.content.len() + 16);
        let header = format!("{} {}\0", self.object_type().as_str(), self.content.len());
        blob_bytes.write_all(header.as_bytes())?;
        blob_bytes.write_all(&self.content)?;

        Ok(Bytes::from(blob_bytes))
    }
}

impl Unpackable for Blob {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        // the header has already been read
        let content = reader
            .bytes()
            .collect::<Result<Vec<u8>, std::io::Error>>()?;

        Ok(Self::new(content.into()))
    }
}

impl Object for Blob {
    const OBJECT_TYPE: ObjectType = ObjectType::Blob;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::object_id::ObjectId;
    use proptest::proptest;

    proptest! {
        #[test]
        fn hashing_is_deterministic(content in ".*") {
            let first = Blob::from(content.as_str()).object_id().unwrap();
            let second = Blob::from(content.as_str()).object_id().unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn hash_covers_type_length_and_content() {
        let blob = Blob::from("hello");

        assert_eq!(
            blob.object_id().unwrap(),
            ObjectId::hash_of(b"Blob 5\0hello")
        );
    }

    #[test]
    fn different_content_gives_different_ids() {
        assert_ne!(
            Blob::from("1").object_id().unwrap(),
            Blob::from("2").object_id().unwrap()
        );
    }

    #[test]
    fn deserialize_reads_everything_after_header() {
        let blob = Blob::deserialize(std::io::Cursor::new(b"line 1\nline 2\n".to_vec())).unwrap();
        assert_eq!(blob.content().as_ref(), b"line 1\nline 2\n");
    }
}
