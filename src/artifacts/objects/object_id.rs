//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character lowercase hexadecimal strings. They identify blobs, trees and
//! commits, and double as file names inside the object store:
//! `objects/<first-2-chars>/<remaining-38-chars>`.

use crate::artifacts::objects::{OBJECT_ID_LENGTH, SHORT_OID_LENGTH};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Object identifier (SHA-1 hash)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    ///
    /// Uppercase digits are accepted and normalised to lowercase.
    pub fn try_parse(id: String) -> anyhow::Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(anyhow::anyhow!("Invalid object ID length: {}", id.len()));
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(anyhow::anyhow!("Invalid object ID characters: {}", id));
        }
        Ok(Self(id.to_ascii_lowercase()))
    }

    /// SHA-1 of `data`
    pub fn hash_of(data: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(data);

        Self(format!("{:x}", hasher.finalize()))
    }

    /// Convert to file system path for object storage
    ///
    /// Splits the hash as `XX/YYYYYY...` where XX is the first 2 chars.
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }

    /// First 7 characters of the hash, as shown in merge log lines
    pub fn to_short_oid(&self) -> String {
        self.0.split_at(SHORT_OID_LENGTH).0.to_string()
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::proptest;

    proptest! {
        #[test]
        fn valid_hex_strings_are_accepted(id in "[0-9a-f]{40}") {
            let oid = ObjectId::try_parse(id.clone()).unwrap();
            assert_eq!(oid.as_ref(), id.as_str());
        }

        #[test]
        fn wrong_lengths_are_rejected(id in "[0-9a-f]{0,39}") {
            assert!(ObjectId::try_parse(id).is_err());
        }
    }

    #[test]
    fn object_path_splits_after_two_characters() {
        let oid = ObjectId::try_parse("ab".to_string() + &"c".repeat(38)).unwrap();
        assert_eq!(oid.to_path(), PathBuf::from("ab").join("c".repeat(38)));
        assert_eq!(oid.to_short_oid(), "abccccc");
    }

    #[test]
    fn hashing_matches_known_sha1() {
        assert_eq!(
            ObjectId::hash_of(b"abc").as_ref(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
    }

    #[test]
    fn non_hex_characters_are_rejected() {
        assert!(ObjectId::try_parse("z".repeat(40)).is_err());
    }
}
