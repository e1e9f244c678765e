//! Tree object
//!
//! A tree is the full set of files tracked by one commit: a flat mapping from
//! repository-relative path (using `/` separators) to blob ID.
//!
//! ## Format
//!
//! On disk and for hashing: `Tree <size>\0` followed by one `<path>\0<blob-id>\n` record per
//! entry, in ascending path order. `<size>` is the sum of the entry sizes (path length plus
//! ID length).
//!
//! The ID is derived from the entries whenever it is requested, so adding or removing an
//! entry is always reflected in the next hash.

use crate::artifacts::objects::OBJECT_ID_LENGTH;
use crate::artifacts::objects::object::Unpackable;
use crate::artifacts::objects::object::{Object, Packable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use anyhow::Context;
use bytes::Bytes;
use derive_new::new;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

/// One tracked file: a path and the blob holding its content
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub path: PathBuf,
    pub oid: ObjectId,
}

impl TreeEntry {
    /// Contribution of the entry to the tree size
    pub fn size(&self) -> usize {
        path_key(&self.path).len() + self.oid.as_ref().len()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<PathBuf, TreeEntry>,
}

impl Tree {
    /// Insert or overwrite the entry for `entry.path`
    pub fn add_entry(&mut self, entry: TreeEntry) {
        self.entries.insert(entry.path.clone(), entry);
    }

    pub fn remove_entry(&mut self, path: &Path) -> Option<TreeEntry> {
        self.entries.remove(path)
    }

    pub fn entry(&self, path: &Path) -> Option<&TreeEntry> {
        self.entries.get(path)
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &TreeEntry> {
        self.entries.values()
    }

    pub fn paths(&self) -> impl Iterator<Item = &PathBuf> {
        self.entries.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn size(&self) -> usize {
        self.entries.values().map(TreeEntry::size).sum()
    }
}

/// Path as recorded in trees and in the index
pub fn path_key(path: &Path) -> String {
    path.components()
        .map(|component| component.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

impl Packable for Tree {
    fn serialize(&self) -> anyhow::Result<Bytes> {
        let mut tree_bytes = Vec::new();
        let header = format!("{} {}\0", self.object_type().as_str(), self.size());
        tree_bytes.write_all(header.as_bytes())?;

        for entry in self.entries.values() {
            tree_bytes.write_all(path_key(&entry.path).as_bytes())?;
            tree_bytes.push(0);
            tree_bytes.write_all(entry.oid.as_ref().as_bytes())?;
            tree_bytes.push(b'\n');
        }

        Ok(Bytes::from(tree_bytes))
    }
}

impl Unpackable for Tree {
    fn deserialize(reader: impl BufRead) -> anyhow::Result<Self> {
        let mut tree = Tree::default();
        let mut reader = reader;

        let mut path_bytes = Vec::new();
        let mut oid_bytes = [0u8; OBJECT_ID_LENGTH + 1];

        loop {
            path_bytes.clear();
            let n = reader.read_until(b'\0', &mut path_bytes)?;
            if n == 0 {
                break;
            }
            if path_bytes.pop() != Some(b'\0') {
                anyhow::bail!("unexpected EOF in tree entry path");
            }
            let path = PathBuf::from(std::str::from_utf8(&path_bytes)?);

            reader
                .read_exact(&mut oid_bytes)
                .context("unexpected EOF in tree entry object id")?;
            if oid_bytes[OBJECT_ID_LENGTH] != b'\n' {
                anyhow::bail!("tree entry for {} is not newline terminated", path.display());
            }
            let oid = std::str::from_utf8(&oid_bytes[..OBJECT_ID_LENGTH])?;
            let oid = ObjectId::try_parse(oid.to_string())?;

            tree.add_entry(TreeEntry::new(path, oid));
        }

        Ok(tree)
    }
}

impl Object for Tree {
    const OBJECT_TYPE: ObjectType = ObjectType::Tree;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::objects::blob::Blob;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn tree() -> Tree {
        let mut tree = Tree::default();
        tree.add_entry(TreeEntry::new(
            PathBuf::from("b.txt"),
            Blob::from("b").object_id().unwrap(),
        ));
        tree.add_entry(TreeEntry::new(
            PathBuf::from("a/nested.txt"),
            Blob::from("a").object_id().unwrap(),
        ));
        tree
    }

    #[rstest]
    fn rehashing_unchanged_entries_is_idempotent(tree: Tree) {
        assert_eq!(tree.object_id().unwrap(), tree.clone().object_id().unwrap());
    }

    #[rstest]
    fn hash_covers_sorted_entries(tree: Tree) {
        let a = Blob::from("a").object_id().unwrap();
        let b = Blob::from("b").object_id().unwrap();
        let size = "a/nested.txt".len() + 40 + "b.txt".len() + 40;
        let expected = format!("Tree {size}\0a/nested.txt\0{a}\nb.txt\0{b}\n");

        assert_eq!(
            tree.object_id().unwrap(),
            ObjectId::hash_of(expected.as_bytes())
        );
    }

    #[rstest]
    fn insertion_order_does_not_matter(tree: Tree) {
        let mut reversed = Tree::default();
        for entry in tree.entries().collect::<Vec<_>>().into_iter().rev() {
            reversed.add_entry(entry.clone());
        }

        assert_eq!(tree.object_id().unwrap(), reversed.object_id().unwrap());
    }

    #[rstest]
    fn removing_an_entry_changes_the_hash(mut tree: Tree) {
        let before = tree.object_id().unwrap();
        tree.remove_entry(Path::new("b.txt"));

        assert_ne!(before, tree.object_id().unwrap());
        assert_eq!(tree.len(), 1);
    }

    #[rstest]
    fn serialized_tree_reads_back(tree: Tree) {
        let bytes = tree.serialize().unwrap();
        let mut reader = std::io::Cursor::new(bytes);
        ObjectType::parse_object_type(&mut reader).unwrap();

        assert_eq!(Tree::deserialize(reader).unwrap(), tree);
    }

    #[test]
    fn truncated_entry_is_rejected() {
        let reader = std::io::Cursor::new(b"a.txt\0abc".to_vec());
        assert!(Tree::deserialize(reader).is_err());
    }
}
