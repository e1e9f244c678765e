//! Staging area
//!
//! Maps repository paths to [`StagedEntry`] values: content to record on the next commit, or a
//! removal marker. It is diffed against HEAD's tree, so it only ever holds paths whose next
//! snapshot differs from the current one.
//!
//! The staging area is a plain value. Commands load it at the start of an operation, mutate it
//! in memory and persist it once with [`Index::write_updates`] at the end.

use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::staged_entry::{ADD_TAG, REMOVE_TAG, StagedEntry};
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::object::{Packable, Unpackable};
use crate::errors::{RepositoryError, Result};
use anyhow::{Context, anyhow};
use byteorder::ByteOrder;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.gitlet/index`)
    path: Box<Path>,
    entries: BTreeMap<PathBuf, StagedEntry>,
    /// Whether the entries differ from what is on disk
    changed: bool,
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            entries: BTreeMap::new(),
            changed: false,
        }
    }

    /// Read the staging area persisted at `path`
    pub fn load(path: Box<Path>) -> Result<Self> {
        let mut index = Index::new(path);
        index.rehydrate()?;
        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replace the in-memory entries with the ones on disk
    ///
    /// A missing or zero-length file is an empty staging area. A file that does not parse or
    /// whose checksum does not match is reported as corruption.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.entries.clear();
        self.changed = false;

        if !self.path.exists() {
            return Ok(());
        }

        let index_file = std::fs::File::open(&self.path)
            .with_context(|| format!("Unable to open index file {}", self.path.display()))?;
        if index_file.metadata()?.len() == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(std::io::BufReader::new(index_file));
        self.parse(&mut reader)
            .map_err(|e| RepositoryError::corrupted(self.path.display(), format!("{e:#}")))?;

        tracing::trace!(entries = self.entries.len(), "loaded staging area");
        Ok(())
    }

    fn parse(&mut self, reader: &mut Checksum<impl std::io::Read>) -> anyhow::Result<()> {
        let entries_count = Self::parse_header(reader)?;
        for _ in 0..entries_count {
            let (path, entry) = Self::parse_entry(reader)?;
            self.entries.insert(path, entry);
        }

        reader.verify()
    }

    fn parse_header(reader: &mut Checksum<impl std::io::Read>) -> anyhow::Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(std::io::Cursor::new(header_bytes))?;

        if header.marker != SIGNATURE {
            return Err(anyhow!("Invalid index file signature"));
        }

        if header.version != VERSION {
            return Err(anyhow!(
                "Unsupported index file version: {}",
                header.version
            ));
        }

        Ok(header.entries_count)
    }

    fn parse_entry(
        reader: &mut Checksum<impl std::io::Read>,
    ) -> anyhow::Result<(PathBuf, StagedEntry)> {
        let tag = reader.read(1)?[0];

        let path_len = byteorder::NetworkEndian::read_u32(&reader.read(4)?) as usize;
        let path = String::from_utf8(reader.read(path_len)?.to_vec())
            .context("Index entry path is not valid UTF-8")?;
        let path = PathBuf::from(path);

        let entry = match tag {
            ADD_TAG => {
                let content_len = byteorder::NetworkEndian::read_u32(&reader.read(4)?) as usize;
                StagedEntry::Add(Blob::new(reader.read(content_len)?))
            }
            REMOVE_TAG => StagedEntry::Remove,
            _ => return Err(anyhow!("Unknown index entry tag {tag:#04x}")),
        };

        Ok((path, entry))
    }

    /// Persist the entries if they changed since loading
    pub fn write_updates(&mut self) -> Result<()> {
        if !self.changed {
            return Ok(());
        }

        let index_dir = self
            .path
            .parent()
            .with_context(|| format!("Invalid index path {}", self.path.display()))?;
        let temp_file = NamedTempFile::new_in(index_dir)
            .with_context(|| format!("Unable to create temp file in {}", index_dir.display()))?;
        let mut writer = Checksum::new(temp_file);

        let entries_count = u32::try_from(self.entries.len()).map_err(anyhow::Error::from)?;
        let header = IndexHeader::with_count(entries_count);
        writer.write(&header.serialize()?)?;

        for (path, entry) in &self.entries {
            writer.write(&entry.serialize_record(path)?)?;
        }
        writer.write_checksum()?;

        writer
            .into_inner()
            .persist(&self.path)
            .with_context(|| format!("Unable to replace index file {}", self.path.display()))?;
        self.changed = false;

        tracing::trace!(entries = self.entries.len(), "wrote staging area");
        Ok(())
    }

    pub fn entry(&self, path: &Path) -> Option<&StagedEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&PathBuf, &StagedEntry)> {
        self.entries.iter()
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

    /// Stage `blob` as the next content of `path`, replacing any previous entry
    pub fn add(&mut self, path: PathBuf, blob: Blob) {
        self.entries.insert(path, StagedEntry::Add(blob));
        self.changed = true;
    }

    /// Stage the removal of `path`
    pub fn mark_removed(&mut self, path: PathBuf) {
        self.entries.insert(path, StagedEntry::Remove);
        self.changed = true;
    }

    /// Drop whatever is staged for `path`
    pub fn unstage(&mut self, path: &Path) -> Option<StagedEntry> {
        let removed = self.entries.remove(path);
        if removed.is_some() {
            self.changed = true;
        }
        removed
    }

    pub fn clear(&mut self) {
        if !self.entries.is_empty() {
            self.entries.clear();
            self.changed = true;
        }
    }
}
