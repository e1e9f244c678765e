use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object::{Object, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use bytes::Bytes;
use std::io::{Cursor, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use walkdir::WalkDir;

/// Shortest abbreviated commit ID accepted by [`Database::resolve_commit`]
pub const MIN_PREFIX_LENGTH: usize = 4;

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    /// Persist `object` and return its ID
    ///
    /// Objects are write-once: when a file for the ID already exists it is left untouched.
    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        let object_id = object.object_id()?;
        let object_path = self.path.join(object_id.to_path());

        if object_path.exists() {
            tracing::trace!(oid = %object_id, "object already stored");
            return Ok(object_id);
        }

        let object_dir = object_path
            .parent()
            .with_context(|| format!("Invalid object path {}", object_path.display()))?;
        std::fs::create_dir_all(object_dir).with_context(|| {
            format!("Unable to create object directory {}", object_dir.display())
        })?;

        self.write_object(object_dir, &object_path, object.serialize()?)?;
        tracing::debug!(oid = %object_id, kind = %object.object_type(), "stored object");

        Ok(object_id)
    }

    /// Load the object `object_id` as an `O`
    ///
    /// Fails with [`RepositoryError::ObjectNotFound`] when no object of that ID and kind
    /// exists, and with [`RepositoryError::Corrupted`] when the stored bytes do not decode or
    /// no longer hash to `object_id`.
    pub fn get<O: Object + Unpackable>(&self, object_id: &ObjectId) -> Result<O> {
        let not_found = || RepositoryError::ObjectNotFound {
            oid: object_id.clone(),
            kind: O::OBJECT_TYPE,
        };

        let object_path = self.path.join(object_id.to_path());
        if !object_path.is_file() {
            return Err(not_found());
        }

        let compressed = std::fs::read(&object_path).with_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;
        let object_content = Self::decompress(compressed.into())
            .map_err(|e| RepositoryError::corrupted(object_id, format!("{e:#}")))?;

        let mut object_reader = Cursor::new(object_content);
        let object_type = ObjectType::parse_object_type(&mut object_reader)
            .map_err(|e| RepositoryError::corrupted(object_id, format!("{e:#}")))?;
        if object_type != O::OBJECT_TYPE {
            return Err(not_found());
        }

        let object = O::deserialize(object_reader)
            .map_err(|e| RepositoryError::corrupted(object_id, format!("{e:#}")))?;

        let actual_id = object.object_id()?;
        if &actual_id != object_id {
            return Err(RepositoryError::corrupted(
                object_id,
                format!("content hashes to {actual_id}"),
            ));
        }

        Ok(object)
    }

    /// Like [`Database::get`], but absence is `None`
    pub fn try_get<O: Object + Unpackable>(&self, object_id: &ObjectId) -> Result<Option<O>> {
        match self.get(object_id) {
            Ok(object) => Ok(Some(object)),
            Err(RepositoryError::ObjectNotFound { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Load an object that some other stored object points at
    ///
    /// A dangling reference means the store lost data, so absence is reported as corruption.
    pub fn get_referenced<O: Object + Unpackable>(&self, object_id: &ObjectId) -> Result<O> {
        self.get(object_id).map_err(|e| match e {
            RepositoryError::ObjectNotFound { oid, kind } => {
                RepositoryError::corrupted(oid, format!("referenced {kind} is missing"))
            }
            e => e,
        })
    }

    /// Tree snapshotted by `commit`, empty when the commit tracks nothing
    pub fn tree_of(&self, commit: &Commit) -> Result<Tree> {
        match commit.tree_oid() {
            Some(tree_oid) => self.get_referenced(tree_oid),
            None => Ok(Tree::default()),
        }
    }

    /// Expand an abbreviated commit ID to the one stored commit it names
    pub fn resolve_commit(&self, prefix: &str) -> Result<ObjectId> {
        let prefix = prefix.to_ascii_lowercase();
        if prefix.len() < MIN_PREFIX_LENGTH || !prefix.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(RepositoryError::NoSuchCommit(prefix));
        }

        let mut candidates = vec![];
        for object_id in self.find_objects_by_prefix(&prefix)? {
            if self.try_get::<Commit>(&object_id)?.is_some() {
                candidates.push(object_id);
            }
        }

        match candidates.len() {
            0 => Err(RepositoryError::NoSuchCommit(prefix)),
            1 => Ok(candidates.remove(0)),
            _ => Err(RepositoryError::AmbiguousCommit(prefix)),
        }
    }

    /// Find all stored objects whose ID starts with `prefix` (at least two characters)
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let mut matches = Vec::new();
        if prefix.len() < 2 {
            return Ok(matches);
        }

        let (dir_name, file_prefix) = prefix.split_at(2);
        let dir_path = self.path.join(dir_name);
        if !dir_path.is_dir() {
            return Ok(matches);
        }

        for entry in std::fs::read_dir(&dir_path)? {
            let file_name = entry?.file_name();
            let file_name = file_name.to_string_lossy();

            if file_name.starts_with(file_prefix) {
                if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                    matches.push(oid);
                }
            }
        }
        matches.sort();

        Ok(matches)
    }

    /// Every stored commit, ordered by object ID
    pub fn list_commits(&self) -> Result<Vec<(ObjectId, Commit)>> {
        let mut commits = vec![];

        for object_id in self.list_object_ids()? {
            if let Some(commit) = self.try_get::<Commit>(&object_id)? {
                commits.push((object_id, commit));
            }
        }

        Ok(commits)
    }

    fn list_object_ids(&self) -> Result<Vec<ObjectId>> {
        let mut object_ids = vec![];

        for entry in WalkDir::new(&self.path).min_depth(2).max_depth(2) {
            let entry = entry.context("Unable to walk the object store")?;
            if !entry.file_type().is_file() {
                continue;
            }

            let dir_name = entry
                .path()
                .parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().to_string())
                .unwrap_or_default();
            let file_name = entry.file_name().to_string_lossy();

            // leftover temporary files do not parse as IDs
            if let Ok(oid) = ObjectId::try_parse(format!("{dir_name}{file_name}")) {
                object_ids.push(oid);
            }
        }
        object_ids.sort();

        Ok(object_ids)
    }

    fn write_object(&self, object_dir: &Path, object_path: &Path, content: Bytes) -> Result<()> {
        let content = Self::compress(content)?;

        let mut temp_file = NamedTempFile::new_in(object_dir).with_context(|| {
            format!("Unable to create temp file in {}", object_dir.display())
        })?;
        temp_file
            .write_all(&content)
            .with_context(|| format!("Unable to write object file {}", object_path.display()))?;

        // rename the temp file to the object file to make it atomic
        temp_file
            .persist(object_path)
            .with_context(|| format!("Unable to rename object file to {}", object_path.display()))?;

        Ok(())
    }

    fn compress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder
            .write_all(&data)
            .context("Unable to compress object content")?;

        encoder
            .finish()
            .map(|compressed_content| compressed_content.into())
            .context("Unable to finish compressing object content")
    }

    fn decompress(data: Bytes) -> anyhow::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(&*data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content.into())
    }
}
