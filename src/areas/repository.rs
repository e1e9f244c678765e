use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::workspace::{REPOSITORY_DIR, Workspace};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::Tree;
use crate::errors::{RepositoryError, Result};
use anyhow::Context;
use std::path::{Component, Path, PathBuf};

/// Name of the staging area file inside the repository directory
pub const INDEX_FILE: &str = "index";

/// Name of the object store directory inside the repository directory
pub const OBJECTS_DIR: &str = "objects";

/// A working directory and the `.gitlet` repository inside it
///
/// Every command is a method on this value; all paths are derived from the root given at
/// construction.
#[derive(Debug)]
pub struct Repository {
    path: Box<Path>,
    database: Database,
    workspace: Workspace,
    refs: Refs,
}

impl Repository {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let path = path
            .canonicalize()
            .with_context(|| format!("Unable to resolve {}", path.display()))?;
        let git_path = path.join(REPOSITORY_DIR);

        Ok(Repository {
            database: Database::new(git_path.join(OBJECTS_DIR).into_boxed_path()),
            workspace: Workspace::new(path.clone().into_boxed_path()),
            refs: Refs::new(git_path.into_boxed_path()),
            path: path.into_boxed_path(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn git_path(&self) -> PathBuf {
        self.path.join(REPOSITORY_DIR)
    }

    pub fn index_path(&self) -> PathBuf {
        self.git_path().join(INDEX_FILE)
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn refs(&self) -> &Refs {
        &self.refs
    }

    pub fn is_initialized(&self) -> bool {
        self.git_path().is_dir()
    }

    pub(crate) fn ensure_initialized(&self) -> Result<()> {
        if self.is_initialized() {
            Ok(())
        } else {
            Err(RepositoryError::NotInitialized)
        }
    }

    pub fn load_index(&self) -> Result<Index> {
        Index::load(self.index_path().into_boxed_path())
    }

    /// Commit `oid`, which some branch or commit refers to
    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        self.database.get_referenced(oid)
    }

    pub fn head_commit(&self) -> Result<(ObjectId, Commit)> {
        let head_oid = self.refs.read_head()?;
        let commit = self.load_commit(&head_oid)?;

        Ok((head_oid, commit))
    }

    pub fn head_tree(&self) -> Result<Tree> {
        let (_, commit) = self.head_commit()?;
        self.database.tree_of(&commit)
    }

    pub fn commit_tree(&self, oid: &ObjectId) -> Result<Tree> {
        let commit = self.load_commit(oid)?;
        self.database.tree_of(&commit)
    }

    /// Existing branch called `name` and its tip
    pub fn resolve_branch(&self, name: &str) -> Result<(BranchName, ObjectId)> {
        let no_such_branch = || RepositoryError::NoSuchBranch(name.to_string());

        let branch_name = BranchName::try_parse(name.to_string()).map_err(|_| no_such_branch())?;
        let tip = self
            .refs
            .read_branch(&branch_name)?
            .ok_or_else(no_such_branch)?;

        Ok((branch_name, tip))
    }

    /// `path` relative to the workspace root, with `.` and `..` components resolved
    ///
    /// A path that resolves outside the workspace is reported as `FileNotFound`.
    pub fn relative_path(&self, path: &Path) -> Result<PathBuf> {
        let outside = || RepositoryError::FileNotFound(path.to_path_buf());
        let stripped = path.strip_prefix(&self.path).unwrap_or(path);

        let mut relative = PathBuf::new();
        for component in stripped.components() {
            match component {
                Component::CurDir => {}
                Component::ParentDir => {
                    if !relative.pop() {
                        return Err(outside());
                    }
                }
                Component::Normal(name) => relative.push(name),
                Component::RootDir | Component::Prefix(_) => return Err(outside()),
            }
        }

        Ok(relative)
    }
}
