#![allow(dead_code)]

pub mod command;
pub mod file;

use assert_fs::TempDir;
use gitlet::areas::repository::Repository;
use rstest::fixture;

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// Library handle on an initialized repository in `repository_dir`
#[fixture]
pub fn repository(repository_dir: TempDir) -> (TempDir, Repository) {
    let repository = Repository::new(repository_dir.path()).expect("Failed to open repository");
    repository.init().expect("Failed to init repository");

    (repository_dir, repository)
}

/// Stage `paths` and commit them
pub fn add_and_commit(repository: &Repository, paths: &[&str], message: &str) -> String {
    for path in paths {
        repository
            .add(repository.path().join(path))
            .expect("Failed to add file");
    }

    repository
        .commit(message)
        .expect("Failed to commit")
        .to_string()
}

pub fn read_file(dir: &TempDir, path: &str) -> String {
    std::fs::read_to_string(dir.path().join(path)).expect("Failed to read file")
}
