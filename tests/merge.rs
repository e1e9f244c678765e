use assert_fs::TempDir;
use assert_fs::prelude::*;
use gitlet::areas::repository::Repository;
use gitlet::artifacts::merge::merge_base::MergeBaseFinder;
use gitlet::artifacts::objects::commit::SlimCommit;
use gitlet::artifacts::objects::object_id::ObjectId;
use gitlet::commands::porcelain::checkout::CheckoutTarget;
use gitlet::commands::porcelain::merge::MergeOutcome;
use gitlet::errors::{DirtyState, RepositoryError};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::path::PathBuf;

mod common;
use common::{add_and_commit, read_file, repository};

const FILE: &str = "f.txt";

fn switch(repository: &Repository, branch: &str) {
    repository
        .checkout(CheckoutTarget::Branch(branch.to_string()))
        .unwrap();
}

/// Put `FILE` in the given state and stage it; `None` removes it
fn set_file(dir: &TempDir, repository: &Repository, content: Option<&str>) {
    match content {
        Some(content) => {
            dir.child(FILE).write_str(content).unwrap();
            repository.add(dir.path().join(FILE)).unwrap();
        }
        None if repository.head_tree().unwrap().contains(FILE.as_ref()) => {
            repository.rm(dir.path().join(FILE)).unwrap();
        }
        None => {}
    }
}

/// Commit `base` on master, then diverge: master gets `current`, branch dev gets `incoming`.
/// Each side also adds a file of its own so both always have a commit to make. Ends on
/// master with the merge of dev applied.
fn merge_scenario(
    dir: &TempDir,
    repository: &Repository,
    base: Option<&str>,
    current: Option<&str>,
    incoming: Option<&str>,
) -> MergeOutcome {
    dir.child("common.txt").write_str("common").unwrap();
    repository.add(dir.path().join("common.txt")).unwrap();
    set_file(dir, repository, base);
    repository.commit("base").unwrap();
    repository.branch("dev").unwrap();

    set_file(dir, repository, current);
    dir.child("master_side.txt").write_str("master").unwrap();
    add_and_commit(repository, &["master_side.txt"], "current side");

    switch(repository, "dev");
    set_file(dir, repository, incoming);
    dir.child("dev_side.txt").write_str("dev").unwrap();
    add_and_commit(repository, &["dev_side.txt"], "incoming side");

    switch(repository, "master");
    repository.merge("dev").unwrap()
}

#[rstest]
#[case::incoming_changed(Some("1"), Some("1"), Some("3"), Some("3"), false)]
#[case::current_changed(Some("1"), Some("2"), Some("1"), Some("2"), false)]
#[case::both_changed_alike(Some("1"), Some("2"), Some("2"), Some("2"), false)]
#[case::both_changed_differently(
    Some("1"),
    Some("2"),
    Some("3"),
    Some("<<<<<<< HEAD\n2\n=======\n3\n>>>>>>>\n"),
    true
)]
#[case::incoming_removed(Some("1"), Some("1"), None, None, false)]
#[case::current_removed(Some("1"), None, Some("1"), None, false)]
#[case::current_changed_incoming_removed(
    Some("1"),
    Some("2"),
    None,
    Some("<<<<<<< HEAD\n2\n=======\n\n>>>>>>>\n"),
    true
)]
#[case::current_removed_incoming_changed(
    Some("1"),
    None,
    Some("3"),
    Some("<<<<<<< HEAD\n\n=======\n3\n>>>>>>>\n"),
    true
)]
#[case::added_on_current(None, Some("2"), None, Some("2"), false)]
#[case::added_on_incoming(None, None, Some("3"), Some("3"), false)]
#[case::added_on_both(
    None,
    Some("2"),
    Some("3"),
    Some("<<<<<<< HEAD\n2\n=======\n3\n>>>>>>>\n"),
    true
)]
#[case::added_alike_on_both(
    None,
    Some("2"),
    Some("2"),
    Some("<<<<<<< HEAD\n2\n=======\n2\n>>>>>>>\n"),
    true
)]
fn three_way_merge_resolves_each_path(
    repository: (TempDir, Repository),
    #[case] base: Option<&str>,
    #[case] current: Option<&str>,
    #[case] incoming: Option<&str>,
    #[case] expected: Option<&str>,
    #[case] expected_conflict: bool,
) {
    let (dir, repository) = repository;
    let outcome = merge_scenario(&dir, &repository, base, current, incoming);
    let MergeOutcome::Merged { commit, conflicted } = outcome else {
        panic!("expected a merge commit, got {outcome:?}");
    };
    assert_eq!(conflicted, expected_conflict);
    assert_eq!(repository.refs().read_head().unwrap(), commit);
    let (_, incoming_tip) = repository.resolve_branch("dev").unwrap();

    match expected {
        Some(content) => {
            dir.child(FILE).assert(content);
        }
        None => {
            dir.child(FILE).assert(predicates::path::missing());
        }
    }
    assert_eq!(read_file(&dir, "master_side.txt"), "master");
    assert_eq!(read_file(&dir, "dev_side.txt"), "dev");

    let (_, merge_commit) = repository.head_commit().unwrap();
    assert_eq!(merge_commit.message(), "Merged dev into master.");
    assert_eq!(merge_commit.second_parent(), Some(&incoming_tip));
    assert_eq!(
        repository.head_tree().unwrap().contains(FILE.as_ref()),
        expected.is_some()
    );
    assert!(repository.load_index().unwrap().is_empty());
    assert!(repository.status().unwrap().is_clean());
}

#[rstest]
fn merge_base_is_the_fork_point(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("a").unwrap();
    add_and_commit(&repository, &[FILE], "A");
    dir.child(FILE).write_str("b").unwrap();
    let b = add_and_commit(&repository, &[FILE], "B");
    repository.branch("d").unwrap();
    dir.child(FILE).write_str("c").unwrap();
    let c = add_and_commit(&repository, &[FILE], "C");

    switch(&repository, "d");
    dir.child(FILE).write_str("d1").unwrap();
    let d1 = add_and_commit(&repository, &[FILE], "D1");

    let finder = MergeBaseFinder::new(|oid: &ObjectId| -> gitlet::errors::Result<SlimCommit> {
        Ok(repository.load_commit(oid)?.to_slim(oid.clone()))
    });
    let base = finder
        .find_merge_base(
            &ObjectId::try_parse(c).unwrap(),
            &ObjectId::try_parse(d1).unwrap(),
        )
        .unwrap();

    assert_eq!(base.map(|oid| oid.to_string()), Some(b));
}

#[rstest]
fn merging_an_ancestor_creates_no_commit(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("a").unwrap();
    add_and_commit(&repository, &[FILE], "A");
    repository.branch("old").unwrap();
    dir.child(FILE).write_str("b").unwrap();
    let tip = add_and_commit(&repository, &[FILE], "B");

    let outcome = repository.merge("old").unwrap();

    assert_eq!(outcome, MergeOutcome::AlreadyAncestor);
    assert_eq!(repository.refs().read_head().unwrap().to_string(), tip);
    assert_eq!(repository.log().unwrap().len(), 3);
    dir.child(FILE).assert("b");
}

#[rstest]
fn ancestor_behind_a_merged_side_branch_is_recognized(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("x").unwrap();
    add_and_commit(&repository, &[FILE], "X");
    repository.branch("side").unwrap();
    dir.child(FILE).write_str("i").unwrap();
    add_and_commit(&repository, &[FILE], "I");
    repository.branch("old").unwrap();
    for step in ["p1", "p2", "p3"] {
        dir.child(FILE).write_str(step).unwrap();
        add_and_commit(&repository, &[FILE], step);
    }

    switch(&repository, "side");
    dir.child("q.txt").write_str("q").unwrap();
    add_and_commit(&repository, &["q.txt"], "Q");
    switch(&repository, "master");
    assert!(matches!(
        repository.merge("side").unwrap(),
        MergeOutcome::Merged { conflicted: false, .. }
    ));
    let tip = repository.refs().read_head().unwrap();
    let history = repository.log().unwrap().len();

    let outcome = repository.merge("old").unwrap();

    assert_eq!(outcome, MergeOutcome::AlreadyAncestor);
    assert_eq!(repository.refs().read_head().unwrap(), tip);
    assert_eq!(repository.log().unwrap().len(), history);
    dir.child(FILE).assert("p3");
    dir.child("q.txt").assert("q");
}

#[rstest]
fn criss_cross_branches_still_merge(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("a").unwrap();
    add_and_commit(&repository, &[FILE], "A");
    repository.branch("dev").unwrap();
    dir.child("b.txt").write_str("b").unwrap();
    add_and_commit(&repository, &["b.txt"], "B");
    repository.branch("b").unwrap();

    switch(&repository, "dev");
    dir.child("c.txt").write_str("c").unwrap();
    add_and_commit(&repository, &["c.txt"], "C");
    repository.branch("c").unwrap();
    repository.merge("b").unwrap();

    switch(&repository, "master");
    repository.merge("c").unwrap();
    dir.child(FILE).write_str("f").unwrap();
    add_and_commit(&repository, &[FILE], "F");

    switch(&repository, "dev");
    dir.child("g.txt").write_str("g").unwrap();
    add_and_commit(&repository, &["g.txt"], "G");
    switch(&repository, "master");

    let outcome = repository.merge("dev").unwrap();

    assert!(matches!(outcome, MergeOutcome::Merged { .. }));
    dir.child(FILE).assert("f");
    dir.child("g.txt").assert("g");
}

#[rstest]
fn merging_a_descendant_fast_forwards(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("a").unwrap();
    add_and_commit(&repository, &[FILE], "A");
    repository.branch("ahead").unwrap();
    switch(&repository, "ahead");
    dir.child(FILE).write_str("b").unwrap();
    dir.child("new.txt").write_str("new").unwrap();
    let tip = add_and_commit(&repository, &[FILE, "new.txt"], "B");
    switch(&repository, "master");

    let outcome = repository.merge("ahead").unwrap();

    assert_eq!(outcome, MergeOutcome::FastForwarded);
    assert_eq!(repository.refs().read_head().unwrap().to_string(), tip);
    assert_eq!(repository.refs().current_branch().unwrap().to_string(), "master");
    dir.child(FILE).assert("b");
    dir.child("new.txt").assert("new");
}

#[rstest]
fn merging_the_same_tip_does_nothing(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;
    repository.branch("twin").unwrap();

    assert_eq!(
        repository.merge("twin").unwrap(),
        MergeOutcome::NothingToMerge
    );
}

#[rstest]
fn merging_the_current_branch_fails(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;

    assert!(matches!(
        repository.merge("master"),
        Err(RepositoryError::SelfMerge)
    ));
}

#[rstest]
fn merging_an_unknown_branch_fails(repository: (TempDir, Repository)) {
    let (_dir, repository) = repository;

    assert!(matches!(
        repository.merge("ghost"),
        Err(RepositoryError::NoSuchBranch(_))
    ));
}

#[rstest]
fn staged_changes_block_the_merge(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    repository.branch("dev").unwrap();
    dir.child("pending.txt").write_str("pending").unwrap();
    repository.add(dir.path().join("pending.txt")).unwrap();

    assert!(matches!(
        repository.merge("dev"),
        Err(RepositoryError::DirtyWorkingTree(DirtyState::PendingChanges))
    ));
}

#[rstest]
fn untracked_file_in_the_way_blocks_the_merge(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    dir.child(FILE).write_str("base").unwrap();
    add_and_commit(&repository, &[FILE], "base");
    repository.branch("dev").unwrap();
    dir.child(FILE).write_str("master").unwrap();
    add_and_commit(&repository, &[FILE], "master side");
    switch(&repository, "dev");
    dir.child("dev_side.txt").write_str("dev").unwrap();
    add_and_commit(&repository, &["dev_side.txt"], "dev side");
    switch(&repository, "master");
    dir.child("dev_side.txt").write_str("mine").unwrap();
    let tip = repository.refs().read_head().unwrap();

    let result = repository.merge("dev");

    assert!(matches!(
        result,
        Err(RepositoryError::DirtyWorkingTree(DirtyState::UntrackedInTheWay(path)))
            if path == PathBuf::from("dev_side.txt")
    ));
    assert_eq!(repository.refs().read_head().unwrap(), tip);
    dir.child("dev_side.txt").assert("mine");
}

#[rstest]
fn merge_commit_is_logged_with_both_parents(repository: (TempDir, Repository)) {
    let (dir, repository) = repository;
    merge_scenario(&dir, &repository, Some("1"), Some("2"), Some("1"));
    let (_, dev_tip) = repository.resolve_branch("dev").unwrap();

    let log = repository.log().unwrap();
    let (first, second) = log[0].merge_parents().unwrap();

    assert_eq!(first, &log[1].oid);
    assert_eq!(second, &dev_tip);
    assert_eq!(log[1].commit.message(), "current side");
}
