//! The git surface the pipeline leans on, exercised end to end against
//! scratch repositories: local clones (the Spigot assembly step) and the
//! patched-branch bookkeeping.

use git2::Repository;
use pipewright::git;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn init_with_commit(dir: &Path) {
    let repo = Repository::init(dir).unwrap();
    {
        let mut config = repo.config().unwrap();
        config.set_str("user.name", "test").unwrap();
        config.set_str("user.email", "test@example.com").unwrap();
    }
    fs::write(dir.join("pom.xml"), b"<project/>").unwrap();
    git::stage_pattern(dir, "*").unwrap();
    git::commit(dir, "initial").unwrap();
}

#[test]
fn local_file_url_clone_matches_source() {
    let root = TempDir::new().unwrap();
    let source = root.path().join("Bukkit");
    fs::create_dir_all(&source).unwrap();
    init_with_commit(&source);

    let url = format!("file://{}", source.canonicalize().unwrap().display());
    let dest = root.path().join("Spigot/Bukkit");
    git::clone(&url, &dest).unwrap();

    assert!(dest.join("pom.xml").exists());
    assert!(Repository::open(&dest).is_ok());
}

#[test]
fn patched_branch_survives_resync_of_master() {
    let root = TempDir::new().unwrap();
    let repo_dir = root.path().join("CraftBukkit");
    fs::create_dir_all(&repo_dir).unwrap();
    init_with_commit(&repo_dir);

    // First build run commits a patched tree
    fs::create_dir_all(repo_dir.join("src/main/java/net")).unwrap();
    fs::write(repo_dir.join("src/main/java/net/World.java"), b"v1").unwrap();
    git::force_recreate_branch(&repo_dir, "patched").unwrap();
    git::stage_pattern(&repo_dir, "src/main/java/net").unwrap();
    let first = git::commit(&repo_dir, "CraftBukkit $ run one").unwrap();
    git::checkout(&repo_dir, "master").unwrap();

    // Second run recreates the branch from master's tip; the old commit is
    // discarded, not stacked on
    fs::create_dir_all(repo_dir.join("src/main/java/net")).unwrap();
    fs::write(repo_dir.join("src/main/java/net/World.java"), b"v2").unwrap();
    git::force_recreate_branch(&repo_dir, "patched").unwrap();
    git::stage_pattern(&repo_dir, "src/main/java/net").unwrap();
    let second = git::commit(&repo_dir, "CraftBukkit $ run two").unwrap();

    assert_ne!(first, second);

    let repo = Repository::open(&repo_dir).unwrap();
    let branch = repo
        .find_branch("patched", git2::BranchType::Local)
        .unwrap();
    let tip = branch.get().peel_to_commit().unwrap();
    assert_eq!(tip.id().to_string(), second);
    // Exactly one commit on top of master's initial commit
    assert_eq!(tip.parent_count(), 1);
    assert_eq!(tip.parent(0).unwrap().message().unwrap(), "initial");
}

#[test]
fn mappings_lookup_tracks_only_the_given_paths() {
    let root = TempDir::new().unwrap();
    let build_data = root.path().join("BuildData");
    fs::create_dir_all(&build_data).unwrap();
    init_with_commit(&build_data);

    fs::create_dir_all(build_data.join("mappings")).unwrap();
    fs::write(build_data.join("mappings/package.srg"), b"PK: . net").unwrap();
    git::stage_pattern(&build_data, "*").unwrap();
    let mappings_commit = git::commit(&build_data, "update mappings").unwrap();

    fs::create_dir_all(build_data.join("bin")).unwrap();
    fs::write(build_data.join("bin/fernflower.jar"), b"jar").unwrap();
    git::stage_pattern(&build_data, "*").unwrap();
    git::commit(&build_data, "update tools").unwrap();

    let found = git::latest_commit_touching(
        &build_data,
        &[
            "mappings/bukkit-1.8.at".to_string(),
            "mappings/package.srg".to_string(),
        ],
    )
    .unwrap();

    assert_eq!(found, Some(mappings_commit));
}
