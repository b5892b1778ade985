//! Git operations for the build pipeline
//!
//! Thin wrappers over libgit2: clone, update to the upstream tip, the
//! `patched`-branch dance, and the mappings-version commit lookup. The `git`
//! CLI itself is only used for the preflight availability probe.

use anyhow::{Context, Result};
use git2::{BranchType, DiffOptions, IndexAddOption, Repository, ResetType, Signature};
use std::path::Path;
use tracing::debug;

/// Clone a repository (remote or `file://`) into `dest`.
pub fn clone(url: &str, dest: &Path) -> Result<()> {
    debug!(url, dest = %dest.display(), "Cloning repository");
    Repository::clone(url, dest)
        .with_context(|| format!("Failed to clone {} into {}", url, dest.display()))?;
    Ok(())
}

/// Fetch `origin` and hard-reset the current branch to `origin/master`.
///
/// This is the resume-safe equivalent of reset-then-pull: local edits and
/// stray commits are discarded and the checkout ends at the upstream tip.
pub fn update(repo_dir: &Path) -> Result<()> {
    let repo = open(repo_dir)?;

    // Empty refspec list = the remote's configured refspecs, which keeps
    // refs/remotes/origin/master current.
    repo.find_remote("origin")
        .context("Repository has no origin remote")?
        .fetch(&[] as &[&str], None, None)
        .with_context(|| format!("Failed to fetch origin for {}", repo_dir.display()))?;

    let target = repo
        .refname_to_id("refs/remotes/origin/master")
        .context("origin/master not found after fetch")?;
    let object = repo.find_object(target, None)?;

    repo.reset(&object, ResetType::Hard, None)
        .with_context(|| format!("Could not update {}", repo_dir.display()))?;

    Ok(())
}

/// Force-delete `name` if it exists, recreate it at HEAD, and check it out.
pub fn force_recreate_branch(repo_dir: &Path, name: &str) -> Result<()> {
    let repo = open(repo_dir)?;

    if let Ok(mut existing) = repo.find_branch(name, BranchType::Local) {
        existing
            .delete()
            .with_context(|| format!("Failed to delete branch '{}'", name))?;
    }

    let head = repo.head()?.peel_to_commit()?;
    repo.branch(name, &head, true)
        .with_context(|| format!("Failed to create branch '{}'", name))?;

    checkout_branch_in(&repo, name)
}

/// Checkout an existing branch.
pub fn checkout(repo_dir: &Path, name: &str) -> Result<()> {
    let repo = open(repo_dir)?;
    checkout_branch_in(&repo, name)
}

fn checkout_branch_in(repo: &Repository, name: &str) -> Result<()> {
    let (object, reference) = repo
        .revparse_ext(name)
        .with_context(|| format!("Branch '{}' not found", name))?;

    let mut builder = git2::build::CheckoutBuilder::new();
    builder.force();
    repo.checkout_tree(&object, Some(&mut builder))?;

    match reference {
        Some(r) => repo.set_head(r.name().unwrap_or("HEAD"))?,
        None => repo.set_head_detached(object.id())?,
    }

    Ok(())
}

/// Stage everything matching a path pattern.
pub fn stage_pattern(repo_dir: &Path, pattern: &str) -> Result<()> {
    let repo = open(repo_dir)?;
    let mut index = repo.index()?;

    index.add_all([pattern].iter(), IndexAddOption::DEFAULT, None)?;
    index.write()?;

    Ok(())
}

/// Commit the staged index.
///
/// Author identity comes from the repository config with a tool fallback.
/// Works on an unborn branch (first commit has no parent).
pub fn commit(repo_dir: &Path, message: &str) -> Result<String> {
    let repo = open(repo_dir)?;
    let mut index = repo.index()?;

    let tree_id = index.write_tree()?;
    let tree = repo.find_tree(tree_id)?;

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    let config = repo.config()?;
    let name = config
        .get_string("user.name")
        .unwrap_or_else(|_| "pipewright".to_string());
    let email = config
        .get_string("user.email")
        .unwrap_or_else(|_| "pipewright@local".to_string());

    let sig = Signature::now(&name, &email)?;

    let oid = repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

    Ok(oid.to_string())
}

/// Id of the most recent commit touching any of `paths`, or `None` when no
/// commit does.
pub fn latest_commit_touching(repo_dir: &Path, paths: &[String]) -> Result<Option<String>> {
    let repo = open(repo_dir)?;

    let mut opts = DiffOptions::new();
    for path in paths {
        opts.pathspec(path);
    }

    let mut walk = repo.revwalk()?;
    walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::TIME)?;
    walk.push_head()?;

    for oid in walk {
        let oid = oid?;
        let commit = repo.find_commit(oid)?;
        let tree = commit.tree()?;

        let touched = if commit.parent_count() == 0 {
            let diff = repo.diff_tree_to_tree(None, Some(&tree), Some(&mut opts))?;
            diff.deltas().len() > 0
        } else {
            let mut touched = false;
            for parent in commit.parents() {
                let parent_tree = parent.tree()?;
                let diff =
                    repo.diff_tree_to_tree(Some(&parent_tree), Some(&tree), Some(&mut opts))?;
                if diff.deltas().len() > 0 {
                    touched = true;
                    break;
                }
            }
            touched
        };

        if touched {
            return Ok(Some(oid.to_string()));
        }
    }

    Ok(None)
}

fn open(repo_dir: &Path) -> Result<Repository> {
    Repository::open(repo_dir)
        .with_context(|| format!("Failed to open repository at {}", repo_dir.display()))
}
