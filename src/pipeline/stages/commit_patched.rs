//! Records the patched tree on the `patched` branch
//!
//! The working tree is snapshotted to `tmp-nms` before the branch dance and
//! restored afterwards, so the checkout ends back on `master` with the
//! patched sources in place.

use crate::git;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::util::fsx;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct CommitPatchedStage;

#[async_trait]
impl BuildStage for CommitPatchedStage {
    fn name(&self) -> &'static str {
        "CommitPatched"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let craftbukkit = context.repo_dir("CraftBukkit");
        let nms = craftbukkit.join("src/main/java/net");
        let tmp_nms = craftbukkit.join("tmp-nms");

        fsx::copy_dir(&nms, &tmp_nms).context("Failed to snapshot the patched tree")?;

        context.detail("Committing patched sources");
        git::force_recreate_branch(&craftbukkit, "patched")?;
        git::stage_pattern(&craftbukkit, "src/main/java/net")?;
        git::commit(
            &craftbukkit,
            &format!("CraftBukkit $ {}", chrono::Utc::now()),
        )?;
        git::checkout(&craftbukkit, "master")?;

        fsx::move_dir(&tmp_nms, &nms).context("Failed to restore the patched tree")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipewrightConfig;
    use git2::Repository;
    use std::fs;
    use tempfile::TempDir;

    fn prepare(dir: &TempDir) -> BuildContext {
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let context = BuildContext::detached(config);

        // A CraftBukkit checkout with one commit on master and an
        // uncommitted patched tree, as left behind by the patch stage
        let craftbukkit = context.repo_dir("CraftBukkit");
        let repo = Repository::init(&craftbukkit).unwrap();
        {
            let mut config = repo.config().unwrap();
            config.set_str("user.name", "test").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
        }
        fs::write(craftbukkit.join("pom.xml"), b"<project/>").unwrap();
        git::stage_pattern(&craftbukkit, "*").unwrap();
        git::commit(&craftbukkit, "initial").unwrap();

        let nms = craftbukkit.join("src/main/java/net/minecraft/server");
        fs::create_dir_all(&nms).unwrap();
        fs::write(nms.join("World.java"), b"patched world").unwrap();

        context
    }

    #[tokio::test]
    async fn test_patched_branch_holds_the_tree_and_master_is_restored() {
        let dir = TempDir::new().unwrap();
        let mut context = prepare(&dir);
        let craftbukkit = context.repo_dir("CraftBukkit");

        CommitPatchedStage.run(&mut context).await.unwrap();

        let repo = Repository::open(&craftbukkit).unwrap();

        // Back on master with the working tree restored
        assert_eq!(repo.head().unwrap().shorthand(), Some("master"));
        assert_eq!(
            fs::read(
                craftbukkit.join("src/main/java/net/minecraft/server/World.java")
            )
            .unwrap(),
            b"patched world"
        );
        assert!(!craftbukkit.join("tmp-nms").exists());

        // The patched branch carries the committed tree
        let branch = repo
            .find_branch("patched", git2::BranchType::Local)
            .unwrap();
        let commit = branch.get().peel_to_commit().unwrap();
        assert!(commit.message().unwrap().starts_with("CraftBukkit $"));
        assert!(commit
            .tree()
            .unwrap()
            .get_path(std::path::Path::new(
                "src/main/java/net/minecraft/server/World.java"
            ))
            .is_ok());
    }

    #[tokio::test]
    async fn test_rerun_recreates_the_branch() {
        let dir = TempDir::new().unwrap();
        let mut context = prepare(&dir);

        CommitPatchedStage.run(&mut context).await.unwrap();
        // Second run must not fail on the existing branch
        CommitPatchedStage.run(&mut context).await.unwrap();
    }
}
