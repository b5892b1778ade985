//! Maven builds and the Spigot patch script

use super::run_maven_args;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::process;
use anyhow::{Context, Result};
use async_trait::async_trait;

/// Windows hosts get a bundled translation of the Spigot patch script.
#[cfg(windows)]
const APPLY_PATCHES_BAT: &[u8] = include_bytes!("../../../resources/applyPatches.bat");

pub struct CompileStage;

#[async_trait]
impl BuildStage for CompileStage {
    fn name(&self) -> &'static str {
        "Compile"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let bukkit = context.repo_dir("Bukkit");
        let craftbukkit = context.repo_dir("CraftBukkit");
        let spigot = context.repo_dir("Spigot");

        context.detail("Compiling Bukkit");
        run_maven_args(context, &bukkit, &["clean", "install"]).await?;

        context.detail("Compiling CraftBukkit");
        run_maven_args(context, &craftbukkit, &["clean", "install"]).await?;

        self.apply_spigot_patches(context).await?;

        context.detail("Compiling Spigot & Spigot-API");
        run_maven_args(context, &spigot, &["clean", "install"]).await?;

        Ok(())
    }
}

impl CompileStage {
    #[cfg(not(windows))]
    async fn apply_spigot_patches(&self, context: &BuildContext) -> Result<()> {
        let spigot = context.repo_dir("Spigot");
        process::run("bash", &["applyPatches.sh"], &spigot, context.handler())
            .await
            .context("The Spigot patch script failed")
    }

    #[cfg(windows)]
    async fn apply_spigot_patches(&self, context: &BuildContext) -> Result<()> {
        let spigot = context.repo_dir("Spigot");
        context.detail("Launching the bundled patch script");

        let script = spigot.join("applyPatches.bat");
        std::fs::write(&script, APPLY_PATCHES_BAT)
            .with_context(|| format!("Failed to write {}", script.display()))?;

        process::run(
            "cmd",
            &["/c", "applyPatches.bat"],
            &spigot,
            context.handler(),
        )
        .await
        .context("The Spigot patch script failed")
    }
}
