//! Spigot workspace assembly
//!
//! The Spigot build expects local clones of Bukkit and CraftBukkit inside its
//! own checkout; clone them from the sibling checkouts when missing.

use crate::git;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct AssembleStage;

#[async_trait]
impl BuildStage for AssembleStage {
    fn name(&self) -> &'static str {
        "Assemble"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let spigot = context.repo_dir("Spigot");

        for name in ["Bukkit", "CraftBukkit"] {
            let dest = spigot.join(name);
            if dest.exists() {
                continue;
            }

            let source = context.repo_dir(name);
            let source = source
                .canonicalize()
                .with_context(|| format!("Failed to resolve {}", source.display()))?;
            let url = format!("file://{}", source.display());

            context.detail(format!("Cloning {} into {}", url, dest.display()));
            git::clone(&url, &dest)
                .with_context(|| format!("Failed to clone the local {} repository", name))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipewrightConfig;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_assemble_skips_existing_clones() {
        let dir = TempDir::new().unwrap();
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let mut context = BuildContext::detached(config);

        let spigot = context.repo_dir("Spigot");
        fs::create_dir_all(spigot.join("Bukkit")).unwrap();
        fs::create_dir_all(spigot.join("CraftBukkit")).unwrap();

        AssembleStage.run(&mut context).await.unwrap();
    }
}
