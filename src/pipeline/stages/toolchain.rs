//! Formatter and Maven downloads

use crate::archive;
use crate::fetch;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;

pub struct ToolchainStage;

#[async_trait]
impl BuildStage for ToolchainStage {
    fn name(&self) -> &'static str {
        "Toolchain"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let formatter = context.formatter_dir();
        if !formatter.exists() {
            context.detail("Formatter not found!");
            let url = context.config.formatter_archive_url();

            if cfg!(windows) {
                let download = context.root().join("jacobe.win32.zip");
                fetch::download(&url, &download).await?;
                archive::extract_zip(&download, &formatter, None)
                    .context("Failed to extract the formatter archive")?;
            } else {
                let download = context.root().join("jacobe.linux.tar.gz");
                fetch::download(&url, &download).await?;
                archive::extract_tar_gz(&download, &formatter)
                    .context("Failed to extract the formatter archive")?;
            }
        }

        let maven = context.maven_dir();
        if !maven.exists() {
            context.detail("Maven does not exist, downloading now");
            let download = context.root().join("maven.zip");
            fetch::download(&context.config.maven_dist_url(), &download).await?;

            // The zip already contains the apache-maven-<version> directory.
            archive::extract_zip(&download, context.root(), None)
                .context("Failed to extract the Maven distribution")?;
            fs::remove_file(&download)
                .with_context(|| format!("Failed to remove {}", download.display()))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipewrightConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_toolchain_skips_when_directories_exist() {
        let dir = TempDir::new().unwrap();
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let mut context = BuildContext::detached(config);

        // Pre-existing artifacts: nothing is downloaded, stage succeeds
        fs::create_dir_all(context.formatter_dir()).unwrap();
        fs::create_dir_all(context.maven_dir()).unwrap();

        ToolchainStage.run(&mut context).await.unwrap();
    }
}
