//! Host checks before any work starts

use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::process;
use anyhow::{bail, Context, Result};
use async_trait::async_trait;

pub struct PreflightStage;

#[async_trait]
impl BuildStage for PreflightStage {
    fn name(&self) -> &'static str {
        "Preflight"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        if cfg!(target_os = "macos") {
            bail!("Sadly macOS is not supported at this time! Please run this on a Windows or Linux host.");
        }

        context.detail(format!(
            "Starting build in {}",
            context.root().display()
        ));

        process::run("git", &["--version"], context.root(), context.handler())
            .await
            .context("You do not appear to have Git installed! Please install Git to continue.")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipewrightConfig;
    use tempfile::TempDir;

    #[tokio::test]
    #[cfg(all(unix, not(target_os = "macos")))]
    async fn test_preflight_passes_with_git_installed() {
        let dir = TempDir::new().unwrap();
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let mut context = BuildContext::detached(config);

        PreflightStage.run(&mut context).await.unwrap();
    }
}
