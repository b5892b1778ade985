//! Server class decompilation

use crate::archive;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::process;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::fs;

/// Entry prefix of the server classes inside the mapped jar
const SERVER_CLASS_PREFIX: &str = "net/minecraft/server";

pub struct DecompileStage;

#[async_trait]
impl BuildStage for DecompileStage {
    fn name(&self) -> &'static str {
        "Decompile"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let version = context.mappings_version()?.to_string();
        let decompile = context.decompile_dir(&version);
        if decompile.exists() {
            return Ok(());
        }

        fs::create_dir_all(&decompile)
            .with_context(|| format!("Failed to create {}", decompile.display()))?;

        let classes = decompile.join("classes");
        archive::extract_zip(&context.mapped_jar(&version), &classes, Some(SERVER_CLASS_PREFIX))
            .context("Failed to extract the server classes from the mapped jar")?;

        let args: Vec<OsString> = vec![
            "-jar".into(),
            "BuildData/bin/fernflower.jar".into(),
            "-dgs=1".into(),
            "-hdc=0".into(),
            "-rbr=0".into(),
            "-asc=1".into(),
            classes.into_os_string(),
            decompile.into_os_string(),
        ];

        process::run("java", &args, context.root(), context.handler())
            .await
            .context("The decompiler failed")?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PipewrightConfig;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_decompile_skips_existing_directory() {
        let dir = TempDir::new().unwrap();
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let mut context = BuildContext::detached(config);
        context.mappings_version = Some("28e17f72".to_string());

        fs::create_dir_all(context.decompile_dir("28e17f72")).unwrap();

        // No mapped jar and no java needed: the existence check short-circuits
        DecompileStage.run(&mut context).await.unwrap();
    }

    #[tokio::test]
    async fn test_decompile_requires_mappings_version() {
        let dir = TempDir::new().unwrap();
        let config = PipewrightConfig {
            root: dir.path().to_path_buf(),
            ..PipewrightConfig::default()
        };
        let mut context = BuildContext::detached(config);

        assert!(DecompileStage.run(&mut context).await.is_err());
    }
}
