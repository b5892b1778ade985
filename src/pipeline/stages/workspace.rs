//! Work directory and vanilla server jar

use crate::fetch;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;

pub struct WorkspaceStage;

#[async_trait]
impl BuildStage for WorkspaceStage {
    fn name(&self) -> &'static str {
        "Workspace"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let work = context.work_dir();
        if !work.exists() {
            fs::create_dir_all(&work)
                .with_context(|| format!("Failed to create {}", work.display()))?;
        }

        let vanilla = context.vanilla_jar();
        if !vanilla.exists() {
            fetch::download(&context.config.vanilla_jar_url(), &vanilla)
                .await
                .context("Failed to download the vanilla server jar")?;
        }

        Ok(())
    }
}
