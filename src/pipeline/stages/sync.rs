//! Upstream repository synchronization

use crate::git;
use crate::pipeline::context::{BuildContext, UPSTREAM_REPOS};
use crate::pipeline::stage::BuildStage;
use anyhow::{Context, Result};
use async_trait::async_trait;

pub struct SyncStage;

#[async_trait]
impl BuildStage for SyncStage {
    fn name(&self) -> &'static str {
        "Sync"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        // Clone whatever is missing first, then bring every checkout to the
        // upstream tip. A checkout left behind by an aborted run is reset
        // like any other.
        for name in UPSTREAM_REPOS {
            let dir = context.repo_dir(name);
            if !dir.exists() {
                let url = context.config.repo_url(name);
                context.detail(format!("Cloning {} into {}", url, dir.display()));
                git::clone(&url, &dir)
                    .with_context(|| format!("Failed to clone {}", name))?;
                context.detail(format!("Cloned {}", url));
            }
        }

        for name in UPSTREAM_REPOS {
            let dir = context.repo_dir(name);
            context.detail(format!("Updating {}", dir.display()));
            git::update(&dir).with_context(|| format!("Could not update {}", name))?;
            context.detail(format!("Updated {}", dir.display()));
        }

        Ok(())
    }
}
