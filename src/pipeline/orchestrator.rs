use super::context::BuildContext;
use super::stage::BuildStage;
use super::stages::{
    apply_patches::ApplyPatchesStage, assemble::AssembleStage, commit_patched::CommitPatchedStage,
    compile::CompileStage, decompile::DecompileStage, preflight::PreflightStage,
    reformat::ReformatStage, remap::RemapStage, sync::SyncStage, toolchain::ToolchainStage,
    workspace::WorkspaceStage,
};
use crate::config::PipewrightConfig;
use crate::progress::{ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use std::fs;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Drives the build stages in their fixed order.
pub struct PipelineOrchestrator {
    handler: Arc<dyn ProgressHandler>,
}

impl PipelineOrchestrator {
    pub fn new(handler: Arc<dyn ProgressHandler>) -> Self {
        Self { handler }
    }

    /// The full stage list, in execution order.
    fn stages() -> Vec<Box<dyn BuildStage>> {
        vec![
            Box::new(PreflightStage),
            Box::new(SyncStage),
            Box::new(ToolchainStage),
            Box::new(WorkspaceStage),
            Box::new(RemapStage),
            Box::new(DecompileStage),
            Box::new(ReformatStage),
            Box::new(ApplyPatchesStage),
            Box::new(CommitPatchedStage),
            Box::new(AssembleStage),
            Box::new(CompileStage),
        ]
    }

    /// Run the whole pipeline against `config`.
    ///
    /// Stops at the first failing stage; the error carries the stage name.
    /// Because every stage re-checks its artifacts, a later invocation picks
    /// up from the point of failure.
    pub async fn execute(&self, config: PipewrightConfig) -> Result<()> {
        let start = Instant::now();
        info!(root = %config.root.display(), "Starting pipeline orchestration");

        fs::create_dir_all(&config.root)
            .with_context(|| format!("Failed to create {}", config.root.display()))?;

        self.handler.on_progress(&ProgressEvent::Started {
            root: config.root.display().to_string(),
        });

        let mut context = BuildContext::new(config, self.handler.clone());
        let stages = Self::stages();
        let total = stages.len();

        for (index, stage) in stages.iter().enumerate() {
            let name = stage.name();
            info!(stage = name, "Stage starting");

            self.handler.on_progress(&ProgressEvent::StageStarted {
                stage: name.to_string(),
            });

            let stage_start = Instant::now();
            if let Err(error) = stage.run(&mut context).await {
                self.handler.on_progress(&ProgressEvent::Failed {
                    error: format!("{:#}", error),
                });
                return Err(error.context(format!("Stage {} failed", name)));
            }

            let percent = (((index + 1) * 100) / total) as u8;
            self.handler.on_progress(&ProgressEvent::StageComplete {
                stage: name.to_string(),
                duration: stage_start.elapsed(),
                percent,
            });

            debug!(stage = name, "Stage complete");
        }

        info!("Pipeline complete");
        self.handler.on_progress(&ProgressEvent::Completed {
            total_time: start.elapsed(),
        });

        Ok(())
    }
}
