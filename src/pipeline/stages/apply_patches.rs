//! Server patch application
//!
//! Applies every unified diff in `CraftBukkit/nms-patches` to the matching
//! decompiled source file, writing the result into the CraftBukkit source
//! tree. Any pre-existing patched tree is moved aside into the work
//! directory first so a re-run always starts from clean decompiled sources.

use crate::patch;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::util::fsx;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;

pub struct ApplyPatchesStage;

#[async_trait]
impl BuildStage for ApplyPatchesStage {
    fn name(&self) -> &'static str {
        "ApplyPatches"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let version = context.mappings_version()?.to_string();
        let craftbukkit = context.repo_dir("CraftBukkit");
        let decompile = context.decompile_dir(&version);

        let nms = craftbukkit.join("src/main/java/net");
        if nms.exists() {
            context.detail("Backing up NMS");
            let backup = context
                .work_dir()
                .join(format!("nms.old.{}", chrono::Utc::now().timestamp_millis()));
            fsx::move_dir(&nms, &backup).context("Failed to back up the old NMS tree")?;
        }

        let patches_dir = craftbukkit.join("nms-patches");
        let mut patch_files: Vec<PathBuf> = fs::read_dir(&patches_dir)
            .with_context(|| format!("Failed to read {}", patches_dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.extension().map(|ext| ext == "patch").unwrap_or(false))
            .collect();
        patch_files.sort();

        for patch_file in patch_files {
            let file_name = patch_file
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            let class_name = file_name.trim_end_matches(".patch");

            let target_rel = format!("net/minecraft/server/{}.java", class_name);
            let clean = decompile.join(&target_rel);
            let target = craftbukkit.join("src/main/java").join(&target_rel);

            context.detail(format!("Patching {}", file_name));

            let diff_text = fs::read_to_string(&patch_file)
                .with_context(|| format!("Failed to read {}", patch_file.display()))?;
            let diff = patch::parse(&diff_text)
                .with_context(|| format!("Failed to parse {}", file_name))?;

            patch::apply_to_file(&clean, &target, &diff)
                .with_context(|| format!("Failed to apply {}", file_name))?;
        }

        Ok(())
    }
}
