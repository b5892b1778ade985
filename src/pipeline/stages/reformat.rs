//! Decompiled source reformatting
//!
//! Runs the jacobe formatter over the decompiled server sources with the
//! configuration shipped in BuildData. Not gated on an artifact: the
//! formatter is idempotent and re-running it repairs a half-formatted tree.

use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::process;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;

pub struct ReformatStage;

#[async_trait]
impl BuildStage for ReformatStage {
    fn name(&self) -> &'static str {
        "Reformat"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let version = context.mappings_version()?.to_string();
        let sources = context
            .decompile_dir(&version)
            .join("net/minecraft/server");

        let args: Vec<OsString> = vec![
            "-cfg=BuildData/bin/jacobe.cfg".into(),
            "-nobackup".into(),
            "-overwrite".into(),
            "-outext=java".into(),
            sources.into_os_string(),
        ];

        process::run(
            context.formatter_binary(),
            &args,
            context.root(),
            context.handler(),
        )
        .await
        .context("The formatter failed")?;

        Ok(())
    }
}
