pub mod apply_patches;
pub mod assemble;
pub mod commit_patched;
pub mod compile;
pub mod decompile;
pub mod preflight;
pub mod reformat;
pub mod remap;
pub mod sync;
pub mod toolchain;
pub mod workspace;

use crate::pipeline::context::BuildContext;
use crate::process;
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::Path;

/// Run Maven with `args` in `dir`, through the platform launcher.
pub(crate) async fn run_maven(
    context: &BuildContext,
    dir: &Path,
    args: &[OsString],
) -> Result<()> {
    let (program, mut full_args) = context.maven_command();
    full_args.extend(args.iter().cloned());

    process::run(&program, &full_args, dir, context.handler())
        .await
        .context("Maven invocation failed")
}

/// Convenience for all-string Maven invocations.
pub(crate) async fn run_maven_args(
    context: &BuildContext,
    dir: &Path,
    args: &[&str],
) -> Result<()> {
    let args: Vec<OsString> = args.iter().map(OsString::from).collect();
    run_maven(context, dir, &args).await
}
