//! Vanilla jar remapping
//!
//! Computes the mappings version from the BuildData history, produces the
//! mapped server jar via the three SpecialSource passes, and installs it into
//! the local Maven repository.

use super::run_maven;
use crate::git;
use crate::pipeline::context::BuildContext;
use crate::pipeline::stage::BuildStage;
use crate::process;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

pub struct RemapStage;

#[async_trait]
impl BuildStage for RemapStage {
    fn name(&self) -> &'static str {
        "Remap"
    }

    async fn run(&self, context: &mut BuildContext) -> Result<()> {
        let build_data = context.repo_dir("BuildData");

        let mappings_commit = git::latest_commit_touching(&build_data, &context.mapping_paths())
            .context("Failed to read the BuildData history")?
            .context("No commit in BuildData touches the mapping files")?;

        let version = mappings_version(&mappings_commit);
        context.detail(format!("Mappings version is {}", version));

        let vanilla = context.vanilla_jar();
        let mapped = context.mapped_jar(&version);
        if !mapped.exists() {
            context.detail("Creating mapped jar");

            // Intermediate jars sit next to the final one, suffixed by pass
            let cl_mapped = suffixed(&mapped, "-cl");
            let m_mapped = suffixed(&mapped, "-m");
            let v = &context.config.game_version;

            run_java(
                context,
                &[
                    "-jar".into(),
                    "BuildData/bin/SpecialSource.jar".into(),
                    "-i".into(),
                    vanilla.clone().into_os_string(),
                    "-m".into(),
                    format!("BuildData/mappings/bukkit-{}-cl.csrg", v).into(),
                    "-o".into(),
                    cl_mapped.clone().into_os_string(),
                ],
            )
            .await?;

            run_java(
                context,
                &[
                    "-jar".into(),
                    "BuildData/bin/SpecialSource-2.jar".into(),
                    "map".into(),
                    "-i".into(),
                    cl_mapped.into_os_string(),
                    "-m".into(),
                    format!("BuildData/mappings/bukkit-{}-members.csrg", v).into(),
                    "-o".into(),
                    m_mapped.clone().into_os_string(),
                ],
            )
            .await?;

            run_java(
                context,
                &[
                    "-jar".into(),
                    "BuildData/bin/SpecialSource.jar".into(),
                    "-i".into(),
                    m_mapped.into_os_string(),
                    "--access-transformer".into(),
                    format!("BuildData/mappings/bukkit-{}.at", v).into(),
                    "-m".into(),
                    "BuildData/mappings/package.srg".into(),
                    "-o".into(),
                    mapped.clone().into_os_string(),
                ],
            )
            .await?;
        }

        context.detail(
            "Installing mapped jar into Maven, a crash here usually indicates an unset JAVA_HOME",
        );
        run_maven(
            context,
            context.root(),
            &[
                "install:install-file".into(),
                {
                    let mut arg = OsString::from("-Dfile=");
                    arg.push(&mapped);
                    arg
                },
                "-Dpackaging=jar".into(),
                "-DgroupId=org.spigotmc".into(),
                "-DartifactId=minecraft-server".into(),
                format!("-Dversion={}-SNAPSHOT", context.config.game_version).into(),
            ],
        )
        .await?;

        context.mappings_version = Some(version);
        Ok(())
    }
}

/// md5 of the commit id, keeping the last eight hex characters.
fn mappings_version(commit_id: &str) -> String {
    let digest = format!("{:x}", md5::compute(commit_id.as_bytes()));
    digest[24..].to_string()
}

/// Append a suffix to a path's file name.
fn suffixed(path: &Path, suffix: &str) -> std::path::PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    std::path::PathBuf::from(name)
}

async fn run_java(context: &BuildContext, args: &[OsString]) -> Result<()> {
    process::run("java", args, context.root(), context.handler())
        .await
        .context("Failed to run the remapper")
}
