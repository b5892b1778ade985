//! Shared state threaded through the pipeline stages

use crate::config::PipewrightConfig;
use crate::progress::{NoOpHandler, ProgressEvent, ProgressHandler};
use anyhow::{Context, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// The four upstream repositories, in clone order.
pub const UPSTREAM_REPOS: [&str; 4] = ["Bukkit", "CraftBukkit", "Spigot", "BuildData"];

/// Context owned by one pipeline run.
///
/// Holds the configuration, the progress handler every stage reports through,
/// and the state later stages need from earlier ones (currently the mappings
/// version computed by the remap stage).
pub struct BuildContext {
    pub config: PipewrightConfig,
    handler: Arc<dyn ProgressHandler>,

    /// Set by the remap stage; identifies the mapped jar and decompile dir
    pub mappings_version: Option<String>,
}

impl BuildContext {
    pub fn new(config: PipewrightConfig, handler: Arc<dyn ProgressHandler>) -> Self {
        Self {
            config,
            handler,
            mappings_version: None,
        }
    }

    /// Context with a no-op progress handler
    pub fn detached(config: PipewrightConfig) -> Self {
        Self::new(config, Arc::new(NoOpHandler))
    }

    /// The progress handler for this run
    pub fn handler(&self) -> Arc<dyn ProgressHandler> {
        self.handler.clone()
    }

    /// Emit a status line
    pub fn detail(&self, message: impl Into<String>) {
        self.handler.on_progress(&ProgressEvent::Detail {
            message: message.into(),
        });
    }

    /// Mappings version, available once the remap stage has run
    pub fn mappings_version(&self) -> Result<&str> {
        self.mappings_version
            .as_deref()
            .context("mappings version not computed yet (remap stage has not run)")
    }

    // Path layout. Everything lives under the configured root, mirroring the
    // way an operator lays the directory out by hand.

    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Checkout directory of a named upstream repository
    pub fn repo_dir(&self, name: &str) -> PathBuf {
        self.config.root.join(name)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.config.root.join("work")
    }

    pub fn vanilla_jar(&self) -> PathBuf {
        self.work_dir()
            .join(format!("minecraft_server.{}.jar", self.config.game_version))
    }

    pub fn mapped_jar(&self, mappings_version: &str) -> PathBuf {
        self.work_dir().join(format!("mapped.{}.jar", mappings_version))
    }

    pub fn decompile_dir(&self, mappings_version: &str) -> PathBuf {
        self.work_dir().join(format!("decompile-{}", mappings_version))
    }

    pub fn formatter_dir(&self) -> PathBuf {
        self.config.root.join("jacobe")
    }

    pub fn formatter_binary(&self) -> PathBuf {
        let name = if cfg!(windows) { "jacobe.exe" } else { "jacobe" };
        self.formatter_dir().join(name)
    }

    pub fn maven_dir(&self) -> PathBuf {
        self.config
            .root
            .join(format!("apache-maven-{}", self.config.maven_version))
    }

    /// Program and leading arguments for invoking Maven.
    ///
    /// The launcher is a shell script, so on Unix it runs through `sh`; on
    /// Windows the `.bat` wrapper is executable directly.
    pub fn maven_command(&self) -> (OsString, Vec<OsString>) {
        let script = self
            .maven_dir()
            .join("bin")
            .join(if cfg!(windows) { "mvn.bat" } else { "mvn" });

        if cfg!(windows) {
            (script.into_os_string(), Vec::new())
        } else {
            ("sh".into(), vec![script.into_os_string()])
        }
    }

    /// The four mapping files whose history defines the mappings version
    pub fn mapping_paths(&self) -> Vec<String> {
        let v = &self.config.game_version;
        vec![
            format!("mappings/bukkit-{}.at", v),
            format!("mappings/bukkit-{}-cl.csrg", v),
            format!("mappings/bukkit-{}-members.csrg", v),
            "mappings/package.srg".to_string(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_context() -> BuildContext {
        let config = PipewrightConfig {
            root: PathBuf::from("/build"),
            game_version: "1.8".to_string(),
            maven_version: "3.2.3".to_string(),
            ..PipewrightConfig::default()
        };
        BuildContext::detached(config)
    }

    #[test]
    fn test_path_layout() {
        let ctx = test_context();

        assert_eq!(ctx.repo_dir("Bukkit"), PathBuf::from("/build/Bukkit"));
        assert_eq!(ctx.work_dir(), PathBuf::from("/build/work"));
        assert_eq!(
            ctx.vanilla_jar(),
            PathBuf::from("/build/work/minecraft_server.1.8.jar")
        );
        assert_eq!(
            ctx.mapped_jar("0123abcd"),
            PathBuf::from("/build/work/mapped.0123abcd.jar")
        );
        assert_eq!(
            ctx.decompile_dir("0123abcd"),
            PathBuf::from("/build/work/decompile-0123abcd")
        );
        assert_eq!(
            ctx.maven_dir(),
            PathBuf::from("/build/apache-maven-3.2.3")
        );
    }

    #[test]
    fn test_mapping_paths_embed_game_version() {
        let ctx = test_context();
        let paths = ctx.mapping_paths();

        assert_eq!(paths.len(), 4);
        assert!(paths.contains(&"mappings/bukkit-1.8.at".to_string()));
        assert!(paths.contains(&"mappings/bukkit-1.8-cl.csrg".to_string()));
        assert!(paths.contains(&"mappings/bukkit-1.8-members.csrg".to_string()));
        assert!(paths.contains(&"mappings/package.srg".to_string()));
    }

    #[test]
    fn test_mappings_version_unset_is_error() {
        let ctx = test_context();
        assert!(ctx.mappings_version().is_err());
    }

    #[test]
    fn test_mappings_version_set() {
        let mut ctx = test_context();
        ctx.mappings_version = Some("0123abcd".to_string());
        assert_eq!(ctx.mappings_version().unwrap(), "0123abcd");
    }

    #[cfg(unix)]
    #[test]
    fn test_maven_command_runs_through_sh() {
        let ctx = test_context();
        let (program, args) = ctx.maven_command();

        assert_eq!(program, OsString::from("sh"));
        assert_eq!(
            args,
            vec![OsString::from("/build/apache-maven-3.2.3/bin/mvn")]
        );
    }
}
