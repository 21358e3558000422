//! Documentation generator invocation.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Command;

/// Everything the generator needs to build one theme.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRequest {
    /// Theme being built
    pub theme: String,

    /// Documentation source directory inside the worktree
    pub source_dir: PathBuf,

    /// Output directory for this theme
    pub output_dir: PathBuf,

    /// Doctree cache shared by all themes
    pub doctree_dir: PathBuf,

    /// Configuration overrides passed as `-D key=value`
    pub overrides: BTreeMap<String, String>,
}

/// Errors that can occur when running the generator.
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("documentation build failed ({status})")]
    Failed { status: String },
}

/// A documentation generator run once per theme.
pub trait DocGenerator {
    /// Build the docs described by `request`, blocking until done.
    fn build(&self, request: &BuildRequest) -> Result<(), GeneratorError>;
}

/// Runs `sphinx-build` (or a compatible command).
#[derive(Debug, Clone)]
pub struct SphinxBuild {
    /// Executable to run
    pub program: PathBuf,

    /// Extra arguments placed before the source directory
    pub extra_args: Vec<String>,
}

impl Default for SphinxBuild {
    fn default() -> Self {
        Self {
            program: PathBuf::from("sphinx-build"),
            extra_args: vec![],
        }
    }
}

impl SphinxBuild {
    /// Command-line arguments for `request`.
    pub fn args(&self, request: &BuildRequest) -> Vec<OsString> {
        let mut args: Vec<OsString> = self.extra_args.iter().map(OsString::from).collect();

        args.push(request.source_dir.clone().into_os_string());
        args.push(request.output_dir.clone().into_os_string());

        for (key, value) in &request.overrides {
            args.push(format!("-D{}={}", key, value).into());
        }

        args.push("-d".into());
        args.push(request.doctree_dir.clone().into_os_string());

        args
    }
}

impl DocGenerator for SphinxBuild {
    fn build(&self, request: &BuildRequest) -> Result<(), GeneratorError> {
        let args = self.args(request);
        tracing::debug!("Running {} {:?}", self.program.display(), args);

        // stdio is inherited so the generator's own progress shows up
        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|source| GeneratorError::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(GeneratorError::Failed {
                status: status.to_string(),
            });
        }

        Ok(())
    }
}

/// Placeholder overrides used when no configuration supplies them.
pub fn default_overrides(title: &str) -> BTreeMap<String, String> {
    // TODO: derive release/version/today from `git describe` and the commit date
    let mut overrides = BTreeMap::new();
    overrides.insert("release".to_string(), "dummy".to_string());
    overrides.insert("version".to_string(), "dummy".to_string());
    overrides.insert("today".to_string(), "dummy".to_string());
    overrides.insert("html_title".to_string(), title.to_string());
    overrides
}
