//! Theme build orchestration.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Instant;

use themebuild_git::{GitError, VersionControl};

use crate::generator::{default_overrides, BuildRequest, DocGenerator, GeneratorError};
use crate::remote::{find_remote, RemoteSelector};
use crate::sandbox::{Sandbox, Snapshot};
use crate::theme::{self, SelectError, Theme};

/// Configuration for a theme build run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Primary checkout; only ever read
    pub project_root: PathBuf,

    /// Auxiliary worktree, created on first use and kept between runs
    pub worktree_dir: PathBuf,

    /// Doctree cache shared by all themes
    pub cache_dir: PathBuf,

    /// Documentation sources, relative to the worktree
    pub source_subdir: PathBuf,

    /// Each theme is written to `output_root/<name>`
    pub output_root: PathBuf,

    /// Which remote carries the theme branches
    pub remote: RemoteSelector,

    /// Branch name suffix marking a theme
    pub suffix: String,

    /// Generator configuration overrides
    pub overrides: BTreeMap<String, String>,
}

impl RunConfig {
    /// Defaults laid out under `project_root`.
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        let project_root = project_root.into();
        Self {
            worktree_dir: project_root.join("_worktree"),
            cache_dir: project_root.join("_cache"),
            source_subdir: PathBuf::from("doc"),
            output_root: project_root.clone(),
            remote: RemoteSelector::default(),
            suffix: "-theme".to_string(),
            overrides: default_overrides("Documentation"),
            project_root,
        }
    }
}

/// A theme that was built successfully.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltTheme {
    pub name: String,
    pub output_dir: PathBuf,
}

/// Result of a run.
#[derive(Debug)]
pub struct RunReport {
    /// Themes built, in build order
    pub built: Vec<BuiltTheme>,

    /// State the themes were applied on
    pub snapshot: Snapshot,

    /// Total run time in milliseconds
    pub duration_ms: u64,
}

/// Errors that can occur during a run.
#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("theme remote not found: no remote {0}")]
    RemoteNotFound(RemoteSelector),

    #[error("theme(s) not found: {}", .0.join(", "))]
    ThemesNotFound(Vec<String>),

    #[error("An error occurred building the docs for theme {theme:?}")]
    BuildFailed {
        theme: String,
        #[source]
        source: GeneratorError,
    },

    #[error(transparent)]
    Git(#[from] GitError),
}

impl From<SelectError> for RunError {
    fn from(err: SelectError) -> Self {
        match err {
            SelectError::NotFound(names) => Self::ThemesNotFound(names),
        }
    }
}

/// Builds each theme in turn inside one shared worktree.
pub struct Orchestrator<V, G> {
    config: RunConfig,
    vcs: V,
    generator: G,
    sandbox: Sandbox,
}

impl<V: VersionControl, G: DocGenerator> Orchestrator<V, G> {
    pub fn new(config: RunConfig, vcs: V, generator: G) -> Self {
        let sandbox = Sandbox::new(config.worktree_dir.clone());
        Self {
            config,
            vcs,
            generator,
            sandbox,
        }
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// All themes available on the theme remote, in ref-name order.
    pub fn themes(&self) -> Result<Vec<Theme>, RunError> {
        let root = &self.config.project_root;

        let remotes = self.vcs.remotes(root)?;
        let remote = find_remote(&remotes, &self.config.remote)
            .ok_or_else(|| RunError::RemoteNotFound(self.config.remote.clone()))?;
        tracing::debug!("Using theme remote {:?}", remote.name);

        let branches = self.vcs.remote_branches(root, &remote.name)?;
        Ok(theme::discover(&branches, &remote.name, &self.config.suffix))
    }

    /// Build the `requested` themes, or every theme if none are named.
    ///
    /// Stops at the first failure. Whatever happens, the worktree ends up on
    /// the primary checkout's `HEAD` as it was when the run started.
    pub fn run(&self, requested: &[String]) -> Result<RunReport, RunError> {
        let start = Instant::now();
        let root = &self.config.project_root;

        let themes = theme::select(self.themes()?, requested)?;

        self.sandbox.prepare(&self.vcs, root)?;

        let head = self.vcs.rev_parse(root, "HEAD")?;
        let guard = self.sandbox.guard(&self.vcs, head);
        let snapshot = self.sandbox.capture(&self.vcs, root, guard.head())?;

        let mut built = Vec::with_capacity(themes.len());
        for theme in &themes {
            built.push(self.build_theme(theme, &snapshot)?);
        }

        guard.finish()?;

        Ok(RunReport {
            built,
            snapshot,
            duration_ms: start.elapsed().as_millis() as u64,
        })
    }

    /// Apply, build, and reset to the snapshot base.
    fn build_theme(&self, theme: &Theme, snapshot: &Snapshot) -> Result<BuiltTheme, RunError> {
        tracing::info!("BUILDING: {}", theme.name.to_uppercase());

        let output_dir = self.config.output_root.join(&theme.name);
        let request = BuildRequest {
            theme: theme.name.clone(),
            source_dir: self.sandbox.path().join(&self.config.source_subdir),
            output_dir: output_dir.clone(),
            doctree_dir: self.config.cache_dir.clone(),
            overrides: self.config.overrides.clone(),
        };

        let outcome = self
            .vcs
            .cherry_pick(self.sandbox.path(), &theme.branch)
            .map_err(RunError::from)
            .and_then(|()| {
                self.generator
                    .build(&request)
                    .map_err(|source| RunError::BuildFailed {
                        theme: theme.name.clone(),
                        source,
                    })
            });

        if let Err(e) = self.sandbox.reset(&self.vcs, &snapshot.base) {
            match outcome {
                // the build error is the one worth reporting
                Err(_) => tracing::error!("Failed to reset worktree after {}: {}", theme.name, e),
                Ok(()) => return Err(e.into()),
            }
        }

        outcome?;
        Ok(BuiltTheme {
            name: theme.name.clone(),
            output_dir,
        })
    }
}
