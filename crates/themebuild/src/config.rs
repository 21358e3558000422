//! Configuration file (themes.toml).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use themebuild_runner::{default_overrides, RemoteSelector, RunConfig, SphinxBuild};

pub const DEFAULT_CONFIG_FILE: &str = "themes.toml";

/// Configuration file structure (themes.toml).
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    remote: RemoteConfig,
    #[serde(default)]
    branches: BranchConfig,
    #[serde(default)]
    build: BuildSettings,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct RemoteConfig {
    /// Remote name, e.g. "upstream"
    name: Option<String>,
    /// Text that one of the remote's URLs must contain
    url_contains: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BranchConfig {
    #[serde(default = "default_suffix")]
    suffix: String,
}

impl Default for BranchConfig {
    fn default() -> Self {
        Self {
            suffix: default_suffix(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuildSettings {
    #[serde(default = "default_source")]
    source: PathBuf,
    #[serde(default = "default_worktree")]
    worktree: PathBuf,
    #[serde(default = "default_cache")]
    cache: PathBuf,
    #[serde(default = "default_output")]
    output: PathBuf,
    #[serde(default = "default_title")]
    title: String,
    #[serde(default = "default_command")]
    command: PathBuf,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    overrides: BTreeMap<String, String>,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            source: default_source(),
            worktree: default_worktree(),
            cache: default_cache(),
            output: default_output(),
            title: default_title(),
            command: default_command(),
            args: vec![],
            overrides: BTreeMap::new(),
        }
    }
}

fn default_suffix() -> String {
    "-theme".to_string()
}
fn default_source() -> PathBuf {
    PathBuf::from("doc")
}
fn default_worktree() -> PathBuf {
    PathBuf::from("_worktree")
}
fn default_cache() -> PathBuf {
    PathBuf::from("_cache")
}
fn default_output() -> PathBuf {
    PathBuf::from(".")
}
fn default_title() -> String {
    "Documentation".to_string()
}
fn default_command() -> PathBuf {
    PathBuf::from("sphinx-build")
}

/// Load configuration for the project at `root`.
///
/// Without an explicit `path`, `<root>/themes.toml` is read if it exists and
/// defaults are used otherwise. An explicit path must exist.
pub fn load(root: &Path, path: Option<&Path>) -> Result<ConfigFile> {
    let (config_path, required) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (root.join(DEFAULT_CONFIG_FILE), false),
    };

    if !config_path.exists() {
        if required {
            anyhow::bail!("Config file not found: {}", config_path.display());
        }
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read {}", config_path.display()))?;
    let config = parse(&content)
        .with_context(|| format!("Failed to parse {}", config_path.display()))?;
    tracing::info!("Loaded config from {}", config_path.display());
    Ok(config)
}

pub fn parse(content: &str) -> Result<ConfigFile> {
    Ok(toml::from_str(content)?)
}

impl ConfigFile {
    /// Run configuration with relative paths resolved against `root`.
    pub fn run_config(&self, root: &Path) -> Result<RunConfig> {
        let remote = match (&self.remote.name, &self.remote.url_contains) {
            (Some(_), Some(_)) => {
                anyhow::bail!("Set either remote.name or remote.url_contains, not both")
            }
            (Some(name), None) => RemoteSelector::Named(name.clone()),
            (None, Some(needle)) => RemoteSelector::UrlContains(needle.clone()),
            (None, None) => RemoteSelector::default(),
        };

        if self.branches.suffix.is_empty() {
            anyhow::bail!("branches.suffix must not be empty");
        }

        let mut overrides = default_overrides(&self.build.title);
        overrides.extend(self.build.overrides.clone());

        Ok(RunConfig {
            project_root: root.to_path_buf(),
            worktree_dir: root.join(&self.build.worktree),
            cache_dir: root.join(&self.build.cache),
            source_subdir: self.build.source.clone(),
            output_root: root.join(&self.build.output),
            remote,
            suffix: self.branches.suffix.clone(),
            overrides,
        })
    }

    /// The documentation generator to run.
    pub fn generator(&self) -> SphinxBuild {
        SphinxBuild {
            program: self.build.command.clone(),
            extra_args: self.build.args.clone(),
        }
    }
}
