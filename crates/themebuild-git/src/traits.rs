//! Trait definitions for the version-control collaborator.

use std::fmt;
use std::path::{Path, PathBuf};

/// A configured remote and the URLs it fetches from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Remote {
    /// Remote name (e.g., "origin")
    pub name: String,

    /// Fetch URLs
    pub urls: Vec<String>,
}

/// A resolved commit object id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CommitId(String);

impl CommitId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CommitId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Errors that can occur while driving git.
#[derive(Debug, thiserror::Error)]
pub enum GitError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` failed ({status}): {stderr}")]
    Failed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("`{command}` produced non-UTF-8 output")]
    NotUtf8 { command: String },
}

/// Version-control operations needed to build themes in a side worktree.
///
/// Every operation names the directory it acts on, so a single value can
/// drive both the primary checkout and the auxiliary worktree.
pub trait VersionControl {
    /// List the configured remotes of the repository at `repo`.
    fn remotes(&self, repo: &Path) -> Result<Vec<Remote>, GitError>;

    /// Short names of the branches under `refs/remotes/<remote>/`, in ref-name
    /// order. Symbolic refs such as `HEAD` are skipped.
    fn remote_branches(&self, repo: &Path, remote: &str) -> Result<Vec<String>, GitError>;

    /// Resolve `rev` to a commit id in the checkout at `dir`.
    fn rev_parse(&self, dir: &Path, rev: &str) -> Result<CommitId, GitError>;

    /// Drop bookkeeping for worktrees whose directories no longer exist.
    fn worktree_prune(&self, repo: &Path) -> Result<(), GitError>;

    /// Create a detached worktree at `path`.
    fn worktree_add_detached(&self, repo: &Path, path: &Path) -> Result<(), GitError>;

    /// Hard-reset the checkout at `dir` to `commit`.
    fn reset_hard(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError>;

    /// Record uncommitted changes as a throwaway commit without touching the
    /// working tree. Returns `None` when there is nothing to record.
    fn stash_create(&self, repo: &Path) -> Result<Option<CommitId>, GitError>;

    /// Merge `commit` into the checkout at `dir`.
    fn merge(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError>;

    /// Apply the change introduced by the tip of `rev` onto `dir`.
    fn cherry_pick(&self, dir: &Path, rev: &str) -> Result<(), GitError>;
}
