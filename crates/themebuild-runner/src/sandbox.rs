//! The auxiliary worktree that themes are applied in.
//!
//! The worktree lives at a caller-chosen path and persists across runs. Each
//! run resets it to the primary checkout's `HEAD`, folds in any uncommitted
//! edits, and records the result as the base that every theme starts from.
//! [`RestoreGuard`] puts the worktree back on `HEAD` however the run ends.

use std::path::{Path, PathBuf};

use themebuild_git::{CommitId, GitError, VersionControl};

/// Handle to the auxiliary worktree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sandbox {
    path: PathBuf,
}

/// State captured at the start of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Primary checkout's `HEAD`; the worktree returns here when the run ends
    pub head: CommitId,

    /// Throwaway commit holding uncommitted primary changes, if any
    pub stash: Option<CommitId>,

    /// Worktree `HEAD` after the stash merge; themes are applied on top of this
    pub base: CommitId,
}

impl Sandbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the worktree if its directory is missing.
    pub fn prepare<V: VersionControl + ?Sized>(&self, vcs: &V, repo: &Path) -> Result<(), GitError> {
        if self.path.exists() {
            tracing::debug!("Reusing worktree at {}", self.path.display());
            return Ok(());
        }

        tracing::info!("Creating worktree at {}", self.path.display());
        vcs.worktree_prune(repo)?;
        vcs.worktree_add_detached(repo, &self.path)
    }

    /// Arm a guard that resets the worktree to `head` when dropped.
    pub fn guard<'a, V: VersionControl + ?Sized>(
        &'a self,
        vcs: &'a V,
        head: CommitId,
    ) -> RestoreGuard<'a, V> {
        RestoreGuard {
            vcs,
            dir: &self.path,
            head,
            armed: true,
        }
    }

    /// Bring the worktree to `head` plus any uncommitted changes in `repo`.
    ///
    /// The primary checkout is only read: `git stash create` records its
    /// changes without touching its working tree or index.
    pub fn capture<V: VersionControl + ?Sized>(
        &self,
        vcs: &V,
        repo: &Path,
        head: &CommitId,
    ) -> Result<Snapshot, GitError> {
        vcs.reset_hard(&self.path, head)?;

        let stash = vcs.stash_create(repo)?;
        if let Some(ref stash) = stash {
            tracing::info!("Including uncommitted changes ({})", short(stash));
            vcs.merge(&self.path, stash)?;
        }

        let base = vcs.rev_parse(&self.path, "HEAD")?;

        Ok(Snapshot {
            head: head.clone(),
            stash,
            base,
        })
    }

    /// Discard everything applied since `commit`.
    pub fn reset<V: VersionControl + ?Sized>(&self, vcs: &V, commit: &CommitId) -> Result<(), GitError> {
        vcs.reset_hard(&self.path, commit)
    }
}

/// Resets the worktree to the run's starting commit on every exit path.
///
/// Call [`RestoreGuard::finish`] on success to surface reset errors; on any
/// other path `Drop` performs the reset and logs a failure.
pub struct RestoreGuard<'a, V: VersionControl + ?Sized> {
    vcs: &'a V,
    dir: &'a Path,
    head: CommitId,
    armed: bool,
}

impl<V: VersionControl + ?Sized> RestoreGuard<'_, V> {
    pub fn head(&self) -> &CommitId {
        &self.head
    }

    /// Restore now and report the outcome.
    pub fn finish(mut self) -> Result<(), GitError> {
        self.armed = false;
        self.vcs.reset_hard(self.dir, &self.head)
    }
}

impl<V: VersionControl + ?Sized> Drop for RestoreGuard<'_, V> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        tracing::debug!("Restoring worktree to {}", short(&self.head));
        if let Err(e) = self.vcs.reset_hard(self.dir, &self.head) {
            tracing::error!(
                "Failed to restore worktree {} to {}: {}",
                self.dir.display(),
                self.head,
                e
            );
        }
    }
}

fn short(id: &CommitId) -> &str {
    let s = id.as_str();
    s.get(..10).unwrap_or(s)
}
