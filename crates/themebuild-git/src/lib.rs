//! Git collaborator for themebuild.
//!
//! This crate exposes the small set of version-control operations the theme
//! builder needs (remote discovery, worktrees, hard resets, stash commits and
//! cherry-picks) behind the [`VersionControl`] trait, with [`GitCli`] as the
//! implementation that shells out to `git`.

pub mod cli;
pub mod traits;

pub use cli::GitCli;
pub use traits::{CommitId, GitError, Remote, VersionControl};
