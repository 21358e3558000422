//! Builds themed variants of a documentation site.
//!
//! Themes are remote branches named `<theme>-theme`. Each one is cherry-picked
//! onto a snapshot of the current checkout inside a persistent git worktree,
//! built with the documentation generator, and then reset away again, so the
//! primary checkout is never modified.

pub mod generator;
pub mod orchestrator;
pub mod remote;
pub mod sandbox;
pub mod theme;

#[cfg(test)]
mod testing;

pub use generator::{default_overrides, BuildRequest, DocGenerator, GeneratorError, SphinxBuild};
pub use orchestrator::{BuiltTheme, Orchestrator, RunConfig, RunError, RunReport};
pub use remote::{find_remote, RemoteSelector};
pub use sandbox::{RestoreGuard, Sandbox, Snapshot};
pub use theme::{discover, select, SelectError, Theme};
