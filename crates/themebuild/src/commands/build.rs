//! Theme build command.

use anyhow::Result;
use themebuild_git::GitCli;
use themebuild_runner::{Orchestrator, RunConfig, SphinxBuild};

/// Run the build command.
pub fn run(config: RunConfig, generator: SphinxBuild, themes: &[String]) -> Result<()> {
    tracing::info!(
        "Building themes from {} in {}",
        config.project_root.display(),
        config.worktree_dir.display()
    );

    let orchestrator = Orchestrator::new(config, GitCli::new(), generator);
    let report = orchestrator.run(themes)?;

    tracing::info!(
        "Built {} theme(s) in {}ms",
        report.built.len(),
        report.duration_ms
    );

    for theme in &report.built {
        tracing::info!("Output: {} -> {}", theme.name, theme.output_dir.display());
    }

    Ok(())
}
