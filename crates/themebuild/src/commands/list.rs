//! List available themes.

use anyhow::Result;
use themebuild_git::GitCli;
use themebuild_runner::{Orchestrator, RunConfig, SphinxBuild};

/// Print each theme name on its own line.
pub fn run(config: RunConfig) -> Result<()> {
    let orchestrator = Orchestrator::new(config, GitCli::new(), SphinxBuild::default());

    for theme in orchestrator.themes()? {
        println!("{}", theme.name);
    }

    Ok(())
}
