//! themebuild CLI - build multiple versions of the docs with different themes.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod config;

#[derive(Parser, Debug)]
#[command(name = "themebuild")]
#[command(about = "Build multiple versions of the docs with different themes")]
#[command(long_about = "Build multiple versions of the docs with different themes.\n\n\
    If no THEME-NAME is given, all theme branches are built.")]
#[command(version)]
pub struct Cli {
    /// Theme name (according to "*-theme" branch name)
    #[arg(value_name = "THEME-NAME")]
    themes: Vec<String>,

    /// Show list of available themes and exit
    #[arg(short, long)]
    list_themes: bool,

    /// Project root (the primary checkout)
    #[arg(short = 'C', long, default_value = ".")]
    root: PathBuf,

    /// Path to config file (defaults to <root>/themes.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for --list-themes
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let root = fs::canonicalize(&cli.root)
        .with_context(|| format!("Project root not found: {}", cli.root.display()))?;

    let file_config = config::load(&root, cli.config.as_deref())?;
    let run_config = file_config.run_config(&root)?;

    if cli.list_themes {
        return commands::list::run(run_config);
    }

    commands::build::run(run_config, file_config.generator(), &cli.themes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_theme_names() {
        let cli = Cli::try_parse_from(["themebuild", "dark", "light"]).unwrap();

        assert_eq!(cli.themes, vec!["dark".to_string(), "light".to_string()]);
        assert!(!cli.list_themes);
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.config, None);
    }

    #[test]
    fn parses_list_flag() {
        let cli = Cli::try_parse_from(["themebuild", "-l"]).unwrap();
        assert!(cli.list_themes);

        let cli = Cli::try_parse_from(["themebuild", "--list-themes", "-C", "/p"]).unwrap();
        assert!(cli.list_themes);
        assert_eq!(cli.root, PathBuf::from("/p"));
    }

    #[test]
    fn no_arguments_builds_everything() {
        let cli = Cli::try_parse_from(["themebuild"]).unwrap();

        assert!(cli.themes.is_empty());
    }
}
