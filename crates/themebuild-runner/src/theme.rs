//! Theme discovery and selection.

use std::collections::{BTreeSet, HashSet};

/// A theme branch on the theme remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Theme {
    /// Display name, the branch name without its suffix (e.g., "dark")
    pub name: String,

    /// Remote-qualified branch to cherry-pick (e.g., "origin/dark-theme")
    pub branch: String,
}

/// Errors that can occur when selecting themes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    #[error("theme(s) not found: {}", .0.join(", "))]
    NotFound(Vec<String>),
}

/// Turn the branches of `remote` into themes.
///
/// Only branches ending in `suffix` (and longer than it) are themes. Order
/// follows `branches`; a repeated name keeps its first branch.
pub fn discover(branches: &[String], remote: &str, suffix: &str) -> Vec<Theme> {
    let mut seen = HashSet::new();

    branches
        .iter()
        .filter_map(|branch| {
            let name = branch.strip_suffix(suffix).filter(|n| !n.is_empty())?;
            seen.insert(name.to_string()).then(|| Theme {
                name: name.to_string(),
                branch: format!("{}/{}", remote, branch),
            })
        })
        .collect()
}

/// Keep the themes named in `requested`.
///
/// An empty request selects everything. Every requested name must match a
/// discovered theme; the names that don't are reported together.
pub fn select(themes: Vec<Theme>, requested: &[String]) -> Result<Vec<Theme>, SelectError> {
    if requested.is_empty() {
        return Ok(themes);
    }

    let wanted: BTreeSet<&str> = requested.iter().map(String::as_str).collect();
    let available: BTreeSet<&str> = themes.iter().map(|t| t.name.as_str()).collect();

    let missing: Vec<String> = wanted
        .difference(&available)
        .map(|name| name.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(SelectError::NotFound(missing));
    }

    Ok(themes
        .into_iter()
        .filter(|theme| wanted.contains(theme.name.as_str()))
        .collect())
}
