//! Locating the remote that carries the theme branches.

use std::fmt;

use themebuild_git::Remote;

/// How to recognise the theme remote among the configured remotes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteSelector {
    /// A remote with this exact name
    Named(String),

    /// A remote with any URL containing this text (e.g., "spatialaudio/nbsphinx")
    UrlContains(String),
}

impl Default for RemoteSelector {
    fn default() -> Self {
        Self::Named("origin".to_string())
    }
}

impl RemoteSelector {
    pub fn matches(&self, remote: &Remote) -> bool {
        match self {
            Self::Named(name) => remote.name == *name,
            Self::UrlContains(needle) => remote.urls.iter().any(|url| url.contains(needle)),
        }
    }
}

impl fmt::Display for RemoteSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => write!(f, "named {:?}", name),
            Self::UrlContains(needle) => write!(f, "with a URL containing {:?}", needle),
        }
    }
}

/// First remote matching `selector`, in configuration order.
pub fn find_remote<'a>(remotes: &'a [Remote], selector: &RemoteSelector) -> Option<&'a Remote> {
    remotes.iter().find(|remote| selector.matches(remote))
}
