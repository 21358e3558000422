//! `VersionControl` backed by the `git` executable.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::traits::{CommitId, GitError, Remote, VersionControl};

/// Runs `git -C <dir> ...` for every operation.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use `git` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Run git in `dir` and return its stdout.
    fn run<I, S>(&self, dir: &Path, args: I) -> Result<String, GitError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-C").arg(dir).args(args);

        let command = describe(&cmd);
        tracing::debug!("Running {}", command);

        let output = cmd.output().map_err(|source| GitError::Spawn {
            program: self.program.clone(),
            source,
        })?;

        if !output.status.success() {
            return Err(GitError::Failed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| GitError::NotUtf8 { command })
    }
}

impl VersionControl for GitCli {
    fn remotes(&self, repo: &Path) -> Result<Vec<Remote>, GitError> {
        let names = self.run(repo, ["remote"])?;

        names
            .lines()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(|name| {
                let urls = self.run(repo, ["remote", "get-url", "--all", name])?;
                Ok(Remote {
                    name: name.to_string(),
                    urls: urls.lines().map(|u| u.trim().to_string()).collect(),
                })
            })
            .collect()
    }

    fn remote_branches(&self, repo: &Path, remote: &str) -> Result<Vec<String>, GitError> {
        let prefix = format!("refs/remotes/{}/", remote);
        let refs = self.run(
            repo,
            [
                "for-each-ref",
                "--format=%(refname)%09%(symref)",
                prefix.as_str(),
            ],
        )?;

        Ok(parse_remote_refs(&refs, &prefix))
    }

    fn rev_parse(&self, dir: &Path, rev: &str) -> Result<CommitId, GitError> {
        let spec = format!("{}^{{commit}}", rev);
        let id = self.run(dir, ["rev-parse", "--verify", spec.as_str()])?;
        Ok(CommitId::new(id.trim()))
    }

    fn worktree_prune(&self, repo: &Path) -> Result<(), GitError> {
        self.run(repo, ["worktree", "prune"]).map(drop)
    }

    fn worktree_add_detached(&self, repo: &Path, path: &Path) -> Result<(), GitError> {
        self.run(
            repo,
            [
                OsStr::new("worktree"),
                OsStr::new("add"),
                OsStr::new("--detach"),
                path.as_os_str(),
            ],
        )
        .map(drop)
    }

    fn reset_hard(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError> {
        self.run(dir, ["reset", "--hard", "--quiet", commit.as_str()])
            .map(drop)
    }

    fn stash_create(&self, repo: &Path) -> Result<Option<CommitId>, GitError> {
        let id = self.run(repo, ["stash", "create"])?;
        let id = id.trim();
        if id.is_empty() {
            Ok(None)
        } else {
            Ok(Some(CommitId::new(id)))
        }
    }

    fn merge(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError> {
        self.run(dir, ["merge", "--no-edit", "--quiet", commit.as_str()])
            .map(drop)
    }

    fn cherry_pick(&self, dir: &Path, rev: &str) -> Result<(), GitError> {
        self.run(dir, ["cherry-pick", rev]).map(drop)
    }
}

/// Strip `prefix` from every non-symbolic ref in `for-each-ref` output.
fn parse_remote_refs(output: &str, prefix: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| {
            let (refname, symref) = line.split_once('\t').unwrap_or((line, ""));
            if !symref.is_empty() {
                return None;
            }
            refname
                .strip_prefix(prefix)
                .filter(|name| !name.is_empty())
                .map(str::to_string)
        })
        .collect()
}

fn describe(cmd: &Command) -> String {
    std::iter::once(cmd.get_program())
        .chain(cmd.get_args())
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
