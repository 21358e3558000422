//! In-memory collaborators for unit tests.

use std::cell::RefCell;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use themebuild_git::{CommitId, GitError, Remote, VersionControl};

use crate::generator::{BuildRequest, DocGenerator, GeneratorError};

/// Operations recorded by [`FakeGit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    WorktreePrune,
    WorktreeAdd(PathBuf),
    Reset(String),
    StashCreate,
    Merge(String),
    CherryPick(String),
}

#[derive(Debug, Default)]
struct State {
    repo: PathBuf,
    head: String,
    worktree_head: String,
    stash: Option<String>,
    remotes: Vec<(Remote, Vec<String>)>,
    failing_picks: HashSet<String>,
    calls: Vec<Call>,
    mutated: Vec<PathBuf>,
}

/// A repository whose commits are strings.
///
/// The primary checkout sits at `/p` on `head0`. Cherry-picking `rev` onto
/// commit `c` yields commit `c+rev`, so a worktree's `HEAD` spells out
/// everything applied to it.
#[derive(Debug, Clone)]
pub struct FakeGit {
    state: Rc<RefCell<State>>,
}

impl FakeGit {
    pub fn new() -> Self {
        Self {
            state: Rc::new(RefCell::new(State {
                repo: PathBuf::from("/p"),
                head: "head0".to_string(),
                worktree_head: "stale".to_string(),
                ..Default::default()
            })),
        }
    }

    pub fn at(self, repo: &Path) -> Self {
        self.state.borrow_mut().repo = repo.to_path_buf();
        self
    }

    pub fn with_stash(self, id: &str) -> Self {
        self.state.borrow_mut().stash = Some(id.to_string());
        self
    }

    pub fn with_remote(self, name: &str, url: &str, branches: &[&str]) -> Self {
        self.state.borrow_mut().remotes.push((
            Remote {
                name: name.to_string(),
                urls: vec![url.to_string()],
            },
            branches.iter().map(|b| b.to_string()).collect(),
        ));
        self
    }

    pub fn failing_cherry_pick(self, rev: &str) -> Self {
        self.state.borrow_mut().failing_picks.insert(rev.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn worktree_head(&self) -> CommitId {
        CommitId::new(self.state.borrow().worktree_head.clone())
    }

    /// Directories that saw a reset, merge or cherry-pick.
    pub fn mutated(&self) -> Vec<PathBuf> {
        self.state.borrow().mutated.clone()
    }

    fn record(&self, call: Call) {
        self.state.borrow_mut().calls.push(call);
    }

    fn mutate(&self, dir: &Path, call: Call) {
        let mut state = self.state.borrow_mut();
        state.mutated.push(dir.to_path_buf());
        state.calls.push(call);
    }
}

fn failed(command: &str) -> GitError {
    GitError::Failed {
        command: command.to_string(),
        status: "exit status: 1".to_string(),
        stderr: "error: could not apply".to_string(),
    }
}

impl VersionControl for FakeGit {
    fn remotes(&self, _repo: &Path) -> Result<Vec<Remote>, GitError> {
        Ok(self
            .state
            .borrow()
            .remotes
            .iter()
            .map(|(remote, _)| remote.clone())
            .collect())
    }

    fn remote_branches(&self, _repo: &Path, remote: &str) -> Result<Vec<String>, GitError> {
        Ok(self
            .state
            .borrow()
            .remotes
            .iter()
            .find(|(r, _)| r.name == remote)
            .map(|(_, branches)| branches.clone())
            .unwrap_or_default())
    }

    fn rev_parse(&self, dir: &Path, rev: &str) -> Result<CommitId, GitError> {
        let state = self.state.borrow();
        if rev != "HEAD" {
            return Err(failed("git rev-parse"));
        }
        if dir == state.repo {
            Ok(CommitId::new(state.head.clone()))
        } else {
            Ok(CommitId::new(state.worktree_head.clone()))
        }
    }

    fn worktree_prune(&self, _repo: &Path) -> Result<(), GitError> {
        self.record(Call::WorktreePrune);
        Ok(())
    }

    fn worktree_add_detached(&self, _repo: &Path, path: &Path) -> Result<(), GitError> {
        self.record(Call::WorktreeAdd(path.to_path_buf()));
        let mut state = self.state.borrow_mut();
        state.worktree_head = state.head.clone();
        Ok(())
    }

    fn reset_hard(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError> {
        self.mutate(dir, Call::Reset(commit.to_string()));
        self.state.borrow_mut().worktree_head = commit.to_string();
        Ok(())
    }

    fn stash_create(&self, _repo: &Path) -> Result<Option<CommitId>, GitError> {
        self.record(Call::StashCreate);
        Ok(self.state.borrow().stash.clone().map(CommitId::new))
    }

    fn merge(&self, dir: &Path, commit: &CommitId) -> Result<(), GitError> {
        self.mutate(dir, Call::Merge(commit.to_string()));
        // a stash commit sits directly on HEAD, so this fast-forwards
        self.state.borrow_mut().worktree_head = commit.to_string();
        Ok(())
    }

    fn cherry_pick(&self, dir: &Path, rev: &str) -> Result<(), GitError> {
        self.mutate(dir, Call::CherryPick(rev.to_string()));
        let mut state = self.state.borrow_mut();
        if state.failing_picks.contains(rev) {
            state.worktree_head = format!("{}+conflict", state.worktree_head);
            return Err(failed("git cherry-pick"));
        }
        state.worktree_head = format!("{}+{}", state.worktree_head, rev);
        Ok(())
    }
}

/// Records each build along with the worktree `HEAD` it saw.
#[derive(Debug, Clone)]
pub struct FakeGenerator {
    git: FakeGit,
    failing: HashSet<String>,
    builds: Rc<RefCell<Vec<(BuildRequest, CommitId)>>>,
}

impl FakeGenerator {
    pub fn new(git: &FakeGit) -> Self {
        Self {
            git: git.clone(),
            failing: HashSet::new(),
            builds: Rc::default(),
        }
    }

    pub fn failing_on(mut self, theme: &str) -> Self {
        self.failing.insert(theme.to_string());
        self
    }

    pub fn builds(&self) -> Vec<(BuildRequest, CommitId)> {
        self.builds.borrow().clone()
    }

    pub fn themes(&self) -> Vec<String> {
        self.builds
            .borrow()
            .iter()
            .map(|(request, _)| request.theme.clone())
            .collect()
    }
}

impl DocGenerator for FakeGenerator {
    fn build(&self, request: &BuildRequest) -> Result<(), GeneratorError> {
        self.builds
            .borrow_mut()
            .push((request.clone(), self.git.worktree_head()));

        if self.failing.contains(&request.theme) {
            return Err(GeneratorError::Failed {
                status: "exit status: 2".to_string(),
            });
        }
        Ok(())
    }
}
