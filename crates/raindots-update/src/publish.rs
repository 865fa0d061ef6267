//! Commits and pushes the calendar document.

use git2::Repository;
use std::path::{Path, PathBuf};

use crate::error::UpdateError;

/// Hands the finished document to version control.
pub struct Publisher {
    repo_path: PathBuf,
}

impl Publisher {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
        }
    }

    /// Stage the calendar file and commit it with `message`.
    ///
    /// Returns `false` without committing when the file is unchanged since
    /// HEAD, so no-op runs leave no empty commits behind.
    pub fn commit(&self, calendar_path: &Path, message: &str) -> Result<bool, UpdateError> {
        let repo = Repository::open(&self.repo_path)?;
        let workdir = repo
            .workdir()
            .ok_or_else(|| git2::Error::from_str("cannot publish into a bare repository"))?;

        let relative = calendar_path
            .strip_prefix(workdir)
            .unwrap_or(calendar_path);

        let mut index = repo.index()?;
        index.add_path(relative)?;
        index.write()?;
        let tree_oid = index.write_tree()?;

        let parent = match repo.head() {
            Ok(head) => {
                let oid = head
                    .target()
                    .ok_or_else(|| git2::Error::from_str("HEAD has no target"))?;
                Some(repo.find_commit(oid)?)
            }
            // Unborn branch on a fresh repository.
            Err(_) => None,
        };

        if let Some(parent) = &parent {
            if parent.tree_id() == tree_oid {
                tracing::info!("Calendar unchanged, nothing to commit");
                return Ok(false);
            }
        }

        let tree = repo.find_tree(tree_oid)?;
        let sig = repo.signature()?;
        let parents: Vec<_> = parent.iter().collect();
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)?;

        tracing::info!(path = %calendar_path.display(), "Committed calendar update");
        Ok(true)
    }

    /// Push the current branch to `origin`.
    pub fn push(&self) -> Result<(), UpdateError> {
        let repo = Repository::open(&self.repo_path)?;

        let head = repo.head()?;
        let branch = head
            .shorthand()
            .ok_or_else(|| git2::Error::from_str("HEAD is not a named branch"))?;

        let mut remote = repo.find_remote("origin")?;
        remote.push(&[format!("refs/heads/{branch}")], None)?;

        tracing::info!(branch, "Pushed calendar update");
        Ok(())
    }
}
