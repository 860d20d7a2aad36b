//! Host-path to repository-path transformation
//!
//! The client-side transformer turns host-local absolute paths into
//! sanitized repository-relative paths, keeping only a configurable
//! number of trailing components. The server-side transformer maps
//! repository paths onto the configured base directory and back.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use pixrepo_path::{NamingRules, RepoPath, Sanitizer};

use crate::{Error, Result};

/// Maps host-local paths to sanitized repository-relative paths.
#[derive(Debug, Clone)]
pub struct ClientPathTransformer {
    sanitizer: Sanitizer,
}

impl ClientPathTransformer {
    pub fn new(rules: NamingRules) -> Self {
        Self {
            sanitizer: Sanitizer::new(rules),
        }
    }

    pub fn sanitizer(&self) -> &Sanitizer {
        &self.sanitizer
    }

    /// The sanitized repository path for a host path, keeping the last
    /// `depth` components.
    pub fn repo_path(&self, host_path: impl AsRef<Path>, depth: usize) -> Result<RepoPath> {
        let full = RepoPath::from_host_path(host_path)?;
        let tail = full.tail(depth)?;
        Ok(self.sanitizer.apply_path(&tail))
    }

    /// The smallest depth at which the sanitized relative paths of all
    /// inputs are pairwise distinct.
    ///
    /// Searches by doubling from depth 1, then binary-searches the
    /// bracket. If even the full depth fails to disambiguate, the
    /// inputs contain effective duplicates and [`Error::NotUnique`] is
    /// returned.
    pub fn minimum_depth(&self, paths: &[PathBuf]) -> Result<usize> {
        if paths.len() < 2 {
            return Ok(1);
        }
        let resolved = paths
            .iter()
            .map(RepoPath::from_host_path)
            .collect::<pixrepo_path::Result<Vec<_>>>()?;
        let max_depth = resolved.iter().map(RepoPath::len).max().unwrap_or(1).max(1);

        let distinct_at = |depth: usize| -> Result<bool> {
            let mut seen = HashSet::new();
            for path in &resolved {
                let key = self.sanitizer.apply_path(&path.tail(depth)?).to_string();
                if !seen.insert(key) {
                    return Ok(false);
                }
            }
            Ok(true)
        };

        if !distinct_at(max_depth)? {
            let mut seen = HashSet::new();
            for path in &resolved {
                let key = self.sanitizer.apply_path(path).to_string();
                if !seen.insert(key.clone()) {
                    return Err(Error::NotUnique { path: key });
                }
            }
            unreachable!("full depth failed but no duplicate found");
        }

        // exponential probe for a distinct depth
        let mut last_failing = 0usize;
        let mut depth = 1usize;
        while depth < max_depth && !distinct_at(depth)? {
            last_failing = depth;
            depth = (depth * 2).min(max_depth);
        }
        // binary search the (failing, distinct] bracket
        let (mut lo, mut hi) = (last_failing, depth);
        while hi - lo > 1 {
            let mid = lo + (hi - lo) / 2;
            if distinct_at(mid)? {
                hi = mid;
            } else {
                lo = mid;
            }
        }
        Ok(hi)
    }

    /// Groups of inputs whose sanitized full paths collide
    /// case-insensitively once stored.
    ///
    /// Returns only the groups with more than one member; an empty
    /// result means all inputs are distinct.
    pub fn too_similar(&self, paths: &[PathBuf]) -> Result<Vec<Vec<PathBuf>>> {
        let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
        for host in paths {
            let repo = self.sanitizer.apply_path(&RepoPath::from_host_path(host)?);
            groups
                .entry(repo.to_string().to_lowercase())
                .or_default()
                .push(host.clone());
        }
        Ok(groups.into_values().filter(|group| group.len() > 1).collect())
    }
}

/// Maps repository-relative paths onto the repository base directory.
#[derive(Debug, Clone)]
pub struct ServerPathTransformer {
    base: PathBuf,
    sanitizer: Sanitizer,
}

impl ServerPathTransformer {
    /// Errors eagerly if the base directory cannot be resolved.
    pub fn new(base: impl AsRef<Path>, rules: NamingRules) -> Result<Self> {
        let base = dunce::canonicalize(base.as_ref()).map_err(|_| Error::BaseDirMissing {
            path: base.as_ref().to_path_buf(),
        })?;
        if !base.is_dir() {
            return Err(Error::BaseDirMissing { path: base });
        }
        Ok(Self {
            base,
            sanitizer: Sanitizer::new(rules),
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    /// The host-local location of a repository path.
    pub fn to_host_path(&self, path: &RepoPath) -> PathBuf {
        path.below(&self.base)
    }

    /// The repository path of a host-local location.
    ///
    /// Errors if the host path is not inside the repository root.
    pub fn from_host_path(&self, host_path: impl AsRef<Path>) -> Result<RepoPath> {
        let resolved = dunce::canonicalize(host_path.as_ref())
            .map_err(|e| Error::io(host_path.as_ref(), e))?;
        let relative = resolved
            .strip_prefix(&self.base)
            .map_err(|_| Error::OutsideRepository {
                path: resolved.clone(),
                base: self.base.clone(),
            })?;
        Ok(RepoPath::from(relative))
    }

    /// True iff re-sanitizing the path would change nothing, i.e. the
    /// client already produced a compliant name.
    pub fn is_legal(&self, path: &RepoPath) -> bool {
        path.components()
            .iter()
            .all(|component| self.sanitizer.is_clean(component))
    }
}
