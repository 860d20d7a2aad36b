//! Race-safe allocation of the next usable subdirectory
//!
//! Multiple independent processes may race to claim numbered
//! directories under the same parent with no shared in-memory state.
//! Correctness rests on the atomicity of the claim operation and on
//! re-validating acceptability after a failed claim.

use std::path::PathBuf;
use std::time::Duration;

use backoff::ExponentialBackoff;
use backoff::backoff::Backoff;
use pixrepo_path::RepoPath;

use crate::{Error, Result};

/// Candidate directories for the allocator, indexed from zero.
pub trait DirSlots {
    /// The candidate directory for an index.
    fn path_for_index(&self, index: u64) -> RepoPath;

    /// True if the candidate is free to claim at this moment.
    fn is_acceptable(&self, path: &RepoPath) -> Result<bool>;

    /// Attempt to atomically reserve the candidate.
    ///
    /// Loses cleanly with [`Error::ClaimCollision`] when a concurrent
    /// allocator reserved it first; any other error is a genuine
    /// fault.
    fn claim(&self, path: &RepoPath) -> Result<()>;
}

/// Filesystem-backed slots: zero-padded numbered directories under a
/// parent, with `fs::create_dir` as the atomic claim.
#[derive(Debug, Clone)]
pub struct NumberedDirSlots {
    parent: PathBuf,
    prefix: String,
}

impl NumberedDirSlots {
    /// Errors eagerly if the parent directory does not exist.
    pub fn new(parent: impl Into<PathBuf>, prefix: impl Into<String>) -> Result<Self> {
        let parent = parent.into();
        if !parent.is_dir() {
            return Err(Error::BaseDirMissing { path: parent });
        }
        Ok(Self {
            parent,
            prefix: prefix.into(),
        })
    }

    fn host_path(&self, path: &RepoPath) -> PathBuf {
        path.below(&self.parent)
    }
}

impl DirSlots for NumberedDirSlots {
    fn path_for_index(&self, index: u64) -> RepoPath {
        RepoPath::from_string(&format!("{}{:03}", self.prefix, index))
    }

    fn is_acceptable(&self, path: &RepoPath) -> Result<bool> {
        Ok(!self.host_path(path).exists())
    }

    fn claim(&self, path: &RepoPath) -> Result<()> {
        let host = self.host_path(path);
        std::fs::create_dir(&host).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::ClaimCollision { path: host.clone() },
            _ => Error::io(&host, e),
        })
    }
}

/// Finds and claims the lowest-index acceptable candidate.
///
/// Two phases: an exponential-then-binary search locates the lowest
/// index acceptable at probe time without touching every index from
/// zero; a forward linear scan then re-validates and claims, because
/// racing allocators may have taken indices between the search and the
/// claim. Lost claims back off by a bounded, jittered delay.
#[derive(Debug, Clone)]
pub struct NextDirAllocator {
    policy: ExponentialBackoff,
}

impl Default for NextDirAllocator {
    fn default() -> Self {
        Self::with_deadline(Duration::from_secs(5))
    }
}

impl NextDirAllocator {
    /// An allocator whose contention retries give up after `deadline`.
    pub fn with_deadline(deadline: Duration) -> Self {
        Self {
            policy: ExponentialBackoff {
                initial_interval: Duration::from_millis(10),
                max_interval: Duration::from_millis(250),
                max_elapsed_time: Some(deadline),
                ..ExponentialBackoff::default()
            },
        }
    }

    /// Claim the lowest-index candidate that is still acceptable,
    /// returning its index and path.
    pub fn use_first_acceptable<S: DirSlots>(&self, slots: &S) -> Result<(u64, RepoPath)> {
        let acceptable = |index: u64| slots.is_acceptable(&slots.path_for_index(index));

        let lowest = if acceptable(0)? {
            0
        } else {
            // double the probe until an acceptable index brackets the
            // boundary, then binary-search the bracket
            let mut unacceptable = 0u64;
            let mut probe = 1u64;
            while !acceptable(probe)? {
                unacceptable = probe;
                probe = probe.checked_mul(2).ok_or(Error::IndexSpaceExhausted)?;
            }
            let (mut lo, mut hi) = (unacceptable, probe);
            while hi - lo > 1 {
                let mid = lo + (hi - lo) / 2;
                if acceptable(mid)? {
                    hi = mid;
                } else {
                    lo = mid;
                }
            }
            hi
        };

        // linear re-validation scan: indices past `lowest` may have
        // been claimed since the search
        let mut policy = self.policy.clone();
        policy.reset();
        let mut index = lowest;
        loop {
            let path = slots.path_for_index(index);
            if slots.is_acceptable(&path)? {
                match slots.claim(&path) {
                    Ok(()) => {
                        tracing::debug!(index, path = %path, "claimed directory");
                        return Ok((index, path));
                    }
                    Err(Error::ClaimCollision { path: host }) => {
                        if slots.is_acceptable(&path)? {
                            // collision reported but the slot still
                            // looks free: a genuine fault, not a race
                            return Err(Error::ClaimInconsistent { path: host });
                        }
                        let delay = policy
                            .next_backoff()
                            .ok_or(Error::ContentionTimeout { last_index: index })?;
                        tracing::debug!(index, ?delay, "lost directory claim race, backing off");
                        std::thread::sleep(delay);
                    }
                    Err(e) => return Err(e),
                }
            }
            index = index.checked_add(1).ok_or(Error::IndexSpaceExhausted)?;
        }
    }
}
