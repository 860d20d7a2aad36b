//! Session-scoped servant registry with per-key locking
//!
//! One registry exists per network session. Worker threads of the
//! session call it concurrently: the servant map, the lock map, and
//! the client set are each guarded by their own mutex, and key-scoped
//! locks give callers mutual exclusion per identity without
//! serializing unrelated identities.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use parking_lot::lock_api::ArcMutexGuard;

use crate::{Error, Result};

/// Holds a key-scoped lock until dropped.
///
/// The lock for a key is created on first acquisition and reused for
/// the lifetime of the registry; release happens on drop, so a release
/// without a prior acquisition cannot be expressed.
pub struct KeyGuard {
    _guard: ArcMutexGuard<parking_lot::RawMutex, ()>,
}

/// Per-session concurrent map from opaque identity to servant, with a
/// hard cap on entries.
pub struct ServantRegistry<S> {
    ceiling: usize,
    servants: Mutex<HashMap<String, S>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
    clients: Mutex<HashSet<String>>,
}

impl<S> ServantRegistry<S> {
    /// A registry that holds at most `ceiling` servants.
    pub fn new(ceiling: usize) -> Self {
        Self {
            ceiling,
            servants: Mutex::new(HashMap::new()),
            locks: Mutex::new(HashMap::new()),
            clients: Mutex::new(HashSet::new()),
        }
    }

    pub fn ceiling(&self) -> usize {
        self.ceiling
    }

    /// Register a servant under an identity.
    ///
    /// At or above the ceiling the registry refuses without inserting.
    /// Otherwise the servant is stored, replacing and returning any
    /// prior value for the identity; replacement is log-worthy but not
    /// an error.
    pub fn put(&self, identity: impl Into<String>, servant: S) -> Result<Option<S>> {
        let identity = identity.into();
        let mut servants = self.servants.lock();
        if servants.len() >= self.ceiling {
            tracing::warn!(%identity, limit = self.ceiling, "servant registry over quota");
            return Err(Error::OverQuota {
                limit: self.ceiling,
            });
        }
        let prior = servants.insert(identity.clone(), servant);
        if prior.is_some() {
            tracing::warn!(%identity, "replacing already-registered servant");
        }
        Ok(prior)
    }

    /// Look up the servant for an identity.
    pub fn get(&self, identity: &str) -> Option<S>
    where
        S: Clone,
    {
        self.servants.lock().get(identity).cloned()
    }

    /// Remove and return the servant for an identity.
    pub fn remove(&self, identity: &str) -> Option<S> {
        self.servants.lock().remove(identity)
    }

    /// Number of registered servants.
    pub fn len(&self) -> usize {
        self.servants.lock().len()
    }

    /// True if no servants are registered.
    pub fn is_empty(&self) -> bool {
        self.servants.lock().is_empty()
    }

    /// Acquire the dedicated lock for a key, creating it on first use.
    ///
    /// Creation is race-free: concurrent first-acquirers resolve to
    /// the same mutex through the lock map's own guard. The map guard
    /// is released before blocking on the key lock, so holding one key
    /// never stalls acquisition of another.
    pub fn lock_key(&self, key: &str) -> KeyGuard {
        let mutex = {
            let mut locks = self.locks.lock();
            Arc::clone(
                locks
                    .entry(key.to_string())
                    .or_insert_with(|| Arc::new(Mutex::new(()))),
            )
        };
        KeyGuard {
            _guard: mutex.lock_arc(),
        }
    }

    /// Record an attached external client connection.
    pub fn add_client(&self, client_id: impl Into<String>) -> bool {
        self.clients.lock().insert(client_id.into())
    }

    /// Remove a client connection marker.
    pub fn remove_client(&self, client_id: &str) -> bool {
        self.clients.lock().remove(client_id)
    }

    /// The client connections still attached, sorted.
    pub fn clients(&self) -> Vec<String> {
        let mut clients: Vec<String> = self.clients.lock().iter().cloned().collect();
        clients.sort();
        clients
    }
}
