//! Rotating credential pool.
//!
//! The pool is owned by the composition root and shared by handle
//! (`Arc<KeyPool>`). The cursor is atomic; rotation is a compare-and-swap
//! against the index a caller actually used, so two in-flight calls that
//! fail on the same key advance the cursor only once.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::warn;

/// Ordered pool of interchangeable API keys with a circular cursor.
#[derive(Debug)]
pub struct KeyPool {
    keys: Vec<String>,
    cursor: AtomicUsize,
}

/// The key a caller is using, together with the cursor position it was read at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyLease {
    index: usize,
    key: String,
}

impl KeyLease {
    /// Cursor position the key was read at.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The credential itself. Never log this.
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl KeyPool {
    /// Create a pool with the cursor on the first key.
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            keys,
            cursor: AtomicUsize::new(0),
        }
    }

    /// Key at the cursor, or `None` when no credential is configured.
    pub fn current(&self) -> Option<&str> {
        self.keys.get(self.cursor()).map(String::as_str)
    }

    /// Lease the key at the cursor.
    pub fn lease(&self) -> Option<KeyLease> {
        let index = self.cursor();
        self.keys.get(index).map(|key| KeyLease {
            index,
            key: key.clone(),
        })
    }

    /// Advance the cursor by one, wrapping. Returns `false` on pools of size 0 or 1.
    pub fn rotate(&self) -> bool {
        match self.lease() {
            Some(lease) => self.rotate_past(&lease),
            None => false,
        }
    }

    /// Move past the leased key.
    ///
    /// If another caller already moved the cursor off `lease`, the cursor is
    /// left alone and `true` is returned: a different key is current either way.
    pub fn rotate_past(&self, lease: &KeyLease) -> bool {
        let len = self.keys.len();
        if len <= 1 {
            return false;
        }

        let next = (lease.index + 1) % len;
        match self
            .cursor
            .compare_exchange(lease.index, next, Ordering::SeqCst, Ordering::SeqCst)
        {
            Ok(_) => {
                warn!(key_index = next, "Rotating to API key index");
                true
            }
            Err(_) => true,
        }
    }

    /// Number of keys in the pool.
    pub fn size(&self) -> usize {
        self.keys.len()
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::SeqCst)
    }

    /// `true` when no credential is configured.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
