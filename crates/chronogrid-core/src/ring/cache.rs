//! Versioned cache around [`derive_snapshot`].
//!
//! Holds the last snapshot together with the `(anchor, capacity, config,
//! source)` tuple it was derived for and only re-derives when that tuple
//! changes.

use std::sync::Arc;

use super::snapshot::{derive_snapshot, RingMeta, SnapshotOf, WindowRequest, WindowSource};
use crate::error::WindowError;

#[derive(Debug, Clone, PartialEq)]
struct CacheKey<C> {
    anchor: C,
    capacity: i64,
    config_version: String,
    source_version: String,
}

impl<C: Clone> CacheKey<C> {
    fn of<S>(request: &WindowRequest<'_, S>) -> Self
    where
        S: WindowSource<Cursor = C>,
    {
        Self {
            anchor: request.anchor.clone(),
            capacity: request.capacity,
            config_version: request.config_version.clone(),
            source_version: request.source_version.clone(),
        }
    }
}

pub struct SnapshotCache<S: WindowSource> {
    key: Option<CacheKey<S::Cursor>>,
    snapshot: Option<Arc<SnapshotOf<S>>>,
}

impl<S: WindowSource> Default for SnapshotCache<S> {
    fn default() -> Self {
        Self {
            key: None,
            snapshot: None,
        }
    }
}

impl<S: WindowSource> SnapshotCache<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached snapshot if the request key is unchanged,
    /// otherwise derive a new one from the cached predecessor.
    pub fn derive(&mut self, request: &WindowRequest<'_, S>) -> Result<Arc<SnapshotOf<S>>, WindowError> {
        let key = CacheKey::of(request);

        if !request.force_replace && self.key.as_ref() == Some(&key) {
            if let Some(snapshot) = &self.snapshot {
                tracing::trace!(anchor = ?key.anchor, "window cache hit");
                return Ok(Arc::clone(snapshot));
            }
        }

        let next = derive_snapshot(self.snapshot.as_ref(), request)?;
        self.snapshot = Some(Arc::clone(&next));
        self.key = Some(key);
        Ok(next)
    }

    pub fn is_initialized(&self) -> bool {
        self.snapshot.is_some()
    }

    pub fn snapshot(&self) -> Result<&Arc<SnapshotOf<S>>, WindowError> {
        self.snapshot.as_ref().ok_or(WindowError::NotInitialized {
            what: "window snapshot",
        })
    }

    pub fn items(&self) -> Result<&[S::Item], WindowError> {
        self.snapshot().map(|snapshot| snapshot.items.as_slice())
    }

    pub fn meta(&self) -> Result<&RingMeta<S::Cursor>, WindowError> {
        self.snapshot().map(|snapshot| &snapshot.meta)
    }

    /// Forget everything; the next derive seeds again.
    pub fn reset(&mut self) {
        self.key = None;
        self.snapshot = None;
    }
}
