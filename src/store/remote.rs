// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Remote store adapter: a shared real-time document store behind a trait.
//!
//! Documents are read and written whole; there is no field-level write
//! primitive. A subscription fires once immediately with the current value
//! (or `None` for an absent document) and again on every subsequent write.
//! Snapshot callbacks run on the writing thread and must only hand the value
//! off (the sync engine enqueues into its inbox); they must not call back
//! into the store.

use std::fmt;
use std::sync::{Arc, Mutex, Weak};

use serde_json::Value;

use crate::model::ProjectId;

/// A document path in the shared store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DocPath {
    /// The full tree of one project.
    OrgData(ProjectId),
    /// The position overlay of one project.
    Positions(ProjectId),
    /// The connections overlay of one project.
    Connections(ProjectId),
    /// One catalogue entry.
    Project(ProjectId),
    ActiveProjectId,
    Locked,
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OrgData(project_id) => write!(f, "orgData/{project_id}"),
            Self::Positions(project_id) => write!(f, "positions/{project_id}"),
            Self::Connections(project_id) => write!(f, "connections/{project_id}"),
            Self::Project(project_id) => write!(f, "projects/{project_id}"),
            Self::ActiveProjectId => f.write_str("settings/activeProjectId"),
            Self::Locked => f.write_str("settings/locked"),
        }
    }
}

#[derive(Debug)]
pub enum RemoteError {
    /// The store rejected the write; the caller owns the bounded retry.
    WriteRejected { path: String, detail: String },
}

impl fmt::Display for RemoteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteRejected { path, detail } => {
                write!(f, "remote store rejected write to {path}: {detail}")
            }
        }
    }
}

impl std::error::Error for RemoteError {}

/// Snapshot callback for one document; `None` means the document is absent.
pub type SnapshotFn = Arc<dyn Fn(Option<Value>) + Send + Sync>;

/// Snapshot callback for the catalogue collection (`projects/*`); receives
/// every project document, ordered by path.
pub type ProjectsSnapshotFn = Arc<dyn Fn(Vec<Value>) + Send + Sync>;

/// Cancellation handle for one listener registration. Cancelling twice, or
/// dropping after a cancel, is a no-op.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("live", &self.cancel.is_some())
            .finish()
    }
}

/// A shared document store. Implementations deliver snapshots synchronously
/// from `write`/`remove`; ordering per path follows write order.
pub trait RemoteStore: Send + Sync {
    fn subscribe(&self, path: &DocPath, on_snapshot: SnapshotFn) -> Subscription;

    /// Collection listener over `projects/*`.
    fn subscribe_projects(&self, on_snapshot: ProjectsSnapshotFn) -> Subscription;

    /// Replaces the document at `path` wholesale.
    fn write(&self, path: &DocPath, value: Value) -> Result<(), RemoteError>;

    fn remove(&self, path: &DocPath) -> Result<(), RemoteError>;
}

#[derive(Default)]
struct MemoryState {
    docs: std::collections::BTreeMap<String, Value>,
    listeners: Vec<(u64, String, SnapshotFn)>,
    project_listeners: Vec<(u64, ProjectsSnapshotFn)>,
    next_listener_id: u64,
    fail_next_writes: u32,
}

impl MemoryState {
    fn project_docs(&self) -> Vec<Value> {
        self.docs
            .range("projects/".to_owned().."projects0".to_owned())
            .map(|(_, value)| value.clone())
            .collect()
    }
}

/// In-process [`RemoteStore`] over mutex-guarded maps.
///
/// This is the shared-mode backend for tests and for embedding several
/// clients in one process; a networked backend implements the same trait.
/// Write failures can be injected to exercise the callers' retry paths.
#[derive(Clone, Default)]
pub struct MemoryRemoteStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryRemoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` writes fail with [`RemoteError::WriteRejected`].
    pub fn fail_next_writes(&self, count: u32) {
        self.state.lock().expect("remote store lock poisoned").fail_next_writes = count;
    }

    /// Test hook: the raw document currently stored at `path`.
    pub fn document(&self, path: &DocPath) -> Option<Value> {
        self.state
            .lock()
            .expect("remote store lock poisoned")
            .docs
            .get(&path.to_string())
            .cloned()
    }

    fn unsubscribe(state: &Weak<Mutex<MemoryState>>, listener_id: u64) {
        if let Some(state) = state.upgrade() {
            let mut state = state.lock().expect("remote store lock poisoned");
            state.listeners.retain(|(id, _, _)| *id != listener_id);
            state.project_listeners.retain(|(id, _)| *id != listener_id);
        }
    }
}

impl fmt::Debug for MemoryRemoteStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock().expect("remote store lock poisoned");
        f.debug_struct("MemoryRemoteStore")
            .field("docs", &state.docs.len())
            .field("listeners", &state.listeners.len())
            .finish()
    }
}

impl RemoteStore for MemoryRemoteStore {
    fn subscribe(&self, path: &DocPath, on_snapshot: SnapshotFn) -> Subscription {
        let key = path.to_string();
        let (listener_id, current) = {
            let mut state = self.state.lock().expect("remote store lock poisoned");
            let listener_id = state.next_listener_id;
            state.next_listener_id += 1;
            state
                .listeners
                .push((listener_id, key.clone(), on_snapshot.clone()));
            (listener_id, state.docs.get(&key).cloned())
        };

        // Initial delivery happens outside the lock, like later deliveries.
        on_snapshot(current);

        let weak = Arc::downgrade(&self.state);
        Subscription::new(move || Self::unsubscribe(&weak, listener_id))
    }

    fn subscribe_projects(&self, on_snapshot: ProjectsSnapshotFn) -> Subscription {
        let (listener_id, current) = {
            let mut state = self.state.lock().expect("remote store lock poisoned");
            let listener_id = state.next_listener_id;
            state.next_listener_id += 1;
            state.project_listeners.push((listener_id, on_snapshot.clone()));
            (listener_id, state.project_docs())
        };

        on_snapshot(current);

        let weak = Arc::downgrade(&self.state);
        Subscription::new(move || Self::unsubscribe(&weak, listener_id))
    }

    fn write(&self, path: &DocPath, value: Value) -> Result<(), RemoteError> {
        let key = path.to_string();
        let (doc_listeners, project_update) = {
            let mut state = self.state.lock().expect("remote store lock poisoned");
            if state.fail_next_writes > 0 {
                state.fail_next_writes -= 1;
                return Err(RemoteError::WriteRejected {
                    path: key,
                    detail: "injected failure".to_owned(),
                });
            }

            state.docs.insert(key.clone(), value.clone());

            let doc_listeners: Vec<SnapshotFn> = state
                .listeners
                .iter()
                .filter(|(_, listener_key, _)| listener_key == &key)
                .map(|(_, _, callback)| callback.clone())
                .collect();
            let project_update = matches!(path, DocPath::Project(_)).then(|| {
                (
                    state
                        .project_listeners
                        .iter()
                        .map(|(_, callback)| callback.clone())
                        .collect::<Vec<_>>(),
                    state.project_docs(),
                )
            });
            (doc_listeners, project_update)
        };

        for callback in doc_listeners {
            callback(Some(value.clone()));
        }
        if let Some((callbacks, docs)) = project_update {
            for callback in callbacks {
                callback(docs.clone());
            }
        }
        Ok(())
    }

    fn remove(&self, path: &DocPath) -> Result<(), RemoteError> {
        let key = path.to_string();
        let (doc_listeners, project_update) = {
            let mut state = self.state.lock().expect("remote store lock poisoned");
            state.docs.remove(&key);

            let doc_listeners: Vec<SnapshotFn> = state
                .listeners
                .iter()
                .filter(|(_, listener_key, _)| listener_key == &key)
                .map(|(_, _, callback)| callback.clone())
                .collect();
            let project_update = matches!(path, DocPath::Project(_)).then(|| {
                (
                    state
                        .project_listeners
                        .iter()
                        .map(|(_, callback)| callback.clone())
                        .collect::<Vec<_>>(),
                    state.project_docs(),
                )
            });
            (doc_listeners, project_update)
        };

        for callback in doc_listeners {
            callback(None);
        }
        if let Some((callbacks, docs)) = project_update {
            for callback in callbacks {
                callback(docs.clone());
            }
        }
        Ok(())
    }
}
