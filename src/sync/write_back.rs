// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Background remote write-back worker.
//!
//! Writes never block the caller: the engine schedules a (path, value) pair
//! and a worker thread performs the write. Scheduling the same path again
//! before the worker gets to it replaces the pending value (latest wins). A
//! failed write is retried once immediately; a second failure is logged and
//! dropped — the next snapshot read reconciles.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Condvar, Mutex};

use serde_json::Value;

use crate::store::{DocPath, RemoteStore};

#[derive(Debug)]
struct WriteTask {
    path: DocPath,
    value: Value,
}

#[derive(Debug, Default)]
struct WriteBackState {
    pending: HashMap<String, WriteTask>,
    queue: VecDeque<String>,
    in_flight: bool,
    shutdown: bool,
}

#[derive(Debug)]
struct WriteBackInner {
    state: Mutex<WriteBackState>,
    cv: Condvar,
}

pub struct WriteBackManager {
    inner: Arc<WriteBackInner>,
}

impl WriteBackManager {
    pub fn new(store: Arc<dyn RemoteStore>) -> Self {
        let inner = Arc::new(WriteBackInner {
            state: Mutex::new(WriteBackState::default()),
            cv: Condvar::new(),
        });

        std::thread::Builder::new()
            .name("proteus-write-back".to_owned())
            .spawn({
                let inner = inner.clone();
                move || Self::run_worker(inner, store)
            })
            .expect("spawn write-back worker thread");

        Self { inner }
    }

    pub fn schedule(&self, path: DocPath, value: Value) {
        let key = path.to_string();
        let task = WriteTask { path, value };

        let mut state = self.inner.state.lock().expect("write-back lock poisoned");
        if state.pending.contains_key(&key) {
            state.pending.insert(key, task);
            return;
        }

        state.pending.insert(key.clone(), task);
        state.queue.push_back(key);
        self.inner.cv.notify_one();
    }

    pub fn cancel(&self, path: &DocPath) {
        let mut state = self.inner.state.lock().expect("write-back lock poisoned");
        state.pending.remove(&path.to_string());
    }

    /// Blocks until every currently scheduled write has been attempted.
    pub fn flush(&self) {
        let mut state = self.inner.state.lock().expect("write-back lock poisoned");
        while state.in_flight || !state.pending.is_empty() {
            state = self.inner.cv.wait(state).expect("write-back cv poisoned");
        }
    }

    fn run_worker(inner: Arc<WriteBackInner>, store: Arc<dyn RemoteStore>) {
        loop {
            let task = {
                let mut state = inner.state.lock().expect("write-back lock poisoned");

                loop {
                    if let Some(key) = state.queue.pop_front() {
                        if let Some(task) = state.pending.remove(&key) {
                            state.in_flight = true;
                            break task;
                        }
                        // Cancelled while queued.
                        continue;
                    }
                    if state.shutdown {
                        return;
                    }
                    state = inner.cv.wait(state).expect("write-back cv poisoned");
                }
            };

            if let Err(first) = store.write(&task.path, task.value.clone()) {
                tracing::debug!(path = %task.path, error = %first, "remote write failed; retrying once");
                if let Err(second) = store.write(&task.path, task.value) {
                    tracing::warn!(
                        path = %task.path,
                        error = %second,
                        "remote write failed after retry; next snapshot reconciles"
                    );
                }
            }

            let mut state = inner.state.lock().expect("write-back lock poisoned");
            state.in_flight = false;
            inner.cv.notify_all();
        }
    }
}

impl Drop for WriteBackManager {
    fn drop(&mut self) {
        // Worker drains the queue, then exits.
        let mut state = self.inner.state.lock().expect("write-back lock poisoned");
        state.shutdown = true;
        self.inner.cv.notify_all();
    }
}

impl std::fmt::Debug for WriteBackManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.inner.state.lock().expect("write-back lock poisoned");
        f.debug_struct("WriteBackManager")
            .field("pending", &state.pending.len())
            .field("in_flight", &state.in_flight)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::WriteBackManager;
    use crate::model::ProjectId;
    use crate::store::{DocPath, MemoryRemoteStore, RemoteStore};

    fn pid(value: &str) -> ProjectId {
        ProjectId::new(value).unwrap()
    }

    #[test]
    fn scheduled_writes_land_in_the_store() {
        let store = Arc::new(MemoryRemoteStore::new());
        let manager = WriteBackManager::new(store.clone() as Arc<dyn RemoteStore>);
        let path = DocPath::OrgData(pid("project-a"));

        manager.schedule(path.clone(), json!({"v": 1}));
        manager.flush();

        assert_eq!(store.document(&path), Some(json!({"v": 1})));
    }

    #[test]
    fn rescheduling_the_same_path_keeps_the_latest_value() {
        let store = Arc::new(MemoryRemoteStore::new());
        let manager = WriteBackManager::new(store.clone() as Arc<dyn RemoteStore>);
        let path = DocPath::Positions(pid("project-a"));

        manager.schedule(path.clone(), json!({"v": 1}));
        manager.schedule(path.clone(), json!({"v": 2}));
        manager.flush();

        assert_eq!(store.document(&path), Some(json!({"v": 2})));
    }

    #[test]
    fn one_failure_is_retried_and_succeeds() {
        let store = Arc::new(MemoryRemoteStore::new());
        let manager = WriteBackManager::new(store.clone() as Arc<dyn RemoteStore>);
        let path = DocPath::Locked;

        store.fail_next_writes(1);
        manager.schedule(path.clone(), json!(true));
        manager.flush();

        assert_eq!(store.document(&path), Some(json!(true)));
    }

    #[test]
    fn two_failures_drop_the_write() {
        let store = Arc::new(MemoryRemoteStore::new());
        let manager = WriteBackManager::new(store.clone() as Arc<dyn RemoteStore>);
        let path = DocPath::Locked;

        store.fail_next_writes(2);
        manager.schedule(path.clone(), json!(true));
        manager.flush();

        assert_eq!(store.document(&path), None);
    }

    #[test]
    fn cancel_discards_a_pending_write() {
        let store = Arc::new(MemoryRemoteStore::new());
        let manager = WriteBackManager::new(store.clone() as Arc<dyn RemoteStore>);
        let path = DocPath::Locked;

        manager.cancel(&path);
        manager.flush();

        assert_eq!(store.document(&path), None);
    }
}
