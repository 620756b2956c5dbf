// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Synchronization core.
//!
//! One `SyncEngine` per client reconciles the in-memory chart with the local
//! cache and, in shared mode, with the remote store. Remote snapshots are
//! never applied on the delivering thread: listeners enqueue into the
//! engine's inbox, and the owner thread drains it with [`SyncEngine::pump`].
//! Every handler runs to completion, so there is no lock on the model.
//!
//! Convergence across clients is document-level last-writer-wins: each client
//! writes whole documents, and the last write at a path replaces the document
//! in full. There is no field-level merge.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::model::{
    resolve_duplicate_ids, Connection, ConnectionOverlay, IdGenerator, NodeId, OrgChart, Position,
    PositionOverlay, Project, ProjectId,
};
use crate::ops::{apply_ops, ChartOp, SkippedOp};
use crate::session::Workspace;
use crate::store::codec;
use crate::store::{DocPath, LocalCache, RemoteStore, StoreError, Subscription};

mod write_back;

pub use write_back::WriteBackManager;


pub const DEFAULT_PROJECT_NAME: &str = "Ana Şema";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    /// The local cache is authoritative; mutations persist synchronously.
    LocalOnly,
    /// The remote store is authoritative; mutations apply optimistically and
    /// the snapshot echo settles the final state.
    Shared,
}

/// Per-project lifecycle. A project leaves `Loading` on its first tree
/// snapshot (even an absent one: a missing document is an empty chart).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectPhase {
    Loading,
    Live,
}

/// Outcome of one [`SyncEngine::apply`] call. A local persistence failure is
/// reported here, never raised: the in-memory state is updated either way so
/// the UI stays responsive.
#[derive(Debug)]
pub struct ApplyReport {
    pub applied: usize,
    pub skipped: Vec<SkippedOp>,
    pub persist_error: Option<StoreError>,
}

enum SyncEvent {
    TreeSnapshot {
        project_id: ProjectId,
        value: Option<Value>,
    },
    PositionsSnapshot {
        project_id: ProjectId,
        value: Option<Value>,
    },
    ConnectionsSnapshot {
        project_id: ProjectId,
        value: Option<Value>,
    },
    ProjectsSnapshot {
        docs: Vec<Value>,
    },
    ActiveProjectSnapshot {
        value: Option<Value>,
    },
    LockedSnapshot {
        value: Option<Value>,
    },
}

type Inbox = Arc<Mutex<VecDeque<SyncEvent>>>;

#[derive(Debug)]
struct ActiveProject {
    project_id: ProjectId,
    phase: ProjectPhase,
    chart: OrgChart,
    positions: PositionOverlay,
    connections: ConnectionOverlay,
}

pub struct SyncEngine {
    mode: SyncMode,
    cache: LocalCache,
    remote: Option<Arc<dyn RemoteStore>>,
    write_back: Option<WriteBackManager>,
    ids: IdGenerator,
    workspace: Workspace,
    active: Option<ActiveProject>,
    inbox: Inbox,
    /// Subscriptions scoped to the active project; dropped on project switch.
    project_subscriptions: Vec<Subscription>,
    /// Catalogue and settings subscriptions; live for the engine's lifetime.
    _settings_subscriptions: Vec<Subscription>,
    /// Last known remote content per path, updated on both writes and
    /// received snapshots. Content-equal write-backs are dropped against it,
    /// which keeps a client's own echo from ping-ponging.
    known_remote: HashMap<String, Value>,
}

impl SyncEngine {
    pub fn new_local(cache: LocalCache) -> Self {
        let workspace = load_workspace(&cache);
        Self {
            mode: SyncMode::LocalOnly,
            cache,
            remote: None,
            write_back: None,
            ids: IdGenerator::new(),
            workspace,
            active: None,
            inbox: Inbox::default(),
            project_subscriptions: Vec::new(),
            _settings_subscriptions: Vec::new(),
            known_remote: HashMap::new(),
        }
    }

    pub fn new_shared(cache: LocalCache, remote: Arc<dyn RemoteStore>) -> Self {
        let workspace = load_workspace(&cache);
        let inbox = Inbox::default();

        let settings_subscriptions = vec![
            remote.subscribe_projects({
                let inbox = inbox.clone();
                Arc::new(move |docs| {
                    inbox
                        .lock()
                        .expect("sync inbox lock poisoned")
                        .push_back(SyncEvent::ProjectsSnapshot { docs });
                })
            }),
            remote.subscribe(&DocPath::ActiveProjectId, {
                let inbox = inbox.clone();
                Arc::new(move |value| {
                    inbox
                        .lock()
                        .expect("sync inbox lock poisoned")
                        .push_back(SyncEvent::ActiveProjectSnapshot { value });
                })
            }),
            remote.subscribe(&DocPath::Locked, {
                let inbox = inbox.clone();
                Arc::new(move |value| {
                    inbox
                        .lock()
                        .expect("sync inbox lock poisoned")
                        .push_back(SyncEvent::LockedSnapshot { value });
                })
            }),
        ];

        let mut engine = Self {
            mode: SyncMode::Shared,
            cache,
            remote: Some(remote.clone()),
            write_back: Some(WriteBackManager::new(remote)),
            ids: IdGenerator::new(),
            workspace,
            active: None,
            inbox,
            project_subscriptions: Vec::new(),
            _settings_subscriptions: settings_subscriptions,
            known_remote: HashMap::new(),
        };
        engine.pump();
        engine
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn active_project_id(&self) -> Option<&ProjectId> {
        self.active.as_ref().map(|active| &active.project_id)
    }

    pub fn phase(&self) -> Option<ProjectPhase> {
        self.active.as_ref().map(|active| active.phase)
    }

    pub fn chart(&self) -> Option<&OrgChart> {
        self.active.as_ref().map(|active| &active.chart)
    }

    pub fn positions(&self) -> Option<&PositionOverlay> {
        self.active.as_ref().map(|active| &active.positions)
    }

    pub fn connections(&self) -> Option<&ConnectionOverlay> {
        self.active.as_ref().map(|active| &active.connections)
    }

    pub fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    /// Drains the inbox on the owner thread; returns the number of events
    /// processed. Each handler runs to completion before the next event.
    pub fn pump(&mut self) -> usize {
        let mut processed = 0;
        loop {
            let event = self
                .inbox
                .lock()
                .expect("sync inbox lock poisoned")
                .pop_front();
            let Some(event) = event else {
                break;
            };
            processed += 1;

            match event {
                SyncEvent::TreeSnapshot { project_id, value } => {
                    self.handle_tree_snapshot(project_id, value);
                }
                SyncEvent::PositionsSnapshot { project_id, value } => {
                    self.handle_positions_snapshot(project_id, value);
                }
                SyncEvent::ConnectionsSnapshot { project_id, value } => {
                    self.handle_connections_snapshot(project_id, value);
                }
                SyncEvent::ProjectsSnapshot { docs } => self.handle_projects_snapshot(docs),
                SyncEvent::ActiveProjectSnapshot { value } => {
                    self.handle_active_project_snapshot(value);
                }
                SyncEvent::LockedSnapshot { value } => self.handle_locked_snapshot(value),
            }
        }
        processed
    }

    /// Blocks until every scheduled remote write has been attempted. Test and
    /// shutdown plumbing; no-op in local-only mode.
    pub fn flush_remote_writes(&self) {
        if let Some(write_back) = &self.write_back {
            write_back.flush();
        }
    }

    /// Makes `project_id` the active project and loads its three documents.
    ///
    /// Previous project subscriptions are cancelled before the new ones are
    /// registered, so at most one subscription per (path, project) is ever
    /// live. In local-only mode the project is `Live` on return; in shared
    /// mode it is `Live` once the first tree snapshot has been pumped (for a
    /// synchronous store that has already happened on return).
    pub fn activate_project(&mut self, project_id: &ProjectId) {
        self.project_subscriptions.clear();

        let chart = self
            .cache
            .load_chart(project_id)
            .unwrap_or_else(|error| {
                tracing::warn!(%project_id, %error, "cached tree unreadable; starting empty");
                None
            })
            .unwrap_or_default();
        let positions = self
            .cache
            .load_positions(project_id)
            .unwrap_or_else(|error| {
                tracing::warn!(%project_id, %error, "cached positions unreadable; starting empty");
                None
            })
            .unwrap_or_default();
        let connections = self
            .cache
            .load_connections(project_id)
            .unwrap_or_else(|error| {
                tracing::warn!(%project_id, %error, "cached connections unreadable; starting empty");
                None
            })
            .unwrap_or_default();

        // Activation repairs: duplicate ids and stale embedded coordinates
        // are fixed before the chart is shown.
        let (mut chart, repaired) = resolve_duplicate_ids(&chart, &self.ids);
        let overlay_touched = match positions.reapply(&chart) {
            Some(updated) => {
                chart = updated;
                true
            }
            None => false,
        };

        let phase = match self.mode {
            SyncMode::LocalOnly => ProjectPhase::Live,
            SyncMode::Shared => ProjectPhase::Loading,
        };

        self.active = Some(ActiveProject {
            project_id: project_id.clone(),
            phase,
            chart,
            positions,
            connections,
        });

        if repaired || overlay_touched {
            let chart = self.active_chart_clone();
            if let Err(error) = self.cache.save_chart(project_id, &chart) {
                tracing::warn!(%project_id, %error, "cannot persist repaired tree");
            }
        }

        self.workspace.set_active_project_id(Some(project_id.clone()));
        if let Err(error) = self.cache.save_active_project(Some(project_id)) {
            tracing::warn!(%project_id, %error, "cannot persist active project id");
        }

        if let Some(remote) = self.remote.clone() {
            self.subscribe_project_documents(&remote, project_id);
            self.pump();
        }
    }

    fn subscribe_project_documents(&mut self, remote: &Arc<dyn RemoteStore>, project_id: &ProjectId) {
        let tree = remote.subscribe(&DocPath::OrgData(project_id.clone()), {
            let inbox = self.inbox.clone();
            let project_id = project_id.clone();
            Arc::new(move |value| {
                inbox
                    .lock()
                    .expect("sync inbox lock poisoned")
                    .push_back(SyncEvent::TreeSnapshot {
                        project_id: project_id.clone(),
                        value,
                    });
            })
        });
        let positions = remote.subscribe(&DocPath::Positions(project_id.clone()), {
            let inbox = self.inbox.clone();
            let project_id = project_id.clone();
            Arc::new(move |value| {
                inbox
                    .lock()
                    .expect("sync inbox lock poisoned")
                    .push_back(SyncEvent::PositionsSnapshot {
                        project_id: project_id.clone(),
                        value,
                    });
            })
        });
        let connections = remote.subscribe(&DocPath::Connections(project_id.clone()), {
            let inbox = self.inbox.clone();
            let project_id = project_id.clone();
            Arc::new(move |value| {
                inbox
                    .lock()
                    .expect("sync inbox lock poisoned")
                    .push_back(SyncEvent::ConnectionsSnapshot {
                        project_id: project_id.clone(),
                        value,
                    });
            })
        });

        self.project_subscriptions = vec![tree, positions, connections];
    }

    /// Runs mutation ops against the active chart and persists the outcome
    /// snapshot. Skipped ops are reported, never raised (spec of the UI:
    /// stale references and double-submissions degrade to no-ops).
    pub fn apply(&mut self, ops: &[ChartOp]) -> ApplyReport {
        let Some(active) = &self.active else {
            tracing::debug!("apply called with no active project");
            return ApplyReport {
                applied: 0,
                skipped: Vec::new(),
                persist_error: None,
            };
        };

        let project_id = active.project_id.clone();
        let outcome = apply_ops(&active.chart, &self.ids, ops);
        let mut report = ApplyReport {
            applied: outcome.applied,
            skipped: outcome.skipped,
            persist_error: None,
        };

        if outcome.chart != active.chart {
            let chart = outcome.chart;
            if let Err(error) = self.cache.save_chart(&project_id, &chart) {
                report.persist_error = Some(error);
            }
            self.schedule_chart_write(&project_id, &chart);
            self.active
                .as_mut()
                .expect("active project checked above")
                .chart = chart;
        }

        report
    }

    /// Records a dragged coordinate in the overlay and mirrors it onto the
    /// embedded copy in the tree.
    pub fn set_node_position(&mut self, id: &NodeId, position: Position) {
        let Some(active) = self.active.as_mut() else {
            return;
        };

        active.positions.set(id.clone(), position);
        let embedded_changed = active
            .chart
            .embedded_position(id)
            .is_some_and(|current| current != position)
            && active.chart.set_embedded_position(id, position);

        let project_id = active.project_id.clone();
        self.persist_positions(&project_id);
        if embedded_changed {
            let chart = self.active_chart_clone();
            if let Err(error) = self.cache.save_chart(&project_id, &chart) {
                tracing::warn!(%project_id, %error, "cannot persist tree after position change");
            }
            self.schedule_chart_write(&project_id, &chart);
        }
    }

    pub fn add_connection(&mut self, connection: Connection) {
        let Some(active) = self.active.as_mut() else {
            return;
        };
        active.connections.add(connection);
        let project_id = active.project_id.clone();
        self.persist_connections(&project_id);
    }

    /// Removes every connection with the given pair; returns whether any
    /// existed.
    pub fn remove_connection(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        let removed = active.connections.remove(source, target);
        if removed {
            let project_id = active.project_id.clone();
            self.persist_connections(&project_id);
        }
        removed
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.workspace.set_locked(locked);
        if let Err(error) = self.cache.save_locked(locked) {
            tracing::warn!(%error, "cannot persist lock state");
        }
        self.schedule_write(DocPath::Locked, Value::Bool(locked));
    }

    /// Catalogue bookkeeping only; `activate_project` does the data loading.
    pub fn set_active_project(&mut self, project_id: Option<ProjectId>) {
        if let Err(error) = self.cache.save_active_project(project_id.as_ref()) {
            tracing::warn!(%error, "cannot persist active project id");
        }
        let value = match &project_id {
            Some(id) => Value::String(id.to_string()),
            None => Value::Null,
        };
        self.schedule_write(DocPath::ActiveProjectId, value);
        self.workspace.set_active_project_id(project_id);
    }

    pub fn create_project(&mut self, name: impl Into<String>) -> ProjectId {
        let project_id = self.ids.generate_project();
        let mut project = Project::new(project_id.clone(), name, now_millis());
        if self.workspace.projects().is_empty() {
            project = project.main();
        }

        self.workspace.upsert_project(project.clone());
        self.persist_projects();
        match codec::project_to_value(&project) {
            Ok(value) => self.schedule_write(DocPath::Project(project_id.clone()), value),
            Err(error) => {
                tracing::warn!(%project_id, %error, "cannot encode project for remote write")
            }
        }

        tracing::debug!(%project_id, "created project");
        project_id
    }

    /// Removes a project and its three documents together. Deleting the
    /// active project deactivates it.
    pub fn delete_project(&mut self, project_id: &ProjectId) {
        if self.workspace.remove_project(project_id).is_none() {
            return;
        }

        if self.active_project_id() == Some(project_id) {
            self.project_subscriptions.clear();
            self.active = None;
        }

        if let Err(error) = self.cache.delete_project_documents(project_id) {
            tracing::warn!(%project_id, %error, "cannot delete cached project documents");
        }
        self.persist_projects();

        if let Some(remote) = &self.remote {
            for path in [
                DocPath::OrgData(project_id.clone()),
                DocPath::Positions(project_id.clone()),
                DocPath::Connections(project_id.clone()),
                DocPath::Project(project_id.clone()),
            ] {
                if let Some(write_back) = &self.write_back {
                    write_back.cancel(&path);
                }
                self.known_remote.remove(&path.to_string());
                if remote.remove(&path).is_err() {
                    if let Err(error) = remote.remove(&path) {
                        tracing::warn!(%path, %error, "cannot remove remote document after retry");
                    }
                }
            }
        }
    }

    /// Returns the main project's id, creating a default project when the
    /// catalogue is empty.
    pub fn ensure_default_project(&mut self) -> ProjectId {
        if let Some(project) = self.workspace.main_project() {
            return project.project_id.clone();
        }
        self.create_project(DEFAULT_PROJECT_NAME)
    }

    fn handle_tree_snapshot(&mut self, project_id: ProjectId, value: Option<Value>) {
        self.note_remote(&DocPath::OrgData(project_id.clone()), value.as_ref());

        let Some(active) = &self.active else {
            return;
        };
        if active.project_id != project_id {
            // Late event from a subscription that has since been cancelled.
            return;
        }

        let decoded = match value {
            Some(value) => match codec::chart_from_value(value) {
                Ok(chart) => chart,
                Err(error) => {
                    tracing::warn!(%project_id, %error, "ignoring undecodable tree snapshot");
                    return;
                }
            },
            None => OrgChart::default(),
        };

        let (resolved, repaired) = resolve_duplicate_ids(&decoded, &self.ids);
        if repaired {
            // Non-blocking self-heal: the cleaned tree goes back to the store.
            self.schedule_chart_write(&project_id, &resolved);
        }

        let active = self.active.as_mut().expect("active project checked above");
        active.phase = ProjectPhase::Live;

        if resolved == active.chart {
            return;
        }

        let mut chart = resolved;
        let positions = active.positions.clone();
        let overlay_touched = match positions.reapply(&chart) {
            Some(updated) => {
                chart = updated;
                true
            }
            None => false,
        };

        self.active
            .as_mut()
            .expect("active project checked above")
            .chart = chart.clone();
        if overlay_touched {
            self.schedule_chart_write(&project_id, &chart);
        }
        if let Err(error) = self.cache.save_chart(&project_id, &chart) {
            tracing::warn!(%project_id, %error, "cannot cache tree snapshot");
        }
        tracing::debug!(%project_id, overlay_touched, "applied tree snapshot");
    }

    fn handle_positions_snapshot(&mut self, project_id: ProjectId, value: Option<Value>) {
        self.note_remote(&DocPath::Positions(project_id.clone()), value.as_ref());

        let Some(active) = &self.active else {
            return;
        };
        if active.project_id != project_id {
            return;
        }

        let overlay = match value {
            Some(value) => match codec::positions_from_value(value) {
                Ok(overlay) => overlay,
                Err(error) => {
                    tracing::warn!(%project_id, %error, "ignoring undecodable positions snapshot");
                    return;
                }
            },
            None => PositionOverlay::default(),
        };

        if overlay == active.positions {
            return;
        }

        let active = self.active.as_mut().expect("active project checked above");
        active.positions = overlay.clone();
        let reapplied = overlay.reapply(&active.chart);
        if let Some(updated) = reapplied {
            active.chart = updated;
            let chart = self.active_chart_clone();
            self.schedule_chart_write(&project_id, &chart);
            if let Err(error) = self.cache.save_chart(&project_id, &chart) {
                tracing::warn!(%project_id, %error, "cannot cache tree after positions snapshot");
            }
        }

        if let Err(error) = self.cache.save_positions(&project_id, &overlay) {
            tracing::warn!(%project_id, %error, "cannot cache positions snapshot");
        }
    }

    fn handle_connections_snapshot(&mut self, project_id: ProjectId, value: Option<Value>) {
        self.note_remote(&DocPath::Connections(project_id.clone()), value.as_ref());

        let Some(active) = &self.active else {
            return;
        };
        if active.project_id != project_id {
            return;
        }

        let overlay = match value {
            Some(value) => match codec::connections_from_value(value) {
                Ok(overlay) => overlay,
                Err(error) => {
                    tracing::warn!(%project_id, %error, "ignoring undecodable connections snapshot");
                    return;
                }
            },
            None => ConnectionOverlay::default(),
        };

        if overlay == active.connections {
            return;
        }

        self.active
            .as_mut()
            .expect("active project checked above")
            .connections = overlay.clone();
        if let Err(error) = self.cache.save_connections(&project_id, &overlay) {
            tracing::warn!(%project_id, %error, "cannot cache connections snapshot");
        }
    }

    fn handle_projects_snapshot(&mut self, docs: Vec<Value>) {
        let mut projects = Vec::with_capacity(docs.len());
        for doc in docs {
            match codec::project_from_value(doc) {
                Ok(project) => projects.push(project),
                Err(error) => {
                    tracing::warn!(%error, "skipping undecodable project document");
                }
            }
        }

        let active_id = self.workspace.active_project_id().cloned();
        self.workspace.set_projects(projects);
        self.workspace.set_active_project_id(active_id);

        self.persist_projects();
    }

    fn handle_active_project_snapshot(&mut self, value: Option<Value>) {
        let project_id = match value {
            Some(Value::String(raw)) => match ProjectId::new(raw) {
                Ok(id) => Some(id),
                Err(error) => {
                    tracing::warn!(%error, "ignoring invalid remote active project id");
                    return;
                }
            },
            Some(Value::Null) | None => None,
            Some(other) => {
                tracing::warn!(?other, "ignoring malformed active project document");
                return;
            }
        };

        self.workspace.set_active_project_id(project_id.clone());
        if let Err(error) = self.cache.save_active_project(project_id.as_ref()) {
            tracing::warn!(%error, "cannot cache active project id");
        }
    }

    fn handle_locked_snapshot(&mut self, value: Option<Value>) {
        let locked = match value {
            Some(Value::Bool(locked)) => locked,
            Some(Value::Null) | None => false,
            Some(other) => {
                tracing::warn!(?other, "ignoring malformed lock document");
                return;
            }
        };

        self.workspace.set_locked(locked);
        if let Err(error) = self.cache.save_locked(locked) {
            tracing::warn!(%error, "cannot cache lock state");
        }
    }

    fn active_chart_clone(&self) -> OrgChart {
        self.active
            .as_ref()
            .expect("active project checked above")
            .chart
            .clone()
    }

    fn persist_positions(&mut self, project_id: &ProjectId) {
        let overlay = self
            .active
            .as_ref()
            .expect("active project checked above")
            .positions
            .clone();
        if let Err(error) = self.cache.save_positions(project_id, &overlay) {
            tracing::warn!(%project_id, %error, "cannot persist positions");
        }
        match codec::positions_to_value(&overlay) {
            Ok(value) => self.schedule_write(DocPath::Positions(project_id.clone()), value),
            Err(error) => tracing::warn!(%project_id, %error, "cannot encode positions"),
        }
    }

    fn persist_connections(&mut self, project_id: &ProjectId) {
        let overlay = self
            .active
            .as_ref()
            .expect("active project checked above")
            .connections
            .clone();
        if let Err(error) = self.cache.save_connections(project_id, &overlay) {
            tracing::warn!(%project_id, %error, "cannot persist connections");
        }
        match codec::connections_to_value(&overlay) {
            Ok(value) => self.schedule_write(DocPath::Connections(project_id.clone()), value),
            Err(error) => tracing::warn!(%project_id, %error, "cannot encode connections"),
        }
    }

    fn persist_projects(&mut self) {
        let projects: Vec<Project> = self.workspace.projects().values().cloned().collect();
        if let Err(error) = self.cache.save_projects(&projects) {
            tracing::warn!(%error, "cannot persist project catalogue");
        }
    }

    fn schedule_chart_write(&mut self, project_id: &ProjectId, chart: &OrgChart) {
        match codec::chart_to_value(chart) {
            Ok(value) => self.schedule_write(DocPath::OrgData(project_id.clone()), value),
            Err(error) => tracing::warn!(%project_id, %error, "cannot encode tree for remote write"),
        }
    }

    /// Schedules a remote write unless the path already holds this content.
    fn schedule_write(&mut self, path: DocPath, value: Value) {
        let key = path.to_string();
        if self.known_remote.get(&key) == Some(&value) {
            tracing::debug!(%path, "skipping content-equal remote write");
            return;
        }
        self.known_remote.insert(key, value.clone());

        if let Some(write_back) = &self.write_back {
            write_back.schedule(path, value);
        }
    }

    fn note_remote(&mut self, path: &DocPath, value: Option<&Value>) {
        let key = path.to_string();
        match value {
            Some(value) => {
                self.known_remote.insert(key, value.clone());
            }
            None => {
                self.known_remote.remove(&key);
            }
        }
    }
}

impl fmt::Debug for SyncEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncEngine")
            .field("mode", &self.mode)
            .field("active", &self.active.as_ref().map(|a| &a.project_id))
            .field("phase", &self.phase())
            .finish()
    }
}

fn load_workspace(cache: &LocalCache) -> Workspace {
    let mut workspace = Workspace::new();

    match cache.load_projects() {
        Ok(Some(projects)) => workspace.set_projects(projects),
        Ok(None) => {}
        Err(error) => tracing::warn!(%error, "cached project catalogue unreadable"),
    }
    match cache.load_active_project() {
        Ok(project_id) => workspace.set_active_project_id(project_id),
        Err(error) => tracing::warn!(%error, "cached active project id unreadable"),
    }
    match cache.load_locked() {
        Ok(locked) => workspace.set_locked(locked.unwrap_or(false)),
        Err(error) => tracing::warn!(%error, "cached lock state unreadable"),
    }

    workspace
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
