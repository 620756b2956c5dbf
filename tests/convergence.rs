// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Multi-client convergence over one shared store.
//!
//! Two engines share a `MemoryRemoteStore`; each has its own local cache.
//! Documents converge by last-writer-wins at whole-document granularity, so
//! the later full-tree write replaces the earlier one rather than merging
//! with it.

use std::env;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use proteus::model::{fixtures, NodeId, Position, ProjectId};
use proteus::ops::{ChartOp, NewDeputy, NewSubUnit};
use proteus::store::{codec, DocPath, LocalCache, MemoryRemoteStore, RemoteStore};
use proteus::sync::{ProjectPhase, SyncEngine};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

struct TempDir {
    path: std::path::PathBuf,
}

impl TempDir {
    fn new(prefix: &str) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut path = env::temp_dir();
        path.push(format!(
            "proteus-{prefix}-{}-{nanos}-{counter}",
            std::process::id()
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

fn pid(value: &str) -> ProjectId {
    ProjectId::new(value).unwrap()
}

fn nid(value: &str) -> NodeId {
    NodeId::new(value).unwrap()
}

struct Cluster {
    _tmp: TempDir,
    store: Arc<MemoryRemoteStore>,
}

impl Cluster {
    fn new() -> Self {
        Self {
            _tmp: TempDir::new("convergence"),
            store: Arc::new(MemoryRemoteStore::new()),
        }
    }

    fn seeded(project_id: &ProjectId) -> Self {
        let cluster = Self::new();
        cluster
            .store
            .write(
                &DocPath::OrgData(project_id.clone()),
                codec::chart_to_value(&fixtures::demo_chart()).unwrap(),
            )
            .unwrap();
        cluster
    }

    fn client(&self, name: &str) -> SyncEngine {
        let cache = LocalCache::new(self._tmp.path().join(name));
        SyncEngine::new_shared(cache, self.store.clone())
    }
}

fn add_sub_unit_op(coordinator: &str, title: &str) -> ChartOp {
    ChartOp::AddSubUnit {
        coordinator_id: nid(coordinator),
        init: NewSubUnit {
            title: title.to_owned(),
            ..NewSubUnit::default()
        },
    }
}

fn add_deputy_op(coordinator: &str, name: &str) -> ChartOp {
    ChartOp::AddDeputy {
        coordinator_id: nid(coordinator),
        init: NewDeputy {
            name: name.to_owned(),
            title: "Deputy Coordinator".to_owned(),
            ..NewDeputy::default()
        },
    }
}

#[test]
fn a_clients_edit_reaches_the_other_client() {
    let project_id = pid("project-a");
    let cluster = Cluster::seeded(&project_id);

    let mut a = cluster.client("a");
    let mut b = cluster.client("b");
    a.activate_project(&project_id);
    b.activate_project(&project_id);

    a.apply(&[add_sub_unit_op("c1", "Design")]);
    a.flush_remote_writes();
    b.pump();

    assert_eq!(b.chart(), a.chart());
    assert!(b
        .chart()
        .unwrap()
        .coordinator(&nid("c1"))
        .unwrap()
        .sub_units
        .iter()
        .any(|s| s.title == "Design"));
}

#[test]
fn concurrent_tree_edits_converge_to_the_later_write() {
    let project_id = pid("project-a");
    let cluster = Cluster::seeded(&project_id);

    let mut a = cluster.client("a");
    let mut b = cluster.client("b");
    a.activate_project(&project_id);
    b.activate_project(&project_id);

    // Both edit the same coordinator before seeing each other's write.
    a.apply(&[add_sub_unit_op("c1", "Design")]);
    b.apply(&[add_deputy_op("c1", "Zeynep Yıldız")]);

    a.flush_remote_writes();
    b.flush_remote_writes();
    a.pump();
    b.pump();

    // B wrote last, so B's whole tree wins: the deputy survives, the
    // sub-unit from A's earlier write does not.
    assert_eq!(a.chart(), b.chart());
    let chart = a.chart().unwrap();
    let c1 = chart.coordinator(&nid("c1")).unwrap();
    assert!(c1.deputies.iter().any(|d| d.name == "Zeynep Yıldız"));
    assert!(!c1.sub_units.iter().any(|s| s.title == "Design"));
}

#[test]
fn position_drags_propagate_without_touching_the_tree_structure() {
    let project_id = pid("project-a");
    let cluster = Cluster::seeded(&project_id);

    let mut a = cluster.client("a");
    let mut b = cluster.client("b");
    a.activate_project(&project_id);
    b.activate_project(&project_id);

    a.set_node_position(&nid("c1"), Position::new(200.0, 80.0));
    a.flush_remote_writes();
    b.pump();

    assert_eq!(
        b.positions().unwrap().get(&nid("c1")),
        Some(Position::new(200.0, 80.0))
    );
    assert_eq!(
        b.chart().unwrap().embedded_position(&nid("c1")),
        Some(Position::new(200.0, 80.0))
    );
    assert_eq!(b.chart(), a.chart());
}

#[test]
fn lock_and_catalogue_changes_propagate() {
    let cluster = Cluster::new();

    let mut a = cluster.client("a");
    let mut b = cluster.client("b");

    let project_id = a.create_project("Saha");
    a.set_locked(true);
    a.flush_remote_writes();
    b.pump();

    assert!(b.workspace().locked());
    assert_eq!(
        b.workspace().project(&project_id).map(|p| p.name.as_str()),
        Some("Saha")
    );

    a.set_locked(false);
    a.flush_remote_writes();
    b.pump();
    assert!(!b.workspace().locked());
}

#[test]
fn a_failed_write_is_reconciled_by_the_next_snapshot() {
    let project_id = pid("project-a");
    let cluster = Cluster::seeded(&project_id);

    let mut a = cluster.client("a");
    let mut b = cluster.client("b");
    a.activate_project(&project_id);
    b.activate_project(&project_id);

    // Both attempts of A's write fail; the document keeps its old content.
    cluster.store.fail_next_writes(2);
    a.apply(&[add_sub_unit_op("c1", "Design")]);
    a.flush_remote_writes();

    // B's later edit lands and its snapshot brings A back in line.
    b.apply(&[add_deputy_op("c1", "Zeynep Yıldız")]);
    b.flush_remote_writes();
    a.pump();

    assert_eq!(a.chart(), b.chart());
    let c1 = a.chart().unwrap().coordinator(&nid("c1")).unwrap();
    assert!(c1.deputies.iter().any(|d| d.name == "Zeynep Yıldız"));
    assert!(!c1.sub_units.iter().any(|s| s.title == "Design"));
}

#[test]
fn a_fresh_client_catches_up_from_the_store() {
    let project_id = pid("project-a");
    let cluster = Cluster::seeded(&project_id);

    let mut a = cluster.client("a");
    a.activate_project(&project_id);
    a.apply(&[add_sub_unit_op("c1", "Design")]);
    a.set_node_position(&nid("c1"), Position::new(10.0, 20.0));
    a.flush_remote_writes();

    // A client that joins later sees the full current state immediately.
    let mut late = cluster.client("late");
    late.activate_project(&project_id);

    assert_eq!(late.phase(), Some(ProjectPhase::Live));
    assert_eq!(late.chart(), a.chart());
    assert_eq!(
        late.positions().unwrap().get(&nid("c1")),
        Some(Position::new(10.0, 20.0))
    );
}
