// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Structural mutation operations on a chart snapshot.
//!
//! Every operation validates its referenced parents against the current
//! snapshot and produces a new chart value; the input is never mutated. A
//! reference to a node that no longer exists, or a create that would produce
//! a semantic duplicate, skips the operation instead of failing — the UI
//! element that issued it is assumed stale, and the next snapshot refreshes
//! it.

use std::collections::BTreeMap;
use std::fmt;

use crate::model::{
    Coordinator, CoordinatorPerson, Deputy, IdGenerator, MainCoordinator, NodeId, OrgChart,
    Person, PersonProfile, Position, ProjectId, RegistryEntry, RegistrySlot, SubUnit,
};

#[derive(Debug, Clone, PartialEq)]
pub enum ChartOp {
    AddMainCoordinator {
        parent_id: Option<NodeId>,
        init: NewMainCoordinator,
    },
    UpdateMainCoordinator {
        main_coordinator_id: NodeId,
        patch: MainCoordinatorPatch,
    },
    DeleteMainCoordinator {
        main_coordinator_id: NodeId,
    },
    AddCoordinator {
        parent_id: Option<NodeId>,
        init: NewCoordinator,
    },
    UpdateCoordinator {
        coordinator_id: NodeId,
        patch: CoordinatorPatch,
    },
    DeleteCoordinator {
        coordinator_id: NodeId,
    },
    AddSubUnit {
        coordinator_id: NodeId,
        init: NewSubUnit,
    },
    UpdateSubUnit {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
        patch: SubUnitPatch,
    },
    DeleteSubUnit {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
    },
    AddDeputy {
        coordinator_id: NodeId,
        init: NewDeputy,
    },
    UpdateDeputy {
        coordinator_id: NodeId,
        deputy_id: NodeId,
        patch: DeputyPatch,
    },
    DeleteDeputy {
        coordinator_id: NodeId,
        deputy_id: NodeId,
    },
    AddPerson {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
        init: PersonInit,
    },
    UpdatePerson {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
        person_id: NodeId,
        patch: PersonPatch,
    },
    DeletePerson {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
        person_id: NodeId,
    },
    /// Remove-then-add expressed as one snapshot transition; an observer
    /// never sees the person in neither or both sub-units.
    MovePerson {
        from_coordinator_id: NodeId,
        from_sub_unit_id: NodeId,
        person_id: NodeId,
        to_coordinator_id: NodeId,
        to_sub_unit_id: NodeId,
    },
    UpdateManagement {
        management_id: NodeId,
        patch: ManagementPatch,
    },
    UpdateExecutive {
        executive_id: NodeId,
        patch: ExecutivePatch,
    },
    AddResponsibility {
        target: ResponsibilityTarget,
        text: String,
    },
    RemoveResponsibility {
        target: ResponsibilityTarget,
        text: String,
    },
    SetCoordinatorPerson {
        coordinator_id: NodeId,
        person: Option<CoordinatorPerson>,
    },
    SetCitySlot {
        city: String,
        slot: RegistrySlot,
        person: Option<PersonInit>,
    },
    SetRegionSlot {
        region: String,
        slot: RegistrySlot,
        person: Option<PersonInit>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponsibilityTarget {
    Coordinator {
        coordinator_id: NodeId,
    },
    SubUnit {
        coordinator_id: NodeId,
        sub_unit_id: NodeId,
    },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewMainCoordinator {
    pub title: String,
    pub description: String,
    pub position: Position,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewCoordinator {
    pub title: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub position: Position,
    pub norm_kadro: Option<u32>,
    pub expandable: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewSubUnit {
    pub title: String,
    pub description: Option<String>,
    pub responsibilities: Vec<String>,
    pub norm_kadro: Option<u32>,
    pub deputy_id: Option<NodeId>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDeputy {
    pub name: String,
    pub title: String,
    pub responsibilities: Vec<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonInit {
    pub name: String,
    pub profile: PersonProfile,
}

/// Patch semantics: an outer `None` leaves the field unchanged; for nullable
// fields the inner value is the new state, so `Some(None)` clears.

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ManagementPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub position: Option<Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutivePatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub position: Option<Position>,
    pub parent: Option<Option<NodeId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MainCoordinatorPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub position: Option<Position>,
    pub parent: Option<Option<NodeId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinatorPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub position: Option<Position>,
    pub parent: Option<Option<NodeId>>,
    pub norm_kadro: Option<Option<u32>>,
    pub expandable: Option<bool>,
    pub linked_schema_id: Option<Option<ProjectId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubUnitPatch {
    pub title: Option<String>,
    pub description: Option<Option<String>>,
    pub responsibilities: Option<Vec<String>>,
    pub norm_kadro: Option<Option<u32>>,
    pub deputy_id: Option<Option<NodeId>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeputyPatch {
    pub name: Option<String>,
    pub title: Option<String>,
    pub responsibilities: Option<Vec<String>>,
    pub color: Option<Option<String>>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonPatch {
    pub name: Option<String>,
    pub profile: Option<PersonProfile>,
}

/// The new snapshot plus a report of what was applied and what was skipped.
#[derive(Debug, Clone, PartialEq)]
pub struct ApplyOutcome {
    pub chart: OrgChart,
    pub applied: usize,
    pub skipped: Vec<SkippedOp>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SkippedOp {
    pub index: usize,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// A parent the op needs no longer exists (stale UI state).
    MissingParent { id: NodeId },
    /// The node the op targets no longer exists.
    MissingTarget { id: NodeId },
    /// The create would duplicate an existing entity (double-submission).
    Duplicate { detail: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingParent { id } => write!(f, "parent not found (id={id})"),
            Self::MissingTarget { id } => write!(f, "target not found (id={id})"),
            Self::Duplicate { detail } => write!(f, "would duplicate {detail}"),
        }
    }
}

impl std::error::Error for SkipReason {}

/// Applies `ops` in order against a snapshot and returns the new snapshot.
///
/// Each op validates independently against the chart as mutated by the ops
/// before it; a skipped op never leaves a partial mutation behind.
pub fn apply_ops(chart: &OrgChart, ids: &IdGenerator, ops: &[ChartOp]) -> ApplyOutcome {
    let mut new_chart = chart.clone();
    let mut applied = 0;
    let mut skipped = Vec::new();

    for (index, op) in ops.iter().enumerate() {
        match apply_chart_op(&mut new_chart, ids, op) {
            Ok(()) => applied += 1,
            Err(reason) => {
                tracing::debug!(index, %reason, "skipped chart op");
                skipped.push(SkippedOp { index, reason });
            }
        }
    }

    ApplyOutcome {
        chart: new_chart,
        applied,
        skipped,
    }
}

// Extracted op-application implementation.
include!("ops_impl.rs");

#[cfg(test)]
mod tests;
