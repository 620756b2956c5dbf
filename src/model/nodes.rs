// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::{NodeId, ProjectId};
use super::person::Person;
use super::position::Position;

/// Root node of the chart.
#[derive(Debug, Clone, PartialEq)]
pub struct Management {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    pub position: Position,
}

impl Management {
    pub fn new(id: NodeId, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: title.into(),
            position: Position::default(),
        }
    }
}

/// Second level: reports to a management node.
#[derive(Debug, Clone, PartialEq)]
pub struct Executive {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    pub position: Position,
    /// Management id; `None` represents a top-level grouping.
    pub parent: Option<NodeId>,
}

impl Executive {
    pub fn new(id: NodeId, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: title.into(),
            position: Position::default(),
            parent: None,
        }
    }
}

/// Third level: groups coordinators under an executive.
#[derive(Debug, Clone, PartialEq)]
pub struct MainCoordinator {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub position: Position,
    /// Executive id; `None` represents a top-level grouping.
    pub parent: Option<NodeId>,
}

impl MainCoordinator {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            position: Position::default(),
            parent: None,
        }
    }
}

/// The person heading a coordinator, shown on the coordinator card itself.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinatorPerson {
    pub name: String,
    pub title: String,
    pub color: Option<String>,
}

/// A deputy attached directly to a coordinator.
#[derive(Debug, Clone, PartialEq)]
pub struct Deputy {
    pub id: NodeId,
    pub name: String,
    pub title: String,
    pub responsibilities: Vec<String>,
    pub color: Option<String>,
}

impl Deputy {
    pub fn new(id: NodeId, name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            title: title.into(),
            responsibilities: Vec::new(),
            color: None,
        }
    }
}

/// Fourth level: the unit most edits target.
#[derive(Debug, Clone, PartialEq)]
pub struct Coordinator {
    pub id: NodeId,
    pub title: String,
    pub description: String,
    pub responsibilities: Vec<String>,
    pub position: Position,
    /// Main-coordinator id; `None` represents a top-level grouping.
    pub parent: Option<NodeId>,
    pub coordinator_person: Option<CoordinatorPerson>,
    pub deputies: Vec<Deputy>,
    pub sub_units: Vec<SubUnit>,
    /// Target staffing count. Independently authored from sub-unit counts;
    /// never derived by rolling sub-unit values up.
    pub norm_kadro: Option<u32>,
    /// Marks the coordinator as having an expandable detail view.
    pub expandable: bool,
    /// One-way pointer to a separate linked chart variant.
    pub linked_schema_id: Option<ProjectId>,
}

impl Coordinator {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            responsibilities: Vec::new(),
            position: Position::default(),
            parent: None,
            coordinator_person: None,
            deputies: Vec::new(),
            sub_units: Vec::new(),
            norm_kadro: None,
            expandable: false,
            linked_schema_id: None,
        }
    }

    pub fn sub_unit(&self, sub_unit_id: &NodeId) -> Option<&SubUnit> {
        self.sub_units.iter().find(|s| &s.id == sub_unit_id)
    }

    pub fn sub_unit_mut(&mut self, sub_unit_id: &NodeId) -> Option<&mut SubUnit> {
        self.sub_units.iter_mut().find(|s| &s.id == sub_unit_id)
    }

    pub fn deputy(&self, deputy_id: &NodeId) -> Option<&Deputy> {
        self.deputies.iter().find(|d| &d.id == deputy_id)
    }

    pub fn deputy_mut(&mut self, deputy_id: &NodeId) -> Option<&mut Deputy> {
        self.deputies.iter_mut().find(|d| &d.id == deputy_id)
    }
}

/// A leaf unit holding people.
#[derive(Debug, Clone, PartialEq)]
pub struct SubUnit {
    pub id: NodeId,
    pub title: String,
    pub description: Option<String>,
    pub people: Vec<Person>,
    pub responsibilities: Vec<String>,
    pub norm_kadro: Option<u32>,
    /// Deputy this unit reports to; must belong to the owning coordinator.
    pub deputy_id: Option<NodeId>,
}

impl SubUnit {
    pub fn new(id: NodeId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            description: None,
            people: Vec::new(),
            responsibilities: Vec::new(),
            norm_kadro: None,
            deputy_id: None,
        }
    }

    pub fn person(&self, person_id: &NodeId) -> Option<&Person> {
        self.people.iter().find(|p| &p.id == person_id)
    }

    pub fn person_mut(&mut self, person_id: &NodeId) -> Option<&mut Person> {
        self.people.iter_mut().find(|p| &p.id == person_id)
    }
}
