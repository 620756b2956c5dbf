// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::ids::NodeId;
use super::nodes::{Coordinator, Executive, Management, MainCoordinator, SubUnit};
use super::position::Position;
use super::registry::RegistryEntry;

/// The full hierarchical chart document for one project.
///
/// One immutable snapshot value at a time: mutation happens by producing a
/// new chart through the ops module, never by handing out mutable access to
/// nested collections across component boundaries. Deep `PartialEq` between
/// snapshots is what the sync engine's diff relies on.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrgChart {
    pub managements: Vec<Management>,
    pub executives: Vec<Executive>,
    pub main_coordinators: Vec<MainCoordinator>,
    pub coordinators: Vec<Coordinator>,
    pub city_personnel: BTreeMap<String, RegistryEntry>,
    pub region_personnel: BTreeMap<String, RegistryEntry>,
}

impl OrgChart {
    pub fn management(&self, id: &NodeId) -> Option<&Management> {
        self.managements.iter().find(|m| &m.id == id)
    }

    pub fn management_mut(&mut self, id: &NodeId) -> Option<&mut Management> {
        self.managements.iter_mut().find(|m| &m.id == id)
    }

    pub fn executive(&self, id: &NodeId) -> Option<&Executive> {
        self.executives.iter().find(|e| &e.id == id)
    }

    pub fn executive_mut(&mut self, id: &NodeId) -> Option<&mut Executive> {
        self.executives.iter_mut().find(|e| &e.id == id)
    }

    pub fn main_coordinator(&self, id: &NodeId) -> Option<&MainCoordinator> {
        self.main_coordinators.iter().find(|m| &m.id == id)
    }

    pub fn main_coordinator_mut(&mut self, id: &NodeId) -> Option<&mut MainCoordinator> {
        self.main_coordinators.iter_mut().find(|m| &m.id == id)
    }

    pub fn coordinator(&self, id: &NodeId) -> Option<&Coordinator> {
        self.coordinators.iter().find(|c| &c.id == id)
    }

    pub fn coordinator_mut(&mut self, id: &NodeId) -> Option<&mut Coordinator> {
        self.coordinators.iter_mut().find(|c| &c.id == id)
    }

    pub fn sub_unit(&self, coordinator_id: &NodeId, sub_unit_id: &NodeId) -> Option<&SubUnit> {
        self.coordinator(coordinator_id)
            .and_then(|c| c.sub_unit(sub_unit_id))
    }

    /// True if `id` names any of the four positioned node kinds.
    pub fn node_exists(&self, id: &NodeId) -> bool {
        self.embedded_position(id).is_some()
    }

    /// The cached coordinate embedded in the node, if the node exists.
    pub fn embedded_position(&self, id: &NodeId) -> Option<Position> {
        self.management(id)
            .map(|m| m.position)
            .or_else(|| self.executive(id).map(|e| e.position))
            .or_else(|| self.main_coordinator(id).map(|m| m.position))
            .or_else(|| self.coordinator(id).map(|c| c.position))
    }

    /// Rewrites the embedded coordinate; returns false when `id` names no
    /// positioned node.
    pub fn set_embedded_position(&mut self, id: &NodeId, position: Position) -> bool {
        if let Some(management) = self.management_mut(id) {
            management.position = position;
            return true;
        }
        if let Some(executive) = self.executive_mut(id) {
            executive.position = position;
            return true;
        }
        if let Some(main_coordinator) = self.main_coordinator_mut(id) {
            main_coordinator.position = position;
            return true;
        }
        if let Some(coordinator) = self.coordinator_mut(id) {
            coordinator.position = position;
            return true;
        }
        false
    }

    pub fn sub_unit_count(&self) -> usize {
        self.coordinators.iter().map(|c| c.sub_units.len()).sum()
    }

    pub fn person_count(&self) -> usize {
        self.coordinators
            .iter()
            .flat_map(|c| c.sub_units.iter())
            .map(|s| s.people.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::OrgChart;
    use crate::model::fixtures;
    use crate::model::{NodeId, Position};

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).expect("node id")
    }

    #[test]
    fn lookups_resolve_each_node_kind() {
        let chart = fixtures::demo_chart();

        assert!(chart.management(&nid("m1")).is_some());
        assert!(chart.executive(&nid("e1")).is_some());
        assert!(chart.main_coordinator(&nid("mc1")).is_some());
        assert!(chart.coordinator(&nid("c1")).is_some());
        assert!(chart.sub_unit(&nid("c1"), &nid("s1")).is_some());
        assert!(chart.coordinator(&nid("missing")).is_none());
    }

    #[test]
    fn set_embedded_position_touches_only_the_named_node() {
        let mut chart = fixtures::demo_chart();

        assert!(chart.set_embedded_position(&nid("c1"), Position::new(50.0, 50.0)));
        assert_eq!(
            chart.embedded_position(&nid("c1")),
            Some(Position::new(50.0, 50.0))
        );
        assert_eq!(
            chart.embedded_position(&nid("m1")),
            Some(Position::default())
        );

        assert!(!chart.set_embedded_position(&nid("missing"), Position::default()));
    }

    #[test]
    fn counts_cover_nested_collections() {
        let chart = fixtures::demo_chart();
        assert_eq!(chart.sub_unit_count(), 2);
        assert_eq!(chart.person_count(), 2);

        assert_eq!(OrgChart::default().person_count(), 0);
    }
}
