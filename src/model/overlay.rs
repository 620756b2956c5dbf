// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;

use super::chart::OrgChart;
use super::ids::NodeId;
use super::position::Position;

/// The id-to-coordinate mapping maintained independently of the tree.
///
/// Dragging a node updates this overlay, not the tree document; the embedded
/// per-node coordinate is a cached copy the sync engine keeps current.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionOverlay {
    entries: BTreeMap<NodeId, Position>,
}

impl PositionOverlay {
    pub fn get(&self, id: &NodeId) -> Option<Position> {
        self.entries.get(id).copied()
    }

    pub fn set(&mut self, id: NodeId, position: Position) {
        self.entries.insert(id, position);
    }

    pub fn remove(&mut self, id: &NodeId) -> Option<Position> {
        self.entries.remove(id)
    }

    pub fn entries(&self) -> &BTreeMap<NodeId, Position> {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-applies overlay coordinates onto the tree's embedded copies.
    ///
    /// Returns a new chart only when at least one embedded coordinate
    /// actually differed; an unchanged tree returns `None` so callers can
    /// skip redundant writes. Overlay entries for ids absent from the tree
    /// are ignored.
    pub fn reapply(&self, chart: &OrgChart) -> Option<OrgChart> {
        let mut updated: Option<OrgChart> = None;

        for (id, &position) in &self.entries {
            let current = updated.as_ref().unwrap_or(chart);
            if current.embedded_position(id).is_some_and(|p| p != position) {
                updated
                    .get_or_insert_with(|| chart.clone())
                    .set_embedded_position(id, position);
            }
        }

        updated
    }
}

impl FromIterator<(NodeId, Position)> for PositionOverlay {
    fn from_iter<I: IntoIterator<Item = (NodeId, Position)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

/// A manually drawn edge, independent of implicit parent-child edges.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    pub source: NodeId,
    pub target: NodeId,
    pub source_anchor: Option<String>,
    pub target_anchor: Option<String>,
}

impl Connection {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            source,
            target,
            source_anchor: None,
            target_anchor: None,
        }
    }
}

/// Manually drawn edges for one project.
///
/// A connection is identified by its (source, target) pair; no duplicate
/// detection beyond that pair is required.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConnectionOverlay {
    connections: Vec<Connection>,
}

impl ConnectionOverlay {
    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn add(&mut self, connection: Connection) {
        self.connections.push(connection);
    }

    /// Removes every connection with the given pair; returns whether any
    /// existed.
    pub fn remove(&mut self, source: &NodeId, target: &NodeId) -> bool {
        let before = self.connections.len();
        self.connections
            .retain(|c| !(&c.source == source && &c.target == target));
        before != self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }
}

impl FromIterator<Connection> for ConnectionOverlay {
    fn from_iter<I: IntoIterator<Item = Connection>>(iter: I) -> Self {
        Self {
            connections: iter.into_iter().collect(),
        }
    }
}
