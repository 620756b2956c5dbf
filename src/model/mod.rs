// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Core org-chart data model.
//!
//! Management → Executive → MainCoordinator → Coordinator → SubUnit → Person,
//! plus two flat city/region registries and the per-project overlays.

pub mod chart;
pub mod dedupe;
pub mod fixtures;
pub mod ids;
pub mod nodes;
pub mod overlay;
pub mod person;
pub mod position;
pub mod project;
pub mod registry;

pub use chart::OrgChart;
pub use dedupe::resolve_duplicate_ids;
pub use ids::{Id, IdError, IdGenerator, NodeId, ProjectId};
pub use nodes::{Coordinator, CoordinatorPerson, Deputy, Executive, Management, MainCoordinator, SubUnit};
pub use overlay::{Connection, ConnectionOverlay, PositionOverlay};
pub use person::{Person, PersonProfile};
pub use position::Position;
pub use project::Project;
pub use registry::{RegistryEntry, RegistrySlot};
