// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Built-in demo chart, shared by the CLI `--demo` mode and tests.

use super::chart::OrgChart;
use super::ids::NodeId;
use super::nodes::{Coordinator, Deputy, Executive, Management, MainCoordinator, SubUnit};
use super::person::Person;
use super::registry::RegistryEntry;

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

/// A small but fully linked chart: one management, one executive, one main
/// coordinator, two coordinators (one with two sub-units, a deputy, and two
/// people), plus one city registry entry.
pub fn demo_chart() -> OrgChart {
    let mut chart = OrgChart::default();

    chart.managements.push(Management::new(nid("m1"), "Genel Merkez", "Management"));

    let mut executive = Executive::new(nid("e1"), "Kerem Aksoy", "Executive Director");
    executive.parent = Some(nid("m1"));
    chart.executives.push(executive);

    let mut main_coordinator = MainCoordinator::new(nid("mc1"), "Programs");
    main_coordinator.parent = Some(nid("e1"));
    chart.main_coordinators.push(main_coordinator);

    let mut field = Coordinator::new(nid("c1"), "Field Operations");
    field.parent = Some(nid("mc1"));
    field.responsibilities.push("Coordinate field teams".to_owned());
    field.deputies.push(Deputy::new(nid("d1"), "Zeynep Kaya", "Deputy"));

    let mut logistics = SubUnit::new(nid("s1"), "Logistics");
    logistics.deputy_id = Some(nid("d1"));
    logistics.people.push(Person::new(nid("p1"), "Ali Demir"));
    logistics.people.push(Person::new(nid("p2"), "Elif Şahin"));
    field.sub_units.push(logistics);
    field.sub_units.push(SubUnit::new(nid("s2"), "Planning"));
    chart.coordinators.push(field);

    let mut outreach = Coordinator::new(nid("c2"), "Outreach");
    outreach.parent = Some(nid("mc1"));
    chart.coordinators.push(outreach);

    let mut ankara = RegistryEntry::default();
    ankara.area_representative = Some(Person::new(nid("p3"), "Murat Çelik"));
    chart.city_personnel.insert("Ankara".to_owned(), ankara);

    chart
}
