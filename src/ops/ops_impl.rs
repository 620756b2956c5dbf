// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

/// Op-application implementation, included into `ops::mod`.
///
/// Every arm validates all referenced ids before the first mutation so that
/// a skip never leaves a partial change behind.
fn apply_chart_op(
    chart: &mut OrgChart,
    ids: &IdGenerator,
    op: &ChartOp,
) -> Result<(), SkipReason> {
    match op {
        ChartOp::AddMainCoordinator { parent_id, init } => {
            if let Some(parent_id) = parent_id {
                if chart.executive(parent_id).is_none() {
                    return Err(missing_parent(parent_id));
                }
            }
            if chart
                .main_coordinators
                .iter()
                .any(|m| m.parent == *parent_id && m.title == init.title)
            {
                return Err(duplicate(format!("main coordinator '{}'", init.title)));
            }

            let mut main_coordinator = MainCoordinator::new(ids.generate(), init.title.clone());
            main_coordinator.description = init.description.clone();
            main_coordinator.position = init.position;
            main_coordinator.parent = parent_id.clone();
            chart.main_coordinators.push(main_coordinator);
            Ok(())
        }
        ChartOp::UpdateMainCoordinator {
            main_coordinator_id,
            patch,
        } => {
            if let Some(Some(parent_id)) = &patch.parent {
                if chart.executive(parent_id).is_none() {
                    return Err(missing_target(parent_id));
                }
            }
            let Some(main_coordinator) = chart.main_coordinator_mut(main_coordinator_id) else {
                return Err(missing_target(main_coordinator_id));
            };

            if let Some(title) = &patch.title {
                main_coordinator.title = title.clone();
            }
            if let Some(description) = &patch.description {
                main_coordinator.description = description.clone();
            }
            if let Some(position) = patch.position {
                main_coordinator.position = position;
            }
            if let Some(parent) = &patch.parent {
                main_coordinator.parent = parent.clone();
            }
            Ok(())
        }
        ChartOp::DeleteMainCoordinator {
            main_coordinator_id,
        } => {
            let Some(index) = chart
                .main_coordinators
                .iter()
                .position(|m| &m.id == main_coordinator_id)
            else {
                return Err(missing_target(main_coordinator_id));
            };

            chart.main_coordinators.remove(index);
            // Coordinators under the removed grouping go with it.
            chart
                .coordinators
                .retain(|c| c.parent.as_ref() != Some(main_coordinator_id));
            Ok(())
        }
        ChartOp::AddCoordinator { parent_id, init } => {
            if let Some(parent_id) = parent_id {
                if chart.main_coordinator(parent_id).is_none() {
                    return Err(missing_parent(parent_id));
                }
            }
            if chart
                .coordinators
                .iter()
                .any(|c| c.parent == *parent_id && c.title == init.title)
            {
                return Err(duplicate(format!("coordinator '{}'", init.title)));
            }

            let mut coordinator = Coordinator::new(ids.generate(), init.title.clone());
            coordinator.description = init.description.clone();
            coordinator.responsibilities = init.responsibilities.clone();
            coordinator.position = init.position;
            coordinator.parent = parent_id.clone();
            coordinator.norm_kadro = init.norm_kadro;
            coordinator.expandable = init.expandable;
            chart.coordinators.push(coordinator);
            Ok(())
        }
        ChartOp::UpdateCoordinator {
            coordinator_id,
            patch,
        } => {
            if let Some(Some(parent_id)) = &patch.parent {
                if chart.main_coordinator(parent_id).is_none() {
                    return Err(missing_target(parent_id));
                }
            }
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_target(coordinator_id));
            };

            if let Some(title) = &patch.title {
                coordinator.title = title.clone();
            }
            if let Some(description) = &patch.description {
                coordinator.description = description.clone();
            }
            if let Some(responsibilities) = &patch.responsibilities {
                coordinator.responsibilities = responsibilities.clone();
            }
            if let Some(position) = patch.position {
                coordinator.position = position;
            }
            if let Some(parent) = &patch.parent {
                coordinator.parent = parent.clone();
            }
            if let Some(norm_kadro) = patch.norm_kadro {
                coordinator.norm_kadro = norm_kadro;
            }
            if let Some(expandable) = patch.expandable {
                coordinator.expandable = expandable;
            }
            if let Some(linked_schema_id) = &patch.linked_schema_id {
                coordinator.linked_schema_id = linked_schema_id.clone();
            }
            Ok(())
        }
        ChartOp::DeleteCoordinator { coordinator_id } => {
            let Some(index) = chart
                .coordinators
                .iter()
                .position(|c| &c.id == coordinator_id)
            else {
                return Err(missing_target(coordinator_id));
            };

            // Sub-units, deputies, and people live nested inside the
            // coordinator, so removal cascades implicitly.
            chart.coordinators.remove(index);
            Ok(())
        }
        ChartOp::AddSubUnit {
            coordinator_id,
            init,
        } => {
            let Some(coordinator) = chart.coordinator(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            if let Some(deputy_id) = &init.deputy_id {
                if coordinator.deputy(deputy_id).is_none() {
                    return Err(missing_target(deputy_id));
                }
            }
            if coordinator.sub_units.iter().any(|s| s.title == init.title) {
                return Err(duplicate(format!("sub-unit '{}'", init.title)));
            }

            let mut sub_unit = SubUnit::new(ids.generate(), init.title.clone());
            sub_unit.description = init.description.clone();
            sub_unit.responsibilities = init.responsibilities.clone();
            sub_unit.norm_kadro = init.norm_kadro;
            sub_unit.deputy_id = init.deputy_id.clone();
            chart
                .coordinator_mut(coordinator_id)
                .expect("coordinator validated above")
                .sub_units
                .push(sub_unit);
            Ok(())
        }
        ChartOp::UpdateSubUnit {
            coordinator_id,
            sub_unit_id,
            patch,
        } => {
            let Some(coordinator) = chart.coordinator(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            if let Some(Some(deputy_id)) = &patch.deputy_id {
                if coordinator.deputy(deputy_id).is_none() {
                    return Err(missing_target(deputy_id));
                }
            }
            if coordinator.sub_unit(sub_unit_id).is_none() {
                return Err(missing_target(sub_unit_id));
            }

            let sub_unit = chart
                .coordinator_mut(coordinator_id)
                .expect("coordinator validated above")
                .sub_unit_mut(sub_unit_id)
                .expect("sub-unit validated above");

            if let Some(title) = &patch.title {
                sub_unit.title = title.clone();
            }
            if let Some(description) = &patch.description {
                sub_unit.description = description.clone();
            }
            if let Some(responsibilities) = &patch.responsibilities {
                sub_unit.responsibilities = responsibilities.clone();
            }
            if let Some(norm_kadro) = patch.norm_kadro {
                sub_unit.norm_kadro = norm_kadro;
            }
            if let Some(deputy_id) = &patch.deputy_id {
                sub_unit.deputy_id = deputy_id.clone();
            }
            Ok(())
        }
        ChartOp::DeleteSubUnit {
            coordinator_id,
            sub_unit_id,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(index) = coordinator
                .sub_units
                .iter()
                .position(|s| &s.id == sub_unit_id)
            else {
                return Err(missing_target(sub_unit_id));
            };

            coordinator.sub_units.remove(index);
            Ok(())
        }
        ChartOp::AddDeputy {
            coordinator_id,
            init,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            if coordinator
                .deputies
                .iter()
                .any(|d| d.name == init.name && d.title == init.title)
            {
                return Err(duplicate(format!("deputy '{}'", init.name)));
            }

            let mut deputy = Deputy::new(ids.generate(), init.name.clone(), init.title.clone());
            deputy.responsibilities = init.responsibilities.clone();
            deputy.color = init.color.clone();
            coordinator.deputies.push(deputy);
            Ok(())
        }
        ChartOp::UpdateDeputy {
            coordinator_id,
            deputy_id,
            patch,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(deputy) = coordinator.deputy_mut(deputy_id) else {
                return Err(missing_target(deputy_id));
            };

            if let Some(name) = &patch.name {
                deputy.name = name.clone();
            }
            if let Some(title) = &patch.title {
                deputy.title = title.clone();
            }
            if let Some(responsibilities) = &patch.responsibilities {
                deputy.responsibilities = responsibilities.clone();
            }
            if let Some(color) = &patch.color {
                deputy.color = color.clone();
            }
            Ok(())
        }
        ChartOp::DeleteDeputy {
            coordinator_id,
            deputy_id,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(index) = coordinator.deputies.iter().position(|d| &d.id == deputy_id)
            else {
                return Err(missing_target(deputy_id));
            };

            coordinator.deputies.remove(index);
            // Sub-units reporting to the removed deputy fall back to the
            // coordinator itself.
            for sub_unit in &mut coordinator.sub_units {
                if sub_unit.deputy_id.as_ref() == Some(deputy_id) {
                    sub_unit.deputy_id = None;
                }
            }
            Ok(())
        }
        ChartOp::AddPerson {
            coordinator_id,
            sub_unit_id,
            init,
        } => {
            let Some(coordinator) = chart.coordinator(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(sub_unit) = coordinator.sub_unit(sub_unit_id) else {
                return Err(missing_parent(sub_unit_id));
            };
            if sub_unit
                .people
                .iter()
                .any(|p| p.name == init.name && p.profile.title == init.profile.title)
            {
                return Err(duplicate(format!("person '{}'", init.name)));
            }

            let person =
                Person::new(ids.generate(), init.name.clone()).with_profile(init.profile.clone());
            chart
                .coordinator_mut(coordinator_id)
                .expect("coordinator validated above")
                .sub_unit_mut(sub_unit_id)
                .expect("sub-unit validated above")
                .people
                .push(person);
            Ok(())
        }
        ChartOp::UpdatePerson {
            coordinator_id,
            sub_unit_id,
            person_id,
            patch,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(sub_unit) = coordinator.sub_unit_mut(sub_unit_id) else {
                return Err(missing_parent(sub_unit_id));
            };
            let Some(person) = sub_unit.person_mut(person_id) else {
                return Err(missing_target(person_id));
            };

            if let Some(name) = &patch.name {
                person.name = name.clone();
            }
            if let Some(profile) = &patch.profile {
                person.profile = profile.clone();
            }
            Ok(())
        }
        ChartOp::DeletePerson {
            coordinator_id,
            sub_unit_id,
            person_id,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            let Some(sub_unit) = coordinator.sub_unit_mut(sub_unit_id) else {
                return Err(missing_parent(sub_unit_id));
            };
            let Some(index) = sub_unit.people.iter().position(|p| &p.id == person_id) else {
                return Err(missing_target(person_id));
            };

            sub_unit.people.remove(index);
            Ok(())
        }
        ChartOp::MovePerson {
            from_coordinator_id,
            from_sub_unit_id,
            person_id,
            to_coordinator_id,
            to_sub_unit_id,
        } => {
            if chart.coordinator(from_coordinator_id).is_none() {
                return Err(missing_parent(from_coordinator_id));
            }
            let Some(from_unit) = chart.sub_unit(from_coordinator_id, from_sub_unit_id) else {
                return Err(missing_parent(from_sub_unit_id));
            };
            if from_unit.person(person_id).is_none() {
                return Err(missing_target(person_id));
            }
            if chart.coordinator(to_coordinator_id).is_none() {
                return Err(missing_parent(to_coordinator_id));
            }
            if chart.sub_unit(to_coordinator_id, to_sub_unit_id).is_none() {
                return Err(missing_parent(to_sub_unit_id));
            }

            let person = {
                let sub_unit = chart
                    .coordinator_mut(from_coordinator_id)
                    .expect("source coordinator validated above")
                    .sub_unit_mut(from_sub_unit_id)
                    .expect("source sub-unit validated above");
                let index = sub_unit
                    .people
                    .iter()
                    .position(|p| &p.id == person_id)
                    .expect("person validated above");
                sub_unit.people.remove(index)
            };
            chart
                .coordinator_mut(to_coordinator_id)
                .expect("target coordinator validated above")
                .sub_unit_mut(to_sub_unit_id)
                .expect("target sub-unit validated above")
                .people
                .push(person);
            Ok(())
        }
        ChartOp::UpdateManagement {
            management_id,
            patch,
        } => {
            let Some(management) = chart.management_mut(management_id) else {
                return Err(missing_target(management_id));
            };

            if let Some(name) = &patch.name {
                management.name = name.clone();
            }
            if let Some(title) = &patch.title {
                management.title = title.clone();
            }
            if let Some(position) = patch.position {
                management.position = position;
            }
            Ok(())
        }
        ChartOp::UpdateExecutive {
            executive_id,
            patch,
        } => {
            if let Some(Some(parent_id)) = &patch.parent {
                if chart.management(parent_id).is_none() {
                    return Err(missing_target(parent_id));
                }
            }
            let Some(executive) = chart.executive_mut(executive_id) else {
                return Err(missing_target(executive_id));
            };

            if let Some(name) = &patch.name {
                executive.name = name.clone();
            }
            if let Some(title) = &patch.title {
                executive.title = title.clone();
            }
            if let Some(position) = patch.position {
                executive.position = position;
            }
            if let Some(parent) = &patch.parent {
                executive.parent = parent.clone();
            }
            Ok(())
        }
        ChartOp::AddResponsibility { target, text } => {
            let list = responsibility_list_mut(chart, target)?;
            if list.iter().any(|r| r == text) {
                return Err(duplicate(format!("responsibility '{text}'")));
            }
            list.push(text.clone());
            Ok(())
        }
        ChartOp::RemoveResponsibility { target, text } => {
            let list = responsibility_list_mut(chart, target)?;
            list.retain(|r| r != text);
            Ok(())
        }
        ChartOp::SetCoordinatorPerson {
            coordinator_id,
            person,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_target(coordinator_id));
            };
            coordinator.coordinator_person = person.clone();
            Ok(())
        }
        ChartOp::SetCitySlot { city, slot, person } => {
            set_registry_slot(&mut chart.city_personnel, city, *slot, person.as_ref(), ids);
            Ok(())
        }
        ChartOp::SetRegionSlot {
            region,
            slot,
            person,
        } => {
            set_registry_slot(
                &mut chart.region_personnel,
                region,
                *slot,
                person.as_ref(),
                ids,
            );
            Ok(())
        }
    }
}

fn missing_parent(id: &NodeId) -> SkipReason {
    SkipReason::MissingParent { id: id.clone() }
}

fn missing_target(id: &NodeId) -> SkipReason {
    SkipReason::MissingTarget { id: id.clone() }
}

fn duplicate(detail: String) -> SkipReason {
    SkipReason::Duplicate { detail }
}

fn responsibility_list_mut<'a>(
    chart: &'a mut OrgChart,
    target: &ResponsibilityTarget,
) -> Result<&'a mut Vec<String>, SkipReason> {
    match target {
        ResponsibilityTarget::Coordinator { coordinator_id } => chart
            .coordinator_mut(coordinator_id)
            .map(|c| &mut c.responsibilities)
            .ok_or_else(|| missing_parent(coordinator_id)),
        ResponsibilityTarget::SubUnit {
            coordinator_id,
            sub_unit_id,
        } => {
            let Some(coordinator) = chart.coordinator_mut(coordinator_id) else {
                return Err(missing_parent(coordinator_id));
            };
            coordinator
                .sub_unit_mut(sub_unit_id)
                .map(|s| &mut s.responsibilities)
                .ok_or_else(|| missing_parent(sub_unit_id))
        }
    }
}

/// Setting a slot creates the registry entry on demand; clearing the last
/// occupied slot of an entry drops the entry from the registry.
fn set_registry_slot(
    registry: &mut BTreeMap<String, RegistryEntry>,
    name: &str,
    slot: RegistrySlot,
    person: Option<&PersonInit>,
    ids: &IdGenerator,
) {
    match person {
        Some(init) => {
            let entry = registry.entry(name.to_owned()).or_default();
            let person =
                Person::new(ids.generate(), init.name.clone()).with_profile(init.profile.clone());
            entry.set_slot(slot, Some(person));
        }
        None => {
            if let Some(entry) = registry.get_mut(name) {
                entry.set_slot(slot, None);
                if entry.is_empty() {
                    registry.remove(name);
                }
            }
        }
    }
}
