// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use crate::model::fixtures;
use crate::model::{IdGenerator, NodeId, PersonProfile, Position, RegistrySlot};

use super::{
    apply_ops, ChartOp, CoordinatorPatch, NewCoordinator, NewDeputy, NewSubUnit, PersonInit,
    ResponsibilityTarget, SkipReason, SubUnitPatch,
};

fn nid(value: &str) -> NodeId {
    NodeId::new(value).expect("node id")
}

fn person_init(name: &str, title: &str) -> PersonInit {
    PersonInit {
        name: name.to_owned(),
        profile: PersonProfile {
            title: Some(title.to_owned()),
            ..PersonProfile::default()
        },
    }
}

#[test]
fn add_sub_unit_assigns_fresh_id_and_keeps_input_untouched() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::AddSubUnit {
            coordinator_id: nid("c1"),
            init: NewSubUnit {
                title: "Design".to_owned(),
                ..NewSubUnit::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 1);
    assert!(outcome.skipped.is_empty());

    // The input snapshot is never mutated.
    assert_eq!(chart.coordinator(&nid("c1")).expect("c1").sub_units.len(), 2);

    let coordinator = outcome.chart.coordinator(&nid("c1")).expect("c1");
    assert_eq!(coordinator.sub_units.len(), 3);
    let added = &coordinator.sub_units[2];
    assert_eq!(added.title, "Design");
    assert!(added.id.as_str().starts_with("node-"));
}

#[test]
fn add_sub_unit_with_missing_coordinator_is_skipped() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::AddSubUnit {
            coordinator_id: nid("gone"),
            init: NewSubUnit {
                title: "Design".to_owned(),
                ..NewSubUnit::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(
        outcome.skipped[0].reason,
        SkipReason::MissingParent { id: nid("gone") }
    );
    assert_eq!(outcome.chart, chart);
}

#[test]
fn add_sub_unit_with_duplicate_title_is_skipped() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::AddSubUnit {
            coordinator_id: nid("c1"),
            init: NewSubUnit {
                title: "Logistics".to_owned(),
                ..NewSubUnit::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 0);
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::Duplicate { .. }
    ));
    assert_eq!(outcome.chart, chart);
}

#[test]
fn add_person_twice_with_identical_arguments_creates_one_person() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let op = ChartOp::AddPerson {
        coordinator_id: nid("c1"),
        sub_unit_id: nid("s2"),
        init: person_init("Aylin", "Designer"),
    };

    let outcome = apply_ops(&chart, &ids, &[op.clone(), op]);

    assert_eq!(outcome.applied, 1);
    assert_eq!(outcome.skipped.len(), 1);
    let people = &outcome
        .chart
        .sub_unit(&nid("c1"), &nid("s2"))
        .expect("s2")
        .people;
    assert_eq!(people.len(), 1);
    assert_eq!(people[0].name, "Aylin");
}

#[test]
fn same_name_different_title_is_not_a_duplicate() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[
            ChartOp::AddPerson {
                coordinator_id: nid("c1"),
                sub_unit_id: nid("s2"),
                init: person_init("Aylin", "Designer"),
            },
            ChartOp::AddPerson {
                coordinator_id: nid("c1"),
                sub_unit_id: nid("s2"),
                init: person_init("Aylin", "Researcher"),
            },
        ],
    );

    assert_eq!(outcome.applied, 2);
    assert_eq!(
        outcome
            .chart
            .sub_unit(&nid("c1"), &nid("s2"))
            .expect("s2")
            .people
            .len(),
        2
    );
}

#[test]
fn move_person_lands_in_exactly_one_place() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::MovePerson {
            from_coordinator_id: nid("c1"),
            from_sub_unit_id: nid("s1"),
            person_id: nid("p1"),
            to_coordinator_id: nid("c1"),
            to_sub_unit_id: nid("s2"),
        }],
    );

    assert_eq!(outcome.applied, 1);
    let source = outcome.chart.sub_unit(&nid("c1"), &nid("s1")).expect("s1");
    let target = outcome.chart.sub_unit(&nid("c1"), &nid("s2")).expect("s2");
    assert!(source.person(&nid("p1")).is_none());
    let moved = target.person(&nid("p1")).expect("moved person");
    assert_eq!(moved.name, "Ali Demir");
    assert_eq!(outcome.chart.person_count(), chart.person_count());
}

#[test]
fn move_person_with_missing_target_unit_leaves_source_untouched() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::MovePerson {
            from_coordinator_id: nid("c1"),
            from_sub_unit_id: nid("s1"),
            person_id: nid("p1"),
            to_coordinator_id: nid("c2"),
            to_sub_unit_id: nid("missing"),
        }],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(
        outcome.skipped[0].reason,
        SkipReason::MissingParent { id: nid("missing") }
    );
    assert_eq!(outcome.chart, chart);
}

#[test]
fn delete_deputy_clears_sub_unit_links() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();
    assert_eq!(
        chart.sub_unit(&nid("c1"), &nid("s1")).expect("s1").deputy_id,
        Some(nid("d1"))
    );

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::DeleteDeputy {
            coordinator_id: nid("c1"),
            deputy_id: nid("d1"),
        }],
    );

    assert_eq!(outcome.applied, 1);
    let coordinator = outcome.chart.coordinator(&nid("c1")).expect("c1");
    assert!(coordinator.deputies.is_empty());
    assert_eq!(coordinator.sub_unit(&nid("s1")).expect("s1").deputy_id, None);
}

#[test]
fn delete_main_coordinator_cascades_to_its_coordinators() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::DeleteMainCoordinator {
            main_coordinator_id: nid("mc1"),
        }],
    );

    assert_eq!(outcome.applied, 1);
    assert!(outcome.chart.main_coordinators.is_empty());
    // Both demo coordinators hang off mc1.
    assert!(outcome.chart.coordinators.is_empty());
}

#[test]
fn coordinator_patch_clears_nullable_fields() {
    let ids = IdGenerator::new();
    let mut chart = fixtures::demo_chart();
    chart.coordinator_mut(&nid("c1")).expect("c1").norm_kadro = Some(12);

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::UpdateCoordinator {
            coordinator_id: nid("c1"),
            patch: CoordinatorPatch {
                title: Some("Field Ops".to_owned()),
                norm_kadro: Some(None),
                parent: Some(None),
                ..CoordinatorPatch::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 1);
    let coordinator = outcome.chart.coordinator(&nid("c1")).expect("c1");
    assert_eq!(coordinator.title, "Field Ops");
    assert_eq!(coordinator.norm_kadro, None);
    assert_eq!(coordinator.parent, None);
}

#[test]
fn sub_unit_patch_rejects_deputy_of_another_coordinator() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::UpdateSubUnit {
            coordinator_id: nid("c2"),
            sub_unit_id: nid("s9"),
            patch: SubUnitPatch {
                deputy_id: Some(Some(nid("d1"))),
                ..SubUnitPatch::default()
            },
        }],
    );

    // c2 has no deputy d1; the patch is skipped before the sub-unit lookup.
    assert_eq!(outcome.applied, 0);
    assert_eq!(
        outcome.skipped[0].reason,
        SkipReason::MissingTarget { id: nid("d1") }
    );
}

#[test]
fn add_coordinator_under_missing_grouping_is_skipped() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::AddCoordinator {
            parent_id: Some(nid("mc9")),
            init: NewCoordinator {
                title: "Volunteers".to_owned(),
                ..NewCoordinator::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 0);
    assert_eq!(
        outcome.skipped[0].reason,
        SkipReason::MissingParent { id: nid("mc9") }
    );
}

#[test]
fn add_deputy_duplicate_name_and_title_is_skipped() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::AddDeputy {
            coordinator_id: nid("c1"),
            init: NewDeputy {
                name: "Zeynep Kaya".to_owned(),
                title: "Deputy".to_owned(),
                ..NewDeputy::default()
            },
        }],
    );

    assert_eq!(outcome.applied, 0);
    assert!(matches!(
        outcome.skipped[0].reason,
        SkipReason::Duplicate { .. }
    ));
}

#[test]
fn responsibilities_add_once_and_remove_is_idempotent() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();
    let target = ResponsibilityTarget::SubUnit {
        coordinator_id: nid("c1"),
        sub_unit_id: nid("s1"),
    };

    let outcome = apply_ops(
        &chart,
        &ids,
        &[
            ChartOp::AddResponsibility {
                target: target.clone(),
                text: "Fleet upkeep".to_owned(),
            },
            ChartOp::AddResponsibility {
                target: target.clone(),
                text: "Fleet upkeep".to_owned(),
            },
            ChartOp::RemoveResponsibility {
                target: target.clone(),
                text: "Not present".to_owned(),
            },
        ],
    );

    // The duplicate add is skipped; removing an absent entry still applies.
    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.skipped.len(), 1);
    assert_eq!(
        outcome
            .chart
            .sub_unit(&nid("c1"), &nid("s1"))
            .expect("s1")
            .responsibilities,
        vec!["Fleet upkeep".to_owned()]
    );
}

#[test]
fn registry_slot_set_and_clear_drops_empty_entries() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::SetRegionSlot {
            region: "Karadeniz".to_owned(),
            slot: RegistrySlot::ProgramRepresentative,
            person: Some(person_init("Selin", "Program Rep")),
        }],
    );
    assert_eq!(outcome.applied, 1);
    let entry = outcome
        .chart
        .region_personnel
        .get("Karadeniz")
        .expect("entry created on demand");
    assert_eq!(
        entry
            .slot(RegistrySlot::ProgramRepresentative)
            .expect("slot")
            .name,
        "Selin"
    );

    let cleared = apply_ops(
        &outcome.chart,
        &ids,
        &[ChartOp::SetRegionSlot {
            region: "Karadeniz".to_owned(),
            slot: RegistrySlot::ProgramRepresentative,
            person: None,
        }],
    );
    assert_eq!(cleared.applied, 1);
    assert!(!cleared.chart.region_personnel.contains_key("Karadeniz"));
}

#[test]
fn later_ops_see_earlier_mutations_in_the_same_batch() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[
            ChartOp::DeleteSubUnit {
                coordinator_id: nid("c1"),
                sub_unit_id: nid("s2"),
            },
            // Re-adding the same title now succeeds: the duplicate is gone.
            ChartOp::AddSubUnit {
                coordinator_id: nid("c1"),
                init: NewSubUnit {
                    title: "Planning".to_owned(),
                    ..NewSubUnit::default()
                },
            },
        ],
    );

    assert_eq!(outcome.applied, 2);
    assert_eq!(outcome.chart.coordinator(&nid("c1")).expect("c1").sub_units.len(), 2);
}

#[test]
fn position_update_flows_through_coordinator_patch() {
    let ids = IdGenerator::new();
    let chart = fixtures::demo_chart();

    let outcome = apply_ops(
        &chart,
        &ids,
        &[ChartOp::UpdateCoordinator {
            coordinator_id: nid("c2"),
            patch: CoordinatorPatch {
                position: Some(Position::new(120.0, 40.0)),
                ..CoordinatorPatch::default()
            },
        }],
    );

    assert_eq!(
        outcome.chart.embedded_position(&nid("c2")),
        Some(Position::new(120.0, 40.0))
    );
}
