// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Identifier collision repair.
//!
//! Duplicate ids arrive through merges, manual edits, and legacy data; reads
//! repair them instead of failing. The first occurrence of an id keeps it,
//! every later occurrence is renamed. The caller decides whether to persist
//! the cleaned tree.

use std::collections::BTreeSet;

use super::chart::OrgChart;
use super::ids::{IdGenerator, NodeId};

/// Returns the cleaned tree and whether any id was rewritten.
///
/// Scans the two collision-prone collections (coordinators, then main
/// coordinators) in list order. Idempotent: a second run over its own output
/// rewrites nothing.
pub fn resolve_duplicate_ids(chart: &OrgChart, ids: &IdGenerator) -> (OrgChart, bool) {
    let mut cleaned = chart.clone();

    let coordinators = rewrite_later_duplicates(
        cleaned.coordinators.iter_mut().map(|c| &mut c.id),
        ids,
        "coordinator",
    );
    let main_coordinators = rewrite_later_duplicates(
        cleaned.main_coordinators.iter_mut().map(|m| &mut m.id),
        ids,
        "main_coordinator",
    );

    (cleaned, coordinators || main_coordinators)
}

fn rewrite_later_duplicates<'a>(
    ids_in_list_order: impl Iterator<Item = &'a mut NodeId>,
    ids: &IdGenerator,
    kind: &'static str,
) -> bool {
    let mut seen = BTreeSet::<NodeId>::new();
    let mut modified = false;

    for id in ids_in_list_order {
        if seen.contains(id) {
            let fresh = ids.generate();
            tracing::warn!(kind, old_id = %id, new_id = %fresh, "rewrote duplicate id");
            *id = fresh;
            modified = true;
        }
        seen.insert(id.clone());
    }

    modified
}
