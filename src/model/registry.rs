// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::person::Person;

/// One of the two designated representative slots of a registry entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrySlot {
    AreaRepresentative,
    ProgramRepresentative,
}

/// Personnel registered under one city or region name.
///
/// Two designated slots plus a legacy unordered list carried over from data
/// that predates the slot model.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegistryEntry {
    pub area_representative: Option<Person>,
    pub program_representative: Option<Person>,
    pub people: Vec<Person>,
}

impl RegistryEntry {
    pub fn slot(&self, slot: RegistrySlot) -> Option<&Person> {
        match slot {
            RegistrySlot::AreaRepresentative => self.area_representative.as_ref(),
            RegistrySlot::ProgramRepresentative => self.program_representative.as_ref(),
        }
    }

    pub fn set_slot(&mut self, slot: RegistrySlot, person: Option<Person>) {
        match slot {
            RegistrySlot::AreaRepresentative => self.area_representative = person,
            RegistrySlot::ProgramRepresentative => self.program_representative = person,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.area_representative.is_none()
            && self.program_representative.is_none()
            && self.people.is_empty()
    }
}
