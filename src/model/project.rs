// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::ProjectId;

/// A chart variant in the project catalogue.
///
/// Each project owns one independent tree, position overlay, and connection
/// overlay; the three documents live and die together.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    pub project_id: ProjectId,
    pub name: String,
    pub created_at_millis: u64,
    /// Marks the default chart shown on startup. Exactly one project should
    /// carry this flag; the catalogue treats the first marked entry as main.
    pub is_main: bool,
}

impl Project {
    pub fn new(project_id: ProjectId, name: impl Into<String>, created_at_millis: u64) -> Self {
        Self {
            project_id,
            name: name.into(),
            created_at_millis,
            is_main: false,
        }
    }

    pub fn main(mut self) -> Self {
        self.is_main = true;
        self
    }
}
