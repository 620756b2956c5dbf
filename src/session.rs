// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Workspace state: the project catalogue, the active project, and the
//! advisory edit lock.

use std::collections::BTreeMap;

use crate::model::{Project, ProjectId};

/// Cross-project session state owned by the sync engine.
///
/// The lock is advisory: the UI layer uses it to grey out editing, but
/// mutation calls are not re-checked against it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workspace {
    projects: BTreeMap<ProjectId, Project>,
    active_project_id: Option<ProjectId>,
    locked: bool,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn projects(&self) -> &BTreeMap<ProjectId, Project> {
        &self.projects
    }

    pub fn project(&self, project_id: &ProjectId) -> Option<&Project> {
        self.projects.get(project_id)
    }

    /// Replaces the whole catalogue, e.g. from a remote collection snapshot.
    pub fn set_projects(&mut self, projects: impl IntoIterator<Item = Project>) {
        self.projects = projects
            .into_iter()
            .map(|project| (project.project_id.clone(), project))
            .collect();
    }

    pub fn upsert_project(&mut self, project: Project) {
        self.projects.insert(project.project_id.clone(), project);
    }

    pub fn remove_project(&mut self, project_id: &ProjectId) -> Option<Project> {
        let removed = self.projects.remove(project_id);
        if self.active_project_id.as_ref() == Some(project_id) {
            self.active_project_id = None;
        }
        removed
    }

    /// The default chart shown on startup: the first entry marked main, or
    /// the earliest-created project when none carries the flag.
    pub fn main_project(&self) -> Option<&Project> {
        self.projects
            .values()
            .find(|project| project.is_main)
            .or_else(|| {
                self.projects
                    .values()
                    .min_by_key(|project| project.created_at_millis)
            })
    }

    pub fn active_project_id(&self) -> Option<&ProjectId> {
        self.active_project_id.as_ref()
    }

    pub fn set_active_project_id(&mut self, project_id: Option<ProjectId>) {
        self.active_project_id = project_id;
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }
}
