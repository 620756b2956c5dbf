// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use super::ids::NodeId;

/// A person assigned to a sub-unit or a registry slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: NodeId,
    pub name: String,
    pub profile: PersonProfile,
}

impl Person {
    pub fn new(id: NodeId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            profile: PersonProfile::default(),
        }
    }

    pub fn with_profile(mut self, profile: PersonProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// Optional profile fields for a person.
///
/// A fixed set of typed fields rather than an open map, so every field a
/// consumer might read is covered at compile time. Blobs (`cv_data`,
/// `photo_data`) arrive pre-encoded as base64 strings; encoding uploads is
/// the dialog layer's job, not this crate's.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PersonProfile {
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub notes: Option<String>,
    pub cv_data: Option<String>,
    pub cv_file_name: Option<String>,
    pub photo_data: Option<String>,
    pub university: Option<String>,
    pub department: Option<String>,
    pub job_description: Option<String>,
    pub hire_date: Option<String>,
    pub seniority: Option<String>,
    pub job_description_url: Option<String>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::{Person, PersonProfile};
    use crate::model::NodeId;

    #[test]
    fn with_profile_replaces_default_profile() {
        let person = Person::new(NodeId::new("p1").expect("node id"), "Ayşe").with_profile(
            PersonProfile {
                title: Some("Engineer".to_owned()),
                ..PersonProfile::default()
            },
        );

        assert_eq!(person.name, "Ayşe");
        assert_eq!(person.profile.title.as_deref(), Some("Engineer"));
        assert_eq!(person.profile.email, None);
    }
}
