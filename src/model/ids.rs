// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;

/// A stable identifier used across the model, the cache, and the remote store.
///
/// This does not enforce any particular id format; it only enforces that the
/// id is a non-empty *path segment* (i.e. contains no `/`), because ids appear
/// inside remote document paths like `orgData/<project_id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id<T> {
    value: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Id<T> {
    pub fn new(value: impl Into<String>) -> Result<Self, IdError> {
        let value = value.into();
        validate_id_segment(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn into_string(self) -> String {
        self.value
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T> AsRef<str> for Id<T> {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl<T> Borrow<str> for Id<T> {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl<T> FromStr for Id<T> {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_owned())
    }
}

impl<T> TryFrom<String> for Id<T> {
    type Error = IdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    Empty,
    ContainsSlash,
}

impl fmt::Display for IdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str("id must not be empty"),
            Self::ContainsSlash => f.write_str("id must not contain '/'"),
        }
    }
}

impl std::error::Error for IdError {}

fn validate_id_segment(value: &str) -> Result<(), IdError> {
    if value.is_empty() {
        return Err(IdError::Empty);
    }
    if value.contains('/') {
        return Err(IdError::ContainsSlash);
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeIdTag {}
/// Identifies any chart entity: management, executive, main coordinator,
/// coordinator, sub-unit, deputy, or person.
pub type NodeId = Id<NodeIdTag>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ProjectIdTag {}
/// Identifies a chart variant; each project owns its own tree and overlays.
pub type ProjectId = Id<ProjectIdTag>;

const NODE_ID_PREFIX: &str = "node";
const PROJECT_ID_PREFIX: &str = "project";

/// Produces process-unique string identifiers for new entities.
///
/// Ids combine a wall-clock millisecond timestamp, a monotonically increasing
/// in-process counter, and a short random suffix. The counter alone makes two
/// ids from the same generator distinct even within one millisecond; the
/// suffix keeps ids from independent processes from colliding in practice.
/// Generation never blocks and cannot fail.
#[derive(Debug, Default)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(0),
        }
    }

    pub fn generate(&self) -> NodeId {
        NodeId::new(self.next_value(NODE_ID_PREFIX)).expect("generated id is a valid segment")
    }

    pub fn generate_project(&self) -> ProjectId {
        ProjectId::new(self.next_value(PROJECT_ID_PREFIX))
            .expect("generated id is a valid segment")
    }

    fn next_value(&self, prefix: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0);
        let seq = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix: u16 = rand::rng().random();
        format!("{prefix}-{millis}-{seq}-{suffix:04x}")
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{Id, IdError, IdGenerator};

    #[test]
    fn id_rejects_empty() {
        let result: Result<Id<()>, _> = Id::new("");
        assert_eq!(result, Err(IdError::Empty));
    }

    #[test]
    fn id_rejects_slash() {
        let result: Result<Id<()>, _> = Id::new("a/b");
        assert_eq!(result, Err(IdError::ContainsSlash));
    }

    #[test]
    fn generated_ids_are_unique_under_rapid_calls() {
        let ids = IdGenerator::new();
        let mut seen = BTreeSet::new();
        for _ in 0..10_000 {
            assert!(seen.insert(ids.generate()));
        }
    }

    #[test]
    fn generated_ids_carry_expected_prefixes() {
        let ids = IdGenerator::new();
        assert!(ids.generate().as_str().starts_with("node-"));
        assert!(ids.generate_project().as_str().starts_with("project-"));
    }
}
