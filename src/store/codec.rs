// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Wire codec between the typed model and JSON documents.
//!
//! Every document that crosses a persistence boundary — the local cache and
//! the remote store use the same shapes — goes through the shadow `*Json`
//! structs here. The model types themselves stay serde-free.
//!
//! This is also where wire normalization lives: `coordinators` and
//! `executives` read back from the remote store may arrive as a JSON array or
//! as a sparse integer-keyed object (an artifact of entries written one at a
//! time versus in bulk). Both shapes are coerced to an ordered list before
//! any other component sees the value.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::model::{
    Connection, ConnectionOverlay, Coordinator, CoordinatorPerson, Deputy, Executive, IdError,
    MainCoordinator, Management, NodeId, OrgChart, Person, PersonProfile, Position,
    PositionOverlay, Project, ProjectId, RegistryEntry, SubUnit,
};

#[derive(Debug)]
pub enum CodecError {
    Json {
        source: serde_json::Error,
    },
    InvalidId {
        field: &'static str,
        value: String,
        source: Box<IdError>,
    },
}

impl fmt::Display for CodecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Json { source } => write!(f, "json codec error: {source}"),
            Self::InvalidId {
                field,
                value,
                source,
            } => write!(f, "invalid id for {field}: {value:?}: {source}"),
        }
    }
}

impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Json { source } => Some(source),
            Self::InvalidId { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}

fn parse_node_id(field: &'static str, value: String) -> Result<NodeId, CodecError> {
    NodeId::new(value.clone()).map_err(|source| CodecError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

fn parse_project_id(field: &'static str, value: String) -> Result<ProjectId, CodecError> {
    ProjectId::new(value.clone()).map_err(|source| CodecError::InvalidId {
        field,
        value,
        source: Box::new(source),
    })
}

/// Accepts an array, a keyed object, `null`, or an absent field and always
/// produces an ordered list. Object keys are ordered numerically where they
/// parse as integers, lexically otherwise; `null` entries are dropped.
fn list_or_keyed_map<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items: Vec<Value> = match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items,
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| match (a.parse::<u64>(), b.parse::<u64>()) {
                (Ok(a), Ok(b)) => a.cmp(&b),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            });
            entries.into_iter().map(|(_, item)| item).collect()
        }
        other => vec![other],
    };

    items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(|item| serde_json::from_value(item).map_err(serde::de::Error::custom))
        .collect()
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct PositionJson {
    #[serde(default)]
    x: f64,
    #[serde(default)]
    y: f64,
}

impl From<Position> for PositionJson {
    fn from(position: Position) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

impl From<PositionJson> for Position {
    fn from(position: PositionJson) -> Self {
        Self {
            x: position.x,
            y: position.y,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ManagementJson {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    position: PositionJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExecutiveJson {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    position: PositionJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MainCoordinatorJson {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    position: PositionJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinatorJson {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default)]
    position: PositionJson,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    parent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    coordinator_person: Option<CoordinatorPersonJson>,
    #[serde(default)]
    deputies: Vec<DeputyJson>,
    #[serde(default)]
    sub_units: Vec<SubUnitJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    norm_kadro: Option<u32>,
    #[serde(default)]
    expandable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    linked_schema_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoordinatorPersonJson {
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeputyJson {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubUnitJson {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    people: Vec<PersonJson>,
    #[serde(default)]
    responsibilities: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    norm_kadro: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    deputy_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersonJson {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cv_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    cv_file_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    photo_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    university: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    job_description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    hire_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    seniority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    job_description_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegistryEntryJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    area_representative: Option<PersonJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    program_representative: Option<PersonJson>,
    #[serde(default)]
    people: Vec<PersonJson>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartJson {
    #[serde(default)]
    managements: Vec<ManagementJson>,
    #[serde(default, deserialize_with = "list_or_keyed_map")]
    executives: Vec<ExecutiveJson>,
    #[serde(default)]
    main_coordinators: Vec<MainCoordinatorJson>,
    #[serde(default, deserialize_with = "list_or_keyed_map")]
    coordinators: Vec<CoordinatorJson>,
    #[serde(default)]
    city_personnel: BTreeMap<String, RegistryEntryJson>,
    #[serde(default)]
    region_personnel: BTreeMap<String, RegistryEntryJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectionJson {
    source: String,
    target: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    source_anchor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    target_anchor: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConnectionsJson {
    #[serde(default)]
    connections: Vec<ConnectionJson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectJson {
    project_id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    created_at: u64,
    #[serde(default)]
    is_main: bool,
}

fn person_to_json(person: &Person) -> PersonJson {
    let profile = &person.profile;
    PersonJson {
        id: person.id.to_string(),
        name: person.name.clone(),
        title: profile.title.clone(),
        email: profile.email.clone(),
        phone: profile.phone.clone(),
        notes: profile.notes.clone(),
        cv_data: profile.cv_data.clone(),
        cv_file_name: profile.cv_file_name.clone(),
        photo_data: profile.photo_data.clone(),
        university: profile.university.clone(),
        department: profile.department.clone(),
        job_description: profile.job_description.clone(),
        hire_date: profile.hire_date.clone(),
        seniority: profile.seniority.clone(),
        job_description_url: profile.job_description_url.clone(),
        color: profile.color.clone(),
    }
}

fn person_from_json(field: &'static str, json: PersonJson) -> Result<Person, CodecError> {
    Ok(Person {
        id: parse_node_id(field, json.id)?,
        name: json.name,
        profile: PersonProfile {
            title: json.title,
            email: json.email,
            phone: json.phone,
            notes: json.notes,
            cv_data: json.cv_data,
            cv_file_name: json.cv_file_name,
            photo_data: json.photo_data,
            university: json.university,
            department: json.department,
            job_description: json.job_description,
            hire_date: json.hire_date,
            seniority: json.seniority,
            job_description_url: json.job_description_url,
            color: json.color,
        },
    })
}

fn registry_to_json(entry: &RegistryEntry) -> RegistryEntryJson {
    RegistryEntryJson {
        area_representative: entry.area_representative.as_ref().map(person_to_json),
        program_representative: entry.program_representative.as_ref().map(person_to_json),
        people: entry.people.iter().map(person_to_json).collect(),
    }
}

fn registry_from_json(json: RegistryEntryJson) -> Result<RegistryEntry, CodecError> {
    Ok(RegistryEntry {
        area_representative: json
            .area_representative
            .map(|p| person_from_json("registry.areaRepresentative.id", p))
            .transpose()?,
        program_representative: json
            .program_representative
            .map(|p| person_from_json("registry.programRepresentative.id", p))
            .transpose()?,
        people: json
            .people
            .into_iter()
            .map(|p| person_from_json("registry.people[].id", p))
            .collect::<Result<Vec<_>, _>>()?,
    })
}

fn deputy_to_json(deputy: &Deputy) -> DeputyJson {
    DeputyJson {
        id: deputy.id.to_string(),
        name: deputy.name.clone(),
        title: deputy.title.clone(),
        responsibilities: deputy.responsibilities.clone(),
        color: deputy.color.clone(),
    }
}

fn deputy_from_json(json: DeputyJson) -> Result<Deputy, CodecError> {
    Ok(Deputy {
        id: parse_node_id("deputies[].id", json.id)?,
        name: json.name,
        title: json.title,
        responsibilities: json.responsibilities,
        color: json.color,
    })
}

fn sub_unit_to_json(sub_unit: &SubUnit) -> SubUnitJson {
    SubUnitJson {
        id: sub_unit.id.to_string(),
        title: sub_unit.title.clone(),
        description: sub_unit.description.clone(),
        people: sub_unit.people.iter().map(person_to_json).collect(),
        responsibilities: sub_unit.responsibilities.clone(),
        norm_kadro: sub_unit.norm_kadro,
        deputy_id: sub_unit.deputy_id.as_ref().map(ToString::to_string),
    }
}

fn sub_unit_from_json(json: SubUnitJson) -> Result<SubUnit, CodecError> {
    Ok(SubUnit {
        id: parse_node_id("subUnits[].id", json.id)?,
        title: json.title,
        description: json.description,
        people: json
            .people
            .into_iter()
            .map(|p| person_from_json("subUnits[].people[].id", p))
            .collect::<Result<Vec<_>, _>>()?,
        responsibilities: json.responsibilities,
        norm_kadro: json.norm_kadro,
        deputy_id: json
            .deputy_id
            .map(|id| parse_node_id("subUnits[].deputyId", id))
            .transpose()?,
    })
}

fn coordinator_to_json(coordinator: &Coordinator) -> CoordinatorJson {
    CoordinatorJson {
        id: coordinator.id.to_string(),
        title: coordinator.title.clone(),
        description: coordinator.description.clone(),
        responsibilities: coordinator.responsibilities.clone(),
        position: coordinator.position.into(),
        parent: coordinator.parent.as_ref().map(ToString::to_string),
        coordinator_person: coordinator
            .coordinator_person
            .as_ref()
            .map(|p| CoordinatorPersonJson {
                name: p.name.clone(),
                title: p.title.clone(),
                color: p.color.clone(),
            }),
        deputies: coordinator.deputies.iter().map(deputy_to_json).collect(),
        sub_units: coordinator.sub_units.iter().map(sub_unit_to_json).collect(),
        norm_kadro: coordinator.norm_kadro,
        expandable: coordinator.expandable,
        linked_schema_id: coordinator.linked_schema_id.as_ref().map(ToString::to_string),
    }
}

fn coordinator_from_json(json: CoordinatorJson) -> Result<Coordinator, CodecError> {
    Ok(Coordinator {
        id: parse_node_id("coordinators[].id", json.id)?,
        title: json.title,
        description: json.description,
        responsibilities: json.responsibilities,
        position: json.position.into(),
        parent: json
            .parent
            .map(|id| parse_node_id("coordinators[].parent", id))
            .transpose()?,
        coordinator_person: json.coordinator_person.map(|p| CoordinatorPerson {
            name: p.name,
            title: p.title,
            color: p.color,
        }),
        deputies: json
            .deputies
            .into_iter()
            .map(deputy_from_json)
            .collect::<Result<Vec<_>, _>>()?,
        sub_units: json
            .sub_units
            .into_iter()
            .map(sub_unit_from_json)
            .collect::<Result<Vec<_>, _>>()?,
        norm_kadro: json.norm_kadro,
        expandable: json.expandable,
        linked_schema_id: json
            .linked_schema_id
            .map(|id| parse_project_id("coordinators[].linkedSchemaId", id))
            .transpose()?,
    })
}

fn chart_to_json(chart: &OrgChart) -> ChartJson {
    ChartJson {
        managements: chart
            .managements
            .iter()
            .map(|m| ManagementJson {
                id: m.id.to_string(),
                name: m.name.clone(),
                title: m.title.clone(),
                position: m.position.into(),
            })
            .collect(),
        executives: chart
            .executives
            .iter()
            .map(|e| ExecutiveJson {
                id: e.id.to_string(),
                name: e.name.clone(),
                title: e.title.clone(),
                position: e.position.into(),
                parent: e.parent.as_ref().map(ToString::to_string),
            })
            .collect(),
        main_coordinators: chart
            .main_coordinators
            .iter()
            .map(|m| MainCoordinatorJson {
                id: m.id.to_string(),
                title: m.title.clone(),
                description: m.description.clone(),
                position: m.position.into(),
                parent: m.parent.as_ref().map(ToString::to_string),
            })
            .collect(),
        coordinators: chart.coordinators.iter().map(coordinator_to_json).collect(),
        city_personnel: chart
            .city_personnel
            .iter()
            .map(|(name, entry)| (name.clone(), registry_to_json(entry)))
            .collect(),
        region_personnel: chart
            .region_personnel
            .iter()
            .map(|(name, entry)| (name.clone(), registry_to_json(entry)))
            .collect(),
    }
}

fn chart_from_json(json: ChartJson) -> Result<OrgChart, CodecError> {
    Ok(OrgChart {
        managements: json
            .managements
            .into_iter()
            .map(|m| {
                Ok(Management {
                    id: parse_node_id("managements[].id", m.id)?,
                    name: m.name,
                    title: m.title,
                    position: m.position.into(),
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?,
        executives: json
            .executives
            .into_iter()
            .map(|e| {
                Ok(Executive {
                    id: parse_node_id("executives[].id", e.id)?,
                    name: e.name,
                    title: e.title,
                    position: e.position.into(),
                    parent: e
                        .parent
                        .map(|id| parse_node_id("executives[].parent", id))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?,
        main_coordinators: json
            .main_coordinators
            .into_iter()
            .map(|m| {
                Ok(MainCoordinator {
                    id: parse_node_id("mainCoordinators[].id", m.id)?,
                    title: m.title,
                    description: m.description,
                    position: m.position.into(),
                    parent: m
                        .parent
                        .map(|id| parse_node_id("mainCoordinators[].parent", id))
                        .transpose()?,
                })
            })
            .collect::<Result<Vec<_>, CodecError>>()?,
        coordinators: json
            .coordinators
            .into_iter()
            .map(coordinator_from_json)
            .collect::<Result<Vec<_>, _>>()?,
        city_personnel: json
            .city_personnel
            .into_iter()
            .map(|(name, entry)| Ok((name, registry_from_json(entry)?)))
            .collect::<Result<BTreeMap<_, _>, CodecError>>()?,
        region_personnel: json
            .region_personnel
            .into_iter()
            .map(|(name, entry)| Ok((name, registry_from_json(entry)?)))
            .collect::<Result<BTreeMap<_, _>, CodecError>>()?,
    })
}

pub fn chart_to_value(chart: &OrgChart) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(chart_to_json(chart))?)
}

pub fn chart_from_value(value: Value) -> Result<OrgChart, CodecError> {
    let json: ChartJson = serde_json::from_value(value)?;
    chart_from_json(json)
}

pub fn positions_to_value(overlay: &PositionOverlay) -> Result<Value, CodecError> {
    let map: BTreeMap<String, PositionJson> = overlay
        .entries()
        .iter()
        .map(|(id, &position)| (id.to_string(), position.into()))
        .collect();
    Ok(serde_json::to_value(map)?)
}

pub fn positions_from_value(value: Value) -> Result<PositionOverlay, CodecError> {
    let map: BTreeMap<String, PositionJson> = serde_json::from_value(value)?;
    map.into_iter()
        .map(|(id, position)| Ok((parse_node_id("positions{}.id", id)?, position.into())))
        .collect()
}

pub fn connections_to_value(overlay: &ConnectionOverlay) -> Result<Value, CodecError> {
    let json = ConnectionsJson {
        connections: overlay
            .connections()
            .iter()
            .map(|c| ConnectionJson {
                source: c.source.to_string(),
                target: c.target.to_string(),
                source_anchor: c.source_anchor.clone(),
                target_anchor: c.target_anchor.clone(),
            })
            .collect(),
    };
    Ok(serde_json::to_value(json)?)
}

pub fn connections_from_value(value: Value) -> Result<ConnectionOverlay, CodecError> {
    let json: ConnectionsJson = serde_json::from_value(value)?;
    json.connections
        .into_iter()
        .map(|c| {
            Ok(Connection {
                source: parse_node_id("connections[].source", c.source)?,
                target: parse_node_id("connections[].target", c.target)?,
                source_anchor: c.source_anchor,
                target_anchor: c.target_anchor,
            })
        })
        .collect()
}

pub fn project_to_value(project: &Project) -> Result<Value, CodecError> {
    Ok(serde_json::to_value(ProjectJson {
        project_id: project.project_id.to_string(),
        name: project.name.clone(),
        created_at: project.created_at_millis,
        is_main: project.is_main,
    })?)
}

pub fn project_from_value(value: Value) -> Result<Project, CodecError> {
    let json: ProjectJson = serde_json::from_value(value)?;
    Ok(Project {
        project_id: parse_project_id("projectId", json.project_id)?,
        name: json.name,
        created_at_millis: json.created_at,
        is_main: json.is_main,
    })
}

pub fn projects_to_value(projects: &[Project]) -> Result<Value, CodecError> {
    let items = projects
        .iter()
        .map(project_to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Value::Array(items))
}

pub fn projects_from_value(value: Value) -> Result<Vec<Project>, CodecError> {
    let items: Vec<Value> = serde_json::from_value(value)?;
    items
        .into_iter()
        .filter(|item| !item.is_null())
        .map(project_from_value)
        .collect()
}
