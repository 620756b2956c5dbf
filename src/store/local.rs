// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Local cache adapter: one JSON file per document under a flat cache
//! directory.
//!
//! The cache is the authoritative store in local-only mode and a warm-start
//! copy in shared mode. Every document is written whole via a temp file and
//! an atomic rename; an absent document loads as `Ok(None)`. A failed save is
//! reported to the caller, never swallowed — the sync engine keeps its
//! in-memory state either way.

use std::fmt;
use std::fs;
use std::io;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

use crate::model::{ConnectionOverlay, OrgChart, PositionOverlay, Project, ProjectId};

use super::codec::{self, CodecError};

#[derive(Debug)]
pub enum StoreError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    Codec {
        path: PathBuf,
        source: CodecError,
    },
    SymlinkRefused {
        path: PathBuf,
    },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {path:?}: {source}"),
            Self::Json { path, source } => write!(f, "json error at {path:?}: {source}"),
            Self::Codec { path, source } => write!(f, "codec error at {path:?}: {source}"),
            Self::SymlinkRefused { path } => {
                write!(f, "refusing to write through symlink at {path:?}")
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Codec { source, .. } => Some(source),
            Self::SymlinkRefused { .. } => None,
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum WriteDurability {
    /// Fast, best-effort persistence.
    ///
    /// - Writes a temp file and renames atomically into place.
    /// - Does not perform per-file fsync/sync.
    #[default]
    BestEffort,

    /// Slower, best-effort durability.
    ///
    /// Attempts to flush written file contents and rename operations to stable
    /// storage where possible. Exact guarantees are platform/filesystem-dependent.
    Durable,
}

/// Key/value cache over one directory; keys map to flat file names with the
/// project-id segment encoded to a Windows-safe form.
#[derive(Debug, Clone)]
pub struct LocalCache {
    root: PathBuf,
    durability: WriteDurability,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            durability: WriteDurability::default(),
        }
    }

    pub fn with_durability(mut self, durability: WriteDurability) -> Self {
        self.durability = durability;
        self
    }

    pub fn durability(&self) -> WriteDurability {
        self.durability
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn chart_path(&self, project_id: &ProjectId) -> PathBuf {
        self.scoped_path("org-tree", project_id)
    }

    fn positions_path(&self, project_id: &ProjectId) -> PathBuf {
        self.scoped_path("org-positions", project_id)
    }

    fn connections_path(&self, project_id: &ProjectId) -> PathBuf {
        self.scoped_path("org-connections", project_id)
    }

    fn projects_path(&self) -> PathBuf {
        self.root.join("org-projects.json")
    }

    fn locked_path(&self) -> PathBuf {
        self.root.join("org-locked.json")
    }

    fn active_project_path(&self) -> PathBuf {
        self.root.join("org-active-project.json")
    }

    fn scoped_path(&self, kind: &str, project_id: &ProjectId) -> PathBuf {
        let segment = encode_persisted_id_segment(project_id.as_str());
        self.root.join(format!("{kind}.{segment}.json"))
    }

    pub fn load_chart(&self, project_id: &ProjectId) -> Result<Option<OrgChart>, StoreError> {
        let path = self.chart_path(project_id);
        self.load_value(&path)?
            .map(|value| {
                codec::chart_from_value(value).map_err(|source| StoreError::Codec {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()
    }

    pub fn save_chart(&self, project_id: &ProjectId, chart: &OrgChart) -> Result<(), StoreError> {
        let path = self.chart_path(project_id);
        let value = codec::chart_to_value(chart).map_err(|source| StoreError::Codec {
            path: path.clone(),
            source,
        })?;
        self.save_value(&path, &value)
    }

    pub fn load_positions(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<PositionOverlay>, StoreError> {
        let path = self.positions_path(project_id);
        self.load_value(&path)?
            .map(|value| {
                codec::positions_from_value(value).map_err(|source| StoreError::Codec {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()
    }

    pub fn save_positions(
        &self,
        project_id: &ProjectId,
        overlay: &PositionOverlay,
    ) -> Result<(), StoreError> {
        let path = self.positions_path(project_id);
        let value = codec::positions_to_value(overlay).map_err(|source| StoreError::Codec {
            path: path.clone(),
            source,
        })?;
        self.save_value(&path, &value)
    }

    pub fn load_connections(
        &self,
        project_id: &ProjectId,
    ) -> Result<Option<ConnectionOverlay>, StoreError> {
        let path = self.connections_path(project_id);
        self.load_value(&path)?
            .map(|value| {
                codec::connections_from_value(value).map_err(|source| StoreError::Codec {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()
    }

    pub fn save_connections(
        &self,
        project_id: &ProjectId,
        overlay: &ConnectionOverlay,
    ) -> Result<(), StoreError> {
        let path = self.connections_path(project_id);
        let value = codec::connections_to_value(overlay).map_err(|source| StoreError::Codec {
            path: path.clone(),
            source,
        })?;
        self.save_value(&path, &value)
    }

    pub fn load_projects(&self) -> Result<Option<Vec<Project>>, StoreError> {
        let path = self.projects_path();
        self.load_value(&path)?
            .map(|value| {
                codec::projects_from_value(value).map_err(|source| StoreError::Codec {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()
    }

    pub fn save_projects(&self, projects: &[Project]) -> Result<(), StoreError> {
        let path = self.projects_path();
        let value = codec::projects_to_value(projects).map_err(|source| StoreError::Codec {
            path: path.clone(),
            source,
        })?;
        self.save_value(&path, &value)
    }

    pub fn load_locked(&self) -> Result<Option<bool>, StoreError> {
        let path = self.locked_path();
        self.load_value(&path)?
            .map(|value| {
                serde_json::from_value(value).map_err(|source| StoreError::Json {
                    path: path.clone(),
                    source,
                })
            })
            .transpose()
    }

    pub fn save_locked(&self, locked: bool) -> Result<(), StoreError> {
        self.save_value(&self.locked_path(), &Value::Bool(locked))
    }

    pub fn load_active_project(&self) -> Result<Option<ProjectId>, StoreError> {
        let path = self.active_project_path();
        let Some(value) = self.load_value(&path)? else {
            return Ok(None);
        };
        // A written `null` means "explicitly no active project".
        let raw: Option<String> = serde_json::from_value(value).map_err(|source| {
            StoreError::Json {
                path: path.clone(),
                source,
            }
        })?;
        Ok(raw.and_then(|value| ProjectId::new(value).ok()))
    }

    pub fn save_active_project(&self, project_id: Option<&ProjectId>) -> Result<(), StoreError> {
        let value = match project_id {
            Some(id) => Value::String(id.to_string()),
            None => Value::Null,
        };
        self.save_value(&self.active_project_path(), &value)
    }

    /// Removes the tree, positions, and connections documents of one project.
    /// Absent files are not an error.
    pub fn delete_project_documents(&self, project_id: &ProjectId) -> Result<(), StoreError> {
        for path in [
            self.chart_path(project_id),
            self.positions_path(project_id),
            self.connections_path(project_id),
        ] {
            match fs::remove_file(&path) {
                Ok(()) => {}
                Err(source) if source.kind() == io::ErrorKind::NotFound => {}
                Err(source) => return Err(StoreError::Io { path, source }),
            }
        }
        Ok(())
    }

    fn load_value(&self, path: &Path) -> Result<Option<Value>, StoreError> {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(source) if source.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let value = serde_json::from_str(&contents).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(value))
    }

    fn save_value(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        write_atomic(
            &self.root,
            path,
            format!("{contents}\n").as_bytes(),
            self.durability,
        )
    }
}

fn encode_persisted_id_segment(segment: &str) -> String {
    if !needs_windows_safe_filename_segment_encoding(segment) {
        return segment.to_owned();
    }

    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(1 + segment.len().saturating_mul(2));
    out.push('~');
    for &b in segment.as_bytes() {
        out.push(HEX[(b >> 4) as usize] as char);
        out.push(HEX[(b & 0x0f) as usize] as char);
    }
    out
}

fn needs_windows_safe_filename_segment_encoding(segment: &str) -> bool {
    if segment.starts_with('~') {
        return true;
    }
    if segment == "." || segment == ".." {
        return true;
    }
    if segment.ends_with(' ') || segment.ends_with('.') {
        return true;
    }

    let trimmed = segment.trim_end_matches([' ', '.']);
    let base = trimmed.split('.').next().unwrap_or(trimmed);
    if is_windows_device_name(base) {
        return true;
    }

    for ch in segment.chars() {
        if matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') {
            return true;
        }
        if ch <= '\u{1f}' || ch == '\u{7f}' {
            return true;
        }
    }

    false
}

fn is_windows_device_name(base: &str) -> bool {
    let base = base.to_ascii_uppercase();
    match base.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            if let Some(num) = base.strip_prefix("COM") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else if let Some(num) = base.strip_prefix("LPT") {
                matches!(num, "1" | "2" | "3" | "4" | "5" | "6" | "7" | "8" | "9")
            } else {
                false
            }
        }
    }
}

fn rename_overwrite(from: &Path, to: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        match fs::rename(from, to) {
            Ok(()) => Ok(()),
            Err(err)
                if matches!(
                    err.kind(),
                    io::ErrorKind::AlreadyExists | io::ErrorKind::PermissionDenied
                ) =>
            {
                let _ = fs::remove_file(to);
                fs::rename(from, to)
            }
            Err(err) => Err(err),
        }
    }

    #[cfg(not(windows))]
    {
        fs::rename(from, to)
    }
}

fn write_atomic(
    root: &Path,
    path: &Path,
    contents: &[u8],
    durability: WriteDurability,
) -> Result<(), StoreError> {
    fs::create_dir_all(root).map_err(|source| StoreError::Io {
        path: root.to_path_buf(),
        source,
    })?;

    match fs::symlink_metadata(path) {
        Ok(md) if md.file_type().is_symlink() => {
            return Err(StoreError::SymlinkRefused {
                path: path.to_path_buf(),
            });
        }
        Ok(_) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    }

    let Some(parent) = path.parent() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no parent"),
        });
    };

    let Some(file_name) = path.file_name() else {
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source: io::Error::other("path has no file name"),
        });
    };

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let tmp_path = parent.join(format!(
        ".proteus.tmp.{}.{}",
        file_name.to_string_lossy(),
        nanos
    ));

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&tmp_path)
        .map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;

    file.write_all(contents).map_err(|source| StoreError::Io {
        path: tmp_path.clone(),
        source,
    })?;

    if durability == WriteDurability::Durable {
        file.sync_all().map_err(|source| StoreError::Io {
            path: tmp_path.clone(),
            source,
        })?;
    }
    drop(file);

    if let Err(source) = rename_overwrite(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        });
    }

    if durability == WriteDurability::Durable {
        #[cfg(unix)]
        {
            let dir = fs::File::open(parent).map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
            dir.sync_all().map_err(|source| StoreError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    use rstest::{fixture, rstest};

    use super::{encode_persisted_id_segment, LocalCache, WriteDurability};
    use crate::model::fixtures;
    use crate::model::{
        Connection, ConnectionOverlay, NodeId, Position, PositionOverlay, Project, ProjectId,
    };

    static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

    struct TempDir {
        path: std::path::PathBuf,
    }

    impl TempDir {
        fn new(prefix: &str) -> Self {
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos();
            let counter = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
            let mut path = env::temp_dir();
            path.push(format!(
                "proteus-{prefix}-{}-{nanos}-{counter}",
                std::process::id()
            ));
            std::fs::create_dir_all(&path).unwrap();
            Self { path }
        }

        fn path(&self) -> &std::path::Path {
            &self.path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.path);
        }
    }

    struct LocalCacheTestCtx {
        _tmp: TempDir,
        cache: LocalCache,
    }

    impl LocalCacheTestCtx {
        fn new(prefix: &str) -> Self {
            let tmp = TempDir::new(prefix);
            let cache = LocalCache::new(tmp.path().join("cache"));
            Self { _tmp: tmp, cache }
        }
    }

    #[fixture]
    fn ctx() -> LocalCacheTestCtx {
        LocalCacheTestCtx::new("local-cache")
    }

    fn pid(value: &str) -> ProjectId {
        ProjectId::new(value).unwrap()
    }

    fn nid(value: &str) -> NodeId {
        NodeId::new(value).unwrap()
    }

    #[rstest]
    fn chart_round_trips_and_absent_chart_loads_as_none(ctx: LocalCacheTestCtx) {
        let project_id = pid("project-a");
        assert!(ctx.cache.load_chart(&project_id).unwrap().is_none());

        let chart = fixtures::demo_chart();
        ctx.cache.save_chart(&project_id, &chart).unwrap();
        assert_eq!(ctx.cache.load_chart(&project_id).unwrap(), Some(chart));
    }

    #[rstest]
    fn documents_are_scoped_per_project(ctx: LocalCacheTestCtx) {
        let chart = fixtures::demo_chart();
        ctx.cache.save_chart(&pid("project-a"), &chart).unwrap();

        assert!(ctx.cache.load_chart(&pid("project-b")).unwrap().is_none());
    }

    #[rstest]
    fn overlays_round_trip(ctx: LocalCacheTestCtx) {
        let project_id = pid("project-a");

        let mut positions = PositionOverlay::default();
        positions.set(nid("c1"), Position::new(50.0, 50.0));
        ctx.cache.save_positions(&project_id, &positions).unwrap();
        assert_eq!(
            ctx.cache.load_positions(&project_id).unwrap(),
            Some(positions)
        );

        let mut connections = ConnectionOverlay::default();
        connections.add(Connection::new(nid("c1"), nid("c2")));
        ctx.cache
            .save_connections(&project_id, &connections)
            .unwrap();
        assert_eq!(
            ctx.cache.load_connections(&project_id).unwrap(),
            Some(connections)
        );
    }

    #[rstest]
    fn projects_locked_and_active_project_round_trip(ctx: LocalCacheTestCtx) {
        let projects = vec![
            Project::new(pid("project-a"), "Main", 1_000).main(),
            Project::new(pid("project-b"), "Draft", 2_000),
        ];
        ctx.cache.save_projects(&projects).unwrap();
        assert_eq!(ctx.cache.load_projects().unwrap(), Some(projects));

        ctx.cache.save_locked(true).unwrap();
        assert_eq!(ctx.cache.load_locked().unwrap(), Some(true));

        ctx.cache.save_active_project(Some(&pid("project-a"))).unwrap();
        assert_eq!(
            ctx.cache.load_active_project().unwrap(),
            Some(pid("project-a"))
        );

        ctx.cache.save_active_project(None).unwrap();
        assert_eq!(ctx.cache.load_active_project().unwrap(), None);
    }

    #[rstest]
    fn delete_project_documents_removes_all_three(ctx: LocalCacheTestCtx) {
        let project_id = pid("project-a");
        ctx.cache
            .save_chart(&project_id, &fixtures::demo_chart())
            .unwrap();
        ctx.cache
            .save_positions(&project_id, &PositionOverlay::default())
            .unwrap();
        ctx.cache
            .save_connections(&project_id, &ConnectionOverlay::default())
            .unwrap();

        ctx.cache.delete_project_documents(&project_id).unwrap();

        assert!(ctx.cache.load_chart(&project_id).unwrap().is_none());
        assert!(ctx.cache.load_positions(&project_id).unwrap().is_none());
        assert!(ctx.cache.load_connections(&project_id).unwrap().is_none());

        // Deleting again is a no-op.
        ctx.cache.delete_project_documents(&project_id).unwrap();
    }

    #[rstest]
    fn durable_writes_round_trip(ctx: LocalCacheTestCtx) {
        let cache = ctx.cache.clone().with_durability(WriteDurability::Durable);
        let chart = fixtures::demo_chart();
        cache.save_chart(&pid("project-a"), &chart).unwrap();
        assert_eq!(cache.load_chart(&pid("project-a")).unwrap(), Some(chart));
    }

    #[test]
    fn unsafe_segments_are_hex_encoded() {
        assert_eq!(encode_persisted_id_segment("project-a"), "project-a");
        assert_eq!(encode_persisted_id_segment("a:b"), "~613a62");
        assert!(encode_persisted_id_segment("CON").starts_with('~'));
        assert!(encode_persisted_id_segment("~x").starts_with('~'));
    }
}
