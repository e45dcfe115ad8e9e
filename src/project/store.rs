//! Project state snapshots, bounded undo/redo, and save/load dispatch.
//!
//! The store owns everything about a project that is not live interaction
//! state: metadata, work-mode flags, and the undo/redo stacks. Snapshots
//! are full value copies of the mark list; restoring one can never alias a
//! live mark.
//!
//! File I/O is the only blocking operation in the core, so the store also
//! offers spawn/poll pairs that run a save or load on a worker thread and
//! deliver the result through a channel, with at most one in-flight
//! operation of each kind. A stale result for a project that was closed is
//! simply dropped with the store.

use crate::constants::{SCHEMA_VERSION, UNDO_DEPTH};
use crate::project::container::{self, LoadReport};
use crate::project::error::{ProjectError, ProjectResult};
use crate::registry::MarkRegistry;
use crate::types::{Mark, ViewState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use tracing::{info, warn};
use uuid::Uuid;

// ============================================================================
// Serialized project model
// ============================================================================

/// Project metadata block of the container.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectMeta {
    pub name: String,
    pub id: Uuid,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
    pub schema_version: u32,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            name: "Untitled".to_string(),
            id: Uuid::new_v4(),
            description: String::new(),
            created_at: now,
            modified_at: now,
            schema_version: SCHEMA_VERSION,
        }
    }
}

/// Work-mode flags shared across the session.
///
/// Replaces the class-level statics of older mark editors (print counters,
/// global size lock) with explicit state carried by the project, with a
/// defined reset lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkMode {
    #[serde(default)]
    pub size_locked: bool,
    #[serde(default)]
    pub print_disabled: bool,
    #[serde(default)]
    pub print_count: u32,
}

impl WorkMode {
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// A complete, self-contained value copy of a project: what the container
/// on disk holds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectState {
    pub meta: ProjectMeta,
    pub view: ViewState,
    pub marks: Vec<Mark>,
    #[serde(with = "index_opt", default)]
    pub selected: Option<usize>,
    #[serde(with = "index_opt", default)]
    pub active: Option<usize>,
    #[serde(default)]
    pub undo: Vec<Vec<Mark>>,
    #[serde(default)]
    pub redo: Vec<Vec<Mark>>,
    #[serde(default)]
    pub clipboard: Option<Mark>,
    #[serde(default)]
    pub work_mode: WorkMode,
}

impl Default for ProjectState {
    fn default() -> Self {
        Self {
            meta: ProjectMeta::default(),
            view: ViewState::default(),
            marks: Vec::new(),
            selected: None,
            active: None,
            undo: Vec::new(),
            redo: Vec::new(),
            clipboard: None,
            work_mode: WorkMode::default(),
        }
    }
}

/// Selection indices travel as `-1` = none in the container.
mod index_opt {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(v: &Option<usize>, ser: S) -> Result<S::Ok, S::Error> {
        match v {
            Some(i) => ser.serialize_i64(*i as i64),
            None => ser.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<usize>, D::Error> {
        let raw = i64::deserialize(de)?;
        if raw < 0 { Ok(None) } else { Ok(Some(raw as usize)) }
    }
}

// ============================================================================
// Store
// ============================================================================

pub struct ProjectStateStore {
    pub meta: ProjectMeta,
    pub work_mode: WorkMode,
    /// When set, an existing file at the save path is copied aside before
    /// being replaced. Backup failure never aborts a save.
    pub backups_enabled: bool,
    undo: VecDeque<Vec<Mark>>,
    redo: VecDeque<Vec<Mark>>,
    in_flight_save: Option<Receiver<ProjectResult<()>>>,
    in_flight_load: Option<Receiver<ProjectResult<(ProjectState, LoadReport)>>>,
}

impl Default for ProjectStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectStateStore {
    pub fn new() -> Self {
        Self {
            meta: ProjectMeta::default(),
            work_mode: WorkMode::default(),
            backups_enabled: true,
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            in_flight_save: None,
            in_flight_load: None,
        }
    }

    /// Start a fresh project in place: new metadata, work mode back to
    /// defaults, history cleared. The backup preference is a user setting
    /// and survives.
    pub fn reset(&mut self) {
        self.meta = ProjectMeta::default();
        self.work_mode.reset();
        self.undo.clear();
        self.redo.clear();
    }

    // ========================================================================
    // Snapshots and history
    // ========================================================================

    /// Deep-copy the live registry and view into a container value.
    /// Later mutation of live marks never alters the snapshot.
    pub fn snapshot(&self, registry: &MarkRegistry, view: &ViewState) -> ProjectState {
        ProjectState {
            meta: self.meta.clone(),
            view: view.clone(),
            marks: registry.snapshot_marks(),
            selected: registry.selected(),
            active: registry.active(),
            undo: self.undo.iter().cloned().collect(),
            redo: self.redo.iter().cloned().collect(),
            clipboard: registry.clipboard().cloned(),
            work_mode: self.work_mode,
        }
    }

    /// Take over metadata, work mode, and history from a loaded state.
    pub fn adopt(&mut self, state: &ProjectState) {
        self.meta = state.meta.clone();
        self.work_mode = state.work_mode;
        self.undo = state.undo.iter().cloned().collect();
        self.redo = state.redo.iter().cloned().collect();
    }

    /// Append a pre-mutation snapshot. Oldest entry is dropped past the
    /// depth cap; any redoable branch is pruned.
    pub fn push_undo(&mut self, marks: Vec<Mark>) {
        self.undo.push_back(marks);
        if self.undo.len() > UNDO_DEPTH {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Swap the current mark list for the previous snapshot. Returns `None`
    /// (and stores nothing) when the undo stack is empty.
    pub fn undo(&mut self, current: Vec<Mark>) -> Option<Vec<Mark>> {
        let restored = self.undo.pop_back()?;
        self.redo.push_back(current);
        if self.redo.len() > UNDO_DEPTH {
            self.redo.pop_front();
        }
        Some(restored)
    }

    /// Inverse of [`undo`](Self::undo).
    pub fn redo(&mut self, current: Vec<Mark>) -> Option<Vec<Mark>> {
        let restored = self.redo.pop_back()?;
        self.undo.push_back(current);
        if self.undo.len() > UNDO_DEPTH {
            self.undo.pop_front();
        }
        Some(restored)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    // ========================================================================
    // Synchronous save / load
    // ========================================================================

    /// Serialize a project state to `path`, stamping `modified_at`.
    pub fn save(&mut self, path: &Path, state: &ProjectState) -> ProjectResult<()> {
        let mut state = state.clone();
        state.meta.modified_at = Utc::now();
        self.meta.modified_at = state.meta.modified_at;
        container::write(path, &state, self.backups_enabled)?;
        info!(path = %path.display(), marks = state.marks.len(), "project saved");
        Ok(())
    }

    /// Decode a project container from `path`. A foreign version or damaged
    /// sections produce a best-effort state plus a report of what was
    /// defaulted, not a failure.
    pub fn load(&self, path: &Path) -> ProjectResult<(ProjectState, LoadReport)> {
        let result = container::read(path)?;
        info!(path = %path.display(), marks = result.0.marks.len(), "project loaded");
        Ok(result)
    }

    // ========================================================================
    // Background save / load
    // ========================================================================

    /// Dispatch a save onto a worker thread. Returns `false` without doing
    /// anything if a save is already in flight for this store.
    pub fn spawn_save(&mut self, path: PathBuf, state: &ProjectState) -> bool {
        if self.in_flight_save.is_some() {
            warn!("save already in flight, request ignored");
            return false;
        }
        let mut state = state.clone();
        state.meta.modified_at = Utc::now();
        self.meta.modified_at = state.meta.modified_at;
        let backups = self.backups_enabled;

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = container::write(&path, &state, backups);
            // Receiver may be gone if the project was closed; the stale
            // result is intentionally ignored
            let _ = tx.send(result);
        });
        self.in_flight_save = Some(rx);
        true
    }

    /// Poll the in-flight save, if any. Returns `Some` exactly once per
    /// spawned save, when it finishes.
    pub fn poll_save(&mut self) -> Option<ProjectResult<()>> {
        let rx = self.in_flight_save.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.in_flight_save = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight_save = None;
                Some(Err(ProjectError::Io(std::io::Error::other(
                    "save worker disconnected",
                ))))
            }
        }
    }

    /// Dispatch a load onto a worker thread; same single-flight rule as
    /// [`spawn_save`](Self::spawn_save).
    pub fn spawn_load(&mut self, path: PathBuf) -> bool {
        if self.in_flight_load.is_some() {
            warn!("load already in flight, request ignored");
            return false;
        }
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(container::read(&path));
        });
        self.in_flight_load = Some(rx);
        true
    }

    pub fn poll_load(&mut self) -> Option<ProjectResult<(ProjectState, LoadReport)>> {
        let rx = self.in_flight_load.as_ref()?;
        match rx.try_recv() {
            Ok(result) => {
                self.in_flight_load = None;
                Some(result)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.in_flight_load = None;
                Some(Err(ProjectError::Io(std::io::Error::other(
                    "load worker disconnected",
                ))))
            }
        }
    }
}
