//! Editor composition root.
//!
//! [`MarkEditor`] owns the live registry, view state, interaction state
//! machine, and project store. The embedding event loop feeds it
//! [`PointerEvent`]s (handlers live in `input/`) and an external painter
//! draws through [`MarkPainter`]. Everything here is single-threaded by
//! design: one mutator, no locking. Only project file I/O leaves this
//! thread, via the store's spawn/poll pairs.

use crate::input::{DragThresholdMode, InteractionState};
use crate::project::{LoadReport, ProjectResult, ProjectState, ProjectStateStore};
use crate::registry::MarkRegistry;
use crate::types::{MarkPainter, PointerEvent, ViewState};
use std::path::Path;
use tracing::debug;

pub struct MarkEditor {
    pub registry: MarkRegistry,
    pub view: ViewState,
    pub interaction: InteractionState,
    pub store: ProjectStateStore,
    pub threshold_mode: DragThresholdMode,
}

impl Default for MarkEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkEditor {
    pub fn new() -> Self {
        Self {
            registry: MarkRegistry::new(),
            view: ViewState::default(),
            interaction: InteractionState::Idle,
            store: ProjectStateStore::new(),
            threshold_mode: DragThresholdMode::default(),
        }
    }

    pub fn with_threshold_mode(mut self, mode: DragThresholdMode) -> Self {
        self.threshold_mode = mode;
        self
    }

    /// Convert a pointer event to canvas coordinates under the current view.
    pub(crate) fn canvas_pos(&self, event: PointerEvent) -> (i32, i32) {
        crate::transform::screen_to_canvas(event.screen_x, event.screen_y, &self.view)
    }

    // ========================================================================
    // Undo / redo
    // ========================================================================

    /// Record the current mark list as an undo snapshot. Called after a
    /// gesture commits and by property-edit paths before they mutate.
    pub fn push_undo_snapshot(&mut self) {
        self.store.push_undo(self.registry.snapshot_marks());
    }

    /// Restore the previous snapshot; no-op when the undo stack is empty.
    pub fn undo(&mut self) -> bool {
        match self.store.undo(self.registry.snapshot_marks()) {
            Some(marks) => {
                self.registry.restore(marks);
                true
            }
            None => false,
        }
    }

    /// Reapply the most recently undone snapshot; no-op when empty.
    pub fn redo(&mut self) -> bool {
        match self.store.redo(self.registry.snapshot_marks()) {
            Some(marks) => {
                self.registry.restore(marks);
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Discard the current project and start an empty one: no marks, default
    /// view, fresh metadata, reset work mode, empty history.
    pub fn new_project(&mut self) {
        self.registry.restore(Vec::new());
        self.registry.select(None);
        self.registry.activate(None);
        self.registry.set_clipboard(None);
        self.view = ViewState::default();
        self.store.reset();
        self.interaction.reset();
    }

    /// Snapshot the live registry and view into a project state value.
    pub fn project_state(&self) -> ProjectState {
        self.store.snapshot(&self.registry, &self.view)
    }

    /// Replace the live state from a loaded project.
    pub fn apply_project_state(&mut self, state: ProjectState) {
        self.store.adopt(&state);
        self.view = state.view;
        self.registry.restore(state.marks);
        self.registry.select(state.selected);
        self.registry.activate(state.active);
        self.registry.set_clipboard(state.clipboard);
        self.interaction.reset();
    }

    /// Synchronous save of the current project to `path`.
    pub fn save_project(&mut self, path: &Path) -> ProjectResult<()> {
        let state = self.project_state();
        self.store.save(path, &state)
    }

    /// Synchronous load; replaces the live state and reports any fields the
    /// decoder had to default.
    pub fn load_project(&mut self, path: &Path) -> ProjectResult<LoadReport> {
        let (state, report) = self.store.load(path)?;
        self.apply_project_state(state);
        if !report.is_clean() {
            debug!(defaulted = ?report.defaulted, skipped = report.skipped_marks,
                "project loaded with defaults");
        }
        Ok(report)
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Drive the external painter once per mark, in paint order. The core
    /// supplies geometry and selection only.
    pub fn render(&self, painter: &mut dyn MarkPainter) {
        let selected = self.registry.selected();
        for index in self.registry.draw_order() {
            if let Some(mark) = self.registry.get(index) {
                painter.draw(mark, selected == Some(index));
            }
        }
    }
}
