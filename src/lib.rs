//! markboard - canvas geometry and interaction core for a 2D mark/engraving
//! editor.
//!
//! The crate covers three concerns:
//!
//! - **Coordinate transform** ([`transform`]): pure screen↔canvas mapping
//!   with zoom-tiered precision, clamping, and grid alignment.
//! - **Interaction** ([`input`], [`editor`]): the per-gesture drag/resize
//!   state machine over a [`registry::MarkRegistry`], driven by plain
//!   pointer events from the embedding event loop.
//! - **Persistence** ([`project`]): versioned, gzip-compressed project
//!   containers with bounded undo/redo and best-effort loading.
//!
//! Window chrome, dialogs, and the pixel rendering of each mark kind live
//! outside this crate; rendering is invoked through the
//! [`types::MarkPainter`] callback with geometry only.

pub mod constants;
pub mod editor;
pub mod input;
pub mod project;
pub mod registry;
pub mod spatial_index;
pub mod transform;
pub mod types;

pub use editor::MarkEditor;
pub use registry::MarkRegistry;
pub use types::{Mark, MarkKind, PointerEvent, ViewState};

/// Install a `tracing` subscriber reading `RUST_LOG`. Intended for
/// embedders and test binaries; calling it twice is harmless.
pub fn init_logging() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
