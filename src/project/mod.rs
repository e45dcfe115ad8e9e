//! Project persistence: snapshots, bounded undo/redo, and the versioned
//! compressed container.
//!
//! ## Error Handling
//!
//! All persistence operations return `ProjectResult<T>` over the
//! `ProjectError` taxonomy. Damaged or foreign containers degrade to a
//! best-effort partial load with a [`LoadReport`]; they do not fail unless
//! the file is not a markboard container at all.

pub mod container;
mod error;
mod store;

pub use container::LoadReport;
pub use error::{ProjectError, ProjectResult};
pub use store::{ProjectMeta, ProjectState, ProjectStateStore, WorkMode};
