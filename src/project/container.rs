//! Versioned, compressed on-disk project container.
//!
//! Layout: one ASCII header line `markboard/<version>\n`, followed by a
//! gzip stream of the JSON-encoded [`ProjectState`]. Unknown fields in the
//! body are ignored on decode, so newer writers stay readable.
//!
//! Saves never touch the previous file until the new bytes are complete:
//! the container is written to a temp file in the target directory and then
//! swapped into place, optionally after copying the old file aside as a
//! backup. Loads of foreign or damaged containers degrade to a best-effort
//! partial decode that reports exactly which sections were defaulted.

use crate::constants::{BACKUP_SUFFIX, CONTAINER_FORMAT, SCHEMA_VERSION};
use crate::project::error::{ProjectError, ProjectResult};
use crate::project::store::ProjectState;
use crate::types::Mark;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// What the tolerant decoder had to make up or drop while loading.
#[derive(Clone, Debug, Default)]
pub struct LoadReport {
    /// False when the header carried a version other than the current one
    pub version_ok: bool,
    /// Container sections that were missing or unreadable and got defaults
    pub defaulted: Vec<String>,
    /// Mark entries (including snapshot entries) that could not be decoded
    pub skipped_marks: usize,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.version_ok && self.defaulted.is_empty() && self.skipped_marks == 0
    }
}

// ============================================================================
// Write
// ============================================================================

/// Serialize `state` to `path`.
///
/// An existing file is optionally copied to `<path>.bak` first; a failed
/// backup logs a warning and the save proceeds. The new container lands in
/// a temp file and replaces `path` atomically, so a failed save never
/// destroys a previously-good project file.
pub fn write(path: &Path, state: &ProjectState, backups_enabled: bool) -> ProjectResult<()> {
    if backups_enabled && path.exists() {
        let mut backup = path.as_os_str().to_os_string();
        backup.push(".");
        backup.push(BACKUP_SUFFIX);
        if let Err(e) = fs::copy(path, &backup) {
            warn!(path = %path.display(), error = %e, "backup copy failed, saving anyway");
        }
    }

    let body = serde_json::to_vec(state)?;
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(&body)?;
    let compressed = encoder.finish()?;

    // The temp file must share a filesystem with the target or the final
    // rename degrades to a copy that can fail cross-device; a bare filename
    // means the current directory, never the system temp dir
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(format!("{CONTAINER_FORMAT}/{SCHEMA_VERSION}\n").as_bytes())?;
    tmp.write_all(&compressed)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| ProjectError::Io(e.error))?;
    Ok(())
}

// ============================================================================
// Read
// ============================================================================

/// Decode a container from `path`.
///
/// A current-version container with a fully readable body yields a clean
/// report. Anything else that still looks like a markboard container is
/// decoded best-effort: missing sections are defaulted, unreadable mark
/// entries skipped, and the report says which. Only a garbled header or an
/// undecompressable payload is an outright error.
pub fn read(path: &Path) -> ProjectResult<(ProjectState, LoadReport)> {
    let bytes = fs::read(path)?;

    let newline = bytes
        .iter()
        .position(|&b| b == b'\n')
        .ok_or_else(|| ProjectError::Corrupt("missing container header".into()))?;
    let header = std::str::from_utf8(&bytes[..newline])
        .map_err(|_| ProjectError::Corrupt("non-text container header".into()))?;
    let version = header
        .strip_prefix(CONTAINER_FORMAT)
        .and_then(|rest| rest.strip_prefix('/'))
        .ok_or_else(|| ProjectError::Corrupt(format!("unrecognized header: {header}")))?
        .to_string();
    let version_ok = version.parse::<u32>() == Ok(SCHEMA_VERSION);

    let mut body = Vec::new();
    GzDecoder::new(&bytes[newline + 1..])
        .read_to_end(&mut body)
        .map_err(|_| ProjectError::Corrupt("payload is not a gzip stream".into()))?;

    let value: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) if version_ok => return Err(ProjectError::Serialization(e)),
        Err(_) => return Err(ProjectError::VersionMismatch { found: version }),
    };

    if version_ok {
        // Strict decode first; fall back to the tolerant path so a single
        // unreadable mark entry does not fail the whole load
        if let Ok(state) = serde_json::from_value::<ProjectState>(value.clone()) {
            let report = LoadReport { version_ok: true, ..LoadReport::default() };
            return Ok((state, report));
        }
    } else {
        debug!(found = %version, "foreign container version, best-effort load");
    }

    let (state, mut report) = decode_lenient(value)?;
    report.version_ok = version_ok;
    Ok((state, report))
}

/// Field-by-field decode with defaults for anything unreadable.
fn decode_lenient(value: Value) -> ProjectResult<(ProjectState, LoadReport)> {
    let Value::Object(mut obj) = value else {
        return Err(ProjectError::Corrupt("container body is not an object".into()));
    };

    let mut report = LoadReport::default();
    let mut state = ProjectState::default();

    state.meta = take_or_default(&mut obj, "meta", &mut report);
    state.view = take_or_default(&mut obj, "view", &mut report);
    state.work_mode = take_or_default(&mut obj, "work_mode", &mut report);
    state.clipboard = take_or_default(&mut obj, "clipboard", &mut report);

    state.selected = take_index(&mut obj, "selected", &mut report);
    state.active = take_index(&mut obj, "active", &mut report);

    state.marks = match obj.remove("marks") {
        Some(Value::Array(entries)) => decode_marks(entries, &mut report),
        _ => {
            report.defaulted.push("marks".into());
            Vec::new()
        }
    };

    state.undo = take_snapshots(&mut obj, "undo", &mut report);
    state.redo = take_snapshots(&mut obj, "redo", &mut report);

    Ok((state, report))
}

fn take_or_default<T: DeserializeOwned + Default>(
    obj: &mut serde_json::Map<String, Value>,
    key: &str,
    report: &mut LoadReport,
) -> T {
    match obj.remove(key) {
        Some(v) => serde_json::from_value(v).unwrap_or_else(|_| {
            report.defaulted.push(key.to_string());
            T::default()
        }),
        None => {
            report.defaulted.push(key.to_string());
            T::default()
        }
    }
}

fn take_index(
    obj: &mut serde_json::Map<String, Value>,
    key: &str,
    report: &mut LoadReport,
) -> Option<usize> {
    match obj.remove(key).and_then(|v| v.as_i64()) {
        Some(i) if i >= 0 => Some(i as usize),
        Some(_) => None,
        None => {
            report.defaulted.push(key.to_string());
            None
        }
    }
}

fn decode_marks(entries: Vec<Value>, report: &mut LoadReport) -> Vec<Mark> {
    entries
        .into_iter()
        .filter_map(|entry| match serde_json::from_value::<Mark>(entry) {
            Ok(mark) => Some(mark),
            Err(e) => {
                report.skipped_marks += 1;
                debug!(error = %e, "skipping unreadable mark entry");
                None
            }
        })
        .collect()
}

fn take_snapshots(
    obj: &mut serde_json::Map<String, Value>,
    key: &str,
    report: &mut LoadReport,
) -> Vec<Vec<Mark>> {
    match obj.remove(key) {
        Some(Value::Array(snapshots)) => snapshots
            .into_iter()
            .filter_map(|snap| match snap {
                Value::Array(entries) => Some(decode_marks(entries, report)),
                _ => {
                    report.defaulted.push(format!("{key} entry"));
                    None
                }
            })
            .collect(),
        Some(_) | None => {
            report.defaulted.push(key.to_string());
            Vec::new()
        }
    }
}
