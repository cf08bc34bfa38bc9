//! Snapshot persistence
//!
//! The graph is the only persisted artifact of a run: loaded once at start,
//! written once at the end (atomic temp-file-then-rename) for audit/resume.

use std::fs;
use std::path::Path;

use crate::graph::errors::GraphError;
use crate::graph::types::ResourceGraph;

pub fn load_snapshot(path: &Path) -> Result<ResourceGraph, GraphError> {
    let content = fs::read_to_string(path).map_err(|source| GraphError::SnapshotIo {
        path: path.display().to_string(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|e| GraphError::SnapshotParse {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

fn cleanup_temp_file(temp_file: &Path, original_error: &std::io::Error) {
    if let Err(cleanup_err) = fs::remove_file(temp_file) {
        tracing::warn!(
            event = "core.graph.temp_file_cleanup_failed",
            temp_file = %temp_file.display(),
            original_error = %original_error,
            cleanup_error = %cleanup_err,
            message = "Failed to clean up temp file after snapshot write error"
        );
    }
}

pub fn save_snapshot(graph: &ResourceGraph, path: &Path) -> Result<(), GraphError> {
    let json = serde_json::to_string_pretty(graph).map_err(|e| {
        tracing::error!(
            event = "core.graph.serialization_failed",
            error = %e,
            message = "Failed to serialize resource graph to JSON"
        );
        GraphError::SnapshotSerialize {
            message: e.to_string(),
        }
    })?;

    let temp_file = path.with_extension("json.tmp");

    // Write to temp file
    if let Err(e) = fs::write(&temp_file, &json) {
        cleanup_temp_file(&temp_file, &e);
        return Err(GraphError::SnapshotIo {
            path: temp_file.display().to_string(),
            source: e,
        });
    }

    // Rename temp file to final location
    if let Err(e) = fs::rename(&temp_file, path) {
        cleanup_temp_file(&temp_file, &e);
        return Err(GraphError::SnapshotIo {
            path: path.display().to_string(),
            source: e,
        });
    }

    tracing::info!(
        event = "core.graph.snapshot_saved",
        path = %path.display()
    );

    Ok(())
}
