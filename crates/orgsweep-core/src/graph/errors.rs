use crate::errors::SweepError;

#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Failed to read snapshot '{path}': {source}")]
    SnapshotIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Snapshot '{path}' is not a valid resource graph: {message}")]
    SnapshotParse { path: String, message: String },

    #[error("Failed to serialize resource graph: {message}")]
    SnapshotSerialize { message: String },
}

impl SweepError for GraphError {
    fn error_code(&self) -> &'static str {
        match self {
            GraphError::SnapshotIo { .. } => "GRAPH_SNAPSHOT_IO",
            GraphError::SnapshotParse { .. } => "GRAPH_SNAPSHOT_PARSE",
            GraphError::SnapshotSerialize { .. } => "GRAPH_SNAPSHOT_SERIALIZE",
        }
    }

    fn is_user_error(&self) -> bool {
        matches!(
            self,
            GraphError::SnapshotIo { .. } | GraphError::SnapshotParse { .. }
        )
    }
}
