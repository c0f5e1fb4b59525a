use std::fmt;

/// Machine-readable error codes for scripted batch consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    InvalidSource,
    UnmappedSource,
    MissingSource,
    DatasetParseError,
    ConfigParseError,
    CycleInCondensation,
    DatasetReadFailed,
    ResultWriteFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::InvalidSource => "E1001",
            Self::UnmappedSource => "E1002",
            Self::MissingSource => "E1003",
            Self::DatasetParseError => "E1004",
            Self::ConfigParseError => "E1005",
            Self::CycleInCondensation => "E2001",
            Self::DatasetReadFailed => "E5001",
            Self::ResultWriteFailed => "E5002",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidSource => "Source node out of range",
            Self::UnmappedSource => "Source node has no component",
            Self::MissingSource => "Dataset has no source node",
            Self::DatasetParseError => "Dataset parse error",
            Self::ConfigParseError => "Config file parse error",
            Self::CycleInCondensation => "Condensation contains a cycle",
            Self::DatasetReadFailed => "Dataset read failed",
            Self::ResultWriteFailed => "Result write failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::InvalidSource => Some("Set `source` to a node id in [0, n)."),
            Self::UnmappedSource => {
                Some("The component set does not cover the source; rebuild it from the same graph.")
            }
            Self::MissingSource => Some("Add a `source` field to the dataset."),
            Self::DatasetParseError => {
                Some("Check the dataset fields: directed, n, nodes, edges, source, weight_model.")
            }
            Self::ConfigParseError => Some("Fix syntax in critpath.toml and retry."),
            Self::CycleInCondensation => {
                Some("Component set is not a valid SCC decomposition; report a bug with the dataset.")
            }
            Self::DatasetReadFailed => Some("Check that the dataset path exists and is readable."),
            Self::ResultWriteFailed => Some("Check disk space and write permissions."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Failure of one dataset's analysis.
///
/// Every variant aborts the dataset it was raised for; there are no retries
/// and no partial results. Other datasets in a batch are unaffected.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Source id outside `[0, n)`.
    #[error("source node {node} out of range for graph with {node_count} nodes")]
    InvalidSource { node: i64, node_count: usize },

    /// Source is in range but no component contains it.
    #[error("source node {node} is not mapped to any component")]
    UnmappedSource { node: usize },

    #[error("dataset does not declare a source node")]
    MissingSource,

    /// Kahn's algorithm emitted fewer components than exist.
    #[error("topological sort failed: component graph has a cycle ({emitted} of {expected} components ordered)")]
    CycleInCondensation { emitted: usize, expected: usize },

    #[error("dataset parse error: {0}")]
    Parse(String),

    #[error("dataset I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Map the error to its stable [`ErrorCode`].
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::InvalidSource { .. } => ErrorCode::InvalidSource,
            Self::UnmappedSource { .. } => ErrorCode::UnmappedSource,
            Self::MissingSource => ErrorCode::MissingSource,
            Self::CycleInCondensation { .. } => ErrorCode::CycleInCondensation,
            Self::Parse(_) => ErrorCode::DatasetParseError,
            Self::Io(_) => ErrorCode::DatasetReadFailed,
        }
    }

    /// Remediation hint for the error's code.
    #[must_use]
    pub fn suggestion(&self) -> String {
        self.error_code()
            .hint()
            .unwrap_or_else(|| self.error_code().message())
            .to_string()
    }

    /// `true` for rejected requests (bad source, bad dataset) as opposed to
    /// broken internal invariants.
    #[must_use]
    pub const fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidSource { .. }
                | Self::UnmappedSource { .. }
                | Self::MissingSource
                | Self::Parse(_)
        )
    }
}

impl From<serde_json::Error> for AnalysisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
