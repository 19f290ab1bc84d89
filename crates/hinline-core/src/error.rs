use thiserror::Error;

use crate::config::ConfigError;
use crate::extract::ExtractError;
use crate::graph::GraphError;
use crate::path::PathError;

/// Any failure of an inlining run.
///
/// Every variant aborts the run; nothing is written for a failed run.
#[derive(Debug, Error)]
pub enum InlineError {
    #[error(transparent)]
    Extract(#[from] ExtractError),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("marker label: {0}")]
    Path(#[from] PathError),
}

impl InlineError {
    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::Extract(_) => "Header could not be read",
            Self::Graph(_) => "Include graph is cyclic",
            Self::Config(_) => "Invalid configuration",
            Self::Path(_) => "Marker label could not be derived",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(&self) -> Option<&'static str> {
        match self {
            Self::Extract(_) => Some("Check the include directory (-I) and the quoted path."),
            Self::Graph(_) => Some("Break the include loop so every header has a defined position."),
            Self::Config(_) => Some("Fix the exclude pattern or .hinline.toml and retry."),
            Self::Path(_) => Some("Use --markers resolved or point -I at the header tree root."),
        }
    }
}
