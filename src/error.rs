// Error type for the analysis core and catalog normalization.
//
// The I/O layers (catalog clients, CLI) use anyhow like everything else.
// The core gets a typed error so callers can tell a bad dataset apart from
// a broken taxonomy file.

pub type WooResult<T> = Result<T, AnalysisError>;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// The dataset has no usable identifier.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A taxonomy or category-rule table violates its invariants.
    #[error("invalid taxonomy: {0}")]
    Taxonomy(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl AnalysisError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}
