use thiserror::Error;

/// Failures of a single dashboard operation (preview, submit or result render).
///
/// None of these escape the current render pass: handlers turn them into an
/// inline message on the page that triggered them.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("File is not valid UTF-8 text: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("CSV read error: {0}")]
    Parse(String),

    #[error("Column '{0}' is missing from the prediction result")]
    Schema(String),

    #[error("Prediction request failed: {0}")]
    Transport(String),

    #[error("Prediction service error (HTTP {status}): {body}")]
    Service { status: u16, body: String },

    #[error("Upload rejected: {0}")]
    Upload(String),
}

impl DashboardError {
    /// Short machine-friendly name, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            DashboardError::Decode(_) => "decode",
            DashboardError::Parse(_) => "parse",
            DashboardError::Schema(_) => "schema",
            DashboardError::Transport(_) => "transport",
            DashboardError::Service { .. } => "service",
            DashboardError::Upload(_) => "upload",
        }
    }
}

impl From<csv::Error> for DashboardError {
    fn from(error: csv::Error) -> Self {
        DashboardError::Parse(error.to_string())
    }
}

impl From<reqwest::Error> for DashboardError {
    fn from(error: reqwest::Error) -> Self {
        DashboardError::Transport(error.to_string())
    }
}
