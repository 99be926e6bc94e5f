use axum::body::Bytes;
use serde::{Deserialize, Serialize};

/// Which view a session currently renders.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Page {
    #[default]
    Predict,
    Result,
}

/// State changes an operation asks its caller to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NavigateTo(Page),
}

/// One CSV file received from the upload form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, bytes: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    pub fn has_csv_extension(&self) -> bool {
        std::path::Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("csv"))
            .unwrap_or(false)
    }
}

/// Per-browser dashboard state, read and written once per render pass.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub page: Page,
    /// Body of the last successful prediction response, kept byte-for-byte.
    pub prediction_result: Option<Bytes>,
    /// Last upload whose preview succeeded.
    pub upload: Option<UploadedFile>,
    pub selected_group: Option<u64>,
}

impl SessionState {
    /// The single place where the page changes.
    pub fn apply(&mut self, command: Command) {
        match command {
            Command::NavigateTo(page) => self.page = page,
        }
    }

    /// Store a successful response body and follow the command that came with it.
    pub fn record_prediction(&mut self, body: Bytes, next: Command) {
        self.prediction_result = Some(body);
        self.selected_group = None;
        self.apply(next);
    }
}
