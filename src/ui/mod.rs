//! Server-side HTML for the two dashboard pages.
//!
//! Pages are askama templates under `templates/`, which escape every
//! interpolated value. Only the SVG chart is assembled by hand.

pub mod chart;
pub mod pages;
pub mod table;

pub use pages::{PredictTemplate, PredictView, ResultTemplate};
pub use table::DataTable;

/// Severity of an inline message box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: Level,
    pub text: String,
}

impl Notice {
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }

    pub fn info(text: impl Into<String>) -> Self {
        Self::new(Level::Info, text)
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self::new(Level::Warning, text)
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self::new(Level::Error, text)
    }

    pub fn icon(&self) -> &'static str {
        match self.level {
            Level::Success => "✅",
            Level::Info => "📄",
            Level::Warning => "⚠",
            Level::Error => "❌",
        }
    }
}
