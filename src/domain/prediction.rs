use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

use super::table::CsvTable;
use crate::error::DashboardError;

/// Composite `"<group_id>_<timestamp>"` key column.
pub const KEY_COLUMN: &str = "num_date_time";
/// Forecast value column.
pub const ANSWER_COLUMN: &str = "answer";
/// Derived column appended to the detail table.
pub const GROUP_COLUMN: &str = "group_id";

const TIMESTAMP_FORMATS: &[&str] = &["%Y%m%d %H:%M", "%Y-%m-%d %H:%M:%S"];

/// Building identifier carried in the leading digits of a composite key.
///
/// Returns `None` unless the key starts with one or more ASCII digits followed
/// by an underscore, or when the digits overflow a `u64`.
pub fn extract_group_id(key: &str) -> Option<u64> {
    let digits_end = key
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(key.len());
    if digits_end == 0 || !key[digits_end..].starts_with('_') {
        return None;
    }
    key[..digits_end].parse().ok()
}

/// Ordering applied to the rows of one group.
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
pub enum SortOrder {
    /// Plain string order on `num_date_time`. Chronological only when the
    /// timestamps are zero-padded to a fixed width.
    #[default]
    Lexicographic,
    /// Order on the timestamp parsed from the key suffix. Keys that do not
    /// parse go last, in string order.
    Chronological,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionRow {
    pub key: String,
    /// `None` when the cell is empty or not a number.
    pub answer: Option<f64>,
    pub group_id: Option<u64>,
    /// Every cell of the source record, in header order.
    pub cells: Vec<String>,
}

impl PredictionRow {
    fn timestamp(&self) -> Option<NaiveDateTime> {
        let (_, suffix) = self.key.split_once('_')?;
        let suffix = suffix.trim();
        // chrono needs minutes, so hour-only stamps get ":00" appended.
        let hour_only = format!("{suffix}:00");
        TIMESTAMP_FORMATS.iter().find_map(|fmt| {
            NaiveDateTime::parse_from_str(suffix, fmt)
                .or_else(|_| NaiveDateTime::parse_from_str(&hour_only, fmt))
                .ok()
        })
    }
}

/// Prediction service output after schema validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionTable {
    pub headers: Vec<String>,
    pub rows: Vec<PredictionRow>,
    answer_idx: usize,
}

impl PredictionTable {
    pub fn from_csv(bytes: &[u8]) -> Result<Self, DashboardError> {
        Self::from_table(CsvTable::parse(bytes)?)
    }

    /// Check the required columns once and type every row.
    pub fn from_table(table: CsvTable) -> Result<Self, DashboardError> {
        let key_idx = table
            .column_index(KEY_COLUMN)
            .ok_or_else(|| DashboardError::Schema(KEY_COLUMN.to_string()))?;
        let answer_idx = table
            .column_index(ANSWER_COLUMN)
            .ok_or_else(|| DashboardError::Schema(ANSWER_COLUMN.to_string()))?;

        let rows = table
            .rows
            .into_iter()
            .map(|cells| {
                let key = cells[key_idx].clone();
                let answer = cells[answer_idx].trim().parse::<f64>().ok();
                PredictionRow {
                    group_id: extract_group_id(&key),
                    key,
                    answer,
                    cells,
                }
            })
            .collect();

        Ok(Self {
            headers: table.headers,
            rows,
            answer_idx,
        })
    }

    /// Cells of `row` for display, with an unparsed `answer` left blank.
    pub fn display_cells(&self, row: &PredictionRow) -> Vec<String> {
        let mut cells = row.cells.clone();
        if row.answer.is_none() {
            if let Some(cell) = cells.get_mut(self.answer_idx) {
                cell.clear();
            }
        }
        cells
    }

    /// Distinct group ids present in the table, ascending.
    pub fn groups(&self) -> Vec<u64> {
        self.rows
            .iter()
            .filter_map(|r| r.group_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Rows of one group, ordered by `order`.
    pub fn select(&self, group: u64, order: SortOrder) -> Vec<&PredictionRow> {
        let mut rows: Vec<&PredictionRow> = self
            .rows
            .iter()
            .filter(|r| r.group_id == Some(group))
            .collect();

        match order {
            SortOrder::Lexicographic => rows.sort_by(|a, b| a.key.cmp(&b.key)),
            SortOrder::Chronological => rows.sort_by(|a, b| {
                match (a.timestamp(), b.timestamp()) {
                    (Some(ta), Some(tb)) => ta.cmp(&tb).then_with(|| a.key.cmp(&b.key)),
                    (Some(_), None) => Ordering::Less,
                    (None, Some(_)) => Ordering::Greater,
                    (None, None) => a.key.cmp(&b.key),
                }
            }),
        }
        rows
    }
}
