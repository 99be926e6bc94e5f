use axum::body::Bytes;
use serde::Serialize;
use tracing::{debug, warn};

use crate::{
    domain::{PredictionTable, SortOrder, GROUP_COLUMN},
    error::DashboardError,
};

/// Download name offered for the stored prediction body.
pub const RESULT_FILE_NAME: &str = "result.csv";
pub const RESULT_CONTENT_TYPE: &str = "text/csv";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// One building's forecast, ready for the chart and the detail table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupView {
    /// Selector options, ascending.
    pub groups: Vec<u64>,
    pub selected: u64,
    /// Response columns followed by `group_id`.
    pub headers: Vec<String>,
    /// Filtered, ordered rows; the display index is the position in this vec.
    pub rows: Vec<Vec<String>>,
    pub points: Vec<ChartPoint>,
}

#[derive(Debug)]
pub enum ResultView {
    /// No successful prediction in this session yet.
    Missing,
    /// The stored bytes could not be turned into a grouped view.
    Failed(DashboardError),
    /// Parsed fine, but no key carried a group id.
    NoGroups,
    Ready(GroupView),
}

impl ResultView {
    /// Whether the raw download should be offered next to this view.
    pub fn has_download(&self) -> bool {
        !matches!(self, ResultView::Missing)
    }
}

/// Parse the stored prediction body and build the view for one group.
///
/// `requested` falls back to the smallest group when absent or unknown.
pub fn render(result: Option<&Bytes>, requested: Option<u64>, order: SortOrder) -> ResultView {
    let Some(bytes) = result else {
        return ResultView::Missing;
    };

    let table = match PredictionTable::from_csv(bytes) {
        Ok(table) => table,
        Err(e) => {
            warn!(kind = e.kind(), error = %e, "stored prediction could not be rendered");
            return ResultView::Failed(e);
        }
    };

    let groups = table.groups();
    let Some(&first) = groups.first() else {
        return ResultView::NoGroups;
    };
    let selected = requested.filter(|g| groups.contains(g)).unwrap_or(first);

    let selection = table.select(selected, order);
    debug!(
        groups = groups.len(),
        selected,
        rows = selection.len(),
        "rendering prediction group"
    );

    let points = selection
        .iter()
        .filter_map(|r| {
            r.answer.filter(|v| v.is_finite()).map(|value| ChartPoint {
                label: r.key.clone(),
                value,
            })
        })
        .collect();

    let rows = selection
        .iter()
        .map(|r| {
            let mut cells = table.display_cells(r);
            cells.push(selected.to_string());
            cells
        })
        .collect();

    let mut headers = table.headers;
    headers.push(GROUP_COLUMN.to_string());

    ResultView::Ready(GroupView {
        groups,
        selected,
        headers,
        rows,
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bytes(s: &'static str) -> Bytes {
        Bytes::from_static(s.as_bytes())
    }

    fn ready(view: ResultView) -> GroupView {
        match view {
            ResultView::Ready(g) => g,
            other => panic!("expected a ready view, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_result_renders_warning_only() {
        let view = render(None, None, SortOrder::Lexicographic);
        assert!(matches!(view, ResultView::Missing));
        assert!(!view.has_download());
    }

    #[test]
    fn test_two_buildings_default_to_smallest() {
        let body = bytes("num_date_time,answer\n2_20240101 00,20\n1_20240101 00,10\n");
        let g = ready(render(Some(&body), None, SortOrder::Lexicographic));
        assert_eq!(g.groups, vec![1, 2]);
        assert_eq!(g.selected, 1);
        assert_eq!(g.rows.len(), 1);
        assert_eq!(g.points, vec![ChartPoint { label: "1_20240101 00".into(), value: 10.0 }]);
    }

    #[test]
    fn test_requested_group_is_honoured() {
        let body = bytes("num_date_time,answer\n2_20240101 01,21\n1_20240101 00,10\n2_20240101 00,20\n");
        let g = ready(render(Some(&body), Some(2), SortOrder::Lexicographic));
        assert_eq!(g.selected, 2);
        assert_eq!(
            g.rows,
            vec![
                vec!["2_20240101 00".to_string(), "20".into(), "2".into()],
                vec!["2_20240101 01".to_string(), "21".into(), "2".into()],
            ]
        );
        assert_eq!(g.headers, vec!["num_date_time", "answer", "group_id"]);
    }

    #[test]
    fn test_unknown_group_falls_back_to_first() {
        let body = bytes("num_date_time,answer\n5_a,1\n7_a,2\n");
        let g = ready(render(Some(&body), Some(99), SortOrder::Lexicographic));
        assert_eq!(g.selected, 5);
    }

    #[test]
    fn test_rows_without_group_are_excluded() {
        let body = bytes("num_date_time,answer\nx_a,1\n3_a,2\n");
        let g = ready(render(Some(&body), None, SortOrder::Lexicographic));
        assert_eq!(g.groups, vec![3]);
        assert_eq!(g.rows.len(), 1);
    }

    #[test]
    fn test_non_numeric_answers_are_left_out_of_chart() {
        let body = bytes("num_date_time,answer\n1_a,1\n1_b,\n1_c,nope\n");
        let g = ready(render(Some(&body), None, SortOrder::Lexicographic));
        assert_eq!(g.rows.len(), 3);
        assert_eq!(g.points.len(), 1);
        assert_eq!(g.rows[2], vec!["1_c", "", "1"]);
        assert_eq!(g.rows[0], vec!["1_a", "1", "1"]);
    }

    #[test]
    fn test_missing_answer_column_fails_with_schema_error() {
        let body = bytes("num_date_time,value\n1_a,1\n");
        let view = render(Some(&body), None, SortOrder::Lexicographic);
        assert!(matches!(view, ResultView::Failed(DashboardError::Schema(_))));
        assert!(view.has_download());
    }

    #[test]
    fn test_non_utf8_result_fails_but_keeps_download() {
        let body = Bytes::from_static(&[0xff, 0xfe, 0x00]);
        let view = render(Some(&body), None, SortOrder::Lexicographic);
        assert!(matches!(view, ResultView::Failed(DashboardError::Decode(_))));
        assert!(view.has_download());
    }

    #[test]
    fn test_no_valid_keys_gives_empty_selector() {
        let body = bytes("num_date_time,answer\nfoo,1\n");
        assert!(matches!(
            render(Some(&body), None, SortOrder::Lexicographic),
            ResultView::NoGroups
        ));
    }
}
