use askama::Template;

use super::{chart, DataTable, Notice};
use crate::dashboard::{result::RESULT_FILE_NAME, GroupView, Preview, ResultView};

/// Everything the upload page shows in one render pass.
#[derive(Debug, Default)]
pub struct PredictView {
    pub preview: Option<Preview>,
    pub notices: Vec<Notice>,
}

pub struct UploadSummary<'a> {
    pub file_name: &'a str,
    pub total_rows: usize,
    pub table: DataTable<'a>,
}

impl<'a> From<&'a Preview> for UploadSummary<'a> {
    fn from(preview: &'a Preview) -> Self {
        Self {
            file_name: &preview.file_name,
            total_rows: preview.total_rows,
            table: DataTable {
                headers: &preview.headers,
                rows: &preview.rows,
            },
        }
    }
}

#[derive(Template)]
#[template(path = "predict.html")]
pub struct PredictTemplate<'a> {
    pub title: &'a str,
    pub upload: Option<UploadSummary<'a>>,
    pub notices: &'a [Notice],
}

impl<'a> PredictTemplate<'a> {
    pub fn new(title: &'a str, view: &'a PredictView) -> Self {
        Self {
            title,
            upload: view.preview.as_ref().map(UploadSummary::from),
            notices: &view.notices,
        }
    }
}

pub struct GroupOption {
    pub id: u64,
    pub selected: bool,
}

/// Selector, chart and detail table for the chosen building.
pub struct GroupSection<'a> {
    pub selected: u64,
    pub options: Vec<GroupOption>,
    pub chart: String,
    pub table: DataTable<'a>,
}

impl<'a> From<&'a GroupView> for GroupSection<'a> {
    fn from(group: &'a GroupView) -> Self {
        Self {
            selected: group.selected,
            options: group
                .groups
                .iter()
                .map(|&id| GroupOption {
                    id,
                    selected: id == group.selected,
                })
                .collect(),
            chart: chart::line_chart(&group.points),
            table: DataTable {
                headers: &group.headers,
                rows: &group.rows,
            },
        }
    }
}

#[derive(Template)]
#[template(path = "result.html")]
pub struct ResultTemplate<'a> {
    pub title: &'a str,
    /// Download name, offered whenever a response body is stored.
    pub download: Option<&'static str>,
    pub notices: Vec<Notice>,
    pub group: Option<GroupSection<'a>>,
}

impl<'a> ResultTemplate<'a> {
    pub fn new(title: &'a str, view: &'a ResultView) -> Self {
        let mut notices = Vec::new();
        let mut group = None;
        match view {
            ResultView::Missing => notices.push(Notice::warning(
                "No prediction result yet. Run a prediction first.",
            )),
            ResultView::Failed(e) => notices.push(Notice::error(e.to_string())),
            ResultView::NoGroups => notices.push(Notice::info(
                "No rows with a building id were found in the result.",
            )),
            ResultView::Ready(g) => group = Some(GroupSection::from(g)),
        }

        Self {
            title,
            download: view.has_download().then_some(RESULT_FILE_NAME),
            notices,
            group,
        }
    }
}
