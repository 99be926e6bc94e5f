use axum::body::Bytes;
use serde::Serialize;
use tracing::{info, warn};

use crate::{
    domain::CsvTable,
    error::DashboardError,
    forecast::PredictionService,
    session::{Command, Page, UploadedFile},
};

/// First rows of an accepted upload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preview {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// What a successful submission hands back to the render loop.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmitOutcome {
    pub body: Bytes,
    pub next: Command,
}

/// Decode and parse an uploaded CSV and keep its first `rows` records.
///
/// Only `.csv` file names are accepted.
pub fn preview(file: &UploadedFile, rows: usize) -> Result<Preview, DashboardError> {
    if !file.has_csv_extension() {
        return Err(DashboardError::Upload(format!(
            "'{}' is not a .csv file",
            file.name
        )));
    }

    let table = CsvTable::parse(&file.bytes)?;
    Ok(Preview {
        file_name: file.name.clone(),
        rows: table.head(rows).to_vec(),
        total_rows: table.row_count(),
        headers: table.headers,
    })
}

/// Send the raw upload to the prediction service exactly once.
///
/// Nothing is written here; the caller stores `body` and applies `next`.
pub async fn submit(
    service: &dyn PredictionService,
    file: &UploadedFile,
) -> Result<SubmitOutcome, DashboardError> {
    info!(file = %file.name, bytes = file.bytes.len(), "requesting prediction");

    match service.predict(file).await {
        Ok(body) => {
            info!(file = %file.name, result_bytes = body.len(), "prediction succeeded");
            Ok(SubmitOutcome {
                body,
                next: Command::NavigateTo(Page::Result),
            })
        }
        Err(e) => {
            warn!(file = %file.name, kind = e.kind(), error = %e, "prediction failed");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedService {
        reply: fn() -> Result<Bytes, DashboardError>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl PredictionService for FixedService {
        async fn predict(&self, _file: &UploadedFile) -> Result<Bytes, DashboardError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.reply)()
        }
    }

    fn csv_file(body: &'static [u8]) -> UploadedFile {
        UploadedFile::new("usage.csv", "text/csv", Bytes::from_static(body))
    }

    #[test]
    fn test_preview_keeps_first_rows() {
        let mut body = String::from("num_date_time,power\n");
        for i in 0..25 {
            body.push_str(&format!("1_20240101 {i:02},{i}\n"));
        }
        let file = UploadedFile::new("usage.csv", "text/csv", Bytes::from(body));

        let preview = preview(&file, 10).unwrap();
        assert_eq!(preview.file_name, "usage.csv");
        assert_eq!(preview.headers, vec!["num_date_time", "power"]);
        assert_eq!(preview.rows.len(), 10);
        assert_eq!(preview.rows[9][1], "9");
        assert_eq!(preview.total_rows, 25);
    }

    #[test]
    fn test_preview_rejects_other_extensions() {
        let file = UploadedFile::new("usage.xlsx", "application/octet-stream", Bytes::new());
        assert!(matches!(
            preview(&file, 10),
            Err(DashboardError::Upload(_))
        ));
    }

    #[test]
    fn test_preview_surfaces_decode_and_parse_errors() {
        let bad_utf8 = UploadedFile::new("a.csv", "text/csv", Bytes::from_static(&[0xff, 0x00]));
        assert!(matches!(preview(&bad_utf8, 10), Err(DashboardError::Decode(_))));

        let ragged = csv_file(b"a,b\n1\n");
        assert!(matches!(preview(&ragged, 10), Err(DashboardError::Parse(_))));
    }

    #[tokio::test]
    async fn test_submit_success_navigates_to_result() {
        let service = FixedService {
            reply: || Ok(Bytes::from_static(b"num_date_time,answer\n")),
            calls: AtomicUsize::new(0),
        };
        let out = submit(&service, &csv_file(b"a\n1\n")).await.unwrap();
        assert_eq!(out.next, Command::NavigateTo(Page::Result));
        assert_eq!(out.body.as_ref(), b"num_date_time,answer\n");
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_submit_failure_is_returned_once() {
        let service = FixedService {
            reply: || {
                Err(DashboardError::Service {
                    status: 503,
                    body: "busy".into(),
                })
            },
            calls: AtomicUsize::new(0),
        };
        let err = submit(&service, &csv_file(b"a\n1\n")).await.unwrap_err();
        assert!(matches!(err, DashboardError::Service { status: 503, .. }));
        assert_eq!(service.calls.load(Ordering::SeqCst), 1);
    }
}
