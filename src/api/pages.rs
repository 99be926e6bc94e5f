use askama::Template;
use axum::{
    body::Bytes,
    extract::{Multipart, Query, State},
    http::header,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{info, warn};

use super::{error::ApiError, session::SessionId};
use crate::{
    dashboard::{
        self,
        result::{RESULT_CONTENT_TYPE, RESULT_FILE_NAME},
        AppState,
    },
    forecast::FILE_FIELD,
    session::{Command, Page, SessionState, UploadedFile},
    ui::{Notice, PredictTemplate, PredictView, ResultTemplate},
};

/// GET / - render whichever page the session is on.
pub async fn index(
    State(st): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Html<String>, ApiError> {
    let session = st.sessions.snapshot(id).await;
    render_page(&st, &session, Vec::new())
}

/// POST /upload - accept a CSV and show its preview.
pub async fn upload(
    State(st): State<AppState>,
    SessionId(id): SessionId,
    mut multipart: Multipart,
) -> Result<Html<String>, ApiError> {
    let Some(file) = read_file_field(&mut multipart).await? else {
        let session = st.sessions.snapshot(id).await;
        return render_predict(&st, &predict_view(&st, &session, Vec::new()));
    };

    let view = match dashboard::preview(&file, st.cfg.ui.preview_rows) {
        Ok(preview) => {
            info!(file = %file.name, rows = preview.total_rows, "upload accepted");
            st.sessions.update(id, |s| s.upload = Some(file)).await;
            PredictView {
                preview: Some(preview),
                notices: Vec::new(),
            }
        }
        Err(e) => {
            warn!(file = %file.name, kind = e.kind(), error = %e, "upload rejected");
            st.sessions.update(id, |s| s.upload = None).await;
            PredictView {
                preview: None,
                notices: vec![Notice::error(e.to_string())],
            }
        }
    };

    render_predict(&st, &view)
}

/// POST /submit - forward the accepted upload to the prediction service.
pub async fn submit(
    State(st): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Response, ApiError> {
    let session = st.sessions.snapshot(id).await;
    let Some(file) = session.upload.clone() else {
        let notice = Notice::warning("Upload a CSV file before running the prediction.");
        return Ok(render_page(&st, &session, vec![notice])?.into_response());
    };

    match dashboard::submit(st.predictor.as_ref(), &file).await {
        Ok(outcome) => {
            st.sessions
                .update(id, |s| s.record_prediction(outcome.body, outcome.next))
                .await;
            Ok(Redirect::to("/").into_response())
        }
        Err(e) => {
            let view = predict_view(&st, &session, vec![Notice::error(e.to_string())]);
            Ok(render_predict(&st, &view)?.into_response())
        }
    }
}

/// Raw selector value; anything that is not a group id is ignored.
#[derive(Debug, Deserialize)]
pub struct ResultQuery {
    pub group: Option<String>,
}

/// GET /result - pick a building and render its forecast.
pub async fn show_result(
    State(st): State<AppState>,
    SessionId(id): SessionId,
    Query(q): Query<ResultQuery>,
) -> Result<Html<String>, ApiError> {
    let requested = q.group.and_then(|g| g.trim().parse::<u64>().ok());
    let session = st
        .sessions
        .update(id, |s| {
            if requested.is_some() {
                s.selected_group = requested;
            }
            s.clone()
        })
        .await;
    render_result(&st, &session)
}

/// GET /result/download - the stored response body, untouched.
pub async fn download_result(
    State(st): State<AppState>,
    SessionId(id): SessionId,
) -> Result<Response, ApiError> {
    let session = st.sessions.snapshot(id).await;
    let bytes: Bytes = session
        .prediction_result
        .ok_or_else(|| ApiError::NotFound("no prediction result in this session".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, RESULT_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{RESULT_FILE_NAME}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}

/// POST /navigate/predict - sidebar button back to the upload page.
pub async fn navigate_predict(State(st): State<AppState>, SessionId(id): SessionId) -> Redirect {
    st.sessions
        .update(id, |s| s.apply(Command::NavigateTo(Page::Predict)))
        .await;
    Redirect::to("/")
}

fn render_page(
    st: &AppState,
    session: &SessionState,
    notices: Vec<Notice>,
) -> Result<Html<String>, ApiError> {
    match session.page {
        Page::Predict => render_predict(st, &predict_view(st, session, notices)),
        Page::Result => render_result(st, session),
    }
}

fn render_predict(st: &AppState, view: &PredictView) -> Result<Html<String>, ApiError> {
    Ok(Html(PredictTemplate::new(&st.cfg.ui.title, view).render()?))
}

fn render_result(st: &AppState, session: &SessionState) -> Result<Html<String>, ApiError> {
    let view = dashboard::render(
        session.prediction_result.as_ref(),
        session.selected_group,
        st.cfg.ui.sort_order,
    );
    Ok(Html(ResultTemplate::new(&st.cfg.ui.title, &view).render()?))
}

fn predict_view(st: &AppState, session: &SessionState, notices: Vec<Notice>) -> PredictView {
    let preview = session
        .upload
        .as_ref()
        .and_then(|file| dashboard::preview(file, st.cfg.ui.preview_rows).ok());
    PredictView { preview, notices }
}

/// First non-empty `file` field of the form, if any.
async fn read_file_field(multipart: &mut Multipart) -> Result<Option<UploadedFile>, ApiError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field.bytes().await?;
        if name.is_empty() && bytes.is_empty() {
            return Ok(None);
        }
        return Ok(Some(UploadedFile::new(name, content_type, bytes)));
    }
    Ok(None)
}
