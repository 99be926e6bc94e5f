use anyhow::Result;
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::{
    header::{HeaderMap, HeaderValue, USER_AGENT},
    multipart::{Form, Part},
    StatusCode,
};
use tracing::{debug, warn};

use crate::{config::PredictorConfig, error::DashboardError, session::UploadedFile};

/// Multipart field the prediction service reads the CSV from.
pub const FILE_FIELD: &str = "file";

/// Remote model that turns an uploaded usage CSV into a forecast CSV.
#[async_trait]
pub trait PredictionService: Send + Sync {
    /// One request, no retries. `Ok` carries the raw response body.
    async fn predict(&self, file: &UploadedFile) -> Result<Bytes, DashboardError>;
}

#[derive(Clone)]
pub struct HttpPredictionService {
    url: String,
    client: reqwest::Client,
}

impl HttpPredictionService {
    pub fn new(cfg: &PredictorConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_str(&cfg.user_agent)?);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = cfg.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            url: cfg.url.clone(),
            client: builder.build()?,
        })
    }
}

fn file_part(file: &UploadedFile) -> Part {
    let part = Part::bytes(file.bytes.to_vec()).file_name(file.name.clone());
    if file.content_type.is_empty() {
        return part;
    }
    match part.mime_str(&file.content_type) {
        Ok(part) => part,
        Err(e) => {
            debug!(content_type = %file.content_type, error = %e, "ignoring unusable content type");
            Part::bytes(file.bytes.to_vec()).file_name(file.name.clone())
        }
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(&self, file: &UploadedFile) -> Result<Bytes, DashboardError> {
        let form = Form::new().part(FILE_FIELD, file_part(file));

        let resp = self.client.post(&self.url).multipart(form).send().await?;
        let status = resp.status();
        if status != StatusCode::OK {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, url = %self.url, "prediction service rejected upload");
            return Err(DashboardError::Service {
                status: status.as_u16(),
                body,
            });
        }

        Ok(resp.bytes().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn service_for(server: &MockServer) -> HttpPredictionService {
        let cfg = PredictorConfig {
            url: format!("{}/model/predict", server.uri()),
            ..PredictorConfig::default()
        };
        HttpPredictionService::new(&cfg).unwrap()
    }

    fn upload() -> UploadedFile {
        UploadedFile::new(
            "usage.csv",
            "text/csv",
            Bytes::from_static(b"num_date_time,power\n1_20240101 00,5\n"),
        )
    }

    #[tokio::test]
    async fn test_success_returns_raw_body() {
        let server = MockServer::start().await;
        let body = b"num_date_time,answer\n1_20240101 00,10\n".to_vec();
        Mock::given(method("POST"))
            .and(path("/model/predict"))
            .and(header_exists("content-type"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(body.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let out = service_for(&server).predict(&upload()).await.unwrap();
        assert_eq!(out.as_ref(), body.as_slice());
    }

    #[tokio::test]
    async fn test_request_carries_file_field() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/model/predict"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        service_for(&server).predict(&upload()).await.unwrap();

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let body = String::from_utf8_lossy(&requests[0].body);
        assert!(body.contains(r#"name="file""#));
        assert!(body.contains(r#"filename="usage.csv""#));
        assert!(body.contains("1_20240101 00,5"));
    }

    #[tokio::test]
    async fn test_non_200_is_service_error_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model offline"))
            .mount(&server)
            .await;

        let err = service_for(&server).predict(&upload()).await.unwrap_err();
        match err {
            DashboardError::Service { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "model offline");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_other_success_codes_are_not_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
            .mount(&server)
            .await;

        let err = service_for(&server).predict(&upload()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Service { status: 202, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let cfg = PredictorConfig {
            url: "http://127.0.0.1:9/model/predict".to_string(),
            ..PredictorConfig::default()
        };
        let service = HttpPredictionService::new(&cfg).unwrap();
        let err = service.predict(&upload()).await.unwrap_err();
        assert!(matches!(err, DashboardError::Transport(_)));
    }
}
