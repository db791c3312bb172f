use std::time::Duration;

use doclist_logging::{doclist_debug, doclist_warn};
use futures_util::StreamExt;
use reqwest::multipart::{Form, Part};
use reqwest::{StatusCode, Url};
use thiserror::Error;

use crate::{DocumentRecord, FailureKind, RepositoryError, UploadFile};

pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct RepositorySettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Cap on list, search and upload response bodies.
    pub max_response_bytes: u64,
    pub max_upload_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for RepositorySettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_response_bytes: 5 * 1024 * 1024,
            max_upload_bytes: MAX_UPLOAD_BYTES,
            allowed_mime_types: vec!["image/jpeg".to_string(), "image/png".to_string()],
        }
    }
}

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },
    #[error("could not build http client: {0}")]
    Client(#[from] reqwest::Error),
    #[error("could not start engine runtime: {0}")]
    Runtime(#[from] std::io::Error),
}

/// Remote document store. Implementations normalise every failure into a
/// [`RepositoryError`]; none of them touch client-side state.
#[async_trait::async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RepositoryError>;

    /// Case-insensitive substring match on the name, done by the server.
    async fn search_by_name(&self, text: &str) -> Result<Vec<DocumentRecord>, RepositoryError>;

    /// Success means the server accepted the deletion; the caller removes
    /// the document locally.
    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError>;

    async fn upload(&self, file: UploadFile) -> Result<DocumentRecord, RepositoryError>;

    /// Local upload checks, exposed so callers can report a rejection
    /// before the request starts.
    fn validate_upload(&self, file: &UploadFile) -> Result<(), RepositoryError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestRepository {
    settings: RepositorySettings,
    base: Url,
    client: reqwest::Client,
}

impl ReqwestRepository {
    pub fn new(settings: RepositorySettings) -> Result<Self, SetupError> {
        let base = Url::parse(&settings.base_url).map_err(|err| SetupError::BaseUrl {
            url: settings.base_url.clone(),
            reason: err.to_string(),
        })?;
        if base.cannot_be_a_base() {
            return Err(SetupError::BaseUrl {
                url: settings.base_url.clone(),
                reason: "not a hierarchical url".to_string(),
            });
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()?;

        Ok(Self {
            settings,
            base,
            client,
        })
    }

    pub fn settings(&self) -> &RepositorySettings {
        &self.settings
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, FailureKind> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| FailureKind::InvalidUrl)?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn fetch_documents(&self, url: Url) -> Result<Vec<DocumentRecord>, FailureKind> {
        doclist_debug!("GET {}", url);
        let response = self.client.get(url).send().await.map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FailureKind::HttpStatus(status.as_u16()));
        }

        let body = self.read_body(response).await?;
        serde_json::from_slice(&body).map_err(|err| FailureKind::Decode(err.to_string()))
    }

    async fn send_upload(&self, file: UploadFile) -> Result<DocumentRecord, FailureKind> {
        let url = self.endpoint(&["document"])?;
        let part = Part::bytes(file.contents.to_vec())
            .file_name(file.file_name)
            .mime_str(&file.mime_type)
            .map_err(map_reqwest_error)?;
        let form = Form::new().part("file", part);

        doclist_debug!("POST {}", url);
        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(FailureKind::HttpStatus(status.as_u16()));
        }

        let body = self.read_body(response).await?;
        serde_json::from_slice(&body).map_err(|err| FailureKind::Decode(err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FailureKind> {
        let max_bytes = self.settings.max_response_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(content_len),
                });
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FailureKind::TooLarge {
                    max_bytes,
                    actual: Some(next_len),
                });
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl DocumentRepository for ReqwestRepository {
    async fn list_all(&self) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let result = match self.endpoint(&["documents"]) {
            Ok(url) => self.fetch_documents(url).await,
            Err(cause) => Err(cause),
        };
        result.map_err(|cause| {
            doclist_warn!("Listing documents failed: {}", cause);
            RepositoryError::LoadFailure { cause }
        })
    }

    async fn search_by_name(&self, text: &str) -> Result<Vec<DocumentRecord>, RepositoryError> {
        let result = match self.endpoint(&["documents"]) {
            Ok(mut url) => {
                url.query_pairs_mut().append_pair("name", text);
                self.fetch_documents(url).await
            }
            Err(cause) => Err(cause),
        };
        result.map_err(|cause| {
            doclist_warn!("Searching documents for {:?} failed: {}", text, cause);
            RepositoryError::SearchFailure { cause }
        })
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), RepositoryError> {
        let failed = |cause: FailureKind| {
            doclist_warn!("Deleting document {} failed: {}", id, cause);
            RepositoryError::DeleteFailed {
                id: id.to_string(),
                cause,
            }
        };

        let url = self.endpoint(&["documents", id]).map_err(failed)?;
        doclist_debug!("DELETE {}", url);
        let response = self
            .client
            .delete(url)
            .send()
            .await
            .map_err(|err| failed(map_reqwest_error(err)))?;

        match response.status().as_u16() {
            200 => Ok(()),
            status @ 400..=499 => {
                doclist_warn!("Deleting document {} rejected with {}", id, status);
                Err(RepositoryError::DeleteRejected {
                    id: id.to_string(),
                    status,
                })
            }
            status => Err(failed(FailureKind::HttpStatus(status))),
        }
    }

    async fn upload(&self, file: UploadFile) -> Result<DocumentRecord, RepositoryError> {
        self.validate_upload(&file)?;
        let file_name = file.file_name.clone();
        self.send_upload(file).await.map_err(|cause| {
            doclist_warn!("Uploading {:?} failed: {}", file_name, cause);
            RepositoryError::UploadFailed { cause }
        })
    }

    fn validate_upload(&self, file: &UploadFile) -> Result<(), RepositoryError> {
        file.validate(&self.settings)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FailureKind {
    if err.is_timeout() {
        return FailureKind::Timeout;
    }
    if err.is_decode() {
        return FailureKind::Decode(err.to_string());
    }
    FailureKind::Network(err.to_string())
}
