use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::models::{
    ActionResponse, CurrentUser, ImageUpload, LoginResponse, PostPayload, PreviewResponse,
    UploadResponse,
};
use crate::reports::ReportId;

pub mod http_client;
pub mod session;
pub use http_client::HttpApiClient;
pub use session::SessionStore;

/// Message shown to the user whenever a call could not reach the backend
pub const CONNECTION_ERROR_MESSAGE: &str = "Error de conexión. Intenta nuevamente.";

/// Errors raised by API calls (the "thrown" class of failures)
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("{0}")]
    Business(String),

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("no active session, log in first")]
    NotAuthenticated,

    #[error("session storage error: {0}")]
    Session(String),

    #[error("invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// Text shown inline by the widgets
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Business(msg) => msg.clone(),
            ApiError::NotAuthenticated => "Tu sesión expiró. Inicia sesión nuevamente.".to_string(),
            _ => CONNECTION_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Backend collaborator used by every widget
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SocialApi: Send + Sync {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError>;

    async fn create_post(&self, payload: &PostPayload) -> Result<ActionResponse, ApiError>;

    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadResponse, ApiError>;

    async fn get_report_preview(&self, report: ReportId) -> Result<PreviewResponse, ApiError>;

    /// Download the server-rendered PDF, returning where it was saved
    async fn download_report_pdf(&self, report: ReportId) -> Result<PathBuf, ApiError>;

    /// Read the previously persisted session, without touching the network
    fn get_current_user(&self) -> Option<CurrentUser>;
}
