use async_trait::async_trait;
use chrono::Utc;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION},
    multipart::{Form, Part},
    Client, RequestBuilder, Response,
};
use serde::de::DeserializeOwned;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

use super::{ApiError, SessionStore, SocialApi};
use crate::models::{
    ActionResponse, Config, CurrentUser, ImageUpload, LoginResponse, PostPayload,
    PreviewResponse, Session, UploadResponse,
};
use crate::reports::ReportId;

/// HTTP implementation of the backend API
pub struct HttpApiClient {
    client: Client,
    base_url: Url,
    session: SessionStore,
    download_dir: PathBuf,
}

impl HttpApiClient {
    /// Create a new client from configuration
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("uni-social/0.1")
            .build()?;

        Ok(Self {
            client,
            base_url: config.api_base_url.clone(),
            session: SessionStore::new(&config.session_path),
            download_dir: config.download_dir.clone(),
        })
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Forget the persisted session
    pub fn logout(&self) -> Result<(), ApiError> {
        self.session.clear()?;
        info!("Logged out");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path)?)
    }

    fn bearer_headers(token: &str) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        let value = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|e| ApiError::Session(format!("unusable token: {}", e)))?;
        headers.insert(AUTHORIZATION, value);
        Ok(headers)
    }

    /// Attach the session token, failing when there is none
    fn authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        let token = self.session.token().ok_or(ApiError::NotAuthenticated)?;
        Ok(builder.headers(Self::bearer_headers(&token)?))
    }

    /// Attach the session token when one exists
    fn maybe_authorized(&self, builder: RequestBuilder) -> Result<RequestBuilder, ApiError> {
        match self.session.token() {
            Some(token) => Ok(builder.headers(Self::bearer_headers(&token)?)),
            None => Ok(builder),
        }
    }

    /// Decode a JSON envelope, turning error statuses into typed errors
    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // The backend answers most rejections with the usual envelope
            if let Ok(envelope) = serde_json::from_str::<ActionResponse>(&body) {
                if let Some(message) = envelope.error {
                    return Err(ApiError::Business(message));
                }
            }
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        debug!("API response received: {} bytes", body.len());
        serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn pdf_path(&self, report: ReportId) -> PathBuf {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        self.download_dir
            .join(format!("{}-{}.pdf", report.as_str(), stamp))
    }
}

#[async_trait]
impl SocialApi for HttpApiClient {
    async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, ApiError> {
        let url = self.endpoint("auth/login")?;
        debug!("Making request to: {}", url);

        let response = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()
            .await?;

        let login: LoginResponse = Self::read_json(response).await?;

        if login.success {
            let session = Session {
                token: login.token.clone(),
                user: login.user.clone(),
                logged_in_at: Utc::now(),
            };
            self.session.save(&session)?;
            info!("Logged in as {}", email);
        }

        Ok(login)
    }

    async fn create_post(&self, payload: &PostPayload) -> Result<ActionResponse, ApiError> {
        let url = self.endpoint("posts")?;
        debug!("Making request to: {}", url);

        let request = self.authorized(self.client.post(url))?.json(payload);
        let response = request.send().await?;

        Self::read_json(response).await
    }

    async fn upload_image(&self, image: &ImageUpload) -> Result<UploadResponse, ApiError> {
        let url = self.endpoint("uploads/image")?;
        debug!("Uploading {} ({} bytes) to {}", image.file_name, image.bytes.len(), url);

        let part = Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.mime_type)?;
        let form = Form::new().part("image", part);

        let response = self
            .authorized(self.client.post(url))?
            .multipart(form)
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn get_report_preview(&self, report: ReportId) -> Result<PreviewResponse, ApiError> {
        let url = self.endpoint(&format!("reports/{}/preview", report.as_str()))?;
        debug!("Making request to: {}", url);

        let response = self
            .maybe_authorized(self.client.get(url))?
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let preview: PreviewResponse = Self::read_json(response).await?;
        debug!("Retrieved {} rows for report {}", preview.data.len(), report.as_str());
        Ok(preview)
    }

    async fn download_report_pdf(&self, report: ReportId) -> Result<PathBuf, ApiError> {
        let url = self.endpoint(&format!("reports/{}/pdf", report.as_str()))?;
        debug!("Making request to: {}", url);

        let response = self
            .maybe_authorized(self.client.get(url))?
            .header(ACCEPT, "application/pdf")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await?;
            error!("PDF export for {} failed with status {}", report.as_str(), status);
            return Err(ApiError::Status { status: status.as_u16(), body });
        }

        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(&self.download_dir).await?;
        let path = self.pdf_path(report);
        tokio::fs::write(&path, &bytes).await?;

        info!("Saved {} report PDF ({} bytes) to {}", report.as_str(), bytes.len(), path.display());
        Ok(path)
    }

    fn get_current_user(&self) -> Option<CurrentUser> {
        self.session.current_user()
    }
}
