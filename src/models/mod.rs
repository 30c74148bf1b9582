use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use url::Url;

/// Audience scope attached to a post
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    #[serde(rename = "Público")]
    Public,
    #[serde(rename = "Solo Conexiones")]
    ConnectionsOnly,
    #[serde(rename = "Privado")]
    Private,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [
        Visibility::Public,
        Visibility::ConnectionsOnly,
        Visibility::Private,
    ];

    /// Wire value accepted by the backend
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "Público",
            Visibility::ConnectionsOnly => "Solo Conexiones",
            Visibility::Private => "Privado",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Visibility::Public => Visibility::ConnectionsOnly,
            Visibility::ConnectionsOnly => Visibility::Private,
            Visibility::Private => Visibility::Public,
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Visibility {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "público" | "publico" | "public" => Ok(Visibility::Public),
            "solo conexiones" | "conexiones" | "connections" => Ok(Visibility::ConnectionsOnly),
            "privado" | "private" => Ok(Visibility::Private),
            other => Err(format!(
                "unknown visibility '{}' (expected publico, conexiones or privado)",
                other
            )),
        }
    }
}

/// Payload sent to create a post
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PostPayload {
    pub texto: String,
    pub visibilidad: Visibility,
}

/// Logged-in user as stored in the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CurrentUser {
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub foto: Option<String>,
}

impl CurrentUser {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("Usuario")
    }
}

/// Persisted session state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: Option<String>,
    pub user: Option<CurrentUser>,
    pub logged_in_at: DateTime<Utc>,
}

/// Response of `POST auth/login`
#[derive(Debug, Clone, Deserialize, Default)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default, alias = "usuario")]
    pub user: Option<CurrentUser>,
}

/// Generic `{ success, error? }` envelope
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ActionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Response of the image upload endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
}

/// Response of the report preview endpoint
#[derive(Debug, Clone, Deserialize, Default)]
pub struct PreviewResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub data: Vec<serde_json::Map<String, serde_json::Value>>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Failure envelopes may carry `"data": null`
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Image file selected for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: Url,
    pub session_path: PathBuf,
    pub download_dir: PathBuf,
    pub log_file: PathBuf,
    pub request_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let base = std::env::var("UNI_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:8000/api/".to_string());

        Ok(Config {
            api_base_url: Self::parse_base_url(&base)?,
            session_path: std::env::var("UNI_SESSION_PATH")
                .unwrap_or_else(|_| "uni_session.json".to_string())
                .into(),
            download_dir: std::env::var("UNI_DOWNLOAD_DIR")
                .unwrap_or_else(|_| ".".to_string())
                .into(),
            log_file: std::env::var("UNI_LOG_FILE")
                .unwrap_or_else(|_| "uni-social.log".to_string())
                .into(),
            request_timeout_secs: std::env::var("UNI_REQUEST_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    /// Parse a base URL, forcing a trailing slash so relative joins keep the path prefix
    pub fn parse_base_url(raw: &str) -> anyhow::Result<Url> {
        let mut normalized = raw.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        Url::parse(&normalized)
            .map_err(|e| anyhow::anyhow!("invalid API base URL '{}': {}", raw, e))
    }
}
