use std::path::PathBuf;
use tracing::{error, info, warn};

use super::{ReportId, ReportRow, ReportSpec, ReportSummary};
use crate::api::{ApiError, SocialApi};
use crate::models::PreviewResponse;

const DEFAULT_LOAD_ERROR: &str = "No se pudo cargar el reporte.";

/// Preview lifecycle of a report viewer
#[derive(Debug, Clone, PartialEq)]
pub enum ReportState {
    Loading,
    Loaded(Vec<ReportRow>),
    Failed(String),
}

/// Blocking notification the host must acknowledge
#[derive(Debug, Clone, PartialEq)]
pub struct Alert {
    pub title: String,
    pub message: String,
}

/// Result of a PDF export request
#[derive(Debug, Clone, PartialEq)]
pub enum DownloadOutcome {
    /// A download was already running
    Skipped,
    Saved(PathBuf),
    Failed(Alert),
}

/// Generic "load preview, summarize, export PDF" widget
#[derive(Debug, Clone)]
pub struct ReportViewer {
    spec: ReportSpec,
    state: ReportState,
    fetch_in_flight: bool,
    downloading: bool,
    last_download: Option<PathBuf>,
}

impl ReportViewer {
    pub fn new(spec: ReportSpec) -> Self {
        Self {
            spec,
            state: ReportState::Loading,
            fetch_in_flight: false,
            downloading: false,
            last_download: None,
        }
    }

    pub fn for_report(id: ReportId) -> Self {
        Self::new(id.spec())
    }

    pub fn spec(&self) -> &ReportSpec {
        &self.spec
    }

    pub fn id(&self) -> ReportId {
        self.spec.id
    }

    pub fn state(&self) -> &ReportState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ReportState::Loading)
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ReportState::Failed(message) => Some(message),
            _ => None,
        }
    }

    /// Rows currently displayed, empty unless loaded
    pub fn rows(&self) -> &[ReportRow] {
        match &self.state {
            ReportState::Loaded(rows) => rows,
            _ => &[],
        }
    }

    /// Summary of the current rows; nothing is computed while loading or failed
    pub fn summary(&self) -> Option<ReportSummary> {
        match &self.state {
            ReportState::Loaded(rows) => Some(self.spec.summarize(rows)),
            _ => None,
        }
    }

    pub fn is_downloading(&self) -> bool {
        self.downloading
    }

    pub fn last_download(&self) -> Option<&PathBuf> {
        self.last_download.as_ref()
    }

    /// Mark a preview fetch as dispatched; None when one is already running
    pub fn begin_load(&mut self) -> Option<ReportId> {
        if self.fetch_in_flight {
            return None;
        }
        self.fetch_in_flight = true;
        self.state = ReportState::Loading;
        Some(self.spec.id)
    }

    /// Apply the preview response
    pub fn finish_load(&mut self, result: Result<PreviewResponse, ApiError>) {
        self.fetch_in_flight = false;
        self.state = match result {
            Ok(response) if response.success => {
                let rows: Vec<ReportRow> = response.data.into_iter().map(ReportRow::from).collect();
                info!("Loaded {} rows for report {}", rows.len(), self.spec.id);
                ReportState::Loaded(rows)
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| DEFAULT_LOAD_ERROR.to_string());
                warn!("Report {} rejected: {}", self.spec.id, message);
                ReportState::Failed(message)
            }
            Err(e) => {
                error!("Failed to load report {}: {}", self.spec.id, e);
                ReportState::Failed(e.user_message())
            }
        };
    }

    /// Fetch the preview and store it
    pub async fn load(&mut self, api: &dyn SocialApi) {
        if let Some(id) = self.begin_load() {
            let result = api.get_report_preview(id).await;
            self.finish_load(result);
        }
    }

    /// Re-run the fetch after a failure; false when there is nothing to retry
    pub async fn retry(&mut self, api: &dyn SocialApi) -> bool {
        if self.error().is_none() {
            return false;
        }
        self.load(api).await;
        true
    }

    /// Mark a PDF export as dispatched; None when one is already running
    pub fn begin_download(&mut self) -> Option<ReportId> {
        if self.downloading {
            return None;
        }
        self.downloading = true;
        Some(self.spec.id)
    }

    /// Apply the export result without touching the preview
    pub fn finish_download(&mut self, result: Result<PathBuf, ApiError>) -> DownloadOutcome {
        self.downloading = false;
        match result {
            Ok(path) => {
                info!("Report {} exported to {}", self.spec.id, path.display());
                self.last_download = Some(path.clone());
                DownloadOutcome::Saved(path)
            }
            Err(e) => {
                error!("PDF export for report {} failed: {}", self.spec.id, e);
                DownloadOutcome::Failed(Alert {
                    title: "Error al descargar".to_string(),
                    message: format!("No se pudo descargar el PDF. {}", e.user_message()),
                })
            }
        }
    }

    pub async fn download_pdf(&mut self, api: &dyn SocialApi) -> DownloadOutcome {
        match self.begin_download() {
            Some(id) => {
                let result = api.download_report_pdf(id).await;
                self.finish_download(result)
            }
            None => DownloadOutcome::Skipped,
        }
    }
}
