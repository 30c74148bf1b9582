use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::api::SocialApi;
use crate::host::HostNotifier;
use crate::models::{ImageUpload, Visibility};
use crate::utils::{image_mime_type, to_data_url};

pub mod pipeline;
pub use pipeline::{compose_body, publish, PublishResult};

const DEFAULT_POST_ERROR: &str = "No se pudo publicar. Intenta nuevamente.";

/// Transient post being written
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostDraft {
    pub text: String,
    pub visibility: Visibility,
    pub image: Option<ImageUpload>,
    /// Local `data:` URL preview, never uploaded
    pub preview: Option<String>,
}

impl PostDraft {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposerStatus {
    Idle,
    Submitting,
}

/// Reasons a submit never reaches the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitBlocked {
    #[error("post text is empty")]
    EmptyText,
    #[error("a submission is already in flight")]
    InFlight,
}

#[derive(Debug, Error)]
pub enum AttachError {
    #[error("unsupported image type: {0}")]
    Unsupported(String),
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),
}

/// Snapshot of the draft handed to the publish pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub text: String,
    pub visibility: Visibility,
    pub image: Option<ImageUpload>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    Posted,
    Failed(String),
}

/// Post composer widget state
#[derive(Debug, Default)]
pub struct PostComposer {
    draft: PostDraft,
    submitting: bool,
    error: Option<String>,
}

impl PostComposer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &PostDraft {
        &self.draft
    }

    pub fn status(&self) -> ComposerStatus {
        if self.submitting {
            ComposerStatus::Submitting
        } else {
            ComposerStatus::Idle
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Whether the submit action is enabled
    pub fn can_submit(&self) -> bool {
        !self.submitting && !self.draft.is_blank()
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.draft.text = text.into();
    }

    pub fn push_char(&mut self, c: char) {
        self.draft.text.push(c);
    }

    pub fn pop_char(&mut self) {
        self.draft.text.pop();
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.draft.visibility = visibility;
    }

    pub fn cycle_visibility(&mut self) {
        self.draft.visibility = self.draft.visibility.next();
    }

    /// Read an image from disk and build its local preview
    pub fn attach_image(&mut self, path: &Path) -> Result<(), AttachError> {
        let mime_type = image_mime_type(path)
            .ok_or_else(|| AttachError::Unsupported(path.display().to_string()))?;
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "imagen".to_string());

        self.draft.preview = Some(to_data_url(mime_type, &bytes));
        self.draft.image = Some(ImageUpload {
            file_name,
            mime_type: mime_type.to_string(),
            bytes,
        });
        Ok(())
    }

    pub fn remove_image(&mut self) {
        self.draft.image = None;
        self.draft.preview = None;
    }

    /// Validate and lock the composer, returning what to publish
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitBlocked> {
        if self.submitting {
            return Err(SubmitBlocked::InFlight);
        }
        if self.draft.is_blank() {
            return Err(SubmitBlocked::EmptyText);
        }

        self.submitting = true;
        self.error = None;
        Ok(Submission {
            text: self.draft.text.clone(),
            visibility: self.draft.visibility,
            image: self.draft.image.clone(),
        })
    }

    /// Apply the pipeline result: clear on success, keep the draft on failure
    pub fn finish_submit(&mut self, result: PublishResult, notifier: &dyn HostNotifier) -> SubmitOutcome {
        self.submitting = false;
        match result.outcome {
            Ok(response) if response.success => {
                self.draft = PostDraft::default();
                self.error = None;
                notifier.on_post_created();
                SubmitOutcome::Posted
            }
            Ok(response) => {
                let message = response.error.unwrap_or_else(|| DEFAULT_POST_ERROR.to_string());
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
            Err(e) => {
                let message = e.user_message();
                self.error = Some(message.clone());
                SubmitOutcome::Failed(message)
            }
        }
    }

    pub async fn submit(
        &mut self,
        api: &dyn SocialApi,
        notifier: &dyn HostNotifier,
    ) -> Result<SubmitOutcome, SubmitBlocked> {
        let submission = self.begin_submit()?;
        info!("Publishing post ({} chars, image: {})", submission.text.len(), submission.image.is_some());
        let result = publish(api, &submission).await;
        Ok(self.finish_submit(result, notifier))
    }
}
