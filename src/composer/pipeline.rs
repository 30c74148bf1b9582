//! Two-stage publish: optional image upload, then post creation.
//!
//! Stage 2 always runs. Stage 1 only contributes a URL when the backend
//! explicitly reports success and returns one.

use tracing::{debug, error, info, warn};

use super::Submission;
use crate::api::{ApiError, SocialApi};
use crate::models::{ActionResponse, ImageUpload, PostPayload};

/// What the pipeline sent and what the backend answered
#[derive(Debug)]
pub struct PublishResult {
    pub payload: PostPayload,
    pub image_url: Option<String>,
    pub outcome: Result<ActionResponse, ApiError>,
}

/// Append the uploaded image as a trailing line of the post body
pub fn compose_body(text: &str, image_url: Option<&str>) -> String {
    match image_url {
        Some(url) => format!("{}\n\n[Imagen: {}]", text, url),
        None => text.to_string(),
    }
}

/// Stage 1: upload the image; every failure collapses to None
pub async fn upload_stage(api: &dyn SocialApi, image: Option<&ImageUpload>) -> Option<String> {
    let image = image?;
    match api.upload_image(image).await {
        Ok(response) if response.success => match response.url {
            Some(url) => {
                debug!("Uploaded {} to {}", image.file_name, url);
                Some(url)
            }
            None => {
                warn!("Upload of {} succeeded without a URL, posting without image", image.file_name);
                None
            }
        },
        Ok(_) => {
            warn!("Upload of {} was rejected, posting without image", image.file_name);
            None
        }
        Err(e) => {
            warn!("Upload of {} failed, posting without image: {}", image.file_name, e);
            None
        }
    }
}

/// Stage 2: create the post with whatever stage 1 produced
pub async fn create_stage(
    api: &dyn SocialApi,
    submission: &Submission,
    image_url: Option<String>,
) -> PublishResult {
    let payload = PostPayload {
        texto: compose_body(&submission.text, image_url.as_deref()),
        visibilidad: submission.visibility,
    };

    let outcome = api.create_post(&payload).await;
    match &outcome {
        Ok(response) if response.success => info!("Post created ({})", payload.visibilidad),
        Ok(response) => warn!("Post rejected: {:?}", response.error),
        Err(e) => error!("Post creation failed: {}", e),
    }

    PublishResult { payload, image_url, outcome }
}

pub async fn publish(api: &dyn SocialApi, submission: &Submission) -> PublishResult {
    let image_url = upload_stage(api, submission.image.as_ref()).await;
    create_stage(api, submission, image_url).await
}
