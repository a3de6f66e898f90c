pub mod activity;
pub mod admin_contacts;
pub mod agenda;
pub mod artworks;
pub mod auth;
pub mod budgets;
pub mod checkout;
pub mod contact;
pub mod digital_art;
pub mod finances;
pub mod newsletter;
pub mod notes;
pub mod orders;
pub mod payments;
pub mod site_info;
pub mod stats;
pub mod tasks;
pub mod upload;
pub mod users;

use axum::http::HeaderMap;

use crate::error::AppResult;
use crate::integrations::cloudinary::{ResourceKind, UploadedAsset};
use crate::multipart::UploadedFile;
use crate::state::AppState;

/// Client address from `x-forwarded-for` (first hop) or `x-real-ip`.
pub(crate) fn client_ip(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(axum::http::header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Validate and upload an image file into `folder`.
pub(crate) async fn upload_image(
    state: &AppState,
    file: UploadedFile,
    folder: &str,
) -> AppResult<UploadedAsset> {
    galeria_core::media::validate_image_filename(&file.filename)
        .map_err(crate::error::AppError::validation)?;
    let media = state.media()?;
    let asset = media
        .upload(file.bytes, &file.filename, folder, ResourceKind::Image)
        .await?;
    tracing::info!(public_id = %asset.public_id, folder, "Image uploaded");
    Ok(asset)
}

/// Best-effort deletion of a hosted asset. Failures are logged, never
/// surfaced, so the owning row can still be updated or removed.
pub(crate) async fn destroy_asset(state: &AppState, public_id: &str, kind: ResourceKind) {
    let Some(media) = state.media.as_ref() else {
        tracing::warn!(public_id, "Image hosting not configured; asset left in place");
        return;
    };
    if let Err(e) = media.destroy(public_id, kind).await {
        tracing::warn!(public_id, error = %e, "Failed to delete hosted asset");
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn client_ip_prefers_first_forwarded_hop() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", HeaderValue::from_static("203.0.113.7, 10.0.0.1"));
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("203.0.113.7"));
    }

    #[test]
    fn client_ip_falls_back_to_real_ip() {
        let mut headers = HeaderMap::new();
        headers.insert("x-real-ip", HeaderValue::from_static("10.0.0.9"));
        assert_eq!(client_ip(&headers).as_deref(), Some("10.0.0.9"));
        assert_eq!(client_ip(&HeaderMap::new()), None);
    }
}
