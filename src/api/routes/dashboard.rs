//! Dashboard Routes
//!
//! The HTML page.
//!
//! - GET / - Upload form
//! - POST / - Multipart upload (field `file`), renders the dashboard

use axum::{
    body::Bytes,
    extract::{multipart::MultipartError, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::routes::forecast::render_upload;
use crate::api::state::AppState;
use crate::dashboard::page::{render_dashboard_page, render_upload_page, NoticeKind};
use crate::dataset::{check_size, DatasetError};

/// Name of the multipart field carrying the CSV
pub const FILE_FIELD: &str = "file";

/// GET /
pub async fn index() -> Html<String> {
    Html(render_upload_page(None))
}

/// POST /
///
/// Errors are rendered into the page rather than returned as JSON.
pub async fn upload(State(state): State<Arc<AppState>>, multipart: Multipart) -> Response {
    let result = async {
        let (file_name, bytes) =
            read_file_field(multipart, state.config.max_upload_bytes).await?;
        tracing::info!(file = ?file_name, bytes = bytes.len(), "Upload received");
        render_upload(&state, bytes).await
    }
    .await;

    match result {
        Ok(dashboard) => Html(render_dashboard_page(&dashboard, true)).into_response(),
        Err(err) => {
            let (status, _) = err.status_and_code();
            err.log();
            let page = render_upload_page(Some((NoticeKind::Error, &err.to_string())));
            (status, Html(page)).into_response()
        }
    }
}

/// Pull the CSV out of the multipart body, stopping once it passes `limit`
async fn read_file_field(
    mut multipart: Multipart,
    limit: usize,
) -> ApiResult<(Option<String>, Bytes)> {
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, limit))?
        {
            bytes.extend_from_slice(&chunk);
            check_size(bytes.len(), limit)?;
        }
        return Ok((file_name, Bytes::from(bytes)));
    }

    Err(ApiError::BadRequest(format!(
        "upload has no '{}' field",
        FILE_FIELD
    )))
}

/// A body cut off by the size limit is an oversized upload, not a bad request
fn multipart_error(err: MultipartError, limit: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        DatasetError::TooLarge {
            size: limit.saturating_add(1),
            limit,
        }
        .into()
    } else {
        ApiError::BadRequest(err.body_text())
    }
}
