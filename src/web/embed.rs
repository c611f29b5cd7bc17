//! GET /embed handler.

use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use serde::Deserialize;

use crate::embeds::{render_embed_page, thumbnail_url};

use super::router::AppState;

#[derive(Debug, Deserialize)]
pub struct EmbedParams {
    video: Option<String>,
    title: Option<String>,
    hide_thumbnail: Option<String>,
}

/// Serve the link-preview page for a cached embed record.
///
/// 400 when `video` or `title` is missing, 404 when no record matches,
/// 500 on store or render failure.
pub async fn serve_embed(
    State(state): State<AppState>,
    Query(params): Query<EmbedParams>,
    headers: HeaderMap,
) -> Response {
    if let Some(user_agent) = headers.get(header::USER_AGENT).and_then(|v| v.to_str().ok()) {
        tracing::debug!("User Agent: {}", user_agent);
    }

    let video = params.video.as_deref().unwrap_or("");
    let title = params.title.as_deref().unwrap_or("");
    if video.is_empty() || title.is_empty() {
        return (StatusCode::BAD_REQUEST, "Missing required parameters").into_response();
    }

    let hide = params.hide_thumbnail.as_deref() == Some("true");

    let record = match state.store.find(video, title) {
        Ok(Some(record)) => record,
        Ok(None) => return (StatusCode::NOT_FOUND, "Embed not found").into_response(),
        Err(e) => {
            tracing::error!("Embed lookup failed for ({}, {}): {}", video, title, e);
            return (StatusCode::INTERNAL_SERVER_ERROR, "Store error").into_response();
        }
    };

    let thumbnail = thumbnail_url(video, hide);
    match render_embed_page(&record, &thumbnail) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Embed render failed for ({}, {}): {}", video, title, e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Render error").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::EmbedStore;
    use axum::body::to_bytes;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn state_with_store() -> (TempDir, AppState) {
        let dir = TempDir::new().unwrap();
        let store = EmbedStore::new(dir.path().join("embeds.db"));
        let state = AppState {
            store: Arc::new(store),
        };
        (dir, state)
    }

    fn params(video: Option<&str>, title: Option<&str>, hide: Option<&str>) -> Query<EmbedParams> {
        Query(EmbedParams {
            video: video.map(String::from),
            title: title.map(String::from),
            hide_thumbnail: hide.map(String::from),
        })
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_params_is_400() {
        let (_dir, state) = state_with_store();

        let response = serve_embed(
            State(state.clone()),
            params(None, Some("title"), None),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = serve_embed(
            State(state),
            params(Some("dQw4w9WgXcQ"), None, None),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_record_is_404() {
        let (_dir, state) = state_with_store();

        let response = serve_embed(
            State(state),
            params(Some("dQw4w9WgXcQ"), Some("ghost"), None),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_renders_cached_record() {
        let (_dir, state) = state_with_store();
        state
            .store
            .get_or_create("dQw4w9WgXcQ", "cat video", "https://youtu.be/dQw4w9WgXcQ")
            .unwrap();

        let response = serve_embed(
            State(state.clone()),
            params(Some("dQw4w9WgXcQ"), Some("cat video"), None),
            HeaderMap::new(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let html = body_text(response).await;
        assert!(html.contains("img.youtube.com/vi/dQw4w9WgXcQ"));
        assert!(html.contains("cat video"));

        // hide_thumbnail=true swaps in the placeholder.
        let response = serve_embed(
            State(state),
            params(Some("dQw4w9WgXcQ"), Some("cat video"), Some("true")),
            HeaderMap::new(),
        )
        .await;
        let html = body_text(response).await;
        assert!(!html.contains("img.youtube.com"));
        assert!(html.contains("dummyimage.com"));
    }
}
