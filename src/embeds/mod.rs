//! Spoiler-free embed records and rendering.

pub mod render;
pub mod store;

pub use render::render_embed_page;
pub use store::EmbedStore;

/// Server-chosen description used for every record.
pub const EMBED_DESCRIPTION: &str = "Spoilless Video! - Click to watch on youtube";

/// Placeholder shown instead of the real thumbnail when hiding is requested.
pub const HIDDEN_THUMBNAIL_URL: &str =
    "https://dummyimage.com/1280x720/000000/ffffff.png&text=Thumbnail+Hidden+Lol";

/// A cached embed, identified by the (video_id, custom_title) pair.
/// Immutable after first insert. The thumbnail is never persisted; it is
/// recomputed per render request from the hide flag.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbedRecord {
    pub video_id: String,
    pub custom_title: String,
    pub description: String,
    pub og_title: String,
    pub og_url: String,
    pub created_at: i64,
}

/// Transient per-request thumbnail URL for a video.
pub fn thumbnail_url(video_id: &str, hide_thumbnail: bool) -> String {
    if hide_thumbnail {
        HIDDEN_THUMBNAIL_URL.to_string()
    } else {
        format!("https://img.youtube.com/vi/{}/0.jpg", video_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thumbnail_url() {
        assert_eq!(
            thumbnail_url("dQw4w9WgXcQ", false),
            "https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg"
        );
        assert_eq!(thumbnail_url("dQw4w9WgXcQ", true), HIDDEN_THUMBNAIL_URL);
    }
}
