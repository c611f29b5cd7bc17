//! HTML rendering for the embed page.

use minijinja::{context, Environment};

use super::EmbedRecord;
use crate::error::{Error, Result};

// The .html template name keeps minijinja's HTML auto-escaping active, so
// record fields are safe inside attribute values.
const EMBED_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta property="og:title" content="{{ og_title }}" />
    <meta property="og:image" content="{{ thumbnail }}" />
    <meta property="og:url" content="{{ og_url }}" />
    <meta property="og:description" content="{{ description }}" />
</head>
<body>
    <h1>Spoilless Video!</h1>
    <p>Click to watch</p>
</body>
</html>
"#;

/// Render a cached record plus a transient, per-request thumbnail URL.
pub fn render_embed_page(record: &EmbedRecord, thumbnail_url: &str) -> Result<String> {
    let mut env = Environment::new();
    env.add_template("embed.html", EMBED_TEMPLATE)
        .map_err(|e| Error::Render(format!("template parse: {}", e)))?;

    let template = env
        .get_template("embed.html")
        .map_err(|e| Error::Render(format!("template lookup: {}", e)))?;

    template
        .render(context! {
            og_title => record.og_title,
            thumbnail => thumbnail_url,
            og_url => record.og_url,
            description => record.description,
        })
        .map_err(|e| Error::Render(format!("template render: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeds::{thumbnail_url, HIDDEN_THUMBNAIL_URL};

    fn record() -> EmbedRecord {
        EmbedRecord {
            video_id: "dQw4w9WgXcQ".to_string(),
            custom_title: "cat video".to_string(),
            description: "Spoilless Video! - Click to watch on youtube".to_string(),
            og_title: "cat video".to_string(),
            og_url: "https://youtu.be/dQw4w9WgXcQ".to_string(),
            created_at: 1_700_000_000_000,
        }
    }

    #[test]
    fn test_all_fields_present() {
        let thumb = thumbnail_url("dQw4w9WgXcQ", false);
        let html = render_embed_page(&record(), &thumb).unwrap();

        assert!(html.contains(r#"og:title" content="cat video""#));
        assert!(html.contains(r#"og:image" content="https://img.youtube.com/vi/dQw4w9WgXcQ/0.jpg""#));
        assert!(html.contains(r#"og:url" content="https://youtu.be/dQw4w9WgXcQ""#));
        assert!(html.contains("og:description"));
        assert!(html.contains("Spoilless Video!"));
    }

    #[test]
    fn test_hidden_thumbnail_substituted() {
        let thumb = thumbnail_url("dQw4w9WgXcQ", true);
        let html = render_embed_page(&record(), &thumb).unwrap();

        assert!(html.contains(HIDDEN_THUMBNAIL_URL.replace('&', "&amp;").as_str()));
        assert!(!html.contains("img.youtube.com"));
    }

    #[test]
    fn test_metadata_is_escaped() {
        let mut rec = record();
        rec.og_title = r#""><script>alert(1)</script>"#.to_string();
        let html = render_embed_page(&rec, "https://example.com/t.jpg").unwrap();

        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
