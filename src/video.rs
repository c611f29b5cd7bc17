//! YouTube URL canonicalization.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::error::{Error, Result};

fn short_id_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-zA-Z0-9_-]{11}$").expect("valid regex"))
}

/// Extract the canonical video id from a long-form (`youtube.com/watch?v=`)
/// or short-form (`youtu.be/<id>`) URL.
pub fn extract_video_id(link: &str) -> Result<String> {
    let parsed = Url::parse(link).map_err(|e| Error::UrlParse(e.to_string()))?;

    match parsed.host_str() {
        Some("youtube.com") | Some("www.youtube.com") => parsed
            .query_pairs()
            .find(|(key, _)| key == "v")
            .map(|(_, value)| value.into_owned())
            .filter(|id| !id.is_empty())
            .ok_or_else(|| Error::InvalidVideoUrl("video ID not found".to_string())),
        Some("youtu.be") => {
            let id = parsed.path().trim_matches('/');
            if short_id_re().is_match(id) {
                Ok(id.to_string())
            } else {
                Err(Error::InvalidVideoUrl("invalid video ID".to_string()))
            }
        }
        _ => Err(Error::InvalidVideoUrl(link.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_form() {
        let id = extract_video_id("https://www.youtube.com/watch?v=abc123XYZ_-").unwrap();
        assert_eq!(id, "abc123XYZ_-");

        let id = extract_video_id("https://youtube.com/watch?v=dQw4w9WgXcQ&t=42").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");
    }

    #[test]
    fn test_long_form_missing_param() {
        assert!(matches!(
            extract_video_id("https://www.youtube.com/watch?list=PL123"),
            Err(Error::InvalidVideoUrl(_))
        ));
        assert!(extract_video_id("https://www.youtube.com/watch?v=").is_err());
    }

    #[test]
    fn test_short_form() {
        let id = extract_video_id("https://youtu.be/dQw4w9WgXcQ").unwrap();
        assert_eq!(id, "dQw4w9WgXcQ");

        let id = extract_video_id("https://youtu.be/abc123XYZ_-/").unwrap();
        assert_eq!(id, "abc123XYZ_-");
    }

    #[test]
    fn test_short_form_wrong_length() {
        // 10 characters.
        assert!(matches!(
            extract_video_id("https://youtu.be/abc123XYZ_"),
            Err(Error::InvalidVideoUrl(_))
        ));
        // 12 characters.
        assert!(extract_video_id("https://youtu.be/abc123XYZ_-x").is_err());
    }

    #[test]
    fn test_unrelated_host() {
        assert!(matches!(
            extract_video_id("https://vimeo.com/12345"),
            Err(Error::InvalidVideoUrl(_))
        ));
    }

    #[test]
    fn test_malformed_url_is_distinct() {
        assert!(matches!(
            extract_video_id("not a url at all"),
            Err(Error::UrlParse(_))
        ));
    }
}
