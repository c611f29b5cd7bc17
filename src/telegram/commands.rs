//! Bot command handlers.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use url::Url;

use crate::clock::{convert, current_time_in, normalize, CanonicalTime, TimeZoneRegistry};
use crate::config::WebConfig;
use crate::embeds::EmbedStore;
use crate::error::{Error, Result};
use crate::video::extract_video_id;

use super::deferred::run_deferred;
use super::responder::ChatResponder;

pub const SPOILLESS_USAGE: &str =
    "Usage: /spoilless <youtube url> | <custom title> [| hide]";
pub const SPOILLESS_ACK_TEXT: &str = "Preparing your spoilless link...";
pub const INVALID_URL_TEXT: &str = "Invalid YouTube URL";
pub const TIME_FORMAT_GUIDANCE: &str = "Please use one of the following formats: \
HH:MM (24-hour), HH:MM AM (HH:MM am), or HH:MM PM (HH:MM pm).";

/// Build the /help reply, listing the configured locations.
pub fn help_text(registry: &TimeZoneRegistry) -> String {
    let locations = registry.labels().collect::<Vec<_>>().join(", ");
    format!(
        "ConcealBot Commands:\n\n\
         /timediff <location> [time] - Convert a time into every other configured timezone\n\
         /spoilless <url> | <title> [| hide] - Spoiler-free YouTube link with a custom title\n\
         /help - Show this help\n\n\
         Locations: {}\n\
         Time formats: HH:MM (24-hour), HH:MM AM, HH:MM PM. \
         Omit the time to use the current time at the location.",
        locations
    )
}

/// Handle /timediff. User-input errors are turned into visible replies;
/// only infrastructure errors propagate.
pub async fn cmd_timediff(
    responder: &dyn ChatResponder,
    registry: &TimeZoneRegistry,
    args: &str,
) -> Result<()> {
    let Some((label, time_text)) = registry.match_label_prefix(args) else {
        let options = registry.labels().collect::<Vec<_>>().join(", ");
        responder
            .send(&format!("Invalid location. Please use one of: {}", options))
            .await?;
        return Ok(());
    };

    let time = if time_text.is_empty() {
        current_time_in(label, registry)?
    } else {
        match normalize(time_text) {
            Ok(time) => time,
            Err(Error::TimeFormat { raw }) => {
                responder
                    .send(&format!("Invalid time format: {}. {}", raw, TIME_FORMAT_GUIDANCE))
                    .await?;
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    };

    let reply = match build_timediff_reply(time, label, registry) {
        Ok(reply) => reply,
        Err(Error::NonexistentLocalTime { label, time }) => {
            responder
                .send(&format!(
                    "{} does not exist in {} today; a daylight saving change skips it. \
                     Try a time outside the transition hour.",
                    time, label
                ))
                .await?;
            return Ok(());
        }
        Err(e) => return Err(e),
    };
    responder.send(&reply).await?;
    Ok(())
}

/// One line per target zone, newline-joined, trailing blank line.
pub fn build_timediff_reply(
    time: CanonicalTime,
    source_label: &str,
    registry: &TimeZoneRegistry,
) -> Result<String> {
    let conversions = convert(time, source_label, registry)?;

    let mut lines = Vec::with_capacity(conversions.len() + 2);
    lines.push(format!(
        "If {} is the time in {}, then:",
        time.format_12h(),
        source_label
    ));
    for (label, target_time) in conversions {
        lines.push(format!(
            "- {} would be the time in {}",
            target_time.format_12h(),
            label
        ));
    }
    lines.push(String::new());

    Ok(lines.join("\n"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpoillessArgs {
    pub url: String,
    pub title: String,
    pub hide_thumbnail: bool,
}

/// Parse "<url> | <title> [| hide]". Returns None on any shape violation.
pub fn parse_spoilless_args(args: &str) -> Option<SpoillessArgs> {
    let mut parts = args.split('|').map(str::trim);

    let url = parts.next().filter(|s| !s.is_empty())?;
    let title = parts.next().filter(|s| !s.is_empty())?;
    let hide_thumbnail = match parts.next() {
        None => false,
        Some(flag) if flag.eq_ignore_ascii_case("hide") => true,
        Some(_) => return None,
    };
    if parts.next().is_some() {
        return None;
    }

    Some(SpoillessArgs {
        url: url.to_string(),
        title: title.to_string(),
        hide_thumbnail,
    })
}

/// Handle /spoilless with the deferred ack->edit protocol.
///
/// Returns None when the invocation was rejected during validation (no
/// acknowledgment sent), or the background task handle after a successful
/// acknowledgment.
pub async fn cmd_spoilless(
    responder: Arc<dyn ChatResponder>,
    store: EmbedStore,
    web: WebConfig,
    shutdown: watch::Receiver<bool>,
    args: &str,
) -> Result<Option<JoinHandle<()>>> {
    // Validating: runs in the calling turn; a rejection never acknowledges.
    let Some(parsed) = parse_spoilless_args(args) else {
        responder.send(SPOILLESS_USAGE).await?;
        return Ok(None);
    };
    let video_id = match extract_video_id(&parsed.url) {
        Ok(id) => id,
        Err(Error::UrlParse(_)) | Err(Error::InvalidVideoUrl(_)) => {
            responder.send(INVALID_URL_TEXT).await?;
            return Ok(None);
        }
        Err(e) => return Err(e),
    };

    let work = async move {
        let record = store.get_or_create(&video_id, &parsed.title, &parsed.url)?;
        tracing::info!(
            video_id = %record.video_id,
            title = %record.custom_title,
            "Embed record ready"
        );
        build_embed_link(
            &web,
            &record.video_id,
            &record.custom_title,
            parsed.hide_thumbnail,
        )
    };

    let handle = run_deferred(responder, SPOILLESS_ACK_TEXT, shutdown, work).await?;
    Ok(Some(handle))
}

/// Construct the public /embed link with encoded query parameters.
pub fn build_embed_link(
    web: &WebConfig,
    video_id: &str,
    title: &str,
    hide_thumbnail: bool,
) -> Result<String> {
    let mut link = Url::parse(&format!("http://{}", web.hostname))
        .map_err(|e| Error::Web(format!("invalid hostname '{}': {}", web.hostname, e)))?;
    if web.port != 80 {
        link.set_port(Some(web.port))
            .map_err(|_| Error::Web(format!("invalid port {}", web.port)))?;
    }
    link.set_path("/embed");
    {
        let mut pairs = link.query_pairs_mut();
        pairs.append_pair("video", video_id);
        pairs.append_pair("title", title);
        if hide_thumbnail {
            pairs.append_pair("hide_thumbnail", "true");
        }
    }

    Ok(link.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TimezoneEntry;
    use crate::telegram::responder::testing::MockResponder;
    use tempfile::TempDir;

    fn registry() -> TimeZoneRegistry {
        TimeZoneRegistry::from_entries(&[
            TimezoneEntry {
                label: "Greenwich".to_string(),
                zone: "UTC".to_string(),
            },
            TimezoneEntry {
                label: "FiveBehind".to_string(),
                zone: "Etc/GMT+5".to_string(),
            },
        ])
        .unwrap()
    }

    fn web_config() -> WebConfig {
        WebConfig {
            hostname: "example.com".to_string(),
            port: 8080,
        }
    }

    #[test]
    fn test_build_timediff_reply() {
        let time = CanonicalTime::new(21, 3).unwrap();
        let reply = build_timediff_reply(time, "Greenwich", &registry()).unwrap();

        assert_eq!(
            reply,
            "If 09:03 PM is the time in Greenwich, then:\n\
             - 04:03 PM would be the time in FiveBehind\n"
        );
    }

    #[tokio::test]
    async fn test_timediff_invalid_location() {
        let responder = MockResponder::default();
        cmd_timediff(&responder, &registry(), "Atlantis 9:30")
            .await
            .unwrap();

        assert_eq!(responder.send_count(), 1);
        assert!(responder.last_send().unwrap().contains("Invalid location"));
    }

    #[tokio::test]
    async fn test_timediff_invalid_time() {
        let responder = MockResponder::default();
        cmd_timediff(&responder, &registry(), "Greenwich 25:00")
            .await
            .unwrap();

        let reply = responder.last_send().unwrap();
        assert!(reply.contains("Invalid time format: 25:00"));
        assert!(reply.contains("24-hour"));
    }

    #[tokio::test]
    async fn test_timediff_success() {
        let responder = MockResponder::default();
        cmd_timediff(&responder, &registry(), "Greenwich 9:3pm")
            .await
            .unwrap();

        let reply = responder.last_send().unwrap();
        assert!(reply.starts_with("If 09:03 PM is the time in Greenwich"));
        assert!(reply.ends_with('\n'));
    }

    #[test]
    fn test_parse_spoilless_args() {
        let args = parse_spoilless_args("https://youtu.be/dQw4w9WgXcQ | never gonna").unwrap();
        assert_eq!(args.url, "https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(args.title, "never gonna");
        assert!(!args.hide_thumbnail);

        let args =
            parse_spoilless_args("https://youtu.be/dQw4w9WgXcQ | never gonna | hide").unwrap();
        assert!(args.hide_thumbnail);

        assert!(parse_spoilless_args("https://youtu.be/dQw4w9WgXcQ").is_none());
        assert!(parse_spoilless_args("").is_none());
        assert!(parse_spoilless_args("url | title | wat").is_none());
    }

    #[test]
    fn test_build_embed_link() {
        let link = build_embed_link(&web_config(), "dQw4w9WgXcQ", "a cat & a dog", true).unwrap();
        assert_eq!(
            link,
            "http://example.com:8080/embed?video=dQw4w9WgXcQ&title=a+cat+%26+a+dog&hide_thumbnail=true"
        );

        // Default port is elided; hide flag only present when set.
        let web = WebConfig {
            hostname: "example.com".to_string(),
            port: 80,
        };
        let link = build_embed_link(&web, "dQw4w9WgXcQ", "title", false).unwrap();
        assert_eq!(link, "http://example.com/embed?video=dQw4w9WgXcQ&title=title");
    }

    #[tokio::test]
    async fn test_spoilless_rejection_never_acknowledges() {
        let responder = Arc::new(MockResponder::default());
        let dir = TempDir::new().unwrap();
        let store = EmbedStore::new(dir.path().join("embeds.db"));
        let (_tx, rx) = tokio::sync::watch::channel(false);

        let handle = cmd_spoilless(
            responder.clone(),
            store,
            web_config(),
            rx,
            "https://vimeo.com/12345 | nope",
        )
        .await
        .unwrap();

        assert!(handle.is_none());
        assert_eq!(responder.send_count(), 1);
        assert_eq!(responder.last_send().unwrap(), INVALID_URL_TEXT);
        assert_eq!(responder.edit_count(), 0);
    }

    #[tokio::test]
    async fn test_spoilless_unextractable_watch_url_rejected_before_ack() {
        // A youtube.com URL without a v parameter has no extractable id; it
        // must be refused during validation, never acknowledged and never
        // handed to the background task.
        let responder = Arc::new(MockResponder::default());
        let dir = TempDir::new().unwrap();
        let store = EmbedStore::new(dir.path().join("embeds.db"));
        let (_tx, rx) = tokio::sync::watch::channel(false);

        let handle = cmd_spoilless(
            responder.clone(),
            store.clone(),
            web_config(),
            rx,
            "https://www.youtube.com/watch?list=PL123 | some title",
        )
        .await
        .unwrap();

        assert!(handle.is_none());
        assert_eq!(responder.send_count(), 1);
        assert_eq!(responder.last_send().unwrap(), INVALID_URL_TEXT);
        assert_eq!(responder.edit_count(), 0);
        assert_eq!(store.count().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_spoilless_success_flow() {
        let responder = Arc::new(MockResponder::default());
        let dir = TempDir::new().unwrap();
        let store = EmbedStore::new(dir.path().join("embeds.db"));
        let (_tx, rx) = tokio::sync::watch::channel(false);

        let handle = cmd_spoilless(
            responder.clone(),
            store.clone(),
            web_config(),
            rx,
            "https://youtu.be/dQw4w9WgXcQ | mystery video | hide",
        )
        .await
        .unwrap()
        .expect("acknowledged");
        handle.await.unwrap();

        // Exactly one ack, exactly one edit carrying the final link.
        assert_eq!(responder.send_count(), 1);
        assert_eq!(responder.last_send().unwrap(), SPOILLESS_ACK_TEXT);
        assert_eq!(responder.edit_count(), 1);
        let (_, link) = responder.last_edit().unwrap();
        assert_eq!(
            link,
            "http://example.com:8080/embed?video=dQw4w9WgXcQ&title=mystery+video&hide_thumbnail=true"
        );

        // The record was persisted.
        assert!(store.find("dQw4w9WgXcQ", "mystery video").unwrap().is_some());
    }
}
