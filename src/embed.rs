//! Canonical embed URLs for hosted video.
//!
//! Catalog entries hold whatever link was copied from the hosting site. The
//! lightbox needs the player-embeddable form:
//!
//! | Input | Embed |
//! |-------|-------|
//! | `https://www.youtube.com/watch?v=ID` | `https://www.youtube.com/embed/ID` |
//! | `https://www.youtube.com/shorts/ID` | `https://www.youtube.com/embed/ID` |
//! | `https://youtu.be/ID` | `https://www.youtube.com/embed/ID` |
//! | `https://drive.google.com/file/d/ID/view?usp=sharing` | `https://drive.google.com/file/d/ID/preview` |
//!
//! Anything that does not parse as a URL, or parses but matches none of the
//! rules, is returned unchanged and left for the embedding player to reject.

use url::Url;

/// A recognised hosted video.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    YouTube(String),
    Drive(String),
}

impl VideoSource {
    pub fn embed_url(&self) -> String {
        match self {
            VideoSource::YouTube(id) => format!("https://www.youtube.com/embed/{id}"),
            VideoSource::Drive(id) => format!("https://drive.google.com/file/d/{id}/preview"),
        }
    }
}

/// Normalize `raw` to its embeddable form, or return it unchanged.
pub fn canonical_embed_url(raw: &str) -> String {
    match video_source(raw) {
        Some(source) => source.embed_url(),
        None => raw.to_string(),
    }
}

/// Identify the hosting service and video id behind `raw`.
pub fn video_source(raw: &str) -> Option<VideoSource> {
    let url = match Url::parse(raw.trim()) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(url = raw, %err, "video reference is not a URL, passing through");
            return None;
        }
    };
    let host = url.host_str()?.to_ascii_lowercase();
    let host = host
        .strip_prefix("www.")
        .or_else(|| host.strip_prefix("m."))
        .unwrap_or(&host);
    let segments: Vec<&str> = url
        .path_segments()
        .map(|s| s.filter(|seg| !seg.is_empty()).collect())
        .unwrap_or_default();

    match host {
        "youtu.be" => segments
            .first()
            .and_then(|id| valid_id(id))
            .map(VideoSource::YouTube),
        "youtube.com" | "youtube-nocookie.com" => {
            if let ["shorts" | "embed" | "live", id, ..] = segments.as_slice() {
                return valid_id(id).map(VideoSource::YouTube);
            }
            url.query_pairs()
                .find(|(key, _)| key == "v")
                .and_then(|(_, id)| valid_id(&id))
                .map(VideoSource::YouTube)
        }
        "drive.google.com" => match segments.as_slice() {
            ["file", "d", id, ..] => valid_id(id).map(VideoSource::Drive),
            _ => url
                .query_pairs()
                .find(|(key, _)| key == "id")
                .and_then(|(_, id)| valid_id(&id))
                .map(VideoSource::Drive),
        },
        _ => None,
    }
}

/// Video ids on both services are URL-safe base64-ish tokens.
fn valid_id(id: &str) -> Option<String> {
    let ok = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    ok.then(|| id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_domain_path() {
        assert_eq!(
            canonical_embed_url("https://youtu.be/abc123"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn short_domain_ignores_tracking_query() {
        assert_eq!(
            canonical_embed_url("https://youtu.be/abc123?si=XyZ&t=4"),
            "https://www.youtube.com/embed/abc123"
        );
    }

    #[test]
    fn watch_query_parameter() {
        assert_eq!(
            canonical_embed_url("https://www.youtube.com/watch?v=xyz789"),
            "https://www.youtube.com/embed/xyz789"
        );
        assert_eq!(
            canonical_embed_url("https://m.youtube.com/watch?feature=share&v=xyz789"),
            "https://www.youtube.com/embed/xyz789"
        );
    }

    #[test]
    fn shorts_path() {
        assert_eq!(
            canonical_embed_url("https://www.youtube.com/shorts/qq111"),
            "https://www.youtube.com/embed/qq111"
        );
        assert_eq!(
            canonical_embed_url("https://youtube.com/shorts/qq111/"),
            "https://www.youtube.com/embed/qq111"
        );
    }

    #[test]
    fn embed_url_is_idempotent() {
        let embed = "https://www.youtube.com/embed/abc123";
        assert_eq!(canonical_embed_url(embed), embed);
        assert_eq!(canonical_embed_url(&canonical_embed_url("https://youtu.be/abc123")), embed);
    }

    #[test]
    fn drive_view_link_becomes_preview() {
        assert_eq!(
            canonical_embed_url(
                "https://drive.google.com/file/d/17xch-nYc7jcwhkODy8Kxan4JFgdEpqsU/view?usp=sharing"
            ),
            "https://drive.google.com/file/d/17xch-nYc7jcwhkODy8Kxan4JFgdEpqsU/preview"
        );
    }

    #[test]
    fn drive_open_id_link() {
        assert_eq!(
            canonical_embed_url("https://drive.google.com/open?id=1abc"),
            "https://drive.google.com/file/d/1abc/preview"
        );
    }

    #[test]
    fn malformed_string_passes_through() {
        assert_eq!(canonical_embed_url("not a url"), "not a url");
        assert_eq!(canonical_embed_url(""), "");
        assert_eq!(canonical_embed_url("youtu.be/abc123"), "youtu.be/abc123");
    }

    #[test]
    fn unknown_host_passes_through() {
        let vimeo = "https://vimeo.com/123456";
        assert_eq!(canonical_embed_url(vimeo), vimeo);
        assert_eq!(video_source(vimeo), None);
    }

    #[test]
    fn youtube_without_id_passes_through() {
        let channel = "https://www.youtube.com/@someone";
        assert_eq!(canonical_embed_url(channel), channel);
        let empty = "https://youtu.be/";
        assert_eq!(canonical_embed_url(empty), empty);
    }

    #[test]
    fn suspicious_id_passes_through() {
        let raw = "https://www.youtube.com/watch?v=abc%22onload";
        assert_eq!(canonical_embed_url(raw), raw);
    }

    #[test]
    fn video_source_identifies_service() {
        assert_eq!(
            video_source("https://youtu.be/abc123"),
            Some(VideoSource::YouTube("abc123".into()))
        );
        assert_eq!(
            video_source("https://drive.google.com/file/d/XY/preview"),
            Some(VideoSource::Drive("XY".into()))
        );
    }
}
