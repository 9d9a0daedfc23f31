// Helper functions shared by the session and the front-end

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use regex::Regex;

use super::models::VideoId;

/// Environment override for the settings file location
pub const SETTINGS_ENV: &str = "TUBE_DOWNLOADER_SETTINGS";

lazy_static::lazy_static! {
    // Order is fixed: watch page, short domain, shorts, embed
    static ref URL_PATTERNS: [Regex; 4] = [
        Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/watch\?v=([a-zA-Z0-9_-]{11})").unwrap(),
        Regex::new(r"(?:https?://)?(?:www\.)?youtu\.be/([a-zA-Z0-9_-]{11})").unwrap(),
        Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/shorts/([a-zA-Z0-9_-]{11})").unwrap(),
        Regex::new(r"(?:https?://)?(?:www\.)?youtube\.com/embed/([a-zA-Z0-9_-]{11})").unwrap(),
    ];
}

/// Extracts the video identifier from a pasted or dropped string
pub struct UrlResolver;

impl UrlResolver {
    /// Returns the first 11-character capture, or `None` when no shape matches
    pub fn resolve(input: &str) -> Option<VideoId> {
        URL_PATTERNS.iter().find_map(|re| {
            re.captures(input)
                .and_then(|caps| caps.get(1))
                .and_then(|m| VideoId::parse(m.as_str()))
        })
    }
}

/// Format seconds as `mm:ss` (minutes may exceed 59)
pub fn format_clock(seconds: u32) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Settings file path: env override, then the platform config dir
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = std::env::var(SETTINGS_ENV) {
        if !path.trim().is_empty() {
            return PathBuf::from(path);
        }
    }

    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tube-downloader")
        .join("settings.json")
}

/// Seed for the simulation RNG when none is configured
pub fn entropy_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5eed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(s: &str) -> Option<String> {
        UrlResolver::resolve(s).map(|id| id.as_str().to_string())
    }

    #[test]
    fn test_watch_url() {
        assert_eq!(
            resolve("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            resolve("youtube.com/watch?v=dQw4w9WgXcQ&t=42s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
    }

    #[test]
    fn test_short_domain() {
        assert_eq!(resolve("https://youtu.be/dQw4w9WgXcQ").as_deref(), Some("dQw4w9WgXcQ"));
        assert_eq!(resolve("youtu.be/abc_DEF-123").as_deref(), Some("abc_DEF-123"));
    }

    #[test]
    fn test_shorts_and_embed() {
        assert_eq!(
            resolve("https://www.youtube.com/shorts/aBcDeFgHiJk").as_deref(),
            Some("aBcDeFgHiJk")
        );
        assert_eq!(
            resolve("http://youtube.com/embed/aBcDeFgHiJk?autoplay=1").as_deref(),
            Some("aBcDeFgHiJk")
        );
    }

    #[test]
    fn test_not_found() {
        assert_eq!(resolve(""), None);
        assert_eq!(resolve("not a url"), None);
        assert_eq!(resolve("https://youtu.be/short"), None);
        assert_eq!(resolve("https://vimeo.com/123456789012"), None);
        assert_eq!(resolve("https://www.youtube.com/channel/dQw4w9WgXcQ"), None);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(212), "03:32");
        assert_eq!(format_clock(3725), "62:05");
    }
}
