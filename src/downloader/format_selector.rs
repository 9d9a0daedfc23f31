// FormatSelector - quality catalog and size estimation
//
// Static quality presets per output format plus the approximate output
// size shown next to the download button. The numbers are placeholders:
// bitrate for audio, a fixed Mbps table for video.

use serde::Serialize;

use super::models::Format;

/// Quality option for UI display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityOption {
    /// Display label (e.g., "192 kbps", "4K")
    pub label: &'static str,

    /// Value for selection (e.g., "192", "4k")
    pub value: &'static str,
}

const AUDIO_QUALITIES: [QualityOption; 3] = [
    QualityOption { label: "128 kbps", value: "128" },
    QualityOption { label: "192 kbps", value: "192" },
    QualityOption { label: "320 kbps", value: "320" },
];

const VIDEO_QUALITIES: [QualityOption; 4] = [
    QualityOption { label: "480p", value: "480p" },
    QualityOption { label: "720p", value: "720p" },
    QualityOption { label: "1080p", value: "1080p" },
    QualityOption { label: "4K", value: "4k" },
];

/// Index of the preselected option in every list
const DEFAULT_INDEX: usize = 1;

/// Mbps used when a video quality is not in the table
const FALLBACK_VIDEO_MBPS: f64 = 2.5;

/// Static format -> quality options mapping
pub struct QualityCatalog;

impl QualityCatalog {
    /// Ordered options for a format
    pub fn options(format: Format) -> &'static [QualityOption] {
        match format {
            Format::Audio => &AUDIO_QUALITIES,
            Format::Video => &VIDEO_QUALITIES,
        }
    }

    /// Preselected option (second in each list)
    pub fn default_option(format: Format) -> QualityOption {
        Self::options(format)[DEFAULT_INDEX]
    }

    pub fn contains(format: Format, value: &str) -> bool {
        Self::options(format).iter().any(|o| o.value == value)
    }
}

/// Approximate output size
pub struct SizeEstimator;

impl SizeEstimator {
    /// Size in MB, or `None` when the trimmed length is zero or the audio
    /// bitrate cannot be read from the quality value
    pub fn estimate(format: Format, quality: &str, trim_seconds: u32) -> Option<f64> {
        if trim_seconds == 0 {
            return None;
        }
        let seconds = trim_seconds as f64;

        let size_mb = match format {
            Format::Audio => {
                let kbps = Self::parse_bitrate(quality)?;
                seconds * kbps * 1000.0 / 8.0 / 1024.0 / 1024.0
            }
            Format::Video => seconds * Self::video_mbps(quality) / 8.0,
        };

        (size_mb > 0.0).then_some(size_mb)
    }

    /// Estimate rendered as "4.6 MB"
    pub fn estimate_label(format: Format, quality: &str, trim_seconds: u32) -> Option<String> {
        Self::format_size(Self::estimate(format, quality, trim_seconds))
    }

    /// Format size for display
    pub fn format_size(size_mb: Option<f64>) -> Option<String> {
        size_mb.map(|mb| format!("{:.1} MB", mb))
    }

    fn video_mbps(quality: &str) -> f64 {
        match quality {
            "480p" => 1.5,
            "720p" => 2.5,
            "1080p" => 5.0,
            "4k" => 15.0,
            _ => FALLBACK_VIDEO_MBPS,
        }
    }

    // Leading decimal digits, so "192" and "192kbps" both read as 192
    fn parse_bitrate(quality: &str) -> Option<f64> {
        let digits: String = quality
            .trim_start()
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        digits.parse::<u32>().ok().map(f64::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_defaults() {
        assert_eq!(QualityCatalog::default_option(Format::Audio).value, "192");
        assert_eq!(QualityCatalog::default_option(Format::Video).value, "720p");
        assert_eq!(QualityCatalog::options(Format::Video).len(), 4);
        assert!(QualityCatalog::contains(Format::Video, "4k"));
        assert!(!QualityCatalog::contains(Format::Audio, "720p"));
        assert_eq!(QualityCatalog::options(Format::Video)[3].label, "4K");
    }

    #[test]
    fn test_audio_estimate() {
        let size = SizeEstimator::estimate(Format::Audio, "128", 60).unwrap();
        let expected = 60.0 * 128.0 * 1000.0 / 8.0 / 1024.0 / 1024.0;
        assert!((size - expected).abs() < 1e-9);
        assert!((size - 0.92).abs() < 0.01);
    }

    #[test]
    fn test_video_estimate() {
        assert_eq!(SizeEstimator::estimate(Format::Video, "1080p", 80), Some(50.0));
        assert_eq!(SizeEstimator::estimate(Format::Video, "4k", 8), Some(15.0));
        // Unknown quality falls back to 2.5 Mbps
        assert_eq!(SizeEstimator::estimate(Format::Video, "8k", 8), Some(2.5));
    }

    #[test]
    fn test_empty_estimate() {
        assert_eq!(SizeEstimator::estimate(Format::Video, "720p", 0), None);
        assert_eq!(SizeEstimator::estimate(Format::Audio, "lossless", 60), None);
        assert_eq!(SizeEstimator::estimate_label(Format::Audio, "128", 0), None);
    }

    #[test]
    fn test_estimate_label() {
        assert_eq!(
            SizeEstimator::estimate_label(Format::Video, "720p", 200).as_deref(),
            Some("62.5 MB")
        );
        assert_eq!(
            SizeEstimator::estimate_label(Format::Audio, "320", 212).as_deref(),
            Some("8.1 MB")
        );
    }
}
