use std::time::Duration;

use async_trait::async_trait;

use crate::downloader::errors::SessionError;
use crate::downloader::models::{VideoDetails, VideoId};
use crate::downloader::traits::MetadataBackend;

/// Delay before placeholder details are returned
pub const DEFAULT_FETCH_DELAY: Duration = Duration::from_millis(2500);

const PLACEHOLDER_TITLE: &str = "Rick Astley - Never Gonna Give You Up (Official Music Video)";
const PLACEHOLDER_AUTHOR: &str = "Rick Astley";
const PLACEHOLDER_DURATION: u32 = 212;

/// Fakes a metadata lookup: waits, then returns fixed details for any id
pub struct SimulatedBackend {
    delay: Duration,
}

impl SimulatedBackend {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Details for `id`. Only the id and thumbnail vary.
    pub fn placeholder(id: &VideoId) -> VideoDetails {
        VideoDetails {
            id: id.clone(),
            title: PLACEHOLDER_TITLE.to_string(),
            author: PLACEHOLDER_AUTHOR.to_string(),
            thumbnail_url: format!("https://i.ytimg.com/vi/{}/hqdefault.jpg", id),
            duration_seconds: PLACEHOLDER_DURATION,
        }
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(DEFAULT_FETCH_DELAY)
    }
}

#[async_trait]
impl MetadataBackend for SimulatedBackend {
    fn name(&self) -> &'static str {
        "simulated"
    }

    async fn get_video_info(&self, id: &VideoId) -> Result<VideoDetails, SessionError> {
        tokio::time::sleep(self.delay).await;
        Ok(Self::placeholder(id))
    }
}
