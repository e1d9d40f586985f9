// src/social/publisher.rs
use std::path::Path;

use crate::error::VendorError;
use crate::file_host::FileHost;
use crate::instagram_client::InstagramClient;
use crate::pipeline::polling::{poll_until_terminal, PollSettings};

#[derive(Debug, Clone, PartialEq)]
pub struct PublishedPost {
    pub post_id: String,
    pub post_url: String,
}

/// Pushes a finished video to Instagram as a Reel
#[derive(Clone)]
pub struct SocialPublisher {
    file_host: FileHost,
    instagram: InstagramClient,
    poll: PollSettings,
}

pub fn fallback_post_url(post_id: &str) -> String {
    format!("https://www.instagram.com/p/{}/", post_id)
}

impl SocialPublisher {
    pub fn new(file_host: FileHost, instagram: InstagramClient, poll: PollSettings) -> Self {
        Self {
            file_host,
            instagram,
            poll,
        }
    }

    pub async fn publish(
        &self,
        video_path: &Path,
        caption: &str,
        user_id: &str,
        access_token: &str,
    ) -> Result<PublishedPost, VendorError> {
        tracing::info!("📸 Starting Instagram upload for {}", video_path.display());

        let video_url = self.file_host.upload_raw(video_path).await?;

        let container_id = self
            .instagram
            .create_reels_container(user_id, access_token, &video_url, caption)
            .await?;

        tracing::info!("⏳ Waiting for Instagram to process the video...");
        poll_until_terminal("Instagram", &self.poll, || async {
            self.instagram
                .get_container_status(&container_id, access_token)
                .await
                .map(|status| status.outcome())
        })
        .await?;

        let post_id = self
            .instagram
            .publish(user_id, access_token, &container_id)
            .await?;

        let post_url = match self.instagram.permalink(&post_id, access_token).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!("Could not fetch permalink for {}: {}", post_id, e);
                fallback_post_url(&post_id)
            }
        };

        tracing::info!("🎉 Video published to Instagram: {} ({})", post_id, post_url);
        Ok(PublishedPost { post_id, post_url })
    }
}
