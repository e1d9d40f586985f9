// Instagram Graph API Client
// Supports: Reels container creation, container status, publishing, permalink lookup

use crate::error::{ensure_success, VendorError};
use crate::http::{vendor_client, DEFAULT_REQUEST_TIMEOUT};
use crate::pipeline::polling::PollOutcome;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Instagram";
const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

#[derive(Clone)]
pub struct InstagramClient {
    client: Client,
    base_url: String,
}

#[derive(Serialize, Debug)]
struct CreateContainerRequest<'a> {
    media_type: &'static str,
    video_url: &'a str,
    caption: &'a str,
    access_token: &'a str,
}

#[derive(Serialize, Debug)]
struct PublishRequest<'a> {
    creation_id: &'a str,
    access_token: &'a str,
}

#[derive(Deserialize, Debug)]
struct IdResponse {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ContainerStatus {
    pub status_code: Option<String>, // "IN_PROGRESS", "FINISHED", "ERROR", "EXPIRED", "PUBLISHED"
    pub status: Option<String>,
}

impl ContainerStatus {
    pub fn outcome(self) -> PollOutcome<()> {
        match self.status_code.as_deref() {
            Some("FINISHED") | Some("PUBLISHED") => PollOutcome::Done(()),
            Some(code @ ("ERROR" | "EXPIRED")) => PollOutcome::Failed(format!(
                "container processing {}: {}",
                code.to_lowercase(),
                self.status.unwrap_or_default()
            )),
            _ => PollOutcome::Pending,
        }
    }
}

#[derive(Deserialize, Debug)]
struct PermalinkResponse {
    permalink: Option<String>,
}

impl Default for InstagramClient {
    fn default() -> Self {
        Self::new()
    }
}

impl InstagramClient {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(base_url: String) -> Self {
        Self {
            client: vendor_client(DEFAULT_REQUEST_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = vendor_client(timeout);
        self
    }

    async fn post_for_id<T: Serialize>(&self, url: String, body: &T, field: &'static str) -> Result<String, VendorError> {
        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        let body: IdResponse = serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))?;
        body.id.ok_or(VendorError::MissingField { service: SERVICE, field })
    }

    /// Create a REELS media container for a publicly reachable video
    pub async fn create_reels_container(
        &self,
        user_id: &str,
        access_token: &str,
        video_url: &str,
        caption: &str,
    ) -> Result<String, VendorError> {
        let request = CreateContainerRequest {
            media_type: "REELS",
            video_url,
            caption,
            access_token,
        };
        let id = self
            .post_for_id(format!("{}/{}/media", self.base_url, user_id), &request, "container id")
            .await?;
        tracing::info!("✅ Media container created: {}", id);
        Ok(id)
    }

    pub async fn get_container_status(
        &self,
        container_id: &str,
        access_token: &str,
    ) -> Result<ContainerStatus, VendorError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, container_id))
            .query(&[("fields", "status_code,status"), ("access_token", access_token)])
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))
    }

    /// Publish a finished container, returning the media id
    pub async fn publish(
        &self,
        user_id: &str,
        access_token: &str,
        container_id: &str,
    ) -> Result<String, VendorError> {
        let request = PublishRequest {
            creation_id: container_id,
            access_token,
        };
        self.post_for_id(
            format!("{}/{}/media_publish", self.base_url, user_id),
            &request,
            "post id",
        )
        .await
    }

    pub async fn permalink(&self, media_id: &str, access_token: &str) -> Result<String, VendorError> {
        let response = self
            .client
            .get(format!("{}/{}", self.base_url, media_id))
            .query(&[("fields", "permalink"), ("access_token", access_token)])
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        let body: PermalinkResponse = serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))?;
        body.permalink.ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "permalink",
        })
    }
}
