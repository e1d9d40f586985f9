// RunwayML API Client
// Supports: image-to-video generation (gen3a_turbo)

use crate::error::{ensure_success, VendorError};
use crate::http::{vendor_client, DEFAULT_REQUEST_TIMEOUT};
use crate::pipeline::polling::PollOutcome;
use base64::prelude::*;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

const SERVICE: &str = "RunwayML";
const DEFAULT_BASE_URL: &str = "https://api.dev.runwayml.com";
const API_VERSION: &str = "2024-11-06";

#[derive(Clone)]
pub struct RunwayClient {
    api_key: String,
    client: Client,
    base_url: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ImageToVideoRequest {
    pub prompt_image: String,
    pub model: &'static str,
    pub prompt_text: String,
    pub duration: u32,
    pub ratio: &'static str,
}

#[derive(Deserialize, Debug)]
struct CreateTaskResponse {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TaskStatus {
    pub status: String, // "PENDING", "RUNNING", "SUCCEEDED", "FAILED"
    #[serde(default)]
    pub output: Vec<String>,
    pub failure: Option<String>,
}

impl TaskStatus {
    pub fn outcome(self) -> PollOutcome<String> {
        match self.status.as_str() {
            "SUCCEEDED" => match self.output.into_iter().next() {
                Some(url) => PollOutcome::Done(url),
                None => PollOutcome::Failed("no output in completed task".to_string()),
            },
            "FAILED" => PollOutcome::Failed(
                self.failure
                    .unwrap_or_else(|| "video generation failed".to_string()),
            ),
            _ => PollOutcome::Pending,
        }
    }
}

/// MIME type for the data URI, by file extension
pub fn image_mime_type(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/jpeg",
    }
}

pub fn data_uri(path: &Path, bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        image_mime_type(path),
        BASE64_STANDARD.encode(bytes)
    )
}

impl RunwayClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            api_key,
            client: vendor_client(DEFAULT_REQUEST_TIMEOUT),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = vendor_client(timeout);
        self
    }

    /// Submit an image-to-video task for a local image, returning the task id
    pub async fn image_to_video(&self, image_path: &Path, prompt: &str) -> Result<String, VendorError> {
        let bytes = tokio::fs::read(image_path).await?;
        let request = ImageToVideoRequest {
            prompt_image: data_uri(image_path, &bytes),
            model: "gen3a_turbo",
            prompt_text: prompt.to_string(),
            duration: 5,
            ratio: "1280:768",
        };

        let response = self
            .client
            .post(format!("{}/v1/image_to_video", self.base_url))
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: CreateTaskResponse = response.json().await.map_err(VendorError::http(SERVICE))?;
        let id = body.id.ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "id",
        })?;
        tracing::info!("🎬 RunwayML task created: {}", id);
        Ok(id)
    }

    pub async fn get_task(&self, task_id: &str) -> Result<TaskStatus, VendorError> {
        let response = self
            .client
            .get(format!("{}/v1/tasks/{}", self.base_url, task_id))
            .bearer_auth(&self.api_key)
            .header("X-Runway-Version", API_VERSION)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_mime_type_by_extension() {
        assert_eq!(image_mime_type(Path::new("a.PNG")), "image/png");
        assert_eq!(image_mime_type(Path::new("a.webp")), "image/webp");
        assert_eq!(image_mime_type(Path::new("a.jpg")), "image/jpeg");
        assert_eq!(image_mime_type(Path::new("noext")), "image/jpeg");
    }

    #[test]
    fn test_data_uri() {
        assert_eq!(data_uri(Path::new("x.png"), b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn test_task_outcomes() {
        let done: TaskStatus =
            serde_json::from_str(r#"{"status":"SUCCEEDED","output":["https://r/out.mp4"]}"#).unwrap();
        assert_eq!(done.outcome(), PollOutcome::Done("https://r/out.mp4".to_string()));

        let failed: TaskStatus = serde_json::from_str(r#"{"status":"FAILED","failure":"nsfw"}"#).unwrap();
        assert_eq!(failed.outcome(), PollOutcome::Failed("nsfw".to_string()));

        let running: TaskStatus = serde_json::from_str(r#"{"status":"RUNNING"}"#).unwrap();
        assert_eq!(running.outcome(), PollOutcome::Pending);
    }

    #[tokio::test]
    async fn test_image_to_video_request() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("product.png");
        std::fs::write(&image, b"png-bytes").unwrap();

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/image_to_video"))
            .and(header("X-Runway-Version", API_VERSION))
            .and(header("Authorization", "Bearer rw-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "task-9"})))
            .expect(1)
            .mount(&server)
            .await;

        let client = RunwayClient::with_base_url("rw-key".to_string(), server.uri());
        let id = client.image_to_video(&image, "slow orbit").await.unwrap();
        assert_eq!(id, "task-9");

        let requests = server.received_requests().await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
        assert_eq!(body["model"], "gen3a_turbo");
        assert_eq!(body["ratio"], "1280:768");
        assert_eq!(body["duration"], 5);
        assert_eq!(body["promptText"], "slow orbit");
        assert!(body["promptImage"].as_str().unwrap().starts_with("data:image/png;base64,"));
    }
}
