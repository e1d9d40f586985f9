// D-ID API Client
// Supports: image upload, talking-avatar generation ("talks")

use crate::error::{ensure_success, VendorError};
use crate::http::{vendor_client, DEFAULT_REQUEST_TIMEOUT};
use crate::pipeline::polling::PollOutcome;
use image::ImageFormat;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;
use std::time::Duration;

const SERVICE: &str = "D-ID";
const DEFAULT_BASE_URL: &str = "https://api.d-id.com";

/// Stock presenter used when the uploaded person media can't be used as a source image
pub const DEFAULT_PRESENTER_URL: &str =
    "https://create-images-results.d-id.com/api_docs/assets/noelle.jpeg";

#[derive(Clone)]
pub struct DIdClient {
    api_key: String,
    client: Client,
    base_url: String,
}

// ============================================================================
// API REQUEST/RESPONSE STRUCTURES
// ============================================================================

#[derive(Serialize, Debug)]
pub struct CreateTalkRequest {
    pub source_url: String,
    pub script: TalkScript,
    pub config: TalkConfig,
}

#[derive(Serialize, Debug)]
pub struct TalkScript {
    #[serde(rename = "type")]
    pub script_type: &'static str,
    pub input: String,
    pub provider: VoiceProvider,
}

#[derive(Serialize, Debug)]
pub struct VoiceProvider {
    #[serde(rename = "type")]
    pub provider_type: &'static str,
    pub voice_id: &'static str,
}

#[derive(Serialize, Debug)]
pub struct TalkConfig {
    pub fluent: bool,
    pub pad_audio: f32,
    pub stitch: bool,
}

#[derive(Deserialize, Debug)]
struct UploadImageResponse {
    url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CreateTalkResponse {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TalkStatus {
    pub status: String, // "created", "started", "done", "error"
    pub result_url: Option<String>,
    pub error: Option<TalkError>,
}

#[derive(Deserialize, Debug)]
pub struct TalkError {
    pub message: Option<String>,
}

impl TalkStatus {
    pub fn outcome(self) -> PollOutcome<String> {
        match self.status.as_str() {
            "done" => match self.result_url {
                Some(url) => PollOutcome::Done(url),
                None => PollOutcome::Failed("result_url missing from completed talk".to_string()),
            },
            "error" => PollOutcome::Failed(
                self.error
                    .and_then(|e| e.message)
                    .unwrap_or_else(|| "video generation failed".to_string()),
            ),
            _ => PollOutcome::Pending,
        }
    }
}

impl CreateTalkRequest {
    pub fn new(source_url: &str, script: &str) -> Self {
        Self {
            source_url: source_url.to_string(),
            script: TalkScript {
                script_type: "text",
                input: script.to_string(),
                provider: VoiceProvider {
                    provider_type: "microsoft",
                    voice_id: "en-US-JennyNeural",
                },
            },
            config: TalkConfig {
                fluent: true,
                pad_audio: 0.0,
                stitch: true,
            },
        }
    }
}

impl DIdClient {
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

    fn auth_header(&self) -> String {
        format!("Basic {}", self.api_key)
    }

    /// Upload a local image (JPEG, PNG or WebP) and return the hosted URL.
    /// D-ID is picky about formats, so everything is re-encoded as PNG first.
    pub async fn upload_image(&self, path: &Path) -> Result<String, VendorError> {
        let source = path.to_path_buf();
        let png = tokio::task::spawn_blocking(move || convert_to_png(&source))
            .await
            .map_err(|e| VendorError::Io(std::io::Error::other(e)))??;

        tracing::info!("📤 Uploading image to D-ID ({} bytes)", png.len());

        let part = reqwest::multipart::Part::bytes(png)
            .file_name("image.png")
            .mime_str("image/png")
            .map_err(VendorError::http(SERVICE))?;
        let form = reqwest::multipart::Form::new().part("image", part);

        let response = self
            .client
            .post(format!("{}/images", self.base_url))
            .header("Authorization", self.auth_header())
            .multipart(form)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: UploadImageResponse = response.json().await.map_err(VendorError::http(SERVICE))?;
        body.url.ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "url",
        })
    }

    /// Start a talk and return its id
    pub async fn create_talk(&self, source_url: &str, script: &str) -> Result<String, VendorError> {
        let request = CreateTalkRequest::new(source_url, script);

        let response = self
            .client
            .post(format!("{}/talks", self.base_url))
            .header("Authorization", self.auth_header())
            .json(&request)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: CreateTalkResponse = response.json().await.map_err(VendorError::http(SERVICE))?;
        let id = body.id.ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "id",
        })?;
        tracing::info!("🎬 D-ID talk created: {}", id);
        Ok(id)
    }

    pub async fn get_talk(&self, talk_id: &str) -> Result<TalkStatus, VendorError> {
        let response = self
            .client
            .get(format!("{}/talks/{}", self.base_url, talk_id))
            .header("Authorization", self.auth_header())
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))
    }
}

fn convert_to_png(path: &Path) -> Result<Vec<u8>, VendorError> {
    let bytes = std::fs::read(path)?;
    if image::guess_format(&bytes).ok() == Some(ImageFormat::Png) {
        return Ok(bytes);
    }

    let decoded = image::load_from_memory(&bytes)?;
    let mut out = Cursor::new(Vec::new());
    decoded.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}
