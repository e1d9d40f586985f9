// Shotstack API Client
// Supports: timeline rendering for the two-track composite

use crate::error::{ensure_success, VendorError};
use crate::http::{vendor_client, DEFAULT_REQUEST_TIMEOUT};
use crate::pipeline::polling::PollOutcome;
use crate::pipeline::scripts::Layout;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SERVICE: &str = "Shotstack";
const DEFAULT_BASE_URL: &str = "https://api.shotstack.io/v1";
const CLIP_LENGTH_SECS: f32 = 15.0;

#[derive(Clone)]
pub struct ShotstackClient {
    api_key: String,
    client: Client,
    base_url: String,
}

// ============================================================================
// EDIT (TIMELINE) STRUCTURES
// ============================================================================

#[derive(Serialize, Debug, Clone)]
pub struct Edit {
    pub timeline: Timeline,
    pub output: Output,
}

#[derive(Serialize, Debug, Clone)]
pub struct Timeline {
    pub background: String,
    pub tracks: Vec<Track>,
}

#[derive(Serialize, Debug, Clone)]
pub struct Track {
    pub clips: Vec<Clip>,
}

#[derive(Serialize, Debug, Clone)]
pub struct Clip {
    pub asset: VideoAsset,
    pub start: f32,
    pub length: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<Offset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
}

#[derive(Serialize, Debug, Clone)]
pub struct VideoAsset {
    #[serde(rename = "type")]
    pub asset_type: String,
    pub src: String,
}

#[derive(Serialize, Debug, Clone, Copy)]
pub struct Offset {
    pub x: f32,
    pub y: f32,
}

#[derive(Serialize, Debug, Clone)]
pub struct Output {
    pub format: String,
    pub resolution: String,
    pub fps: u32,
}

// ============================================================================
// API RESPONSE STRUCTURES
// ============================================================================

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    response: Option<T>,
    message: Option<String>,
}

#[derive(Deserialize, Debug)]
struct QueuedRender {
    id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct RenderStatus {
    pub status: String, // "queued", "fetching", "rendering", "saving", "done", "failed"
    pub url: Option<String>,
    pub error: Option<String>,
}

impl RenderStatus {
    pub fn outcome(self) -> PollOutcome<String> {
        match self.status.as_str() {
            "done" => match self.url {
                Some(url) => PollOutcome::Done(url),
                None => PollOutcome::Failed("no video URL in render response".to_string()),
            },
            "failed" => PollOutcome::Failed(
                self.error.unwrap_or_else(|| "render failed".to_string()),
            ),
            _ => PollOutcome::Pending,
        }
    }
}

fn full_frame(src: &str) -> Clip {
    Clip {
        asset: VideoAsset {
            asset_type: "video".to_string(),
            src: src.to_string(),
        },
        start: 0.0,
        length: CLIP_LENGTH_SECS,
        fit: Some("cover".to_string()),
        position: None,
        offset: None,
        scale: None,
    }
}

fn corner_overlay(src: &str, scale: f32) -> Clip {
    Clip {
        asset: VideoAsset {
            asset_type: "video".to_string(),
            src: src.to_string(),
        },
        start: 0.0,
        length: CLIP_LENGTH_SECS,
        fit: None,
        position: Some("bottomRight".to_string()),
        offset: Some(Offset { x: -0.02, y: -0.02 }),
        scale: Some(scale),
    }
}

/// Two tracks over a black background: one clip fills the frame, the other sits in the
/// bottom-right corner. Which is which depends on the layout.
pub fn build_edit(layout: Layout, product_url: &str, avatar_url: &str) -> Edit {
    let (main, overlay) = match layout {
        Layout::ProductMain => (full_frame(product_url), corner_overlay(avatar_url, 0.25)),
        Layout::AvatarMain => (full_frame(avatar_url), corner_overlay(product_url, 0.3)),
    };

    Edit {
        timeline: Timeline {
            background: "#000000".to_string(),
            tracks: vec![Track { clips: vec![main] }, Track { clips: vec![overlay] }],
        },
        output: Output {
            format: "mp4".to_string(),
            resolution: "hd".to_string(),
            fps: 30,
        },
    }
}

impl ShotstackClient {
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

    /// Queue a render and return its id
    pub async fn submit_render(&self, edit: &Edit) -> Result<String, VendorError> {
        let response = self
            .client
            .post(format!("{}/render", self.base_url))
            .header("x-api-key", &self.api_key)
            .json(edit)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let body: Envelope<QueuedRender> =
            response.json().await.map_err(VendorError::http(SERVICE))?;
        let id = body
            .response
            .and_then(|r| r.id)
            .ok_or(VendorError::MissingField {
                service: SERVICE,
                field: "response.id",
            })?;
        tracing::info!("🎨 Shotstack render queued: {}", id);
        Ok(id)
    }

    pub async fn get_render(&self, render_id: &str) -> Result<RenderStatus, VendorError> {
        let response = self
            .client
            .get(format!("{}/render/{}", self.base_url, render_id))
            .header("x-api-key", &self.api_key)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        let body: Envelope<RenderStatus> =
            serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))?;
        body.response.ok_or_else(|| VendorError::Decode {
            service: SERVICE,
            message: body
                .message
                .unwrap_or_else(|| "response object missing".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_product_main_layout() {
        let edit = serde_json::to_value(build_edit(Layout::ProductMain, "https://p.mp4", "https://a.mp4")).unwrap();

        assert_eq!(edit["timeline"]["background"], "#000000");
        let tracks = edit["timeline"]["tracks"].as_array().unwrap();
        assert_eq!(tracks.len(), 2);

        let main = &tracks[0]["clips"][0];
        assert_eq!(main["asset"]["src"], "https://p.mp4");
        assert_eq!(main["asset"]["type"], "video");
        assert_eq!(main["fit"], "cover");
        assert_eq!(main["length"], 15.0);
        assert!(main.get("position").is_none());

        let overlay = &tracks[1]["clips"][0];
        assert_eq!(overlay["asset"]["src"], "https://a.mp4");
        assert_eq!(overlay["position"], "bottomRight");
        assert_eq!(overlay["scale"], 0.25);

        assert_eq!(edit["output"]["format"], "mp4");
        assert_eq!(edit["output"]["resolution"], "hd");
        assert_eq!(edit["output"]["fps"], 30);
    }

    #[test]
    fn test_avatar_main_layout() {
        let edit = build_edit(Layout::AvatarMain, "https://p.mp4", "https://a.mp4");
        assert_eq!(edit.timeline.tracks[0].clips[0].asset.src, "https://a.mp4");
        let overlay = &edit.timeline.tracks[1].clips[0];
        assert_eq!(overlay.asset.src, "https://p.mp4");
        assert_eq!(overlay.scale, Some(0.3));
    }

    #[test]
    fn test_render_outcomes() {
        let parse = |s: &str| serde_json::from_str::<RenderStatus>(s).unwrap().outcome();
        assert_eq!(
            parse(r#"{"status":"done","url":"https://cdn/x.mp4"}"#),
            PollOutcome::Done("https://cdn/x.mp4".to_string())
        );
        assert_eq!(parse(r#"{"status":"rendering"}"#), PollOutcome::Pending);
        assert!(matches!(parse(r#"{"status":"failed"}"#), PollOutcome::Failed(_)));
        assert!(matches!(parse(r#"{"status":"done"}"#), PollOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn test_submit_and_get_render() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/render"))
            .and(header("x-api-key", "ss-key"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "success": true,
                "response": {"id": "rnd-1", "message": "Render Successfully Queued"}
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/render/rnd-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "response": {"status": "done", "url": "https://cdn/final.mp4"}
            })))
            .mount(&server)
            .await;

        let client = ShotstackClient::with_base_url("ss-key".to_string(), server.uri());
        let edit = build_edit(Layout::ProductMain, "https://p.mp4", "https://a.mp4");
        let id = client.submit_render(&edit).await.unwrap();
        assert_eq!(id, "rnd-1");

        let status = client.get_render(&id).await.unwrap();
        assert_eq!(status.outcome(), PollOutcome::Done("https://cdn/final.mp4".to_string()));
    }
}
