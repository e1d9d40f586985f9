// src/pipeline/video.rs
//! Turns a project's media and script into a single promotional mp4.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::config::{AiProvider, Config, ProductVideoProvider};
use crate::did_client::{DIdClient, DEFAULT_PRESENTER_URL};
use crate::error::{ensure_success, PipelineError, VendorError};
use crate::file_host::FileHost;
use crate::http::vendor_client;
use crate::models::project::PersonMediaType;
use crate::pipeline::polling::{poll_until_terminal, PollSettings};
use crate::pipeline::scripts::{
    avatar_script, product_presentation_script, runway_prompt, Layout, ProductVideoStyle,
};
use crate::runway_client::RunwayClient;
use crate::shotstack_client::{build_edit, ShotstackClient};

const MOCK_VIDEO_CONTENT: &[u8] = b"Placeholder video - integrate with AI service";

/// Inputs for one generation run
#[derive(Debug, Clone)]
pub struct VideoRequest<'a> {
    pub product_image_path: &'a Path,
    pub person_media_path: &'a Path,
    pub person_media_type: PersonMediaType,
    pub script: &'a str,
    pub style: ProductVideoStyle,
    pub layout: Layout,
}

#[derive(Clone)]
pub struct VideoPipeline {
    provider: AiProvider,
    full_pipeline: bool,
    product_provider: ProductVideoProvider,
    output_dir: PathBuf,
    did: Option<DIdClient>,
    runway: Option<RunwayClient>,
    shotstack: Option<ShotstackClient>,
    file_host: FileHost,
    http: reqwest::Client,
    poll: PollSettings,
}

fn step(n: u8, stage: &'static str) -> impl FnOnce(VendorError) -> PipelineError {
    move |source| PipelineError::Step {
        step: n,
        stage,
        source,
    }
}

fn is_still_image(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref(),
        Some("png" | "jpg" | "jpeg")
    )
}

impl VideoPipeline {
    pub fn from_config(config: &Config, file_host: FileHost) -> Self {
        Self {
            provider: config.ai_provider,
            full_pipeline: config.use_full_ai_pipeline,
            product_provider: config.product_video_provider,
            output_dir: config.generated_video_path.clone(),
            did: config
                .did_api_key
                .clone()
                .map(|key| DIdClient::new(key).with_timeout(config.http_timeout)),
            runway: config
                .runway_api_key
                .clone()
                .map(|key| RunwayClient::new(key).with_timeout(config.http_timeout)),
            shotstack: config
                .shotstack_api_key
                .clone()
                .map(|key| ShotstackClient::new(key).with_timeout(config.http_timeout)),
            file_host,
            http: vendor_client(config.http_timeout),
            poll: config.poll,
        }
    }

    /// Replace vendor clients, mainly so tests can point them at a local server
    pub fn with_clients(
        mut self,
        did: Option<DIdClient>,
        runway: Option<RunwayClient>,
        shotstack: Option<ShotstackClient>,
    ) -> Self {
        self.did = did;
        self.runway = runway;
        self.shotstack = shotstack;
        self
    }

    fn did(&self) -> Result<&DIdClient, PipelineError> {
        self.did
            .as_ref()
            .ok_or(PipelineError::NotConfigured("DID_API_KEY"))
    }

    /// Returns the path of the finished video inside the generated-video directory
    pub async fn generate(&self, request: &VideoRequest<'_>) -> Result<PathBuf, PipelineError> {
        match self.provider {
            AiProvider::Mock => self.generate_mock().await,
            AiProvider::DId if self.full_pipeline => self.generate_full(request).await,
            AiProvider::DId => {
                tracing::info!("🎭 Generating avatar-only video with D-ID");
                Ok(self.generate_avatar(self.did()?, request).await?)
            }
        }
    }

    async fn generate_mock(&self) -> Result<PathBuf, PipelineError> {
        let path = self.new_video_path();
        tokio::fs::create_dir_all(&self.output_dir)
            .await
            .map_err(VendorError::from)?;
        tokio::fs::write(&path, MOCK_VIDEO_CONTENT)
            .await
            .map_err(VendorError::from)?;
        tracing::info!("🧪 Mock video written to {}", path.display());
        Ok(path)
    }

    async fn generate_full(&self, request: &VideoRequest<'_>) -> Result<PathBuf, PipelineError> {
        let shotstack = self
            .shotstack
            .as_ref()
            .ok_or(PipelineError::NotConfigured("SHOTSTACK_API_KEY"))?;
        let did = self.did()?;
        if self.product_provider == ProductVideoProvider::Runway && self.runway.is_none() {
            return Err(PipelineError::NotConfigured("RUNWAYML_API_KEY"));
        }

        tracing::info!("🎬 Starting full AI pipeline (style: {:?}, layout: {:?})", request.style, request.layout);

        tracing::info!("👤 STEP 1: Generating talking avatar...");
        let avatar_path = self
            .generate_avatar(did, request)
            .await
            .map_err(step(1, "avatar"))?;

        tracing::info!("📦 STEP 2: Generating product video...");
        let product_path = self
            .generate_product_video(did, request)
            .await
            .map_err(step(2, "product video"))?;

        tracing::info!("🎨 STEP 3: Compositing with Shotstack...");
        let final_path = self
            .composite(shotstack, request.layout, &product_path, &avatar_path)
            .await
            .map_err(step(3, "composite"))?;

        tracing::info!("✅ Full pipeline complete: {}", final_path.display());
        Ok(final_path)
    }

    async fn generate_avatar(
        &self,
        did: &DIdClient,
        request: &VideoRequest<'_>,
    ) -> Result<PathBuf, VendorError> {
        let source_url = if request.person_media_type == PersonMediaType::Image
            && is_still_image(request.person_media_path)
        {
            match did.upload_image(request.person_media_path).await {
                Ok(url) => url,
                Err(e) => {
                    tracing::warn!("⚠️ Person image upload failed, using default presenter: {}", e);
                    DEFAULT_PRESENTER_URL.to_string()
                }
            }
        } else {
            DEFAULT_PRESENTER_URL.to_string()
        };

        let talk_id = did.create_talk(&source_url, &avatar_script(request.script)).await?;
        let video_url = poll_until_terminal("D-ID", &self.poll, || async {
            did.get_talk(&talk_id).await.map(|t| t.outcome())
        })
        .await?;

        self.download(&video_url).await
    }

    async fn generate_product_video(
        &self,
        did: &DIdClient,
        request: &VideoRequest<'_>,
    ) -> Result<PathBuf, VendorError> {
        let video_url = match (self.product_provider, &self.runway) {
            (ProductVideoProvider::Runway, Some(runway)) => {
                let task_id = runway
                    .image_to_video(request.product_image_path, runway_prompt(request.style))
                    .await?;
                poll_until_terminal("RunwayML", &self.poll, || async {
                    runway.get_task(&task_id).await.map(|t| t.outcome())
                })
                .await?
            }
            _ => {
                let image_url = did.upload_image(request.product_image_path).await?;
                let talk_id = did
                    .create_talk(&image_url, product_presentation_script(request.style))
                    .await?;
                poll_until_terminal("D-ID", &self.poll, || async {
                    did.get_talk(&talk_id).await.map(|t| t.outcome())
                })
                .await?
            }
        };

        self.download(&video_url).await
    }

    async fn composite(
        &self,
        shotstack: &ShotstackClient,
        layout: Layout,
        product_path: &Path,
        avatar_path: &Path,
    ) -> Result<PathBuf, VendorError> {
        let product_url = self.file_host.upload_for_link(product_path).await?;
        let avatar_url = self.file_host.upload_for_link(avatar_path).await?;

        let edit = build_edit(layout, &product_url, &avatar_url);
        let render_id = shotstack.submit_render(&edit).await?;
        let video_url = poll_until_terminal("Shotstack", &self.poll, || async {
            shotstack.get_render(&render_id).await.map(|r| r.outcome())
        })
        .await?;

        self.download(&video_url).await
    }

    fn new_video_path(&self) -> PathBuf {
        self.output_dir.join(format!("{}.mp4", Uuid::new_v4()))
    }

    async fn download(&self, url: &str) -> Result<PathBuf, VendorError> {
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(VendorError::http("Download"))?;
        let response = ensure_success("Download", response).await?;
        let bytes = response.bytes().await.map_err(VendorError::http("Download"))?;

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let path = self.new_video_path();
        tokio::fs::write(&path, &bytes).await?;
        tracing::info!("💾 Saved {} bytes to {}", bytes.len(), path.display());
        Ok(path)
    }
}
