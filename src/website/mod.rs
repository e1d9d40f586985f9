// src/website/mod.rs
//! Renders a static landing page per project under `<website_path>/<uuid>/`.

pub mod templates;

use chrono::Datelike;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::VendorError;
use crate::gemini_client::GeminiClient;
use crate::models::feature::{default_features, Feature};
use crate::models::project::Project;
use templates::{render_index, PageContext, SCRIPT_JS, STYLES_CSS};

const DEFAULT_NAME: &str = "Amazing Product";
const DEFAULT_DESCRIPTION: &str = "Transform your experience with our innovative solution";

#[derive(Debug, Clone, PartialEq)]
pub struct BuiltWebsite {
    pub dir: PathBuf,
    pub url: String,
}

#[derive(Clone)]
pub struct WebsiteBuilder {
    website_path: PathBuf,
    gemini: Option<GeminiClient>,
}

fn file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(path)
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    if value.trim().is_empty() {
        default
    } else {
        value
    }
}

impl WebsiteBuilder {
    pub fn new(website_path: PathBuf, gemini: Option<GeminiClient>) -> Self {
        Self {
            website_path,
            gemini,
        }
    }

    async fn features_for(&self, project: &Project) -> Vec<Feature> {
        let Some(gemini) = &self.gemini else {
            return default_features();
        };

        match gemini.generate_website_features(&project.details()).await {
            Ok(features) => features,
            Err(e) => {
                tracing::warn!("⚠️ Feature generation failed, using defaults: {}", e);
                default_features()
            }
        }
    }

    pub async fn build(&self, project: &Project) -> Result<BuiltWebsite, VendorError> {
        let site_id = Uuid::new_v4().to_string();
        let dir = self.website_path.join(&site_id);
        tokio::fs::create_dir_all(&dir).await?;

        let features = self.features_for(project).await;
        let image_url = format!("/static/uploads/{}", file_name(&project.product_image_path));
        let video_url = project
            .generated_video_path
            .as_deref()
            .map(|p| format!("/static/generated/videos/{}", file_name(p)));

        let html = render_index(&PageContext {
            product_name: or_default(&project.product_name, DEFAULT_NAME),
            product_description: or_default(&project.product_description, DEFAULT_DESCRIPTION),
            product_price: &project.product_price,
            product_image_url: &image_url,
            video_url: video_url.as_deref(),
            features: &features,
            year: chrono::Utc::now().year(),
        });

        tokio::fs::write(dir.join("index.html"), html).await?;
        tokio::fs::write(dir.join("styles.css"), STYLES_CSS).await?;
        tokio::fs::write(dir.join("script.js"), SCRIPT_JS).await?;

        let url = format!("/static/generated/websites/{}/index.html", site_id);
        tracing::info!("🌐 Website generated at {}", dir.display());
        Ok(BuiltWebsite { dir, url })
    }
}
