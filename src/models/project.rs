// src/models/project.rs
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum ProjectStatus {
    Uploaded,
    VideoGenerating,
    VideoComplete,
    WebsiteGenerating,
    WebsiteComplete,
    InstagramUploading,
    InstagramPosted,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Uploaded => "uploaded",
            ProjectStatus::VideoGenerating => "video_generating",
            ProjectStatus::VideoComplete => "video_complete",
            ProjectStatus::WebsiteGenerating => "website_generating",
            ProjectStatus::WebsiteComplete => "website_complete",
            ProjectStatus::InstagramUploading => "instagram_uploading",
            ProjectStatus::InstagramPosted => "instagram_posted",
        }
    }

    /// In-flight states only exist while a stage is talking to a vendor
    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            ProjectStatus::VideoGenerating
                | ProjectStatus::WebsiteGenerating
                | ProjectStatus::InstagramUploading
        )
    }
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum PersonMediaType {
    Image,
    Video,
}

impl PersonMediaType {
    pub fn from_filename(filename: &str) -> Self {
        let lower = filename.to_lowercase();
        if lower.ends_with(".mp4") || lower.ends_with(".mov") || lower.ends_with(".avi") {
            PersonMediaType::Video
        } else {
            PersonMediaType::Image
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: String,
    pub product_image_path: String,
    pub person_media_path: String,
    pub person_media_type: PersonMediaType,
    pub product_name: String,
    pub product_description: String,
    pub product_category: String,
    pub product_price: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_script: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generated_video_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram_post_url: Option<String>,
    pub status: ProjectStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Project {
    pub fn details(&self) -> ProductDetails {
        ProductDetails {
            name: self.product_name.clone(),
            description: self.product_description.clone(),
            category: self.product_category.clone(),
            price: self.product_price.clone(),
        }
    }

    /// Script usable for video generation, if one was produced at upload time
    pub fn script(&self) -> Option<&str> {
        self.generated_script
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }

    /// Furthest completed stage, judged by the artifacts the row holds
    pub fn last_settled_status(&self) -> ProjectStatus {
        if self.instagram_post_id.is_some() {
            ProjectStatus::InstagramPosted
        } else if self.website_path.is_some() {
            ProjectStatus::WebsiteComplete
        } else if self.generated_video_path.is_some() {
            ProjectStatus::VideoComplete
        } else {
            ProjectStatus::Uploaded
        }
    }

    /// Status to restore when a stage fails. A row left in flight by an
    /// interrupted or overlapping run never gets that status back.
    pub fn rollback_status(&self) -> ProjectStatus {
        if self.status.is_in_flight() {
            self.last_settled_status()
        } else {
            self.status
        }
    }
}

/// Free-text product metadata submitted with the upload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: String,
}

#[derive(Debug)]
pub struct NewProject {
    pub product_image_path: String,
    pub person_media_path: String,
    pub person_media_type: PersonMediaType,
    pub details: ProductDetails,
    pub generated_script: String,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub project_id: String,
    pub status: ProjectStatus,
    pub message: String,
    pub generated_script: String,
    pub product_name: String,
    pub product_description: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct GenerateVideoRequest {
    pub product_video_style: Option<String>,
    pub layout: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GenerateVideoResponse {
    pub project_id: String,
    pub video_path: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Serialize)]
pub struct GenerateWebsiteResponse {
    pub project_id: String,
    pub website_path: String,
    pub website_url: String,
    pub status: ProjectStatus,
}

#[derive(Debug, Default, Deserialize)]
pub struct InstagramUploadRequest {
    pub instagram_access_token: Option<String>,
    pub instagram_user_id: Option<String>,
    pub custom_caption: Option<String>,
    /// Ask Gemini for the caption instead of the built-in template
    #[serde(default)]
    pub use_ai_caption: bool,
}

#[derive(Debug, Serialize)]
pub struct InstagramUploadResponse {
    pub project_id: String,
    pub instagram_post_id: String,
    pub instagram_post_url: String,
    pub caption: String,
    pub status: ProjectStatus,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub projects: Vec<Project>,
}
