use crate::error::ApiError;
use crate::models::project::{
    GenerateVideoRequest, GenerateVideoResponse, GenerateWebsiteResponse, InstagramUploadRequest,
    InstagramUploadResponse, NewProject, PersonMediaType, ProductDetails, Project,
    ProjectListResponse, ProjectStatus, UploadResponse,
};
use crate::pipeline::scripts::{Layout, ProductVideoStyle};
use crate::pipeline::VideoRequest;
use crate::services::ProjectStore;
use crate::social::generate_caption;
use crate::AppState;
use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, Extension, Path},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use std::path::{Path as FsPath, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

pub fn project_routes() -> Router {
    Router::new()
        .route(
            "/upload",
            post(upload_project).layer(DefaultBodyLimit::max(100 * 1024 * 1024)), // 100MB limit for media uploads
        )
        .route("/projects", get(list_projects))
        .route("/projects/:id", get(get_project))
        .route("/projects/:id/generate-video", post(generate_video))
        .route("/projects/:id/generate-website", post(generate_website))
        .route("/projects/:id/upload-instagram", post(upload_instagram))
}

async fn load_project(state: &AppState, id: &str) -> Result<Project, ApiError> {
    ProjectStore::get(&state.db_pool, id)
        .await?
        .ok_or_else(ApiError::project_not_found)
}

/// Put a project back to the status it had before a failed stage
async fn revert_status(state: &AppState, id: &str, status: ProjectStatus) {
    if let Err(e) = ProjectStore::set_status(&state.db_pool, id, status).await {
        tracing::error!("Failed to revert project {} to {}: {}", id, status, e);
    }
}

/// Persist a finished stage. A failed write rolls the status back instead of leaving it in flight.
async fn finish_stage(
    state: &AppState,
    project: &mut Project,
    previous: ProjectStatus,
) -> Result<(), ApiError> {
    if let Err(e) = ProjectStore::save(&state.db_pool, project).await {
        tracing::error!("Failed to save project {} after stage: {}", project.id, e);
        revert_status(state, &project.id, previous).await;
        return Err(e.into());
    }
    Ok(())
}

async fn remove_files(paths: &[PathBuf]) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!("Failed to clean up {}: {}", path.display(), e);
        }
    }
}

struct SavedMedia {
    path: PathBuf,
    file_name: String,
}

async fn save_upload(
    upload_dir: &FsPath,
    field_name: &str,
    file_name: &str,
    data: &[u8],
) -> Result<PathBuf, ApiError> {
    let extension = FsPath::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("");
    let unique_filename = if extension.is_empty() {
        format!("{}_{}", Uuid::new_v4(), field_name)
    } else {
        format!("{}_{}.{}", Uuid::new_v4(), field_name, extension)
    };
    let file_path = upload_dir.join(unique_filename);

    tokio::fs::write(&file_path, data)
        .await
        .map_err(|e| ApiError::internal("Failed to save file", e))?;
    Ok(file_path)
}

pub async fn upload_project(
    Extension(state): Extension<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<UploadResponse>), ApiError> {
    let upload_dir = state.config.upload_path.clone();
    tokio::fs::create_dir_all(&upload_dir)
        .await
        .map_err(|e| ApiError::internal("Failed to create upload directory", e))?;

    let mut product_image: Option<SavedMedia> = None;
    let mut person_media: Option<SavedMedia> = None;
    let mut details = ProductDetails::default();
    let mut saved: Vec<PathBuf> = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                remove_files(&saved).await;
                return Err(ApiError::BadRequest(format!("Invalid multipart body: {}", e)));
            }
        };
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "product_image" | "person_media" => {
                let already_sent = if name == "product_image" {
                    product_image.is_some()
                } else {
                    person_media.is_some()
                };
                if already_sent {
                    remove_files(&saved).await;
                    return Err(ApiError::BadRequest(format!("Duplicate {} field", name)));
                }

                let file_name = field.file_name().unwrap_or("upload").to_string();
                let data = match field.bytes().await {
                    Ok(data) => data,
                    Err(e) => {
                        remove_files(&saved).await;
                        return Err(ApiError::BadRequest(format!("Failed to read {}: {}", name, e)));
                    }
                };
                let path = match save_upload(&upload_dir, &name, &file_name, &data).await {
                    Ok(path) => path,
                    Err(e) => {
                        remove_files(&saved).await;
                        return Err(e);
                    }
                };
                saved.push(path.clone());
                tracing::info!("Saved {} '{}' -> {}", name, file_name, path.display());

                let media = SavedMedia { path, file_name };
                if name == "product_image" {
                    product_image = Some(media);
                } else {
                    person_media = Some(media);
                }
            }
            "product_name" | "product_description" | "product_category" | "product_price" => {
                let value = match field.text().await {
                    Ok(value) => value,
                    Err(e) => {
                        remove_files(&saved).await;
                        return Err(ApiError::BadRequest(format!("Failed to read {}: {}", name, e)));
                    }
                };
                match name.as_str() {
                    "product_name" => details.name = value,
                    "product_description" => details.description = value,
                    "product_category" => details.category = value,
                    _ => details.price = value,
                }
            }
            _ => {}
        }
    }

    let (Some(product_image), Some(person_media)) = (product_image, person_media) else {
        remove_files(&saved).await;
        return Err(ApiError::BadRequest(
            "Both product_image and person_media files are required".to_string(),
        ));
    };

    let Some(gemini) = &state.gemini_client else {
        remove_files(&saved).await;
        return Err(ApiError::BadRequest(
            "Gemini API key not configured; set GOOGLE_GEMINI_API_KEY to generate scripts".to_string(),
        ));
    };

    let script = match gemini.generate_marketing_script(&details).await {
        Ok(script) => script,
        Err(e) => {
            tracing::error!("❌ Script generation failed: {}", e);
            remove_files(&saved).await;
            return Err(ApiError::internal("Failed to generate script", e));
        }
    };

    let new_project = NewProject {
        product_image_path: product_image.path.to_string_lossy().into_owned(),
        person_media_path: person_media.path.to_string_lossy().into_owned(),
        person_media_type: PersonMediaType::from_filename(&person_media.file_name),
        details,
        generated_script: script,
    };

    let project = match ProjectStore::insert(&state.db_pool, new_project).await {
        Ok(project) => project,
        Err(e) => {
            remove_files(&saved).await;
            return Err(e.into());
        }
    };
    tracing::info!("✅ Project {} created", project.id);

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            project_id: project.id,
            status: project.status,
            message: "Files uploaded and script generated successfully".to_string(),
            generated_script: project.generated_script.unwrap_or_default(),
            product_name: project.product_name,
            product_description: project.product_description,
        }),
    ))
}

pub async fn list_projects(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<ProjectListResponse>, ApiError> {
    let projects = ProjectStore::list(&state.db_pool).await?;
    Ok(Json(ProjectListResponse { projects }))
}

pub async fn get_project(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    Ok(Json(load_project(&state, &id).await?))
}

pub async fn generate_video(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<GenerateVideoRequest>>,
) -> Result<Json<GenerateVideoResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let mut project = load_project(&state, &id).await?;
    let previous = project.rollback_status();

    project.status = ProjectStatus::VideoGenerating;
    ProjectStore::save(&state.db_pool, &mut project).await?;

    let Some(script) = project.script().map(str::to_string) else {
        revert_status(&state, &id, previous).await;
        return Err(ApiError::BadRequest(
            "No generated script found for this project".to_string(),
        ));
    };

    let video_request = VideoRequest {
        product_image_path: FsPath::new(&project.product_image_path),
        person_media_path: FsPath::new(&project.person_media_path),
        person_media_type: project.person_media_type,
        script: &script,
        style: ProductVideoStyle::parse(request.product_video_style.as_deref()),
        layout: Layout::parse(request.layout.as_deref()),
    };

    let video_path = match state.video_pipeline.generate(&video_request).await {
        Ok(path) => path.to_string_lossy().into_owned(),
        Err(e) => {
            tracing::error!("❌ Video generation failed for {}: {}", id, e);
            revert_status(&state, &id, previous).await;
            return Err(ApiError::internal("Failed to generate video", e));
        }
    };

    project.generated_video_path = Some(video_path.clone());
    project.status = ProjectStatus::VideoComplete;
    finish_stage(&state, &mut project, previous).await?;

    Ok(Json(GenerateVideoResponse {
        project_id: project.id,
        video_path,
        status: project.status,
    }))
}

pub async fn generate_website(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<GenerateWebsiteResponse>, ApiError> {
    let mut project = load_project(&state, &id).await?;
    let previous = project.rollback_status();

    project.status = ProjectStatus::WebsiteGenerating;
    ProjectStore::save(&state.db_pool, &mut project).await?;

    let site = match state.website_builder.build(&project).await {
        Ok(site) => site,
        Err(e) => {
            tracing::error!("❌ Website generation failed for {}: {}", id, e);
            revert_status(&state, &id, previous).await;
            return Err(ApiError::internal("Failed to generate website", e));
        }
    };

    let website_path = site.dir.to_string_lossy().into_owned();
    project.website_path = Some(website_path.clone());
    project.website_url = Some(site.url.clone());
    project.status = ProjectStatus::WebsiteComplete;
    finish_stage(&state, &mut project, previous).await?;

    Ok(Json(GenerateWebsiteResponse {
        project_id: project.id,
        website_path,
        website_url: site.url,
        status: project.status,
    }))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

async fn caption_for(state: &AppState, project: &Project, request: &InstagramUploadRequest) -> String {
    if let Some(custom) = non_empty(request.custom_caption.clone()) {
        return custom;
    }

    if request.use_ai_caption {
        if let Some(gemini) = &state.gemini_client {
            match gemini
                .generate_instagram_caption(
                    &project.product_name,
                    &project.product_description,
                    &project.product_price,
                )
                .await
            {
                Ok(caption) if !caption.is_empty() => return caption,
                Ok(_) => tracing::warn!("Gemini returned an empty caption, using template"),
                Err(e) => tracing::warn!("AI caption failed, using template: {}", e),
            }
        }
    }

    generate_caption(
        &project.product_name,
        &project.product_description,
        &project.product_price,
    )
}

pub async fn upload_instagram(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<String>,
    body: Option<Json<InstagramUploadRequest>>,
) -> Result<Json<InstagramUploadResponse>, ApiError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let mut project = load_project(&state, &id).await?;

    let Some(video_path) = non_empty(project.generated_video_path.clone()) else {
        return Err(ApiError::BadRequest(
            "No video generated yet. Generate a video first".to_string(),
        ));
    };
    let Some(access_token) = non_empty(request.instagram_access_token.clone())
        .or_else(|| state.config.instagram_access_token.clone())
    else {
        return Err(ApiError::BadRequest(
            "Instagram access token is required".to_string(),
        ));
    };
    let Some(user_id) = non_empty(request.instagram_user_id.clone())
        .or_else(|| state.config.instagram_user_id.clone())
    else {
        return Err(ApiError::BadRequest("Instagram user ID is required".to_string()));
    };

    let previous = project.rollback_status();
    project.status = ProjectStatus::InstagramUploading;
    ProjectStore::save(&state.db_pool, &mut project).await?;

    let caption = caption_for(&state, &project, &request).await;

    let post = match state
        .social_publisher
        .publish(FsPath::new(&video_path), &caption, &user_id, &access_token)
        .await
    {
        Ok(post) => post,
        Err(e) => {
            tracing::error!("❌ Instagram upload failed for {}: {}", id, e);
            revert_status(&state, &id, previous).await;
            return Err(ApiError::internal("Failed to upload to Instagram", e));
        }
    };

    project.instagram_post_id = Some(post.post_id.clone());
    project.instagram_post_url = Some(post.post_url.clone());
    project.status = ProjectStatus::InstagramPosted;
    finish_stage(&state, &mut project, previous).await?;

    Ok(Json(InstagramUploadResponse {
        project_id: project.id,
        instagram_post_id: post.post_id,
        instagram_post_url: post.post_url,
        caption,
        status: project.status,
        message: "Video uploaded to Instagram successfully".to_string(),
    }))
}
