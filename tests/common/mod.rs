#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header::CONTENT_TYPE, Request, Response};
use axum::Router;
use tower::ServiceExt;

use promo_studio::config::{AiProvider, Config, ProductVideoProvider};
use promo_studio::models::project::{NewProject, PersonMediaType, ProductDetails, Project};
use promo_studio::pipeline::PollSettings;
use promo_studio::services::ProjectStore;
use promo_studio::AppState;

pub const BOUNDARY: &str = "promo-studio-test-boundary";

/// Config rooted in a scratch directory, mock provider, no vendor keys.
pub fn test_config(root: &Path) -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        upload_path: root.join("uploads"),
        generated_video_path: root.join("generated/videos"),
        website_path: root.join("generated/websites"),
        port: 0,
        ai_provider: AiProvider::Mock,
        use_full_ai_pipeline: false,
        product_video_provider: ProductVideoProvider::DId,
        gemini_api_key: None,
        did_api_key: None,
        runway_api_key: None,
        shotstack_api_key: None,
        instagram_access_token: None,
        instagram_user_id: None,
        file_host_url: "http://127.0.0.1:9".to_string(),
        raw_file_host_url: "http://127.0.0.1:9".to_string(),
        poll: PollSettings {
            max_attempts: 3,
            interval: Duration::from_millis(1),
        },
        http_timeout: Duration::from_secs(5),
    }
}

pub async fn test_state(config: Config) -> AppState {
    let pool = promo_studio::db::connect("sqlite::memory:", 1)
        .await
        .expect("in-memory database should open");
    AppState::from_config(config, pool)
}

pub fn build_test_app(state: AppState) -> (Router, Arc<AppState>) {
    let state = Arc::new(state);
    (promo_studio::app(state.clone()), state)
}

pub async fn seed_project(state: &AppState, script: &str) -> Project {
    ProjectStore::insert(
        &state.db_pool,
        NewProject {
            product_image_path: state
                .config
                .upload_path
                .join("seed_product_image.png")
                .to_string_lossy()
                .into_owned(),
            person_media_path: state
                .config
                .upload_path
                .join("seed_person_media.mp4")
                .to_string_lossy()
                .into_owned(),
            person_media_type: PersonMediaType::Video,
            details: ProductDetails {
                name: "Aero Bottle".to_string(),
                description: "Keeps drinks cold for 24 hours".to_string(),
                category: "Outdoors".to_string(),
                price: "$29".to_string(),
            },
            generated_script: script.to_string(),
        },
    )
    .await
    .expect("seed insert should succeed")
}

pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n",
                        name, file_name
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub async fn post_multipart(app: Router, uri: &str, body: Vec<u8>) -> Response<Body> {
    let request = Request::post(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, json: serde_json::Value) -> Response<Body> {
    let request = Request::post(uri)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(json.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_empty(app: Router, uri: &str) -> Response<Body> {
    let request = Request::post(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
