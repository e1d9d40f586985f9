// lib.rs - Library root: modules, shared state and the HTTP application
pub mod config;
pub mod db;
pub mod did_client;
pub mod error;
pub mod file_host;
pub mod gemini_client;
pub mod handlers;
pub mod http;
pub mod instagram_client;
pub mod middleware;
pub mod models;
pub mod pipeline;
pub mod runway_client;
pub mod services;
pub mod shotstack_client;
pub mod social;
pub mod website;

use axum::{Extension, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use config::Config;
use file_host::FileHost;
use gemini_client::GeminiClient;
use instagram_client::InstagramClient;
use pipeline::VideoPipeline;
use social::SocialPublisher;
use website::WebsiteBuilder;

// AppState holds the database pool, the resolved configuration and one instance of each stage
pub struct AppState {
    pub db_pool: sqlx::SqlitePool,
    pub config: Config,
    pub gemini_client: Option<GeminiClient>, // Script generation; uploads are rejected without it
    pub video_pipeline: VideoPipeline,
    pub website_builder: WebsiteBuilder,
    pub social_publisher: SocialPublisher,
}

impl AppState {
    pub fn from_config(config: Config, db_pool: sqlx::SqlitePool) -> Self {
        let gemini_client = config.gemini_api_key.clone().map(GeminiClient::new);
        let file_host = FileHost::new(config.file_host_url.clone(), config.raw_file_host_url.clone())
            .with_timeout(config.http_timeout);

        let video_pipeline = VideoPipeline::from_config(&config, file_host.clone());
        let website_builder = WebsiteBuilder::new(config.website_path.clone(), gemini_client.clone());
        let social_publisher = SocialPublisher::new(
            file_host,
            InstagramClient::new().with_timeout(config.http_timeout),
            config.poll,
        );

        Self {
            db_pool,
            config,
            gemini_client,
            video_pipeline,
            website_builder,
            social_publisher,
        }
    }
}

/// Build the router with every route, static mount and layer
pub fn app(state: Arc<AppState>) -> Router {
    let statics = Router::new()
        .nest_service("/static/uploads", ServeDir::new(&state.config.upload_path))
        .nest_service(
            "/static/generated/videos",
            ServeDir::new(&state.config.generated_video_path),
        )
        .nest_service(
            "/static/generated/websites",
            ServeDir::new(&state.config.website_path),
        );

    Router::new()
        .nest("/api/v1", handlers::projects::project_routes())
        .route("/api/status", axum::routing::get(handlers::status::api_status))
        .merge(statics)
        .layer(axum::middleware::from_fn(middleware::logging::request_logging_middleware))
        .layer(CorsLayer::permissive())
        .layer(Extension(state))
}
