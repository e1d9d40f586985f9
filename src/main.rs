use promo_studio::config::{mask_secret, Config};
use promo_studio::{app, db, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    init_logging().expect("Failed to initialize logging");

    let config = Config::from_env();
    log_configuration(&config);

    for (label, dir) in [
        ("Uploads", &config.upload_path),
        ("Generated videos", &config.generated_video_path),
        ("Generated websites", &config.website_path),
    ] {
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::warn!("Failed to create {} directory {}: {}", label, dir.display(), e);
        } else {
            tracing::info!("{} directory ready: {}", label, dir.display());
        }
    }

    let db_pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool.");

    let port = config.port;
    let shared_state = Arc::new(AppState::from_config(config, db_pool));
    let app = app(shared_state);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .expect("Failed to bind listener");
    tracing::info!("🚀 listening on {}", listener.local_addr().expect("listener has an address"));
    axum::serve(listener, app).await.expect("Server error");
}

// Production-grade logging configuration
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cfg!(debug_assertions) {
            "debug,promo_studio=trace,sqlx=info,reqwest=info,hyper=info,tower_http=info".to_string()
        } else {
            "info,promo_studio=info,sqlx=warn,reqwest=warn,hyper=warn,tower_http=warn".to_string()
        }
    });

    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&log_level))?;

    let fmt_layer = if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        // JSON lines for log aggregation
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .boxed()
    };

    tracing_subscriber::registry().with(env_filter).with(fmt_layer).init();

    tracing::info!("🎬 Promo Studio starting up...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        "Build mode: {}",
        if cfg!(debug_assertions) { "development" } else { "production" }
    );
    tracing::info!("Log level: {}", log_level);
    Ok(())
}

fn key_status(key: &Option<String>) -> String {
    match key {
        Some(k) => format!("✅ ({})", mask_secret(k)),
        None => "❌".to_string(),
    }
}

fn log_configuration(config: &Config) {
    tracing::info!(
        "AI provider: {}, full pipeline: {}, product video: {:?}, vendor timeout: {:?}",
        config.ai_provider.as_str(),
        config.use_full_ai_pipeline,
        config.product_video_provider,
        config.http_timeout
    );
    tracing::info!(
        "Configuration - Gemini: {}, D-ID: {}, RunwayML: {}, Shotstack: {}, Instagram: {}",
        key_status(&config.gemini_api_key),
        key_status(&config.did_api_key),
        key_status(&config.runway_api_key),
        key_status(&config.shotstack_api_key),
        key_status(&config.instagram_access_token)
    );

    if config.gemini_api_key.is_none() {
        tracing::warn!("GOOGLE_GEMINI_API_KEY not found. Uploads will be rejected until it is set.");
    }
}
