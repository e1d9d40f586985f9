// src/config.rs
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::pipeline::polling::PollSettings;

/// Which backend produces the final promotional video
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    /// D-ID talking avatar, optionally followed by product animation + Shotstack compositing
    DId,
    /// Writes a placeholder file, no vendor calls
    Mock,
}

impl AiProvider {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "did" | "d-id" => AiProvider::DId,
            "mock" | "" => AiProvider::Mock,
            other => {
                tracing::warn!("Unknown AI_PROVIDER '{}', falling back to mock", other);
                AiProvider::Mock
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::DId => "did",
            AiProvider::Mock => "mock",
        }
    }
}

/// Vendor used for step 2 of the full pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductVideoProvider {
    DId,
    Runway,
}

impl ProductVideoProvider {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "runway" | "runwayml" => ProductVideoProvider::Runway,
            _ => ProductVideoProvider::DId,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub upload_path: PathBuf,
    pub generated_video_path: PathBuf,
    pub website_path: PathBuf,
    pub port: u16,
    pub ai_provider: AiProvider,
    pub use_full_ai_pipeline: bool,
    pub product_video_provider: ProductVideoProvider,
    pub gemini_api_key: Option<String>,
    pub did_api_key: Option<String>,
    pub runway_api_key: Option<String>,
    pub shotstack_api_key: Option<String>,
    pub instagram_access_token: Option<String>,
    pub instagram_user_id: Option<String>,
    pub file_host_url: String,
    pub raw_file_host_url: String,
    pub poll: PollSettings,
    /// Per-request limit for every vendor call
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let poll = PollSettings {
            max_attempts: env_parse("POLL_MAX_ATTEMPTS", 60),
            interval: Duration::from_secs(env_parse("POLL_INTERVAL_SECS", 5)),
        };

        Self {
            database_url: env_or("DATABASE_URL", "sqlite://data/app.db"),
            upload_path: PathBuf::from(env_or("UPLOAD_PATH", "./uploads")),
            generated_video_path: PathBuf::from(env_or("GENERATED_VIDEO_PATH", "./generated/videos")),
            website_path: PathBuf::from(env_or("WEBSITE_PATH", "./generated/websites")),
            port: env_parse("PORT", 8080),
            ai_provider: AiProvider::parse(&env_or("AI_PROVIDER", "mock")),
            use_full_ai_pipeline: env_or("USE_FULL_AI_PIPELINE", "false") == "true",
            product_video_provider: ProductVideoProvider::parse(&env_or("PRODUCT_VIDEO_PROVIDER", "did")),
            // Both names are in circulation for the Gemini key
            gemini_api_key: env_opt("GOOGLE_GEMINI_API_KEY").or_else(|| env_opt("GEMINI_API_KEY")),
            did_api_key: env_opt("DID_API_KEY"),
            runway_api_key: env_opt("RUNWAYML_API_KEY"),
            shotstack_api_key: env_opt("SHOTSTACK_API_KEY"),
            instagram_access_token: env_opt("INSTAGRAM_ACCESS_TOKEN"),
            instagram_user_id: env_opt("INSTAGRAM_USER_ID"),
            file_host_url: env_or("FILE_HOST_URL", "https://file.io"),
            raw_file_host_url: env_or("RAW_FILE_HOST_URL", "https://0x0.st"),
            poll,
            http_timeout: Duration::from_secs(env_parse("HTTP_TIMEOUT_SECS", 300)),
        }
    }
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(key: &str, default: &str) -> String {
    env_opt(key).unwrap_or_else(|| default.to_string())
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env_opt(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!("Invalid value for {}: '{}', using default", key, raw);
            default
        }),
        None => default,
    }
}

/// Mask a secret for startup logs, keeping only the last four characters
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 4 {
        return "***".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("***{}", tail)
}
