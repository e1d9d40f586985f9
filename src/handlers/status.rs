use crate::AppState;
use axum::{extract::Extension, response::Json};
use serde_json::{json, Value};
use std::sync::Arc;

fn configured(present: bool) -> &'static str {
    if present {
        "configured"
    } else {
        "not_configured"
    }
}

pub async fn api_status(Extension(state): Extension<Arc<AppState>>) -> Json<Value> {
    let db_status = match sqlx::query("SELECT 1").fetch_one(&state.db_pool).await {
        Ok(_) => "healthy",
        Err(_) => "unhealthy",
    };
    let config = &state.config;

    Json(json!({
        "service": "promo-studio",
        "status": "operational",
        "version": env!("CARGO_PKG_VERSION"),
        "ai_provider": config.ai_provider.as_str(),
        "full_pipeline": config.use_full_ai_pipeline,
        "services": {
            "database": db_status,
            "gemini": configured(state.gemini_client.is_some()),
            "did": configured(config.did_api_key.is_some()),
            "runwayml": configured(config.runway_api_key.is_some()),
            "shotstack": configured(config.shotstack_api_key.is_some()),
            "instagram": configured(
                config.instagram_access_token.is_some() && config.instagram_user_id.is_some()
            ),
        },
        "endpoints": {
            "upload": "/api/v1/upload",
            "projects": "/api/v1/projects",
            "status": "/api/status"
        }
    }))
}
