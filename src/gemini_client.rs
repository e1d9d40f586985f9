use crate::error::VendorError;
use crate::models::feature::{default_features, Feature, FEATURE_COUNT};
use crate::models::project::ProductDetails;
use backoff::{future::retry, ExponentialBackoff};
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const SERVICE: &str = "Gemini";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const MODEL: &str = "gemini-2.5-flash";

lazy_static! {
    static ref CODE_FENCE: Regex = Regex::new(r"(?m)^\s*```[a-zA-Z]*\s*$").unwrap();
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    base_url: String,
    retry_window: Duration,
}

#[derive(Debug, Serialize)]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(rename = "generationConfig")]
    pub generation_config: GenerationConfig,
    #[serde(rename = "safetySettings")]
    pub safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default)]
    pub parts: Vec<Part>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Text { text: String },
    Other(Value),
}

#[derive(Debug, Serialize)]
pub struct GenerationConfig {
    pub temperature: f32,
    #[serde(rename = "topK")]
    pub top_k: u32,
    #[serde(rename = "topP")]
    pub top_p: f32,
    #[serde(rename = "maxOutputTokens")]
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 2048,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub error: Option<ApiErrorBody>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    #[serde(rename = "finishReason")]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub message: Option<String>,
}

fn safety_settings() -> Vec<SafetySetting> {
    [
        "HARM_CATEGORY_HARASSMENT",
        "HARM_CATEGORY_HATE_SPEECH",
        "HARM_CATEGORY_SEXUALLY_EXPLICIT",
        "HARM_CATEGORY_DANGEROUS_CONTENT",
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: "BLOCK_MEDIUM_AND_ABOVE",
    })
    .collect()
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            retry_window: Duration::from_secs(120),
        }
    }

    /// Total time spent retrying transient failures before giving up
    pub fn with_retry_window(mut self, window: Duration) -> Self {
        self.retry_window = window;
        self
    }

    pub async fn generate_text(&self, prompt: &str) -> Result<String, VendorError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part::Text {
                    text: prompt.to_string(),
                }],
                role: None,
            }],
            generation_config: GenerationConfig::default(),
            safety_settings: safety_settings(),
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, MODEL);

        let backoff_config = ExponentialBackoff {
            initial_interval: Duration::from_secs(1),
            max_interval: Duration::from_secs(15),
            multiplier: 2.0,
            max_elapsed_time: Some(self.retry_window),
            ..Default::default()
        };

        // Retry connection errors, timeouts and 429/500/502/503
        let operation = || async {
            let response = self
                .client
                .post(&url)
                .query(&[("key", &self.api_key)])
                .timeout(Duration::from_secs(60))
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_connect() || e.is_timeout() {
                        tracing::warn!("Gemini API connection error (retrying): {}", e);
                        backoff::Error::transient(VendorError::Http {
                            service: SERVICE,
                            source: e,
                        })
                    } else {
                        backoff::Error::permanent(VendorError::Http {
                            service: SERVICE,
                            source: e,
                        })
                    }
                })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| backoff::Error::permanent(VendorError::http(SERVICE)(e)))?;

            if matches!(status.as_u16(), 429 | 500 | 502 | 503) {
                tracing::warn!("Gemini API returned {} (retrying): {}", status, body);
                return Err(backoff::Error::transient(VendorError::Api {
                    service: SERVICE,
                    status,
                    body: error_message(&body).unwrap_or(body),
                }));
            }

            if !status.is_success() {
                tracing::error!("Gemini API permanent error ({}): {}", status, body);
                return Err(backoff::Error::permanent(VendorError::Api {
                    service: SERVICE,
                    status,
                    body: error_message(&body).unwrap_or(body),
                }));
            }

            Ok(body)
        };

        let body = retry(backoff_config, operation).await?;
        extract_text(&body)
    }

    pub async fn generate_marketing_script(
        &self,
        details: &ProductDetails,
    ) -> Result<String, VendorError> {
        tracing::info!("🤖 Generating marketing script for '{}'", details.name);
        let text = self.generate_text(&build_script_prompt(details)).await?;
        let script = clean_script(&text);
        tracing::info!("✅ Generated script ({} words)", script.split_whitespace().count());
        Ok(script)
    }

    pub async fn generate_website_features(
        &self,
        details: &ProductDetails,
    ) -> Result<Vec<Feature>, VendorError> {
        let text = self.generate_text(&build_features_prompt(details)).await?;
        parse_features(&text)
    }

    pub async fn generate_instagram_caption(
        &self,
        name: &str,
        description: &str,
        price: &str,
    ) -> Result<String, VendorError> {
        let text = self
            .generate_text(&build_caption_prompt(name, description, price))
            .await?;
        Ok(text.trim().to_string())
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<GenerateContentResponse>(body)
        .ok()?
        .error?
        .message
}

/// Pull the first text part out of a generateContent body
pub fn extract_text(body: &str) -> Result<String, VendorError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(VendorError::decode(SERVICE))?;

    if let Some(error) = response.error {
        return Err(VendorError::TaskFailed {
            service: SERVICE,
            message: error.message.unwrap_or_else(|| "unknown error".to_string()),
        });
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "candidates",
        })?;

    match candidate.finish_reason.as_deref() {
        Some("SAFETY") => {
            return Err(VendorError::TaskFailed {
                service: SERVICE,
                message: "content was blocked by safety filters".to_string(),
            })
        }
        Some("MAX_TOKENS") => {
            tracing::warn!("Gemini response hit MAX_TOKENS, using partial text");
        }
        _ => {}
    }

    let content = candidate.content.ok_or(VendorError::MissingField {
        service: SERVICE,
        field: "content",
    })?;

    content
        .parts
        .into_iter()
        .find_map(|part| match part {
            Part::Text { text } => Some(text),
            Part::Other(_) => None,
        })
        .ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "text",
        })
}

fn push_field(prompt: &mut String, label: &str, value: &str) {
    if !value.trim().is_empty() {
        prompt.push_str(&format!("- {}: {}\n", label, value.trim()));
    }
}

pub fn build_script_prompt(details: &ProductDetails) -> String {
    let mut prompt = String::from(
        "You are an expert marketing copywriter specializing in short-form video content. \
         Create a compelling 15-second marketing script for a product video.\n\nPRODUCT DETAILS:\n",
    );
    push_field(&mut prompt, "Product Name", &details.name);
    push_field(&mut prompt, "Description", &details.description);
    push_field(&mut prompt, "Category", &details.category);
    push_field(&mut prompt, "Price", &details.price);

    prompt.push_str(
        "\nREQUIREMENTS:\n\
         1. The script must be exactly 15 seconds when spoken (approximately 35-40 words)\n\
         2. Start with an attention-grabbing hook\n\
         3. Highlight the key benefit or unique selling point\n\
         4. Create urgency or excitement\n\
         5. End with a clear call-to-action\n\
         6. Use conversational, energetic language suitable for social media\n\
         7. Do not include stage directions, emojis or hashtags\n\
         8. Return only the script text, nothing else\n\n\
         Now generate the script:",
    );
    prompt
}

fn build_features_prompt(details: &ProductDetails) -> String {
    let mut prompt = String::from(
        "Generate 4 key features for a product marketing website.\n\nPRODUCT DETAILS:\n",
    );
    push_field(&mut prompt, "Product Name", &details.name);
    push_field(&mut prompt, "Description", &details.description);
    push_field(&mut prompt, "Category", &details.category);

    prompt.push_str(
        "\nReturn ONLY a JSON array of exactly 4 objects, each with the keys \
         \"icon\" (a single emoji), \"title\" (2-4 words) and \"description\" (one sentence). \
         Do not wrap the JSON in markdown.",
    );
    prompt
}

fn build_caption_prompt(name: &str, description: &str, price: &str) -> String {
    let mut prompt = String::from(
        "Write an engaging Instagram Reels caption for this product.\n\nPRODUCT DETAILS:\n",
    );
    push_field(&mut prompt, "Product Name", name);
    push_field(&mut prompt, "Description", description);
    push_field(&mut prompt, "Price", price);
    prompt.push_str(
        "\nStart with a hook, keep it under 150 words, use a few emojis, \
         end with a call-to-action and 5-8 relevant hashtags. Return only the caption.",
    );
    prompt
}

/// Strip whitespace and wrapping double quotes the model likes to add
pub fn clean_script(text: &str) -> String {
    text.trim().trim_matches('"').trim().to_string()
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    icon: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

fn non_empty(value: Option<String>, fallback: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

/// Parse the model's feature list, always returning exactly four entries
pub fn parse_features(text: &str) -> Result<Vec<Feature>, VendorError> {
    let cleaned = CODE_FENCE.replace_all(text, "");
    let raw: Vec<RawFeature> =
        serde_json::from_str(cleaned.trim()).map_err(VendorError::decode(SERVICE))?;

    let mut features: Vec<Feature> = raw
        .into_iter()
        .take(FEATURE_COUNT)
        .map(|f| Feature {
            icon: non_empty(f.icon, "✨"),
            title: non_empty(f.title, "Feature"),
            description: non_empty(f.description, "Experience the difference."),
        })
        .collect();

    let missing = FEATURE_COUNT.saturating_sub(features.len());
    features.extend(default_features().into_iter().skip(FEATURE_COUNT - missing));
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn details() -> ProductDetails {
        ProductDetails {
            name: "Aero Bottle".to_string(),
            description: "Keeps drinks cold for 24 hours".to_string(),
            category: String::new(),
            price: "$29".to_string(),
        }
    }

    #[test]
    fn test_script_prompt_omits_blank_fields() {
        let prompt = build_script_prompt(&details());
        assert!(prompt.contains("- Product Name: Aero Bottle"));
        assert!(prompt.contains("- Price: $29"));
        assert!(!prompt.contains("Category"));
        assert!(prompt.contains("35-40 words"));
        assert!(prompt.ends_with("Now generate the script:"));
    }

    #[test]
    fn test_clean_script() {
        assert_eq!(clean_script("  \"Grab yours today!\"\n"), "Grab yours today!");
        assert_eq!(clean_script("No quotes"), "No quotes");
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"Hello"}],"role":"model"},"finishReason":"STOP"}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Hello");

        let truncated = r#"{"candidates":[{"content":{"parts":[{"text":"Partial"}]},"finishReason":"MAX_TOKENS"}]}"#;
        assert_eq!(extract_text(truncated).unwrap(), "Partial");
    }

    #[test]
    fn test_extract_text_failures() {
        let blocked = r#"{"candidates":[{"finishReason":"SAFETY"}]}"#;
        assert!(matches!(extract_text(blocked), Err(VendorError::TaskFailed { .. })));

        let empty = r#"{"candidates":[]}"#;
        assert!(matches!(
            extract_text(empty),
            Err(VendorError::MissingField { field: "candidates", .. })
        ));

        let no_text = r#"{"candidates":[{"content":{"parts":[]}}]}"#;
        assert!(matches!(
            extract_text(no_text),
            Err(VendorError::MissingField { field: "text", .. })
        ));

        let error = r#"{"error":{"message":"API key not valid"}}"#;
        let err = extract_text(error).unwrap_err();
        assert_eq!(err.to_string(), "Gemini error: API key not valid");
    }

    #[test]
    fn test_parse_features_strips_fences_and_fills_gaps() {
        let text = "```json\n[{\"icon\":\"🧊\",\"title\":\"Ice Cold\",\"description\":\"Cold for a day.\"},{\"title\":\"Light\"}]\n```";
        let features = parse_features(text).unwrap();

        assert_eq!(features.len(), 4);
        assert_eq!(features[0].icon, "🧊");
        assert_eq!(features[1].icon, "✨");
        assert_eq!(features[1].description, "Experience the difference.");
        assert_eq!(features[2], default_features()[2]);
        assert_eq!(features[3], default_features()[3]);
    }

    #[test]
    fn test_parse_features_drops_extras() {
        let text = r#"[{"icon":"1","title":"a","description":"a"},{"icon":"2","title":"b","description":"b"},
            {"icon":"3","title":"c","description":"c"},{"icon":"4","title":"d","description":"d"},
            {"icon":"5","title":"e","description":"e"}]"#;
        let features = parse_features(text).unwrap();
        assert_eq!(features.len(), 4);
        assert_eq!(features[3].title, "d");
    }

    #[test]
    fn test_parse_features_rejects_prose() {
        assert!(parse_features("Here are some features!").is_err());
    }

    #[tokio::test]
    async fn test_generate_marketing_script() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(query_param("key", "test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {"parts": [{"text": "\"Stay cold. Stay bold. Grab yours now!\"\n"}]},
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("test-key".to_string(), server.uri());
        let script = client.generate_marketing_script(&details()).await.unwrap();
        assert_eq!(script, "Stay cold. Stay bold. Grab yours now!");
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "error": {"message": "API key not valid"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = GeminiClient::with_base_url("bad".to_string(), server.uri())
            .with_retry_window(Duration::from_millis(50));
        let err = client.generate_text("hi").await.unwrap_err();

        match err {
            VendorError::Api { status, body, .. } => {
                assert_eq!(status.as_u16(), 400);
                assert_eq!(body, "API key not valid");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
