// Temporary public hosting for local files.
// D-ID/Shotstack/Instagram only accept URLs, so local artifacts are pushed to a
// throwaway host first.

use crate::error::{ensure_success, VendorError};
use crate::http::{vendor_client, DEFAULT_REQUEST_TIMEOUT};
use reqwest::Client;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const SERVICE: &str = "File host";

#[derive(Clone)]
pub struct FileHost {
    client: Client,
    link_host_url: String,
    raw_host_url: String,
}

/// file.io style reply
#[derive(Deserialize, Debug)]
struct LinkResponse {
    #[serde(default)]
    success: bool,
    link: Option<String>,
}

impl FileHost {
    pub fn new(link_host_url: String, raw_host_url: String) -> Self {
        Self {
            client: vendor_client(DEFAULT_REQUEST_TIMEOUT),
            link_host_url: link_host_url.trim_end_matches('/').to_string(),
            raw_host_url: raw_host_url.trim_end_matches('/').to_string(),
        }
    }

    /// Uploads of large videos count against this too
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = vendor_client(timeout);
        self
    }

    async fn file_part(path: &Path, file_name: &str) -> Result<reqwest::multipart::Part, VendorError> {
        let bytes = tokio::fs::read(path).await?;
        Ok(reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string()))
    }

    /// Upload to a host that answers `{success, link}`
    pub async fn upload_for_link(&self, path: &Path) -> Result<String, VendorError> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin");
        let form = reqwest::multipart::Form::new().part("file", Self::file_part(path, file_name).await?);

        let response = self
            .client
            .post(&self.link_host_url)
            .multipart(form)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let text = response.text().await.map_err(VendorError::http(SERVICE))?;
        let body: LinkResponse = serde_json::from_str(&text).map_err(VendorError::decode(SERVICE))?;
        if !body.success {
            return Err(VendorError::TaskFailed {
                service: SERVICE,
                message: format!("upload rejected: {}", text),
            });
        }

        let link = body.link.ok_or(VendorError::MissingField {
            service: SERVICE,
            field: "link",
        })?;
        tracing::info!("📤 Uploaded {} to {}", path.display(), link);
        Ok(link)
    }

    /// Upload a video to a host that replies with the URL as plain text
    pub async fn upload_raw(&self, path: &Path) -> Result<String, VendorError> {
        let form = reqwest::multipart::Form::new().part("file", Self::file_part(path, "video.mp4").await?);

        let response = self
            .client
            .post(&self.raw_host_url)
            .multipart(form)
            .send()
            .await
            .map_err(VendorError::http(SERVICE))?;
        let response = ensure_success(SERVICE, response).await?;

        let url = response
            .text()
            .await
            .map_err(VendorError::http(SERVICE))?
            .trim()
            .to_string();
        if url.is_empty() {
            return Err(VendorError::MissingField {
                service: SERVICE,
                field: "url",
            });
        }
        tracing::info!("📤 Uploaded {} to {}", path.display(), url);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn scratch_video() -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.mp4");
        std::fs::write(&path, b"fake mp4").unwrap();
        (dir, path)
    }

    #[tokio::test]
    async fn test_upload_for_link() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "success": true,
                "link": "https://file.io/abc"
            })))
            .mount(&server)
            .await;

        let (_dir, path) = scratch_video();
        let host = FileHost::new(server.uri(), server.uri());
        assert_eq!(host.upload_for_link(&path).await.unwrap(), "https://file.io/abc");
    }

    #[tokio::test]
    async fn test_upload_for_link_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": false})))
            .mount(&server)
            .await;

        let (_dir, path) = scratch_video();
        let host = FileHost::new(server.uri(), server.uri());
        assert!(matches!(
            host.upload_for_link(&path).await,
            Err(VendorError::TaskFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_upload_raw_trims_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("https://0x0.st/Xy.mp4\n"))
            .mount(&server)
            .await;

        let (_dir, path) = scratch_video();
        let host = FileHost::new(server.uri(), server.uri());
        assert_eq!(host.upload_raw(&path).await.unwrap(), "https://0x0.st/Xy.mp4");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let host = FileHost::new("http://127.0.0.1:9".to_string(), "http://127.0.0.1:9".to_string());
        let err = host.upload_raw(Path::new("/nonexistent/video.mp4")).await.unwrap_err();
        assert!(matches!(err, VendorError::Io(_)));
    }
}
