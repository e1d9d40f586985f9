// src/http.rs
//! reqwest client shared by the vendor integrations.

use reqwest::Client;
use std::time::Duration;

/// Ceiling on a single vendor call, body download included
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

pub fn vendor_client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .connect_timeout(CONNECT_TIMEOUT.min(timeout))
        .build()
        .unwrap_or_else(|e| {
            tracing::error!("Failed to build HTTP client with timeouts: {}", e);
            Client::new()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_slow_response_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let err = vendor_client(Duration::from_millis(100))
            .get(server.uri())
            .send()
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
