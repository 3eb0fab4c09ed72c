use crate::core::error::ConvertError;
use crate::core::rate::RateProvider;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;
use tracing::{debug, instrument};

const RATE_ENDPOINT: &str = "/api/getData";

// HttpRateProvider queries the local rate service, one currency per request.
pub struct HttpRateProvider {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpRateProvider {
    pub fn new(base_url: &str) -> Result<Self> {
        let endpoint = format!("{}{}", base_url.trim_end_matches('/'), RATE_ENDPOINT);
        let endpoint = Url::parse(&endpoint)
            .with_context(|| format!("Invalid rate service URL: {base_url}"))?;
        let client = reqwest::Client::builder()
            .user_agent("cconv/1.0")
            .build()
            .context("Failed to build HTTP client")?;

        Ok(HttpRateProvider { endpoint, client })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn url_for(&self, code: &str) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut().append_pair("code", code);
        url
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    #[instrument(name = "RateFetch", skip(self), fields(code = %code))]
    async fn fetch_rate(&self, code: &str) -> Result<Value, ConvertError> {
        let url = self.url_for(code);
        debug!("Requesting rate from {}", url);

        let network_error = |source: reqwest::Error| ConvertError::Network {
            code: code.to_string(),
            source,
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(network_error)?;
        debug!(response = ?response, "Received rate response");

        let status = response.status();
        let text = response.text().await.map_err(network_error)?;

        if !status.is_success() {
            return Err(ConvertError::RateFetch {
                code: code.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let data: Value =
            serde_json::from_str(&text).map_err(|source| ConvertError::MalformedResponse {
                code: code.to_string(),
                source,
            })?;
        debug!(data = %data, "Decoded rate document");
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(code: &str, template: ResponseTemplate) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(RATE_ENDPOINT))
            .and(query_param("code", code))
            .respond_with(template)
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_rate_fetch() {
        let mock_response = r#"{"charCode": "USD", "name": "US Dollar", "value": 90.5}"#;
        let mock_server =
            create_mock_server("USD", ResponseTemplate::new(200).set_body_string(mock_response))
                .await;

        let provider = HttpRateProvider::new(&mock_server.uri()).unwrap();
        let data = provider.fetch_rate("USD").await.unwrap();
        assert_eq!(data["value"], 90.5);
        assert_eq!(data["name"], "US Dollar");
    }

    #[tokio::test]
    async fn test_body_returned_without_shape_checks() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string(r#"{"value": "ten"}"#),
        )
        .await;

        let provider = HttpRateProvider::new(&mock_server.uri()).unwrap();
        let data = provider.fetch_rate("USD").await.unwrap();
        assert_eq!(data["value"], "ten");
    }

    #[tokio::test]
    async fn test_error_status_carries_body() {
        let mock_server = create_mock_server(
            "XXX",
            ResponseTemplate::new(500).set_body_string("Currency XXX not found"),
        )
        .await;

        let provider = HttpRateProvider::new(&mock_server.uri()).unwrap();
        let err = provider.fetch_rate("XXX").await.unwrap_err();
        match &err {
            ConvertError::RateFetch { code, status, body } => {
                assert_eq!(code, "XXX");
                assert_eq!(*status, 500);
                assert_eq!(body, "Currency XXX not found");
            }
            other => panic!("Expected RateFetch, got {other:?}"),
        }
        assert_eq!(
            err.to_string(),
            "Failed to load rate for XXX: 500 - Currency XXX not found"
        );
    }

    #[tokio::test]
    async fn test_malformed_json_response() {
        let mock_server = create_mock_server(
            "USD",
            ResponseTemplate::new(200).set_body_string("<html>oops</html>"),
        )
        .await;

        let provider = HttpRateProvider::new(&mock_server.uri()).unwrap();
        let err = provider.fetch_rate("USD").await.unwrap_err();
        assert!(matches!(err, ConvertError::MalformedResponse { .. }));
        assert!(
            err.to_string()
                .contains("Failed to parse JSON response for USD")
        );
    }

    #[tokio::test]
    async fn test_unreachable_service() {
        // Nothing listens on the discard port.
        let provider = HttpRateProvider::new("http://127.0.0.1:9").unwrap();
        let err = provider.fetch_rate("USD").await.unwrap_err();
        assert!(matches!(err, ConvertError::Network { .. }));
    }

    #[test]
    fn test_endpoint_url() {
        let provider = HttpRateProvider::new("http://localhost:8082/").unwrap();
        assert_eq!(
            provider.endpoint().as_str(),
            "http://localhost:8082/api/getData"
        );
        assert_eq!(
            provider.url_for("EUR").as_str(),
            "http://localhost:8082/api/getData?code=EUR"
        );
        assert!(HttpRateProvider::new("not a url").is_err());
    }
}
