use std::time::Duration;

use log::{debug, warn};
use reqwest::{Client, StatusCode, Url};

use crate::types::{ChargerStatus, PlaceDetailsResponse, PlacesError};

/// Header carrying the Places API key
pub const API_KEY_HEADER: &str = "X-Goog-Api-Key";

/// Header restricting which place fields the API returns
pub const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// Configuration for the Places API client
#[derive(Debug, Clone)]
pub struct PlacesClientConfig {
    /// Base URL of the Places API (default: `https://places.googleapis.com/v1`)
    pub base_url: String,

    /// Field mask sent with every request (default: `evChargeOptions`)
    pub field_mask: String,

    /// Request timeout (default: 10 seconds)
    pub timeout: Duration,
}

impl Default for PlacesClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://places.googleapis.com/v1".to_string(),
            field_mask: "evChargeOptions".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// Client for the Google Places place details endpoint
pub struct PlacesClient {
    client: Client,
    api_key: String,
    config: PlacesClientConfig,
}

impl PlacesClient {
    /// Create a new Places API client
    pub fn new(
        api_key: impl Into<String>,
        config: Option<PlacesClientConfig>,
    ) -> Result<Self, PlacesError> {
        let config = config.unwrap_or_default();

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| PlacesError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            config,
        })
    }

    /// Build the details URL for a place
    pub fn place_url(&self, place_id: &str) -> Result<Url, PlacesError> {
        if place_id.trim().is_empty() {
            return Err(PlacesError::InvalidUrl("place id is empty".to_string()));
        }

        let url = format!(
            "{}/places/{}",
            self.config.base_url.trim_end_matches('/'),
            urlencoding::encode(place_id)
        );

        Url::parse(&url).map_err(|e| PlacesError::InvalidUrl(format!("{}: {}", url, e)))
    }

    /// Get the EV charging details of a place
    pub async fn get_place_details(
        &self,
        place_id: &str,
    ) -> Result<PlaceDetailsResponse, PlacesError> {
        let url = self.place_url(place_id)?;
        debug!("Fetching place details from {}", url);

        let response = self
            .client
            .get(url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(API_KEY_HEADER, &self.api_key)
            .header(FIELD_MASK_HEADER, &self.config.field_mask)
            .send()
            .await
            .map_err(|e| PlacesError::Network(format!("HTTP request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PlacesError::Network(format!("Failed to read response body: {}", e)))?;

        if !status.is_success() {
            warn!("Places API request failed with status {}: {}", status, body);
            return Err(status_error(status, &body));
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!("Unexpected place details response: {}", body);
            PlacesError::DataFormat(format!("Failed to parse response: {}", e))
        })
    }

    /// Fetch the availability of the slowest connector class at a place
    pub async fn fetch_connector_data(&self, place_id: &str) -> Result<ChargerStatus, PlacesError> {
        let details = self.get_place_details(place_id).await?;
        Ok(ChargerStatus::from_response(&details))
    }
}

/// Map a non-success status to an error
fn status_error(status: StatusCode, body: &str) -> PlacesError {
    match status.as_u16() {
        429 => PlacesError::RateLimited,
        401 | 403 => PlacesError::AuthenticationFailed,
        404 => PlacesError::NotFound,
        _ => PlacesError::ApiError(format!("HTTP {} - {}", status, body)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> PlacesClient {
        PlacesClient::new("test-key", None).unwrap()
    }

    fn client_for(base_url: &str) -> PlacesClient {
        let config = PlacesClientConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        PlacesClient::new("test-key", Some(config)).unwrap()
    }

    /// Serves one canned HTTP response on a local port and returns the raw request
    async fn serve_once(response: String) -> (String, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);

                if let Some(end) = request.windows(4).position(|w| w == b"\r\n\r\n") {
                    let head = String::from_utf8_lossy(&request[..end]).to_lowercase();
                    let content_length = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|value| value.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if request.len() >= end + 4 + content_length {
                        break;
                    }
                }
            }

            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).to_string()
        });

        (base_url, handle)
    }

    fn http_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        )
    }

    #[test]
    fn test_place_url() {
        let url = client().place_url("ChIJlf0s_HFLtokRRa9H_ouBaLM").unwrap();
        assert_eq!(
            url.as_str(),
            "https://places.googleapis.com/v1/places/ChIJlf0s_HFLtokRRa9H_ouBaLM"
        );
    }

    #[test]
    fn test_place_url_encodes_place_id() {
        let url = client().place_url("a b/c").unwrap();
        assert_eq!(
            url.as_str(),
            "https://places.googleapis.com/v1/places/a%20b%2Fc"
        );
    }

    #[test]
    fn test_place_url_rejects_empty_id() {
        assert!(matches!(
            client().place_url("  "),
            Err(PlacesError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_place_url_rejects_bad_base() {
        let config = PlacesClientConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        let client = PlacesClient::new("test-key", Some(config)).unwrap();

        assert!(matches!(
            client.place_url("abc"),
            Err(PlacesError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_status_error_mapping() {
        assert!(matches!(
            status_error(StatusCode::TOO_MANY_REQUESTS, ""),
            PlacesError::RateLimited
        ));
        assert!(matches!(
            status_error(StatusCode::FORBIDDEN, ""),
            PlacesError::AuthenticationFailed
        ));
        assert!(matches!(
            status_error(StatusCode::UNAUTHORIZED, ""),
            PlacesError::AuthenticationFailed
        ));
        assert!(matches!(
            status_error(StatusCode::NOT_FOUND, ""),
            PlacesError::NotFound
        ));
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            PlacesError::ApiError(msg) if msg.contains("boom")
        ));
    }

    #[tokio::test]
    async fn test_invalid_place_id_fails_before_request() {
        let result = client().fetch_connector_data("").await;
        assert!(matches!(result, Err(PlacesError::InvalidUrl(_))));
    }

    #[tokio::test]
    async fn test_fetch_sends_key_and_field_mask() {
        let body = r#"{"evChargeOptions":{"connectorAggregation":[
            {"type":"EV_CONNECTOR_TYPE_CCS_COMBO_1","maxChargeRateKw":150,"count":2,"availableCount":0},
            {"type":"EV_CONNECTOR_TYPE_J1772","maxChargeRateKw":6.5,"count":4,"availableCount":3}
        ]}}"#;
        let (base_url, server) = serve_once(http_response("200 OK", body)).await;

        let status = client_for(&base_url)
            .fetch_connector_data("ChIJlf0s_HFLtokRRa9H_ouBaLM")
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.starts_with("GET /places/ChIJlf0s_HFLtokRRa9H_ouBaLM HTTP/1.1\r\n"));

        let headers = request.to_lowercase();
        assert!(headers.contains("x-goog-api-key: test-key\r\n"));
        assert!(headers.contains("x-goog-fieldmask: evchargeoptions\r\n"));
        assert!(headers.contains("content-type: application/json\r\n"));

        assert!(status.available);
        assert_eq!(status.available_count, 3);
        assert_eq!(status.total_count, 4);
        assert_eq!(status.max_charge_rate_kw, Some(6.5));
    }

    #[tokio::test]
    async fn test_fetch_empty_place_is_no_data() {
        let (base_url, server) = serve_once(http_response("200 OK", "{}")).await;

        let status = client_for(&base_url).fetch_connector_data("abc").await.unwrap();
        server.await.unwrap();

        assert_eq!(status, ChargerStatus::no_data());
    }

    #[tokio::test]
    async fn test_fetch_maps_not_found() {
        let (base_url, server) = serve_once(http_response(
            "404 Not Found",
            r#"{"error":{"code":404,"status":"NOT_FOUND"}}"#,
        ))
        .await;

        let result = client_for(&base_url).fetch_connector_data("missing").await;
        server.await.unwrap();

        assert!(matches!(result, Err(PlacesError::NotFound)));
    }

    #[tokio::test]
    async fn test_fetch_maps_server_error() {
        let (base_url, server) =
            serve_once(http_response("500 Internal Server Error", "backend exploded")).await;

        let result = client_for(&base_url).fetch_connector_data("abc").await;
        server.await.unwrap();

        assert!(matches!(
            result,
            Err(PlacesError::ApiError(msg)) if msg.contains("500") && msg.contains("backend exploded")
        ));
    }

    #[tokio::test]
    async fn test_fetch_rejects_malformed_body() {
        let (base_url, server) = serve_once(http_response("200 OK", "not json")).await;

        let result = client_for(&base_url).fetch_connector_data("abc").await;
        server.await.unwrap();

        assert!(matches!(result, Err(PlacesError::DataFormat(_))));
    }

    #[tokio::test]
    async fn test_fetch_rejects_wrong_shape() {
        let (base_url, server) = serve_once(http_response(
            "200 OK",
            r#"{"evChargeOptions":{"connectorAggregation":"soon"}}"#,
        ))
        .await;

        let result = client_for(&base_url).fetch_connector_data("abc").await;
        server.await.unwrap();

        assert!(matches!(result, Err(PlacesError::DataFormat(_))));
    }
}
