use crate::metrics::{ApiMetrics, MetricsCollector, RequestMetrics};
use pullsearch_core::{
    ApiError, AppConfig, CoreError, SearchFilters, SearchResponse, MAX_PAGE_SIZE,
};
use reqwest::header::ACCEPT;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use url::Url;

pub const PULLPUSH_API_BASE: &str = "https://api.pullpush.io/reddit/search";
pub const DEFAULT_USER_AGENT: &str = "Reddit-Search-App/1.0.0";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body the service sends alongside a non-success status.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// Client for the PullPush archive search endpoints.
///
/// Every call is a single GET; nothing is retried.
#[derive(Debug, Clone)]
pub struct PullPushClient {
    http_client: Client,
    metrics: Arc<MetricsCollector>,
    base_url: String,
    max_page_size: u32,
}

impl PullPushClient {
    pub fn new(user_agent: String) -> Result<Self, CoreError> {
        Self::with_settings(
            PULLPUSH_API_BASE.to_string(),
            user_agent,
            DEFAULT_TIMEOUT,
            MAX_PAGE_SIZE,
        )
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, CoreError> {
        Self::with_settings(
            config.api_base_url.clone(),
            config.user_agent.clone(),
            config.timeout(),
            config.max_page_size,
        )
    }

    pub fn with_settings(
        base_url: String,
        user_agent: String,
        timeout: Duration,
        max_page_size: u32,
    ) -> Result<Self, CoreError> {
        let http_client = Client::builder()
            .user_agent(&user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http_client,
            metrics: Arc::new(MetricsCollector::new()),
            base_url: base_url.trim_end_matches('/').to_string(),
            max_page_size,
        })
    }

    /// Exact URL `search` requests for `filters`, query string included.
    pub fn request_url(&self, filters: &SearchFilters) -> Result<Url, ApiError> {
        let endpoint = format!("{}/{}/", self.base_url, filters.search_type.as_str());
        Url::parse_with_params(&endpoint, filters.query_pairs(self.max_page_size)).map_err(|e| {
            ApiError::Unexpected {
                details: format!("invalid request URL {}: {}", endpoint, e),
            }
        })
    }

    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResponse, ApiError> {
        let endpoint = format!("/{}/", filters.search_type.as_str());
        let start_time = Instant::now();

        let url = self.request_url(filters)?;
        info!("Searching {} for {:?} (page {})", endpoint, filters.query.trim(), filters.page);
        debug!("Request URL: {}", url);

        let (status_code, outcome) = match self
            .http_client
            .get(url)
            .header(ACCEPT, "application/json")
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status().as_u16();
                (Some(status), Self::read_response(response).await)
            }
            Err(e) => (None, Err(Self::classify_transport_error(e))),
        };

        let request_metrics = RequestMetrics {
            endpoint,
            status_code,
            response_time: start_time.elapsed(),
            success: outcome.is_ok(),
        };
        self.metrics.record_request(request_metrics).await;

        if let Ok(response) = &outcome {
            info!(
                "Received {} results (total {})",
                response.data.len(),
                response.total()
            );
        }
        outcome
    }

    async fn read_response(response: Response) -> Result<SearchResponse, ApiError> {
        let status = response.status();

        if !status.is_success() {
            error!("Search request failed with status: {}", status);
            let message = match response.text().await {
                Ok(body) => serde_json::from_str::<ErrorBody>(&body)
                    .ok()
                    .and_then(|body| body.message),
                Err(e) => {
                    warn!("Failed to read error body: {}", e);
                    None
                }
            };
            return Err(ApiError::rejected(message, status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(Self::classify_transport_error)?;
        serde_json::from_slice::<SearchResponse>(&body).map_err(|e| {
            error!("Failed to parse search response: {}", e);
            ApiError::Unexpected {
                details: format!("invalid response body: {}", e),
            }
        })
    }

    fn classify_transport_error(e: reqwest::Error) -> ApiError {
        if e.is_builder() || e.is_redirect() {
            error!("Request could not be built: {}", e);
            ApiError::Unexpected {
                details: e.to_string(),
            }
        } else {
            error!("No response from search service: {}", e);
            ApiError::NoResponse {
                details: e.to_string(),
            }
        }
    }

    pub async fn get_metrics(&self) -> ApiMetrics {
        self.metrics.get_metrics().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pullsearch_core::{SearchType, SortDirection, SortType};

    #[test]
    fn test_client_creation() {
        let client = PullPushClient::new("test-user-agent/1.0".to_string()).unwrap();
        let url = client.request_url(&SearchFilters::default()).unwrap();
        assert!(url.as_str().starts_with(PULLPUSH_API_BASE));
    }

    #[test]
    fn test_request_url_matches_sent_parameters() {
        let client = PullPushClient::new(DEFAULT_USER_AGENT.to_string()).unwrap();
        let filters = SearchFilters {
            query: "rust lang".to_string(),
            search_type: SearchType::Comment,
            sort_type: SortType::Score,
            sort: SortDirection::Asc,
            size: 500,
            page: 3,
            ..Default::default()
        };

        let url = client.request_url(&filters).unwrap();
        assert_eq!(url.path(), "/reddit/search/comment/");
        assert_eq!(
            url.query(),
            Some("q=rust+lang&sort_type=score&sort=asc&size=100&page=3")
        );
    }

    #[test]
    fn test_request_url_respects_configured_ceiling() {
        let client = PullPushClient::with_settings(
            "http://localhost:9/api/".to_string(),
            DEFAULT_USER_AGENT.to_string(),
            DEFAULT_TIMEOUT,
            50,
        )
        .unwrap();
        let filters = SearchFilters {
            query: "q".to_string(),
            size: 75,
            ..Default::default()
        };
        let url = client.request_url(&filters).unwrap();
        assert!(url.as_str().starts_with("http://localhost:9/api/submission/?"));
        assert!(url.query().unwrap().contains("size=50"));
    }

    #[tokio::test]
    async fn test_metrics_start_empty() {
        let client = PullPushClient::new(DEFAULT_USER_AGENT.to_string()).unwrap();
        assert_eq!(client.get_metrics().await.total_requests, 0);
    }
}
