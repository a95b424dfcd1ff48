//! Typed client for the FRED REST API.
//!
//! Every operation is a single GET with query parameters. The client checks
//! the rate limiter before any outbound I/O, attaches the two fixed
//! parameters (`api_key`, `file_type=json`) to every request, and returns the
//! response body as an opaque `serde_json::Value` — the FRED response schema
//! is not modeled here.

use crate::error::{FredError, Result};
use crate::rate_limit::RateLimiter;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org/fred";

/// Parameters for `series/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSeriesParams {
    pub search_text: String,
    pub search_type: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Option<String>,
    pub sort_order: Option<String>,
    pub tag_names: Option<String>,
}

/// Parameters for `series`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetSeriesParams {
    pub series_id: String,
}

/// Parameters for `series/observations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetObservationsParams {
    pub series_id: String,
    pub observation_start: Option<String>,
    pub observation_end: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub sort_order: Option<String>,
    pub units: Option<String>,
    pub frequency: Option<String>,
}

/// Parameters for category browsing.
///
/// The boolean flags route between sibling endpoints and are never
/// transmitted as query values: `series` selects `category/series`,
/// otherwise `children` selects `category/children`, otherwise the plain
/// `category` endpoint. `series` beats `children` when both are set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetCategoryParams {
    pub category_id: Option<u32>,
    pub children: Option<bool>,
    pub series: Option<bool>,
}

/// Parameters for `releases` / `releases/dates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetReleasesParams {
    pub dates: Option<bool>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub order_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Parameters for `series/updates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GetSeriesUpdatesParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

pub struct FredClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    limiter: RateLimiter,
}

impl FredClient {
    /// Build a client against the production FRED endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_key: impl Into<String>,
        limiter: RateLimiter,
        timeout: Duration,
    ) -> Result<Self> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, limiter, timeout)
    }

    /// Build a client against an explicit base URL (tests, proxies).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid URL or the HTTP client
    /// cannot be built.
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: &str,
        limiter: RateLimiter,
        timeout: Duration,
    ) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|e| FredError::Config(format!("invalid base URL '{base_url}': {e}")))?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FredError::from)?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            limiter,
        })
    }

    /// The rate limiter guarding this client's outbound calls.
    #[must_use]
    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    /// Search for economic data series by keyword.
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn search_series(&self, params: &SearchSeriesParams) -> Result<Value> {
        let mut query = vec![("search_text", params.search_text.clone())];
        push_opt(&mut query, "search_type", params.search_type.as_deref());
        push_opt_num(&mut query, "limit", params.limit);
        push_opt_num(&mut query, "offset", params.offset);
        push_opt(&mut query, "order_by", params.order_by.as_deref());
        push_opt(&mut query, "sort_order", params.sort_order.as_deref());
        push_opt(&mut query, "tag_names", params.tag_names.as_deref());
        self.request("series/search", &query).await
    }

    /// Get metadata for a specific series.
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn get_series(&self, params: &GetSeriesParams) -> Result<Value> {
        let query = vec![("series_id", params.series_id.clone())];
        self.request("series", &query).await
    }

    /// Get observations (data points) for a series.
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn get_observations(&self, params: &GetObservationsParams) -> Result<Value> {
        let mut query = vec![("series_id", params.series_id.clone())];
        push_opt(
            &mut query,
            "observation_start",
            params.observation_start.as_deref(),
        );
        push_opt(
            &mut query,
            "observation_end",
            params.observation_end.as_deref(),
        );
        push_opt_num(&mut query, "limit", params.limit);
        push_opt_num(&mut query, "offset", params.offset);
        push_opt(&mut query, "sort_order", params.sort_order.as_deref());
        push_opt(&mut query, "units", params.units.as_deref());
        push_opt(&mut query, "frequency", params.frequency.as_deref());
        self.request("series/observations", &query).await
    }

    /// Get a category, its children, or the series it contains.
    ///
    /// `category_id` defaults to 0 (the root of the category tree).
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn get_category(&self, params: &GetCategoryParams) -> Result<Value> {
        // Deliberate precedence: series, then children, then the category
        // itself. Both flags false (or absent) falls through to the plain
        // category lookup.
        let endpoint = if params.series.unwrap_or(false) {
            "category/series"
        } else if params.children.unwrap_or(false) {
            "category/children"
        } else {
            "category"
        };
        let query = vec![("category_id", params.category_id.unwrap_or(0).to_string())];
        self.request(endpoint, &query).await
    }

    /// Get all releases, or recent release dates when `dates` is set.
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn get_releases(&self, params: &GetReleasesParams) -> Result<Value> {
        let endpoint = if params.dates.unwrap_or(false) {
            "releases/dates"
        } else {
            "releases"
        };
        let mut query = Vec::new();
        push_opt_num(&mut query, "limit", params.limit);
        push_opt_num(&mut query, "offset", params.offset);
        push_opt(&mut query, "order_by", params.order_by.as_deref());
        push_opt(&mut query, "sort_order", params.sort_order.as_deref());
        self.request(endpoint, &query).await
    }

    /// Get recently updated series (FRED's proxy for "popular").
    ///
    /// # Errors
    ///
    /// Rate limit, transport, or non-2xx.
    pub async fn get_series_updates(&self, params: &GetSeriesUpdatesParams) -> Result<Value> {
        let mut query = Vec::new();
        push_opt_num(&mut query, "limit", params.limit);
        push_opt_num(&mut query, "offset", params.offset);
        self.request("series/updates", &query).await
    }

    async fn request(&self, endpoint: &str, query: &[(&'static str, String)]) -> Result<Value> {
        // Fail before any outbound I/O; the rejected attempt is not counted.
        self.limiter.check_and_record()?;

        let url = self.build_url(endpoint, query)?;
        tracing::debug!(endpoint, "outbound FRED request");

        let response = self.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status.is_success() {
            serde_json::from_str(&body).map_err(|e| FredError::InvalidResponse(e.to_string()))
        } else {
            Err(FredError::Api {
                status: status.as_u16(),
                body,
            })
        }
    }

    fn build_url(&self, endpoint: &str, query: &[(&'static str, String)]) -> Result<Url> {
        let raw = format!("{}/{endpoint}", self.base_url);
        let mut url =
            Url::parse(&raw).map_err(|e| FredError::Config(format!("invalid URL '{raw}': {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("api_key", &self.api_key);
            pairs.append_pair("file_type", "json");
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }
}

/// Append an optional string parameter; absent or empty values are omitted
/// entirely rather than sent as empty pairs.
fn push_opt(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(v) = value
        && !v.is_empty()
    {
        query.push((key, v.to_string()));
    }
}

fn push_opt_num(query: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<u32>) {
    if let Some(v) = value {
        query.push((key, v.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::http::{StatusCode, Uri};
    use axum::routing::any;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::net::TcpListener;

    const WINDOW: Duration = Duration::from_secs(60);
    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Echo server returning the request path and raw query string.
    async fn spawn_echo() -> (String, tokio::sync::oneshot::Sender<()>) {
        async fn echo_handler(uri: Uri) -> axum::Json<serde_json::Value> {
            axum::Json(json!({
                "path": uri.path(),
                "query": uri.query().unwrap_or(""),
            }))
        }
        let app = Router::new().route("/{*path}", any(echo_handler));
        spawn_app(app).await
    }

    async fn spawn_app(app: Router) -> (String, tokio::sync::oneshot::Sender<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local_addr");
        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        tokio::spawn(async move {
            let _ = server.await;
        });
        (format!("http://{addr}/fred"), shutdown_tx)
    }

    fn client(base_url: &str) -> FredClient {
        FredClient::with_base_url("test-key", base_url, RateLimiter::new(120, WINDOW), TIMEOUT)
            .expect("valid base URL")
    }

    fn echoed(value: &serde_json::Value) -> (String, Vec<(String, String)>) {
        let path = value["path"].as_str().expect("path").to_string();
        let query = value["query"].as_str().expect("query");
        let pairs = url::form_urlencoded::parse(query.as_bytes())
            .into_owned()
            .collect();
        (path, pairs)
    }

    fn param<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
        pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[tokio::test]
    async fn search_series_sends_required_and_fixed_params() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .search_series(&SearchSeriesParams {
                search_text: "gdp".to_string(),
                limit: Some(5),
                ..Default::default()
            })
            .await
            .expect("search_series");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/series/search");
        assert_eq!(param(&pairs, "api_key"), Some("test-key"));
        assert_eq!(param(&pairs, "file_type"), Some("json"));
        assert_eq!(param(&pairs, "search_text"), Some("gdp"));
        assert_eq!(param(&pairs, "limit"), Some("5"));
    }

    #[tokio::test]
    async fn absent_and_empty_optionals_are_omitted() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .search_series(&SearchSeriesParams {
                search_text: "cpi".to_string(),
                sort_order: Some(String::new()),
                ..Default::default()
            })
            .await
            .expect("search_series");

        let (_, pairs) = echoed(&result);
        assert_eq!(param(&pairs, "sort_order"), None);
        assert_eq!(param(&pairs, "order_by"), None);
        assert_eq!(param(&pairs, "limit"), None);
        assert_eq!(param(&pairs, "offset"), None);
    }

    #[tokio::test]
    async fn get_series_sends_series_id() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_series(&GetSeriesParams {
                series_id: "GDP".to_string(),
            })
            .await
            .expect("get_series");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/series");
        assert_eq!(param(&pairs, "series_id"), Some("GDP"));
    }

    #[tokio::test]
    async fn get_observations_with_date_range_and_units() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_observations(&GetObservationsParams {
                series_id: "UNRATE".to_string(),
                observation_start: Some("2020-01-01".to_string()),
                observation_end: Some("2023-12-31".to_string()),
                units: Some("lin".to_string()),
                ..Default::default()
            })
            .await
            .expect("get_observations");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/series/observations");
        assert_eq!(param(&pairs, "series_id"), Some("UNRATE"));
        assert_eq!(param(&pairs, "observation_start"), Some("2020-01-01"));
        assert_eq!(param(&pairs, "observation_end"), Some("2023-12-31"));
        assert_eq!(param(&pairs, "units"), Some("lin"));
        assert_eq!(param(&pairs, "frequency"), None);
    }

    #[tokio::test]
    async fn get_category_defaults_to_root() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_category(&GetCategoryParams::default())
            .await
            .expect("get_category");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/category");
        assert_eq!(param(&pairs, "category_id"), Some("0"));
    }

    #[tokio::test]
    async fn get_category_children_routes_to_children_endpoint() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_category(&GetCategoryParams {
                category_id: Some(32991),
                children: Some(true),
                series: None,
            })
            .await
            .expect("get_category");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/category/children");
        assert_eq!(param(&pairs, "category_id"), Some("32991"));
    }

    #[tokio::test]
    async fn get_category_series_flag_beats_children() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_category(&GetCategoryParams {
                category_id: Some(125),
                children: Some(true),
                series: Some(true),
            })
            .await
            .expect("get_category");

        let (path, _) = echoed(&result);
        assert_eq!(path, "/fred/category/series");
    }

    #[tokio::test]
    async fn get_releases_plain_and_dates_endpoints() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_releases(&GetReleasesParams {
                limit: Some(10),
                ..Default::default()
            })
            .await
            .expect("get_releases");
        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/releases");
        assert_eq!(param(&pairs, "limit"), Some("10"));
        assert_eq!(param(&pairs, "dates"), None);

        let result = client
            .get_releases(&GetReleasesParams {
                dates: Some(true),
                ..Default::default()
            })
            .await
            .expect("get_releases dates");
        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/releases/dates");
        assert_eq!(param(&pairs, "dates"), None);
    }

    #[tokio::test]
    async fn get_series_updates_sends_paging_params() {
        let (base, _shutdown) = spawn_echo().await;
        let client = client(&base);

        let result = client
            .get_series_updates(&GetSeriesUpdatesParams {
                limit: Some(5),
                offset: Some(10),
            })
            .await
            .expect("get_series_updates");

        let (path, pairs) = echoed(&result);
        assert_eq!(path, "/fred/series/updates");
        assert_eq!(param(&pairs, "limit"), Some("5"));
        assert_eq!(param(&pairs, "offset"), Some("10"));
    }

    #[tokio::test]
    async fn non_2xx_response_surfaces_status_and_body() {
        async fn bad_request() -> (StatusCode, String) {
            (
                StatusCode::BAD_REQUEST,
                json!({"error_message": "Bad Request"}).to_string(),
            )
        }
        let app = Router::new().route("/{*path}", any(bad_request));
        let (base, _shutdown) = spawn_app(app).await;
        let client = client(&base);

        let err = client
            .get_series(&GetSeriesParams {
                series_id: "INVALID".to_string(),
            })
            .await
            .expect_err("400 response");

        match err {
            FredError::Api { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("Bad Request"));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn rate_limited_client_makes_no_outbound_call() {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = hits.clone();
        let app = Router::new().route(
            "/{*path}",
            any(move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    axum::Json(json!({}))
                }
            }),
        );
        let (base, _shutdown) = spawn_app(app).await;

        let client =
            FredClient::with_base_url("test-key", &base, RateLimiter::new(1, WINDOW), TIMEOUT)
                .expect("valid base URL");

        client
            .get_series(&GetSeriesParams {
                series_id: "GDP".to_string(),
            })
            .await
            .expect("first call within limit");

        let err = client
            .get_series(&GetSeriesParams {
                series_id: "GDP".to_string(),
            })
            .await
            .expect_err("second call rate limited");

        assert!(matches!(err, FredError::RateLimited { limit: 1, .. }));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
