//! HTTP order API client.
//!
//! Posts [`OrderRequest`]s as JSON to the configured endpoint. Each call gets
//! a fresh `Idempotency-Key` that is reused across its retries so the order
//! API can drop duplicates when a response is lost in flight.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;
use url::Url;
use uuid::Uuid;

use super::{OrderError, OrderPlacement, OrderRequest, OrderServiceInitError};
use crate::config::HttpOrderServiceConfig;

/// Header carrying the per-order idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// Upper bound for a single backoff sleep.
const MAX_BACKOFF: Duration = Duration::from_secs(5);

/// Client for an external order API.
#[derive(Clone)]
pub struct HttpOrderClient {
    inner: Arc<HttpOrderClientInner>,
}

struct HttpOrderClientInner {
    client: reqwest::Client,
    endpoint: Url,
    max_retries: u32,
    initial_backoff: Duration,
}

impl HttpOrderClient {
    /// Create a new order API client.
    ///
    /// # Errors
    ///
    /// Returns error if the API key is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &HttpOrderServiceConfig) -> Result<Self, OrderServiceInitError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", config.api_key.expose_secret()))
                .map_err(|e| OrderServiceInitError::InvalidApiKey(e.to_string()))?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(HttpOrderClientInner {
                client,
                endpoint: config.url.clone(),
                max_retries: config.max_retries,
                initial_backoff: config.initial_backoff,
            }),
        })
    }

    /// Make a single attempt.
    async fn send_once(
        &self,
        request: &OrderRequest,
        idempotency_key: &str,
    ) -> Result<(), OrderError> {
        let response = self
            .inner
            .client
            .post(self.inner.endpoint.clone())
            .header(IDEMPOTENCY_KEY_HEADER, idempotency_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(OrderError::RateLimited(retry_after));
        }

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OrderError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }
}

#[async_trait]
impl OrderPlacement for HttpOrderClient {
    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    async fn place_order(&self, request: &OrderRequest) -> Result<(), OrderError> {
        let idempotency_key = Uuid::new_v4().to_string();
        let mut attempt: u32 = 0;

        loop {
            match self.send_once(request, &idempotency_key).await {
                Ok(()) => {
                    tracing::info!(attempt, %idempotency_key, "Order placed");
                    return Ok(());
                }
                Err(e) if e.is_transient() && attempt < self.inner.max_retries => {
                    let delay = backoff_delay(self.inner.initial_backoff, attempt, &e);
                    tracing::warn!(
                        attempt,
                        error = %e,
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Order attempt failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => {
                    tracing::error!(attempt, error = %e, %idempotency_key, "Order placement failed");
                    return Err(e);
                }
            }
        }
    }

    fn name(&self) -> &'static str {
        "http"
    }
}

/// Delay before retry number `attempt + 1`.
///
/// Exponential from `initial`, honoring a server `Retry-After`, capped at
/// [`MAX_BACKOFF`].
fn backoff_delay(initial: Duration, attempt: u32, error: &OrderError) -> Duration {
    let exponential = initial.saturating_mul(2_u32.saturating_pow(attempt));
    let delay = match error {
        OrderError::RateLimited(secs) => exponential.max(Duration::from_secs(*secs)),
        _ => exponential,
    };
    delay.min(MAX_BACKOFF)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use axum::{Json, Router, extract::State, http::HeaderMap as AxumHeaderMap, http::StatusCode, routing::post};
    use secrecy::SecretString;

    use dev_books_core::BookId;

    use super::*;

    #[derive(Clone, Default)]
    struct Recorded {
        calls: Arc<Mutex<Vec<(Option<String>, Option<String>, OrderRequest)>>>,
        statuses: Arc<Mutex<Vec<StatusCode>>>,
    }

    async fn handler(
        State(recorded): State<Recorded>,
        headers: AxumHeaderMap,
        Json(body): Json<OrderRequest>,
    ) -> StatusCode {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from)
        };
        recorded.calls.lock().unwrap().push((
            header("authorization"),
            header("idempotency-key"),
            body,
        ));
        let mut statuses = recorded.statuses.lock().unwrap();
        if statuses.is_empty() {
            StatusCode::CREATED
        } else {
            statuses.remove(0)
        }
    }

    /// Serve scripted statuses (then 201s) on an ephemeral port.
    async fn spawn_order_api(statuses: Vec<StatusCode>) -> (Url, Recorded) {
        let recorded = Recorded::default();
        *recorded.statuses.lock().unwrap() = statuses;

        let app = Router::new()
            .route("/orders", post(handler))
            .with_state(recorded.clone());
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (Url::parse(&format!("http://{addr}/orders")).unwrap(), recorded)
    }

    fn client(url: Url, max_retries: u32) -> HttpOrderClient {
        HttpOrderClient::new(&HttpOrderServiceConfig {
            url,
            api_key: SecretString::from("k3y-Zq8!wP2#"),
            timeout: Duration::from_secs(5),
            max_retries,
            initial_backoff: Duration::from_millis(1),
        })
        .unwrap()
    }

    fn request() -> OrderRequest {
        OrderRequest {
            customer_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            address: "12 Analytical Row".to_string(),
            product_id: BookId::new("3"),
            quantity: 1,
        }
    }

    #[tokio::test]
    async fn test_places_order_with_auth_and_idempotency_key() {
        let (url, recorded) = spawn_order_api(vec![]).await;

        client(url, 2).place_order(&request()).await.unwrap();

        let calls = recorded.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (auth, key, body) = &calls[0];
        assert_eq!(auth.as_deref(), Some("Bearer k3y-Zq8!wP2#"));
        assert!(key.is_some());
        assert_eq!(body, &request());
    }

    #[tokio::test]
    async fn test_retries_transient_failures_with_same_key() {
        let (url, recorded) = spawn_order_api(vec![
            StatusCode::SERVICE_UNAVAILABLE,
            StatusCode::BAD_GATEWAY,
        ])
        .await;

        client(url, 2).place_order(&request()).await.unwrap();

        let calls = recorded.calls.lock().unwrap();
        assert_eq!(calls.len(), 3);
        let keys: Vec<_> = calls.iter().map(|(_, key, _)| key.clone()).collect();
        assert!(keys.iter().all(|k| k == &keys[0]));
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let (url, recorded) = spawn_order_api(vec![StatusCode::SERVICE_UNAVAILABLE; 5]).await;

        let err = client(url, 1).place_order(&request()).await.unwrap_err();

        assert!(matches!(err, OrderError::Api { status: 503, .. }));
        assert_eq!(recorded.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_does_not_retry_client_errors() {
        let (url, recorded) = spawn_order_api(vec![StatusCode::UNPROCESSABLE_ENTITY]).await;

        let err = client(url, 3).place_order(&request()).await.unwrap_err();

        assert!(matches!(err, OrderError::Api { status: 422, .. }));
        assert_eq!(recorded.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_each_order_gets_a_fresh_key() {
        let (url, recorded) = spawn_order_api(vec![]).await;
        let client = client(url, 0);

        client.place_order(&request()).await.unwrap();
        client.place_order(&request()).await.unwrap();

        let calls = recorded.calls.lock().unwrap();
        assert_ne!(calls[0].1, calls[1].1);
    }

    #[test]
    fn test_backoff_delay_doubles_and_caps() {
        let initial = Duration::from_millis(200);
        let transient = OrderError::Api {
            status: 503,
            message: String::new(),
        };

        assert_eq!(backoff_delay(initial, 0, &transient), Duration::from_millis(200));
        assert_eq!(backoff_delay(initial, 1, &transient), Duration::from_millis(400));
        assert_eq!(backoff_delay(initial, 2, &transient), Duration::from_millis(800));
        assert_eq!(backoff_delay(initial, 10, &transient), MAX_BACKOFF);
    }

    #[test]
    fn test_backoff_delay_honors_retry_after() {
        let initial = Duration::from_millis(200);
        assert_eq!(
            backoff_delay(initial, 0, &OrderError::RateLimited(2)),
            Duration::from_secs(2)
        );
        assert_eq!(
            backoff_delay(initial, 0, &OrderError::RateLimited(60)),
            MAX_BACKOFF
        );
    }
}
