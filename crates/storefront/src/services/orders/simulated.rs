//! Simulated order service for demos and local development.

use std::time::Duration;

use async_trait::async_trait;
use tracing::instrument;

use super::{OrderError, OrderPlacement, OrderRequest};

/// Accepts every order after a fixed delay.
///
/// Stands in for a real order API so the checkout flow can be exercised end
/// to end, including the "processing" window, without any backend.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedOrderService {
    latency: Duration,
}

impl SimulatedOrderService {
    /// Create a service that waits `latency` before accepting each order.
    #[must_use]
    pub const fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

#[async_trait]
impl OrderPlacement for SimulatedOrderService {
    #[instrument(skip(self, request), fields(product_id = %request.product_id))]
    async fn place_order(&self, request: &OrderRequest) -> Result<(), OrderError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        tracing::info!(
            quantity = request.quantity,
            latency_ms = u64::try_from(self.latency.as_millis()).unwrap_or(u64::MAX),
            "Simulated order accepted"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

#[cfg(test)]
mod tests {
    use dev_books_core::BookId;

    use super::*;

    fn request() -> OrderRequest {
        OrderRequest {
            customer_name: "Grace Hopper".to_string(),
            email: "grace@example.com".to_string(),
            address: "1 Harvard Way".to_string(),
            product_id: BookId::new("2"),
            quantity: 1,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_configured_latency_then_succeeds() {
        let service = SimulatedOrderService::new(Duration::from_millis(1500));
        let started = tokio::time::Instant::now();

        let result = service.place_order(&request()).await;

        assert!(result.is_ok());
        assert!(started.elapsed() >= Duration::from_millis(1500));
    }

    #[tokio::test]
    async fn test_zero_latency() {
        let service = SimulatedOrderService::new(Duration::ZERO);
        assert!(service.place_order(&request()).await.is_ok());
    }
}
