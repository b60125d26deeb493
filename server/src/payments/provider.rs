//! Card provider boundary
//!
//! The engine talks to the card processor through [`CardProvider`]; the
//! production implementation is a thin HTTP client, tests plug in an
//! in-process fake. Amounts cross this boundary in minor units (cents).

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::orders::{OrderError, OrderResult};

/// A provider-side payment intent
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    pub id: String,
    /// Handed to the client app to drive the card capture UI
    pub client_secret: String,
}

/// Capture status as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentStatus {
    Succeeded,
    Processing,
    Failed,
}

#[async_trait]
pub trait CardProvider: Send + Sync {
    /// Create an intent for `amount_minor` in the smallest currency unit
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        order_number: &str,
    ) -> OrderResult<PaymentIntent>;

    /// Ask the provider whether an intent has been captured
    async fn intent_status(&self, intent_id: &str) -> OrderResult<IntentStatus>;
}

/// HTTP card provider client
pub struct HttpCardProvider {
    client: reqwest::Client,
    base_url: String,
    secret_key: String,
}

impl HttpCardProvider {
    pub fn new(base_url: String, secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            secret_key,
        }
    }
}

#[derive(Debug, Deserialize)]
struct IntentBody {
    id: String,
    client_secret: String,
}

#[derive(Debug, Deserialize)]
struct IntentStatusBody {
    status: String,
}

#[async_trait]
impl CardProvider for HttpCardProvider {
    async fn create_intent(
        &self,
        amount_minor: i64,
        currency: &str,
        order_number: &str,
    ) -> OrderResult<PaymentIntent> {
        let body = json!({
            "amount": amount_minor,
            "currency": currency,
            "metadata": { "order_number": order_number },
        });
        let response = self
            .client
            .post(format!("{}/v1/payment_intents", self.base_url))
            .bearer_auth(&self.secret_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| OrderError::PaymentProvider(e.to_string()))?;
        if !response.status().is_success() {
            return Err(OrderError::PaymentProvider(format!(
                "Intent creation failed: HTTP {}",
                response.status()
            )));
        }
        let intent: IntentBody = response
            .json()
            .await
            .map_err(|e| OrderError::PaymentProvider(e.to_string()))?;
        Ok(PaymentIntent {
            id: intent.id,
            client_secret: intent.client_secret,
        })
    }

    async fn intent_status(&self, intent_id: &str) -> OrderResult<IntentStatus> {
        let response = self
            .client
            .get(format!("{}/v1/payment_intents/{}", self.base_url, intent_id))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| OrderError::PaymentProvider(e.to_string()))?;
        if !response.status().is_success() {
            return Err(OrderError::PaymentProvider(format!(
                "Intent lookup failed: HTTP {}",
                response.status()
            )));
        }
        let body: IntentStatusBody = response
            .json()
            .await
            .map_err(|e| OrderError::PaymentProvider(e.to_string()))?;
        Ok(match body.status.as_str() {
            "succeeded" => IntentStatus::Succeeded,
            "processing" | "requires_action" | "requires_confirmation" => IntentStatus::Processing,
            _ => IntentStatus::Failed,
        })
    }
}
