// Deal memo notification
// Fire-and-forget POST of the agreed booking terms to the automation webhook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize, Serializer};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub const WEBHOOK_URL_ENV: &str = "DEAL_MEMO_WEBHOOK_URL";
pub const WEBHOOK_TIMEOUT_ENV: &str = "DEAL_MEMO_WEBHOOK_TIMEOUT_MS";

#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Deal memo webhook URL is not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    #[error("Webhook error: {status_code} - {message}")]
    Rejected { status_code: u16, message: String },

    #[error("Client error: {0}")]
    ClientError(String),

    #[error("No async runtime to deliver on: {0}")]
    NoRuntime(String),
}

// Webhook configuration
#[derive(Debug, Clone)]
pub struct WebhookConfig {
    pub url: String,
    pub timeout_ms: u64,
}

impl Default for WebhookConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            timeout_ms: 10000,
        }
    }
}

impl WebhookConfig {
    // Defaults overridden by DEAL_MEMO_WEBHOOK_URL / DEAL_MEMO_WEBHOOK_TIMEOUT_MS
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var(WEBHOOK_URL_ENV) {
            config.url = url.trim().to_string();
        }
        if let Some(timeout_ms) = std::env::var(WEBHOOK_TIMEOUT_ENV)
            .ok()
            .and_then(|value| value.trim().parse().ok())
        {
            config.timeout_ms = timeout_ms;
        }
        config
    }

    pub fn is_configured(&self) -> bool {
        !self.url.is_empty()
    }
}

// Form fields as the automation names them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealMemoPayload {
    #[serde(rename = "bookingID")]
    pub booking_id: String,
    #[serde(rename = "signeeID")]
    pub signee_id: String,
    pub booking_sheet_row_number: usize,
    pub signee_sheet_row_number: usize,
    pub email: String,
    #[serde(serialize_with = "serialize_amount")]
    pub hire_fee: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub bar_deposit: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub deposit_returned_on: f64,
    #[serde(serialize_with = "serialize_amount")]
    pub half_hire_fee_returned_on: f64,
    pub subject: String,
    // DD/MM/YYYY
    pub latest_event_date: String,
}

// Whole amounts go out as "1200", not "1200.0"
fn serialize_amount<S: Serializer>(amount: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if amount.fract() == 0.0 && amount.abs() < 1e15 {
        serializer.serialize_i64(*amount as i64)
    } else {
        serializer.serialize_f64(*amount)
    }
}

#[async_trait]
pub trait DealMemoNotifier: Send + Sync + 'static {
    async fn send(&self, payload: &DealMemoPayload) -> Result<(), NotifyError>;
}

pub struct WebhookNotifier {
    client: reqwest::Client,
    config: WebhookConfig,
}

impl WebhookNotifier {
    pub fn new(config: WebhookConfig) -> Result<Self, NotifyError> {
        if !config.is_configured() {
            return Err(NotifyError::NotConfigured);
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| NotifyError::ClientError(e.to_string()))?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &WebhookConfig {
        &self.config
    }
}

#[async_trait]
impl DealMemoNotifier for WebhookNotifier {
    async fn send(&self, payload: &DealMemoPayload) -> Result<(), NotifyError> {
        let response = self
            .client
            .post(&self.config.url)
            .form(payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    NotifyError::Timeout(self.config.timeout_ms)
                } else {
                    NotifyError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(NotifyError::Rejected {
                status_code: status.as_u16(),
                message,
            });
        }

        info!(booking_id = %payload.booking_id, "Deal memo webhook accepted");
        Ok(())
    }
}

// Background delivery on the current tokio runtime; failures are only logged.
// Outside a runtime nothing is spawned and NoRuntime is returned.
pub fn dispatch(
    notifier: Arc<dyn DealMemoNotifier>,
    payload: DealMemoPayload,
) -> Result<JoinHandle<()>, NotifyError> {
    let runtime = Handle::try_current().map_err(|e| NotifyError::NoRuntime(e.to_string()))?;
    Ok(runtime.spawn(async move {
        if let Err(e) = notifier.send(&payload).await {
            warn!(booking_id = %payload.booking_id, error = %e, "Deal memo delivery failed");
        }
    }))
}
