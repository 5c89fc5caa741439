use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::EmailConfig;
use crate::error::{ForumWatchError, Result};

const SERVICE_NAME: &str = "Email service";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>, html: impl Into<String>) -> Self {
        Self {
            to: vec![to.into()],
            subject: subject.into(),
            html: html.into(),
            text: None,
        }
    }
}

/// Result of a delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryOutcome {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl DeliveryOutcome {
    fn delivered(id: Option<String>) -> Self {
        Self {
            success: true,
            id,
            error: None,
        }
    }

    fn failed(error: impl Into<String>) -> Self {
        Self {
            success: false,
            id: None,
            error: Some(error.into()),
        }
    }
}

#[derive(Debug, Serialize)]
struct ProviderRequest<'a> {
    from: &'a str,
    #[serde(flatten)]
    message: &'a EmailMessage,
}

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct EmailClient {
    client: Client,
    api_key: Option<String>,
    from_address: String,
    endpoint: String,
}

impl EmailClient {
    pub fn from_config(config: &EmailConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .map_err(|e| ForumWatchError::internal(format!("email client: {e}")))?;

        let api_key = config.api_key.clone().filter(|key| !key.trim().is_empty());
        if api_key.is_none() {
            info!("📭 Email delivery disabled: no API key configured");
        }

        Ok(Self {
            client,
            api_key,
            from_address: config.from_address.clone(),
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ForumWatchError::Unconfigured(SERVICE_NAME.to_string()))
    }

    /// Deliver `message`, reporting failures in the outcome rather than as errors
    pub async fn send(&self, message: &EmailMessage) -> DeliveryOutcome {
        let api_key = match self.api_key() {
            Ok(key) => key,
            Err(e) => {
                warn!(subject = %message.subject, "Email not sent: {}", e);
                return DeliveryOutcome::failed(e.to_string());
            }
        };

        let request = ProviderRequest {
            from: &self.from_address,
            message,
        };

        let response = match self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "❌ Email delivery request failed");
                return DeliveryOutcome::failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "❌ Email provider rejected message");
            return DeliveryOutcome::failed(format!("provider returned {status}"));
        }

        let id = response
            .json::<ProviderResponse>()
            .await
            .ok()
            .and_then(|body| body.id);
        debug!(id = ?id, recipients = message.to.len(), "📧 Email delivered");
        DeliveryOutcome::delivered(id)
    }
}
