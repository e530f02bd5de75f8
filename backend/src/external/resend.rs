//! Resend API client for transactional email

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Resend API client
#[derive(Clone)]
pub struct ResendClient {
    client: Client,
    api_key: String,
    base_url: String,
}

/// Outgoing message
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SendEmailResponse {
    id: String,
}

impl ResendClient {
    /// Create a new ResendClient against the given API base URL
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Send one email, returning the provider's message id
    pub async fn send(&self, email: &OutgoingEmail) -> AppResult<String> {
        let url = format!("{}/emails", self.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(email)
            .send()
            .await
            .map_err(|e| AppError::EmailService(format!("Resend request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::EmailService(format!("Resend API error: {} - {}", status, body)));
        }

        let data: SendEmailResponse = response
            .json()
            .await
            .map_err(|e| AppError::EmailService(format!("Failed to parse Resend response: {}", e)))?;

        Ok(data.id)
    }
}
