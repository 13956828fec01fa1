use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::debug;

use crate::update::Update;

/// Header Telegram sets on webhook calls so bots can authenticate the sender.
pub const SECRET_TOKEN_HEADER: &str = "X-Telegram-Bot-Api-Secret-Token";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// What came back from the webhook, for the operator to judge.
#[derive(Debug)]
pub struct Delivery {
    pub status: StatusCode,
    pub body: String,
}

pub struct WebhookClient {
    client: reqwest::Client,
    url: String,
    secret_token: String,
}

impl WebhookClient {
    pub fn new(url: String, secret_token: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            url,
            secret_token,
        })
    }

    /// POST one update to the webhook. Transport failures bubble up as
    /// errors; HTTP-level failures come back in the Delivery so the caller
    /// can print status and body without interpreting them.
    pub async fn send(&self, update: &Update) -> Result<Delivery> {
        debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .header(SECRET_TOKEN_HEADER, &self.secret_token)
            .json(update)
            .send()
            .await
            .with_context(|| format!("Failed to deliver update to {}", self.url))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("Failed to read webhook response body")?;

        Ok(Delivery { status, body })
    }
}
