use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::{debug, info};

use crate::domain::repository::CodeNotifier;
use crate::domain::types::CodeDelivery;
use crate::error::AuthServiceError;

const RELAY_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings for the transactional mail relay.
#[derive(Debug, Clone)]
pub struct MailRelayConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub sender_email: String,
    pub sender_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayAddress {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// JSON body posted to the relay.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayMessage {
    pub sender: RelayAddress,
    pub to: Vec<RelayAddress>,
    pub subject: String,
    pub text_content: String,
    pub html_content: String,
}

pub fn render_message(delivery: &CodeDelivery<'_>, config: &MailRelayConfig) -> RelayMessage {
    let CodeDelivery {
        to_email,
        to_name,
        code,
        form_title,
        expires_in_minutes,
    } = *delivery;

    let text_content = format!(
        "Hello {to_name},\n\n\
         Your access code for \"{form_title}\" is {code}.\n\
         It expires in {expires_in_minutes} minutes and can be used once.\n\n\
         If you did not request this code, you can ignore this message."
    );
    let html_content = format!(
        "<p>Hello {to_name},</p>\
         <p>Your access code for <strong>{form_title}</strong> is:</p>\
         <p style=\"font-size:24px;letter-spacing:4px\"><strong>{code}</strong></p>\
         <p>It expires in {expires_in_minutes} minutes and can be used once.</p>\
         <p>If you did not request this code, you can ignore this message.</p>"
    );

    RelayMessage {
        sender: RelayAddress {
            email: config.sender_email.clone(),
            name: config.sender_name.clone(),
        },
        to: vec![RelayAddress {
            email: to_email.to_owned(),
            name: Some(to_name.to_owned()),
        }],
        subject: format!("Your access code for {form_title}"),
        text_content,
        html_content,
    }
}

/// Delivers codes by posting JSON to a transactional mail relay.
#[derive(Clone)]
pub struct HttpCodeNotifier {
    client: reqwest::Client,
    config: MailRelayConfig,
}

impl HttpCodeNotifier {
    pub fn new(config: MailRelayConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(RELAY_TIMEOUT)
            .build()
            .context("failed to build mail relay client")?;
        Ok(Self { client, config })
    }
}

impl CodeNotifier for HttpCodeNotifier {
    async fn send(&self, delivery: &CodeDelivery<'_>) -> Result<(), AuthServiceError> {
        let message = render_message(delivery, &self.config);

        let mut request = self
            .client
            .post(&self.config.endpoint)
            .header("accept", "application/json")
            .json(&message);
        if let Some(api_key) = &self.config.api_key {
            request = request.header("api-key", api_key);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AuthServiceError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AuthServiceError::Delivery(format!(
                "mail relay returned {status}: {detail}"
            )));
        }
        debug!(to = delivery.to_email, "auth code handed to mail relay");
        Ok(())
    }
}

/// Development notifier used when no relay is configured. The code is only
/// emitted at `debug` level.
///
/// Always succeeds, so requests report `code_sent = true` even though no
/// email left the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogCodeNotifier;

impl CodeNotifier for LogCodeNotifier {
    async fn send(&self, delivery: &CodeDelivery<'_>) -> Result<(), AuthServiceError> {
        info!(
            to = delivery.to_email,
            form_title = delivery.form_title,
            "no mail relay configured; auth code not emailed"
        );
        debug!(to = delivery.to_email, code = delivery.code, "auth code");
        Ok(())
    }
}

/// Notifier selected at startup.
#[derive(Clone)]
pub enum Notifier {
    Http(HttpCodeNotifier),
    Log(LogCodeNotifier),
}

impl Notifier {
    /// Relay-backed when `relay` is set, log-only otherwise.
    ///
    /// In log-only mode `code_sent` still comes back `true`: "sent" means the
    /// notifier accepted the code, not that a mailbox received it. Deployments
    /// that must email codes need `MAIL_RELAY_URL`; startup warns when it is unset.
    pub fn from_config(relay: Option<MailRelayConfig>) -> anyhow::Result<Self> {
        match relay {
            Some(config) => Ok(Self::Http(HttpCodeNotifier::new(config)?)),
            None => Ok(Self::Log(LogCodeNotifier)),
        }
    }
}

impl CodeNotifier for Notifier {
    async fn send(&self, delivery: &CodeDelivery<'_>) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(notifier) => notifier.send(delivery).await,
            Self::Log(notifier) => notifier.send(delivery).await,
        }
    }
}
