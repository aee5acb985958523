use std::time::Duration;

use anyhow::{Context, bail};

use crate::infra::mailer::MailRelayConfig;

/// Auth service configuration loaded from environment variables.
#[derive(Debug)]
pub struct AuthConfig {
    /// HMAC secret for validating access tokens. Env var: `JWT_SECRET`.
    pub jwt_secret: String,
    /// TCP port to listen on (default 8000). Env var: `AUTH_PORT`.
    pub auth_port: u16,
    /// Mail relay settings; `None` when `MAIL_RELAY_URL` is unset, in which
    /// case codes are only logged.
    pub mail_relay: Option<MailRelayConfig>,
    /// Period of the expired-code sweep (default 60s).
    /// Env var: `AUTHCODE_SWEEP_INTERVAL_SECS`.
    pub sweep_interval: Duration,
}

const DEFAULT_AUTH_PORT: u16 = 8000;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;
const DEFAULT_SENDER_EMAIL: &str = "no-reply@formerr.dev";

impl AuthConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;

        let auth_port = match var("AUTH_PORT") {
            Some(v) => v
                .parse()
                .with_context(|| format!("AUTH_PORT is not a valid port: {v}"))?,
            None => DEFAULT_AUTH_PORT,
        };

        let sweep_secs = match var("AUTHCODE_SWEEP_INTERVAL_SECS") {
            Some(v) => v
                .parse()
                .with_context(|| format!("AUTHCODE_SWEEP_INTERVAL_SECS is not a number: {v}"))?,
            None => DEFAULT_SWEEP_INTERVAL_SECS,
        };
        if sweep_secs == 0 {
            bail!("AUTHCODE_SWEEP_INTERVAL_SECS must be greater than zero");
        }

        let mail_relay = var("MAIL_RELAY_URL").map(|endpoint| MailRelayConfig {
            endpoint,
            api_key: var("MAIL_RELAY_API_KEY"),
            sender_email: var("MAIL_SENDER_EMAIL")
                .unwrap_or_else(|| DEFAULT_SENDER_EMAIL.to_owned()),
            sender_name: var("MAIL_SENDER_NAME"),
        });

        Ok(Self {
            jwt_secret,
            auth_port,
            mail_relay,
            sweep_interval: Duration::from_secs(sweep_secs),
        })
    }
}
