use std::env;

pub const WEBHOOK_URL_VAR: &str = "SLACK_WEBHOOK_URL";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_webhook_url(env::var(WEBHOOK_URL_VAR).ok())
    }

    /// An empty URL is treated the same as an unset one.
    pub fn from_webhook_url(webhook_url: Option<String>) -> Self {
        Config {
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
        }
    }
}
