use async_trait::async_trait;
use serde::Serialize;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::HousekeepingError;

/// Name and avatar a handler posts under.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Identity {
    pub username: &'static str,
    pub icon_emoji: &'static str,
}

pub const LIFECYCLE_MANAGER: Identity = Identity {
    username: "EBS Lifecycle Manager",
    icon_emoji: ":floppy_disk:",
};

pub const SECURITY_GROUP_AUDITOR: Identity = Identity {
    username: "Security Group Auditor",
    icon_emoji: ":shield:",
};

#[derive(Debug, Serialize, PartialEq)]
struct WebhookPayload<'a> {
    text: &'a str,
    username: &'a str,
    icon_emoji: &'a str,
}

/// Best-effort delivery: implementations never fail the caller.
#[async_trait]
pub trait Notify {
    async fn notify(&self, message: &str);
}

pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: Option<String>,
    identity: Identity,
}

#[async_trait]
impl Notify for SlackNotifier {
    async fn notify(&self, message: &str) {
        let url = match self.webhook_url {
            Some(ref url) => url,
            None => {
                info!("Silent Mode: No SLACK_WEBHOOK_URL set.");
                return;
            }
        };

        if let Err(error) = self.post(url, message).await {
            warn!(%error, "Failed to send Slack notification");
        }
    }
}

impl SlackNotifier {
    pub fn new(config: &Config, identity: Identity) -> Self {
        Self::new_with_client(reqwest::Client::new(), config, identity)
    }

    pub fn new_with_client(client: reqwest::Client, config: &Config, identity: Identity) -> Self {
        SlackNotifier {
            client,
            webhook_url: config.webhook_url.clone(),
            identity,
        }
    }

    async fn post(&self, url: &str, message: &str) -> Result<(), HousekeepingError> {
        let payload = WebhookPayload {
            text: message,
            username: self.identity.username,
            icon_emoji: self.identity.icon_emoji,
        };
        self.client
            .post(url)
            .json(&payload)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}
