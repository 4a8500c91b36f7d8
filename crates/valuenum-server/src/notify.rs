//! Concepts-access notifications.
//!
//! A lead is always persisted before a notification is attempted; delivery
//! failures are reported back to the caller, never raised.

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use valuenum_core::{storage::NotifyConfig, ConceptAccess};

const DELIVERY_TIMEOUT: Duration = Duration::from_secs(20);

/// Result of one delivery attempt.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Delivery {
    pub sent: bool,
    pub error: Option<String>,
}

pub enum Notifier {
    /// POST a JSON message to an HTTP endpoint.
    Webhook {
        client: Client,
        url: String,
        notify_to: String,
        from_name: String,
    },
    Disabled,
}

impl Notifier {
    pub fn from_config(config: &NotifyConfig) -> Self {
        match config.webhook_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => {
                let client = match Client::builder().timeout(DELIVERY_TIMEOUT).build() {
                    Ok(client) => client,
                    Err(e) => {
                        warn!("Falling back to default HTTP client: {e}");
                        Client::new()
                    }
                };
                Notifier::Webhook {
                    client,
                    url: url.to_string(),
                    notify_to: config.notify_to.clone(),
                    from_name: config.from_name.clone(),
                }
            }
            _ => Notifier::Disabled,
        }
    }

    pub async fn concept_access(&self, access: &ConceptAccess) -> Delivery {
        let (client, url, notify_to, from_name) = match self {
            Notifier::Webhook {
                client,
                url,
                notify_to,
                from_name,
            } => (client, url, notify_to, from_name),
            Notifier::Disabled => {
                return Delivery {
                    sent: false,
                    error: Some("notification webhook not configured on server".into()),
                }
            }
        };

        let body = json!({
            "to": notify_to,
            "from": from_name,
            "reply_to": access.email,
            "subject": format!("Concepts Access - {}", access.fullname),
            "text": message_text(access),
        });

        let outcome = match client.post(url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => Ok(()),
            Ok(resp) => Err(format!("webhook returned HTTP {}", resp.status())),
            Err(e) => Err(e.to_string()),
        };

        match outcome {
            Ok(()) => {
                info!(record_id = %access.id, "Concepts access notification sent");
                Delivery {
                    sent: true,
                    error: None,
                }
            }
            Err(error) => {
                warn!(record_id = %access.id, "Concepts access notification failed: {error}");
                Delivery {
                    sent: false,
                    error: Some(error),
                }
            }
        }
    }
}

fn message_text(access: &ConceptAccess) -> String {
    format!(
        "A visitor accessed the concepts page\n\nName: {}\nEmail: {}\nZIP: {}\nTime (UTC): {}",
        access.fullname,
        access.email,
        access.zip,
        access.timestamp.to_rfc3339()
    )
}
