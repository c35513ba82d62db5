//! Notifier processor.
//!
//! The Notifier is responsible for:
//! - Receiving `NotifyEvent` from the queue
//! - Building a minimal JSON message for the email provider
//! - Sending one HTTP POST per event to the provider endpoint
//!
//! Delivery is strictly best-effort: a failure is logged and the event is
//! dropped. Nothing upstream ever waits on, or fails because of, email.

use crate::events::{NotifyEvent, NotifyEventReceiver};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Errors that can occur during notification delivery.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// Provider rejected the message (non-2xx status)
    #[error("delivery failed with status {status}: {body}")]
    DeliveryFailed { status: u16, body: String },
}

/// Message handed to the email provider. Rendering (subject lines,
/// templates, localization) is the provider's job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub template: &'static str,
    pub kind: String,
    pub pending_id: uuid::Uuid,
}

/// Build the provider message for an event.
///
/// Operator mail goes to `operator_address`; approval mail goes to the
/// submitter identity resolved by the reconciler.
pub fn build_message(event: &NotifyEvent, operator_address: &str) -> EmailMessage {
    match event {
        NotifyEvent::SubmissionReceived { kind, pending_id } => EmailMessage {
            to: operator_address.to_owned(),
            template: "submission_received",
            kind: kind.to_string(),
            pending_id: *pending_id,
        },
        NotifyEvent::SubmissionApproved {
            kind,
            pending_id,
            recipient,
        } => EmailMessage {
            to: recipient.clone(),
            template: "submission_approved",
            kind: kind.to_string(),
            pending_id: *pending_id,
        },
    }
}

/// Static configuration of the email provider collaborator.
#[derive(Debug, Clone)]
pub struct NotifierConfig {
    pub endpoint: url::Url,
    pub api_key: String,
    pub operator_address: String,
}

/// Notifier delivers registry events to the email provider.
pub struct Notifier {
    config: NotifierConfig,
    notify_rx: NotifyEventReceiver,
    shutdown_rx: watch::Receiver<bool>,
    http_client: reqwest::Client,
}

impl Notifier {
    pub fn new(
        config: NotifierConfig,
        notify_rx: NotifyEventReceiver,
        shutdown_rx: watch::Receiver<bool>,
    ) -> Self {
        Self {
            config,
            notify_rx,
            shutdown_rx,
            http_client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Run the Notifier until shutdown or channel close.
    pub async fn run(mut self) {
        info!("Notifier started");

        loop {
            tokio::select! {
                biased;

                _ = self.shutdown_rx.changed() => {
                    if *self.shutdown_rx.borrow() {
                        info!("Notifier received shutdown signal");
                        break;
                    }
                }

                Some(event) = self.notify_rx.recv() => {
                    debug!(event = ?event, "Received NotifyEvent");

                    if let Err(e) = self.process_event(&event).await {
                        warn!(error = %e, event = ?event, "Notification delivery failed");
                    }
                }

                else => {
                    info!("NotifyEvent channel closed");
                    break;
                }
            }
        }

        info!("Notifier shutdown complete");
    }

    async fn process_event(&self, event: &NotifyEvent) -> Result<(), NotifyError> {
        let message = build_message(event, &self.config.operator_address);

        let response = self
            .http_client
            .post(self.config.endpoint.clone())
            .bearer_auth(&self.config.api_key)
            .json(&message)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            debug!(to = %message.to, template = message.template, "Notification delivered");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(NotifyError::DeliveryFailed {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::ChangeKind;
    use uuid::Uuid;

    #[test]
    fn operator_mail_for_new_submissions() {
        let id = Uuid::now_v7();
        let message = build_message(
            &NotifyEvent::SubmissionReceived {
                kind: ChangeKind::VehicleEdit,
                pending_id: id,
            },
            "mods@example.org",
        );
        assert_eq!(message.to, "mods@example.org");
        assert_eq!(message.template, "submission_received");
        assert_eq!(message.kind, "vehicle-edits");
        assert_eq!(message.pending_id, id);
    }

    #[test]
    fn approval_mail_goes_to_submitter() {
        let id = Uuid::now_v7();
        let message = build_message(
            &NotifyEvent::SubmissionApproved {
                kind: ChangeKind::Photo,
                pending_id: id,
                recipient: "owner@example.org".to_owned(),
            },
            "mods@example.org",
        );
        assert_eq!(message.to, "owner@example.org");
        assert_eq!(message.template, "submission_approved");
        assert_eq!(message.kind, "photos");
    }
}
