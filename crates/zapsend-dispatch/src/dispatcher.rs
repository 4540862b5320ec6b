// SPDX-FileCopyrightText: 2026 Zapsend Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Sequential delivery loop.
//!
//! Contacts are processed strictly in order, one at a time, with a fixed
//! pause after every delivery attempt except the last. Skipped contacts do
//! not consume the pause. A failed send is recorded and the loop moves on;
//! only cancellation ends a run early.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use zapsend_config::model::DispatchConfig;
use zapsend_core::pacing;
use zapsend_core::{
    Contact, DeliveryRecord, DeliveryResult, DispatchSummary, Gateway, MediaAttachment,
};

use crate::template::render_template;

pub const SKIP_NOT_DISPATCHABLE: &str = "missing name or phone";
pub const SKIP_NO_CAPABILITY: &str = "no messaging capability";

/// What to send and how to pace it.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchPlan {
    pub template: String,
    /// Pause after each delivery attempt except the last.
    pub delay: Duration,
    /// Check each recipient with the gateway before sending.
    pub verify: bool,
    /// When set, every message is sent as this media with the rendered
    /// template as caption.
    pub media: Option<MediaAttachment>,
}

impl DispatchPlan {
    pub fn new(template: impl Into<String>) -> Self {
        Self::from_config(template, &DispatchConfig::default())
    }

    /// Takes pacing and verification from `config`.
    pub fn from_config(template: impl Into<String>, config: &DispatchConfig) -> Self {
        Self {
            template: template.into(),
            delay: config.delay(),
            verify: config.verify_recipients,
            media: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    pub fn with_media(mut self, media: MediaAttachment) -> Self {
        self.media = Some(media);
        self
    }
}

/// Delivers one message per contact through a connected session.
pub struct DeliveryDispatcher {
    gateway: Arc<dyn Gateway>,
    session: String,
    cancel: CancellationToken,
}

impl DeliveryDispatcher {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        session: impl Into<String>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            gateway,
            session: session.into(),
            cancel,
        }
    }

    /// Runs the delivery loop over `contacts` in order.
    ///
    /// Never fails: per-contact errors become `Failed` records. When the
    /// cancellation token fires, the summary covers the contacts processed
    /// so far and is flagged as cancelled.
    pub async fn dispatch(&self, contacts: &[Contact], plan: &DispatchPlan) -> DispatchSummary {
        let total = contacts.len();
        let mut records = Vec::with_capacity(total);
        let mut cancelled = false;

        info!(
            session = %self.session,
            total,
            delay_ms = plan.delay.as_millis() as u64,
            verify = plan.verify,
            media = plan.media.is_some(),
            "starting dispatch"
        );

        for (index, contact) in contacts.iter().enumerate() {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            info!("[{}/{}] {}", index + 1, total, contact.name);
            let result = self.deliver(contact, plan).await;
            let attempted = !matches!(result, DeliveryResult::Skipped(_));
            records.push(DeliveryRecord {
                name: contact.name.clone(),
                phone: contact.phone.clone(),
                result,
            });

            if attempted
                && index + 1 < total
                && pacing::pause(plan.delay, &self.cancel).await.is_err()
            {
                cancelled = true;
                break;
            }
        }

        let summary = DispatchSummary::from_records(records, cancelled);
        if cancelled {
            warn!(
                processed = summary.total(),
                remaining = total - summary.total(),
                "dispatch cancelled"
            );
        }
        info!(
            sent = summary.sent(),
            failed = summary.failed(),
            skipped = summary.skipped(),
            total = summary.total(),
            "dispatch finished"
        );
        summary
    }

    async fn deliver(&self, contact: &Contact, plan: &DispatchPlan) -> DeliveryResult {
        if !contact.is_dispatchable() {
            debug!(name = %contact.name, "skipping contact without name or phone");
            return DeliveryResult::Skipped(SKIP_NOT_DISPATCHABLE.to_string());
        }

        if plan.verify
            && !self
                .gateway
                .validate_recipient(&self.session, &contact.phone)
                .await
        {
            info!(
                name = %contact.name,
                phone = %contact.phone,
                "recipient cannot receive messages, skipping"
            );
            return DeliveryResult::Skipped(SKIP_NO_CAPABILITY.to_string());
        }

        let text = render_template(&plan.template, contact);
        let outcome = match &plan.media {
            Some(media) => {
                self.gateway
                    .send_media(&self.session, &contact.phone, &media.url, media.kind, &text)
                    .await
            }
            None => {
                self.gateway
                    .send_text(&self.session, &contact.phone, &text)
                    .await
            }
        };

        match outcome {
            Ok(()) => {
                info!(name = %contact.name, "message sent");
                DeliveryResult::Sent
            }
            Err(e) => {
                warn!(name = %contact.name, phone = %contact.phone, error = %e, "send failed");
                DeliveryResult::Failed(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zapsend_core::MediaKind;

    #[test]
    fn plan_defaults_follow_config() {
        let plan = DispatchPlan::new("hi");
        assert_eq!(plan.delay, Duration::from_secs(5));
        assert!(plan.verify);
        assert!(plan.media.is_none());
    }

    #[test]
    fn plan_builders() {
        let plan = DispatchPlan::new("hi")
            .with_delay(Duration::ZERO)
            .with_verify(false)
            .with_media(MediaAttachment {
                url: "https://cdn.example/a.pdf".into(),
                kind: MediaKind::Document,
            });
        assert_eq!(plan.delay, Duration::ZERO);
        assert!(!plan.verify);
        assert_eq!(plan.media.map(|m| m.kind), Some(MediaKind::Document));
    }
}
