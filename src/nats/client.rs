use anyhow::{Context, Result};
use async_nats::{Client, Subscriber};
use futures::stream::{self, Select};
use tracing::{debug, info};

use super::messages::{ControlAction, ControlMessage, PermissionReply};

/// Subjects the STT service publishes transcripts on (partial and final)
const TRANSCRIPT_SUBJECT: &str = "stt.text.>";

/// Subjects the STT service publishes lifecycle events on
const STATUS_SUBJECT: &str = "stt.status.>";

pub struct NatsClient {
    client: Client,
}

impl NatsClient {
    /// Connect to NATS server
    pub async fn connect(url: &str) -> Result<Self> {
        info!("Connecting to NATS at {}", url);

        let client = async_nats::connect(url)
            .await
            .context("Failed to connect to NATS")?;

        info!("Connected to NATS successfully");

        Ok(Self { client })
    }

    /// Publish a control message for a recognition session
    pub async fn publish_control(
        &self,
        session_id: &str,
        action: ControlAction,
        locale: Option<&str>,
    ) -> Result<()> {
        let subject = action.subject().to_string();
        let payload = serde_json::to_vec(&control_message(session_id, action, locale))?;

        self.client
            .publish(subject.clone(), payload.into())
            .await
            .context("Failed to publish control message")?;

        debug!(
            "Published {:?} to {} (session={})",
            action, subject, session_id
        );

        Ok(())
    }

    /// Ask the STT service whether it may use the microphone
    pub async fn request_permission(&self, session_id: &str) -> Result<bool> {
        let action = ControlAction::Permission;
        let payload = serde_json::to_vec(&control_message(session_id, action, None))?;

        let reply = self
            .client
            .request(action.subject().to_string(), payload.into())
            .await
            .context("Permission request failed")?;

        let reply: PermissionReply =
            serde_json::from_slice(&reply.payload).context("Malformed permission reply")?;

        info!("Microphone permission granted: {}", reply.granted);

        Ok(reply.granted)
    }

    /// Subscribe to transcript and lifecycle messages
    ///
    /// Messages for every session arrive here; callers filter by session_id.
    pub async fn subscribe_events(&self) -> Result<Select<Subscriber, Subscriber>> {
        info!(
            "Subscribing to STT events on {} and {}",
            TRANSCRIPT_SUBJECT, STATUS_SUBJECT
        );

        let transcripts = self
            .client
            .subscribe(TRANSCRIPT_SUBJECT)
            .await
            .context("Failed to subscribe to transcripts")?;

        let statuses = self
            .client
            .subscribe(STATUS_SUBJECT)
            .await
            .context("Failed to subscribe to recognizer status")?;

        Ok(stream::select(transcripts, statuses))
    }
}

fn control_message(
    session_id: &str,
    action: ControlAction,
    locale: Option<&str>,
) -> ControlMessage {
    ControlMessage {
        session_id: session_id.to_string(),
        action,
        locale: locale.map(str::to_string),
        timestamp: chrono::Utc::now().to_rfc3339(),
    }
}
