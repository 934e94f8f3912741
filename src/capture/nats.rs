use anyhow::{Context, Result};
use futures::stream::StreamExt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::backend::{SpeechCapture, SpeechEvent};
use crate::nats::{decode_event, ControlAction, NatsClient};

const EVENT_BUFFER: usize = 100;

/// Speech capture backed by a remote STT service on a NATS bus.
///
/// The service owns the microphone. This side sends control messages and
/// turns the service's transcript/status traffic into [`SpeechEvent`]s.
pub struct NatsSpeechCapture {
    nats_url: String,
    client: Option<Arc<NatsClient>>,
    session_id: Option<String>,
    is_capturing: Arc<AtomicBool>,
    listener: Option<JoinHandle<()>>,
}

impl NatsSpeechCapture {
    pub fn new(nats_url: impl Into<String>) -> Self {
        Self {
            nats_url: nats_url.into(),
            client: None,
            session_id: None,
            is_capturing: Arc::new(AtomicBool::new(false)),
            listener: None,
        }
    }

    async fn client(&mut self) -> Result<Arc<NatsClient>> {
        if let Some(client) = &self.client {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(NatsClient::connect(&self.nats_url).await?);
        self.client = Some(Arc::clone(&client));
        Ok(client)
    }

    fn stop_listener(&mut self) {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }
    }
}

#[async_trait::async_trait]
impl SpeechCapture for NatsSpeechCapture {
    async fn request_permission(&mut self) -> Result<bool> {
        let client = self.client().await?;
        let probe_id = format!("permission-{}", uuid::Uuid::new_v4());
        client.request_permission(&probe_id).await
    }

    async fn start(&mut self, locale: &str) -> Result<mpsc::Receiver<SpeechEvent>> {
        self.stop_listener();

        let client = self.client().await?;
        let session_id = format!("dream-session-{}", uuid::Uuid::new_v4());

        // Subscribe before asking the service to start so no early event is lost
        let mut events = client
            .subscribe_events()
            .await
            .context("Failed to subscribe to STT events")?;

        client
            .publish_control(&session_id, ControlAction::Start, Some(locale))
            .await
            .context("Failed to start STT session")?;

        info!("STT session {} started (locale={})", session_id, locale);

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let is_capturing = Arc::clone(&self.is_capturing);
        is_capturing.store(true, Ordering::SeqCst);
        let listen_id = session_id.clone();

        let listener = tokio::spawn(async move {
            while let Some(msg) = events.next().await {
                let event = match decode_event(&msg.subject, &msg.payload, &listen_id) {
                    Ok(Some(event)) => event,
                    Ok(None) => continue,
                    Err(e) => {
                        warn!("Failed to parse STT message on {}: {}", msg.subject, e);
                        continue;
                    }
                };

                let finished = matches!(event, SpeechEvent::End | SpeechEvent::Error(_));
                if finished {
                    is_capturing.store(false, Ordering::SeqCst);
                }

                if let Err(e) = tx.send(event).await {
                    error!("Failed to forward speech event: {}", e);
                    break;
                }
            }

            is_capturing.store(false, Ordering::SeqCst);
            info!("STT listener for {} stopped", listen_id);
        });

        self.listener = Some(listener);
        self.session_id = Some(session_id);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let Some(session_id) = self.session_id.clone() else {
            return Ok(());
        };

        // Keep listening: the final result arrives after the stop request
        self.is_capturing.store(false, Ordering::SeqCst);
        let client = self.client().await?;
        client
            .publish_control(&session_id, ControlAction::Stop, None)
            .await
    }

    async fn cancel(&mut self) -> Result<()> {
        self.stop_listener();
        self.is_capturing.store(false, Ordering::SeqCst);

        let Some(session_id) = self.session_id.take() else {
            return Ok(());
        };

        let client = self.client().await?;
        client
            .publish_control(&session_id, ControlAction::Cancel, None)
            .await
    }

    fn is_capturing(&self) -> bool {
        self.is_capturing.load(Ordering::SeqCst)
    }

    fn name(&self) -> &str {
        "nats-stt"
    }
}

impl Drop for NatsSpeechCapture {
    fn drop(&mut self) {
        self.stop_listener();
    }
}
