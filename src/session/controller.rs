use chrono::Utc;
use std::io::ErrorKind;
use std::ops::ControlFlow;
use std::sync::{Arc, Weak};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::config::SessionConfig;
use super::state::{CommittedTranscript, SessionSnapshot, SessionState, SessionStatus};
use super::ticker::RepeatingTask;
use crate::capture::{SpeechCapture, SpeechEvent};
use crate::error::{CaptureErrorKind, SessionError};

/// Mutable session data plus the tasks that belong to it
struct Runtime {
    state: SessionState,
    /// Duration ticker, present only while recording
    ticker: Option<RepeatingTask>,
    /// Forwards capability events into the state machine
    pump: Option<JoinHandle<()>>,
}

struct Inner {
    config: SessionConfig,
    /// Lock order: `runtime` before `capture`
    runtime: Mutex<Runtime>,
    capture: Mutex<Box<dyn SpeechCapture>>,
    updates: watch::Sender<SessionSnapshot>,
}

/// Coordinates one speech-capture session at a time.
///
/// Every transition is serialized through a single lock, so at most one
/// session is ever recording. Capability failures never escape as errors:
/// they move the session to `Failed` with a readable message.
#[derive(Clone)]
pub struct SessionController {
    inner: Arc<Inner>,
}

impl SessionController {
    pub fn new(config: SessionConfig, capture: Box<dyn SpeechCapture>) -> Self {
        info!(
            "Creating session controller {} (capture={})",
            config.session_id,
            capture.name()
        );

        let (updates, _) = watch::channel(SessionSnapshot::default());

        Self {
            inner: Arc::new(Inner {
                config,
                runtime: Mutex::new(Runtime {
                    state: SessionState::new(),
                    ticker: None,
                    pump: None,
                }),
                capture: Mutex::new(capture),
                updates,
            }),
        }
    }

    /// Start recording.
    ///
    /// Rejected with [`SessionError::SessionBusy`] while a session is
    /// recording or transcribing; the capability is not touched. A finished
    /// session is cleared first. Permission and start failures return `Ok`
    /// with a `Failed` snapshot.
    pub async fn start_recording(&self) -> Result<SessionSnapshot, SessionError> {
        let mut rt = self.inner.runtime.lock().await;

        if rt.state.status.is_active() {
            warn!("Recording already in progress ({:?})", rt.state.status);
            return Err(SessionError::SessionBusy);
        }

        if rt.state.status.is_finished() {
            self.inner.discard(&mut rt).await;
        }

        info!("Starting recording session: {}", self.inner.config.session_id);

        let mut capture = self.inner.capture.lock().await;

        let granted = match capture.request_permission().await {
            Ok(granted) => granted,
            Err(e) => {
                error!("Failed to request microphone permission: {:#}", e);
                false
            }
        };

        if !granted {
            warn!("Microphone permission denied");
            drop(capture);
            rt.state.fail(SessionError::PermissionDenied);
            return Ok(self.inner.publish(&rt.state));
        }

        let events = match capture.start(&self.inner.config.locale).await {
            Ok(events) => events,
            Err(e) => {
                error!("Failed to start speech capture: {:#}", e);
                drop(capture);
                rt.state.fail(SessionError::CaptureStart(format!("{:#}", e)));
                return Ok(self.inner.publish(&rt.state));
            }
        };
        drop(capture);

        rt.state.begin_recording(Utc::now(), Instant::now());
        rt.ticker = Some(self.inner.spawn_ticker());
        rt.pump = Some(self.inner.spawn_pump(events));

        info!("Recording session started successfully");

        Ok(self.inner.publish(&rt.state))
    }

    /// Stop recording and wait for the recognizer's final result
    pub async fn stop_recording(&self) -> SessionSnapshot {
        let mut rt = self.inner.runtime.lock().await;

        if rt.state.status != SessionStatus::Recording {
            warn!("Recording not active");
            return rt.state.snapshot();
        }

        info!("Stopping recording session: {}", self.inner.config.session_id);

        rt.state.begin_transcribing(Instant::now());
        rt.ticker = None;

        let mut capture = self.inner.capture.lock().await;
        if let Err(e) = capture.stop().await {
            error!("Failed to stop speech capture: {:#}", e);
            rt.state.fail(SessionError::CaptureRuntime(CaptureErrorKind::Other(
                format!("{:#}", e),
            )));
        }
        rt.state.audio_artifact = capture.audio_artifact();
        drop(capture);

        self.inner.publish(&rt.state)
    }

    /// Abort the session without producing a transcript
    pub async fn cancel_recording(&self) -> SessionSnapshot {
        let mut rt = self.inner.runtime.lock().await;
        if rt.state.status == SessionStatus::Idle {
            return rt.state.snapshot();
        }

        info!("Cancelling recording session ({:?})", rt.state.status);
        self.inner.discard(&mut rt).await;
        self.inner.publish(&rt.state)
    }

    /// Return to `Idle` from any state, deleting any local audio artifact
    pub async fn clear_recording(&self) -> SessionSnapshot {
        let mut rt = self.inner.runtime.lock().await;

        debug!("Clearing recording session ({:?})", rt.state.status);
        self.inner.discard(&mut rt).await;
        self.inner.publish(&rt.state)
    }

    /// Playback is not available for capability-based capture
    pub async fn play_recording(&self) -> bool {
        warn!("Playback is not supported by speech capture sessions");
        false
    }

    /// Current state of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.updates.borrow().clone()
    }

    /// Receive every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.updates.subscribe()
    }

    /// Wait until the session is no longer recording or transcribing
    pub async fn wait_for_outcome(&self) -> SessionSnapshot {
        let mut updates = self.subscribe();
        let outcome = updates
            .wait_for(|snapshot| !snapshot.status.is_active())
            .await
            .map(|snapshot| snapshot.clone());

        match outcome {
            Ok(snapshot) => snapshot,
            Err(_) => self.snapshot(),
        }
    }

    /// The committed transcript, once the session has completed
    pub async fn committed_transcript(&self) -> Option<CommittedTranscript> {
        self.inner.runtime.lock().await.state.committed()
    }

    /// Take the committed transcript and clear the session in one step.
    ///
    /// Returns `None` and leaves the session untouched unless it is
    /// `Completed`, so a recording started in the meantime is never wiped.
    pub async fn take_committed(&self) -> Option<CommittedTranscript> {
        let mut rt = self.inner.runtime.lock().await;
        let committed = rt.state.committed()?;

        debug!("Taking committed transcript ({} chars)", committed.text.len());
        self.inner.discard(&mut rt).await;
        self.inner.publish(&rt.state);

        Some(committed)
    }
}

impl Inner {
    fn publish(&self, state: &SessionState) -> SessionSnapshot {
        let snapshot = state.snapshot();
        self.updates.send_replace(snapshot.clone());
        snapshot
    }

    /// Stop tasks, cancel the capability, delete the artifact and reset to `Idle`.
    ///
    /// Never fails; cleanup errors are logged.
    async fn discard(&self, rt: &mut Runtime) {
        rt.ticker = None;
        let had_session = match rt.pump.take() {
            Some(pump) => {
                pump.abort();
                true
            }
            None => false,
        };

        // A finished session may still hold listeners on the capability side
        let mut capture = self.capture.lock().await;
        if had_session || rt.state.status.is_active() || capture.is_capturing() {
            if let Err(e) = capture.cancel().await {
                warn!("Failed to cancel speech capture: {:#}", e);
            }
        }
        let artifact = rt
            .state
            .audio_artifact
            .take()
            .or_else(|| capture.audio_artifact());
        drop(capture);

        if let Some(path) = artifact {
            match tokio::fs::remove_file(&path).await {
                Ok(()) => info!("Deleted audio artifact {}", path.display()),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Could not delete audio file {}: {}", path.display(), e),
            }
        }

        rt.state.reset();
    }

    fn spawn_ticker(self: &Arc<Self>) -> RepeatingTask {
        let weak = Arc::downgrade(self);

        RepeatingTask::spawn(self.config.tick_interval, move || {
            let weak = Weak::clone(&weak);
            async move {
                let Some(inner) = weak.upgrade() else {
                    return ControlFlow::Break(());
                };
                let mut rt = inner.runtime.lock().await;

                if rt.state.status != SessionStatus::Recording {
                    return ControlFlow::Break(());
                }

                match rt.state.sync_elapsed(Instant::now()) {
                    Ok(_) => {
                        inner.publish(&rt.state);
                        ControlFlow::Continue(())
                    }
                    Err(e) => {
                        warn!("Duration tick failed, stopping timer: {:#}", e);
                        ControlFlow::Break(())
                    }
                }
            }
        })
    }

    fn spawn_pump(self: &Arc<Self>, mut events: mpsc::Receiver<SpeechEvent>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);

        tokio::spawn(async move {
            debug!("Speech event pump started");

            while let Some(event) = events.recv().await {
                let Some(inner) = weak.upgrade() else {
                    return;
                };
                let mut rt = inner.runtime.lock().await;
                inner.apply_event(&mut rt, event).await;
                inner.publish(&rt.state);
            }

            if let Some(inner) = weak.upgrade() {
                let mut rt = inner.runtime.lock().await;
                if rt.state.status.is_active() {
                    warn!("Speech capture ended without a final result");
                    rt.ticker = None;
                    rt.state.fail(SessionError::CaptureRuntime(CaptureErrorKind::Other(
                        "recognizer stopped without a result".to_string(),
                    )));
                    inner.publish(&rt.state);
                }
            }

            debug!("Speech event pump stopped");
        })
    }

    async fn apply_event(&self, rt: &mut Runtime, event: SpeechEvent) {
        match event {
            SpeechEvent::Start => debug!("Recognizer started listening"),

            SpeechEvent::PartialResult(text) => {
                if !rt.state.update_partial(text) {
                    debug!("Ignoring partial result in {:?}", rt.state.status);
                }
            }

            SpeechEvent::FinalResult {
                alternatives,
                confidence,
            } => {
                let confidence = confidence.unwrap_or(self.config.default_confidence);
                if !rt.state.complete(&alternatives, confidence, Instant::now()) {
                    debug!("Ignoring final result in {:?}", rt.state.status);
                    return;
                }
                rt.ticker = None;

                let capture = self.capture.lock().await;
                if rt.state.audio_artifact.is_none() {
                    rt.state.audio_artifact = capture.audio_artifact();
                }

                match rt.state.status {
                    SessionStatus::Completed => info!(
                        "Transcript committed ({} chars, confidence={:.2}, {}s)",
                        rt.state.final_text.len(),
                        rt.state.confidence,
                        rt.state.elapsed_seconds
                    ),
                    _ => warn!("Final result contained no speech"),
                }
            }

            SpeechEvent::Error(kind) => {
                if !rt.state.status.is_active() {
                    debug!("Ignoring capture error in {:?}: {}", rt.state.status, kind);
                    return;
                }
                rt.ticker = None;

                let error = SessionError::from(kind);
                if error.is_recoverable() {
                    warn!("Recording failed: {}", error);
                } else {
                    error!("Recording failed: {}", error);
                }
                rt.state.fail(error);
            }

            SpeechEvent::End => {
                if rt.state.begin_transcribing(Instant::now()) {
                    info!("End of speech detected, transcribing");
                    rt.ticker = None;
                }
            }
        }
    }
}
