use anyhow::Result;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::backend::{SpeechCapture, SpeechEvent};

const EVENT_BUFFER: usize = 32;

#[derive(Debug)]
struct Script {
    permission_granted: bool,
    start_failure: Option<String>,
    final_on_stop: Option<SpeechEvent>,
    audio_artifact: Option<PathBuf>,
    sender: Option<mpsc::Sender<SpeechEvent>>,
    capturing: bool,
    starts: usize,
    stops: usize,
    cancels: usize,
    last_locale: Option<String>,
}

/// Speech capture that only emits what its [`ScriptHandle`] tells it to.
///
/// Used by tests and the demo binary to drive a session deterministically.
pub struct ScriptedCapture {
    script: Arc<Mutex<Script>>,
}

/// Controls a [`ScriptedCapture`] from outside the session
#[derive(Clone)]
pub struct ScriptHandle {
    script: Arc<Mutex<Script>>,
}

impl ScriptedCapture {
    pub fn new() -> (Self, ScriptHandle) {
        let script = Arc::new(Mutex::new(Script {
            permission_granted: true,
            start_failure: None,
            final_on_stop: None,
            audio_artifact: None,
            sender: None,
            capturing: false,
            starts: 0,
            stops: 0,
            cancels: 0,
            last_locale: None,
        }));

        (
            Self {
                script: Arc::clone(&script),
            },
            ScriptHandle { script },
        )
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        lock(&self.script)
    }
}

fn lock(script: &Mutex<Script>) -> MutexGuard<'_, Script> {
    // A panicking test thread must not wedge every other assertion
    script.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait::async_trait]
impl SpeechCapture for ScriptedCapture {
    async fn request_permission(&mut self) -> Result<bool> {
        Ok(self.script().permission_granted)
    }

    async fn start(&mut self, locale: &str) -> Result<mpsc::Receiver<SpeechEvent>> {
        let mut script = self.script();
        script.starts += 1;
        script.last_locale = Some(locale.to_string());

        if let Some(reason) = script.start_failure.take() {
            anyhow::bail!(reason);
        }

        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        script.sender = Some(tx);
        script.capturing = true;
        debug!("Scripted capture started (locale={})", locale);

        Ok(rx)
    }

    async fn stop(&mut self) -> Result<()> {
        let mut script = self.script();
        script.stops += 1;
        script.capturing = false;

        let pending = script.final_on_stop.take();
        if let (Some(event), Some(sender)) = (pending, script.sender.as_ref()) {
            if let Err(e) = sender.try_send(event) {
                warn!("Scripted capture dropped final result: {}", e);
            }
        }

        Ok(())
    }

    async fn cancel(&mut self) -> Result<()> {
        let mut script = self.script();
        script.cancels += 1;
        script.capturing = false;
        script.sender = None;
        Ok(())
    }

    fn is_capturing(&self) -> bool {
        self.script().capturing
    }

    fn name(&self) -> &str {
        "scripted"
    }

    fn audio_artifact(&self) -> Option<PathBuf> {
        self.script().audio_artifact.clone()
    }
}

impl ScriptHandle {
    /// Deliver an event to the running session; false if nothing is listening
    pub async fn emit(&self, event: SpeechEvent) -> bool {
        let sender = lock(&self.script).sender.clone();
        match sender {
            Some(sender) => sender.send(event).await.is_ok(),
            None => false,
        }
    }

    /// Convenience for a single-alternative final result
    pub async fn emit_final(&self, text: &str, confidence: Option<f32>) -> bool {
        self.emit(SpeechEvent::FinalResult {
            alternatives: vec![text.to_string()],
            confidence,
        })
        .await
    }

    /// Close the event stream, as a recognizer does when it shuts down
    pub fn close(&self) {
        let mut script = lock(&self.script);
        script.sender = None;
        script.capturing = false;
    }

    pub fn set_permission(&self, granted: bool) {
        lock(&self.script).permission_granted = granted;
    }

    /// Make the next `start()` fail with this reason
    pub fn fail_next_start(&self, reason: &str) {
        lock(&self.script).start_failure = Some(reason.to_string());
    }

    /// Deliver this final result as soon as `stop()` is called
    pub fn final_on_stop(&self, text: &str, confidence: Option<f32>) {
        lock(&self.script).final_on_stop = Some(SpeechEvent::FinalResult {
            alternatives: vec![text.to_string()],
            confidence,
        });
    }

    pub fn set_audio_artifact(&self, path: Option<PathBuf>) {
        lock(&self.script).audio_artifact = path;
    }

    pub fn start_count(&self) -> usize {
        lock(&self.script).starts
    }

    pub fn stop_count(&self) -> usize {
        lock(&self.script).stops
    }

    pub fn cancel_count(&self) -> usize {
        lock(&self.script).cancels
    }

    pub fn is_capturing(&self) -> bool {
        lock(&self.script).capturing
    }

    pub fn last_locale(&self) -> Option<String> {
        lock(&self.script).last_locale.clone()
    }
}
