pub mod backend;
pub mod nats;
pub mod scripted;

pub use backend::{SpeechCapture, SpeechEvent};
pub use nats::NatsSpeechCapture;
pub use scripted::{ScriptHandle, ScriptedCapture};
