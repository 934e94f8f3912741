//! Recording session management
//!
//! This module provides the `SessionController` that manages:
//! - The Idle → Recording → Transcribing → Completed/Failed lifecycle
//! - Partial transcript tracking and the committed transcript
//! - Duration measurement with a cancellable repeating tick
//! - Cleanup of the capability session and any local audio artifact

mod config;
mod controller;
mod state;
mod ticker;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use state::{CommittedTranscript, SessionSnapshot, SessionState, SessionStatus};
pub use ticker::RepeatingTask;
