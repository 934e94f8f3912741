pub mod client;
pub mod messages;

pub use client::NatsClient;
pub use messages::{
    decode_event, ControlAction, ControlMessage, PermissionReply, StatusEvent, StatusMessage,
    TranscriptMessage,
};
