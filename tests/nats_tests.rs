use dream_journal::error::CaptureErrorKind;
use dream_journal::nats::messages::{
    decode_event, ControlAction, ControlMessage, StatusMessage, TranscriptMessage,
};
use dream_journal::SpeechEvent;

#[test]
fn test_control_message_serialization() {
    let msg = ControlMessage {
        session_id: "dream-session-1".to_string(),
        action: ControlAction::Start,
        locale: Some("en-US".to_string()),
        timestamp: "2025-10-27T06:30:00Z".to_string(),
    };

    let json = serde_json::to_string(&msg).unwrap();
    assert!(json.contains("dream-session-1"));
    assert!(json.contains("\"action\":\"start\""));
    assert!(json.contains("\"locale\":\"en-US\""));

    let stop = ControlMessage {
        action: ControlAction::Stop,
        locale: None,
        ..msg
    };
    let json = serde_json::to_string(&stop).unwrap();
    assert!(!json.contains("locale"));
}

#[test]
fn test_control_subjects() {
    assert_eq!(ControlAction::Start.subject(), "stt.control.start");
    assert_eq!(ControlAction::Stop.subject(), "stt.control.stop");
    assert_eq!(ControlAction::Cancel.subject(), "stt.control.cancel");
    assert_eq!(ControlAction::Permission.subject(), "stt.control.permission");
}

#[test]
fn test_transcript_deserialization() {
    let json = r#"{
        "session_id": "dream-session-1",
        "text": "I was flying",
        "partial": false,
        "timestamp": "2025-10-27T06:30:05Z",
        "confidence": 0.95
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.session_id, "dream-session-1");
    assert_eq!(msg.text, "I was flying");
    assert!(!msg.partial);
    assert_eq!(msg.confidence, Some(0.95));
    assert!(msg.alternatives.is_empty());
}

#[test]
fn test_transcript_no_confidence() {
    let json = r#"{
        "session_id": "dream-session-1",
        "text": "No confidence score",
        "partial": false,
        "timestamp": "2025-10-27T06:30:05Z"
    }"#;

    let msg: TranscriptMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.confidence, None);
}

#[test]
fn test_final_transcript_puts_best_alternative_first() {
    let msg = TranscriptMessage {
        session_id: "s".to_string(),
        text: "I was flying".to_string(),
        partial: false,
        timestamp: "2025-10-27T06:30:05Z".to_string(),
        confidence: Some(0.8),
        alternatives: vec!["I was frying".to_string()],
    };

    assert_eq!(
        msg.into_event(),
        SpeechEvent::FinalResult {
            alternatives: vec!["I was flying".to_string(), "I was frying".to_string()],
            confidence: Some(0.8),
        }
    );
}

#[test]
fn test_status_error_maps_recognizer_code() {
    let json = r#"{"session_id": "s", "event": "error", "code": 7}"#;
    let msg: StatusMessage = serde_json::from_str(json).unwrap();
    assert_eq!(msg.into_event(), SpeechEvent::Error(CaptureErrorKind::NoSpeech));

    let json = r#"{"session_id": "s", "event": "error", "message": "model crashed"}"#;
    let msg: StatusMessage = serde_json::from_str(json).unwrap();
    assert_eq!(
        msg.into_event(),
        SpeechEvent::Error(CaptureErrorKind::Other("model crashed".to_string()))
    );
}

#[test]
fn test_decode_event_filters_by_session() {
    let partial = br#"{"session_id": "mine", "text": "I was", "partial": true, "timestamp": "t"}"#;

    let event = decode_event("stt.text.partial", partial, "mine").unwrap();
    assert_eq!(event, Some(SpeechEvent::PartialResult("I was".to_string())));

    let other = decode_event("stt.text.partial", partial, "someone-else").unwrap();
    assert_eq!(other, None);
}

#[test]
fn test_decode_event_status_and_unknown_subjects() {
    let end = br#"{"session_id": "mine", "event": "end"}"#;
    assert_eq!(
        decode_event("stt.status.mine", end, "mine").unwrap(),
        Some(SpeechEvent::End)
    );
    assert_eq!(decode_event("audio.frame", end, "mine").unwrap(), None);
}

#[test]
fn test_decode_event_rejects_malformed_payload() {
    assert!(decode_event("stt.text.final", b"not json", "mine").is_err());
}
