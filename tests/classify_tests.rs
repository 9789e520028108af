//! Tests for mapping hook notifications onto event records.

use serde_json::json;

use island_hook::event::{EventClassifier, EventRecord, HookEventKind, HookInput, SessionStatus};
use island_hook::process::ProcessOrigin;

fn origin() -> ProcessOrigin {
    ProcessOrigin {
        pid: 4242,
        tty: Some("/dev/ttys004".into()),
    }
}

fn input(value: serde_json::Value) -> HookInput {
    HookInput::parse(&value.to_string()).unwrap()
}

fn classify(value: serde_json::Value) -> Option<EventRecord> {
    EventClassifier::default().classify(&input(value), origin())
}

// ---------------------------------------------------------------------------
// Input parsing
// ---------------------------------------------------------------------------

#[test]
fn malformed_json_is_invalid_input() {
    assert!(HookInput::parse("{not json").is_err());
    assert!(HookInput::parse("").is_err());
}

#[test]
fn non_object_is_invalid_input() {
    assert!(HookInput::parse("[1, 2]").is_err());
    assert!(HookInput::parse("\"SessionStart\"").is_err());
}

#[test]
fn empty_object_is_valid_input() {
    let parsed = HookInput::parse("{}").unwrap();
    assert_eq!(parsed.kind(), HookEventKind::Unrecognized(String::new()));
}

#[test]
fn extra_fields_are_ignored() {
    let parsed = input(json!({
        "hook_event_name": "Stop",
        "transcript_path": "/tmp/t.jsonl",
        "stop_hook_active": false
    }));
    assert_eq!(parsed.kind(), HookEventKind::Stop);
}

// ---------------------------------------------------------------------------
// Status mapping
// ---------------------------------------------------------------------------

#[test]
fn status_for_every_known_kind() {
    let cases = [
        ("UserPromptSubmit", SessionStatus::Processing),
        ("PreToolUse", SessionStatus::RunningTool),
        ("PostToolUse", SessionStatus::Processing),
        ("PermissionRequest", SessionStatus::WaitingForApproval),
        ("Stop", SessionStatus::WaitingForInput),
        ("SubagentStop", SessionStatus::WaitingForInput),
        ("SessionStart", SessionStatus::WaitingForInput),
        ("SessionEnd", SessionStatus::Ended),
        ("PreCompact", SessionStatus::Compacting),
    ];
    for (event, status) in cases {
        let record = classify(json!({ "hook_event_name": event })).unwrap();
        assert_eq!(record.status, status, "status for {event}");
        assert_eq!(record.event, event);
    }
}

#[test]
fn only_permission_request_is_a_request() {
    for event in [
        "UserPromptSubmit",
        "PreToolUse",
        "PostToolUse",
        "Notification",
        "Stop",
        "SubagentStop",
        "SessionStart",
        "SessionEnd",
        "PreCompact",
        "SomethingNew",
    ] {
        let record = classify(json!({ "hook_event_name": event })).unwrap();
        assert!(!record.is_request(), "{event} must be fire-and-forget");
    }

    let record = classify(json!({ "hook_event_name": "PermissionRequest" })).unwrap();
    assert!(record.is_request());
}

#[test]
fn unrecognized_kind_still_produces_record() {
    let record = classify(json!({
        "hook_event_name": "FutureHook",
        "session_id": "abc"
    }))
    .unwrap();
    assert_eq!(record.status, SessionStatus::Unknown);
    assert_eq!(record.event, "FutureHook");
    assert_eq!(record.session_id, "abc");
}

#[test]
fn missing_fields_get_defaults() {
    let record = classify(json!({})).unwrap();
    assert_eq!(record.session_id, "unknown");
    assert_eq!(record.cwd, "");
    assert_eq!(record.event, "");
    assert_eq!(record.status, SessionStatus::Unknown);
}

#[test]
fn non_string_event_name_is_unrecognized() {
    let raw = input(json!({ "hook_event_name": 7 }));
    assert_eq!(raw.kind(), HookEventKind::Unrecognized("7".into()));

    let record = EventClassifier::default().classify(&raw, origin()).unwrap();
    assert_eq!(record.status, SessionStatus::Unknown);
    assert_eq!(record.event, "7");
    assert!(!record.is_request());
}

#[test]
fn non_string_identity_fields_fall_back_to_defaults() {
    let record = classify(json!({
        "hook_event_name": "SessionStart",
        "session_id": 42,
        "cwd": ["/tmp"]
    }))
    .unwrap();
    assert_eq!(record.status, SessionStatus::WaitingForInput);
    assert_eq!(record.session_id, "unknown");
    assert_eq!(record.cwd, "");
}

#[test]
fn non_string_tool_fields_are_dropped() {
    let record = classify(json!({
        "hook_event_name": "PreToolUse",
        "tool_name": { "name": "Bash" },
        "tool_use_id": 9
    }))
    .unwrap();
    assert_eq!(record.status, SessionStatus::RunningTool);
    assert_eq!(record.tool, None);
    assert_eq!(record.tool_use_id, None);
}

#[test]
fn non_string_notification_type_is_not_suppressed() {
    let raw = input(json!({
        "hook_event_name": "Notification",
        "notification_type": false,
        "message": 3
    }));
    let record = EventClassifier::default().classify(&raw, origin()).unwrap();
    assert_eq!(record.status, SessionStatus::Notification);
    assert_eq!(record.notification_type, None);
    assert_eq!(record.message, None);
}

#[test]
fn process_origin_is_attached() {
    let record = classify(json!({ "hook_event_name": "SessionStart" })).unwrap();
    assert_eq!(record.pid, 4242);
    assert_eq!(record.tty.as_deref(), Some("/dev/ttys004"));
}

// ---------------------------------------------------------------------------
// Tool events
// ---------------------------------------------------------------------------

#[test]
fn pre_tool_use_carries_tool_fields() {
    let record = classify(json!({
        "hook_event_name": "PreToolUse",
        "session_id": "s1",
        "cwd": "/work",
        "tool_name": "Bash",
        "tool_input": { "command": "ls" },
        "tool_use_id": "toolu_01"
    }))
    .unwrap();

    assert_eq!(record.tool.as_deref(), Some("Bash"));
    assert_eq!(record.tool_input, Some(json!({ "command": "ls" })));
    assert_eq!(record.tool_use_id.as_deref(), Some("toolu_01"));
    assert_eq!(record.cwd, "/work");
}

#[test]
fn tool_input_defaults_to_empty_object() {
    let record = classify(json!({
        "hook_event_name": "PostToolUse",
        "tool_name": "Read"
    }))
    .unwrap();
    assert_eq!(record.tool_input, Some(json!({})));
    assert_eq!(record.tool_use_id, None);
}

#[test]
fn permission_request_omits_tool_use_id() {
    let record = classify(json!({
        "hook_event_name": "PermissionRequest",
        "tool_name": "Write",
        "tool_input": { "file_path": ".env" },
        "tool_use_id": "toolu_02"
    }))
    .unwrap();

    assert_eq!(record.tool.as_deref(), Some("Write"));
    assert_eq!(record.tool_input, Some(json!({ "file_path": ".env" })));
    assert_eq!(record.tool_use_id, None);
}

#[test]
fn lifecycle_events_carry_no_tool_fields() {
    let record = classify(json!({
        "hook_event_name": "SessionStart",
        "tool_name": "Bash"
    }))
    .unwrap();
    assert_eq!(record.tool, None);
    assert_eq!(record.tool_input, None);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[test]
fn permission_prompt_notification_is_suppressed() {
    let raw = input(json!({
        "hook_event_name": "Notification",
        "notification_type": "permission_prompt"
    }));
    let classifier = EventClassifier::default();
    assert!(classifier.is_suppressed(&raw));
    assert!(classifier.classify(&raw, origin()).is_none());
}

#[test]
fn idle_prompt_means_waiting_for_input() {
    let record = classify(json!({
        "hook_event_name": "Notification",
        "notification_type": "idle_prompt",
        "message": "Claude is waiting for your input"
    }))
    .unwrap();
    assert_eq!(record.status, SessionStatus::WaitingForInput);
    assert_eq!(record.notification_type.as_deref(), Some("idle_prompt"));
    assert_eq!(
        record.message.as_deref(),
        Some("Claude is waiting for your input")
    );
}

#[test]
fn other_notifications_keep_their_subtype() {
    let record = classify(json!({
        "hook_event_name": "Notification",
        "notification_type": "auth_success",
        "message": "ok"
    }))
    .unwrap();
    assert_eq!(record.status, SessionStatus::Notification);
    assert_eq!(record.notification_type.as_deref(), Some("auth_success"));
}

#[test]
fn notification_without_subtype_is_forwarded() {
    let record = classify(json!({ "hook_event_name": "Notification" })).unwrap();
    assert_eq!(record.status, SessionStatus::Notification);
    assert_eq!(record.notification_type, None);
}

#[test]
fn suppression_list_is_configurable() {
    let classifier = EventClassifier::new(vec!["idle_prompt".into()]);

    let idle = input(json!({
        "hook_event_name": "Notification",
        "notification_type": "idle_prompt"
    }));
    assert!(classifier.classify(&idle, origin()).is_none());

    let prompt = input(json!({
        "hook_event_name": "Notification",
        "notification_type": "permission_prompt"
    }));
    assert!(classifier.classify(&prompt, origin()).is_none());
}

#[test]
fn permission_prompt_cannot_be_unsuppressed() {
    let classifier = EventClassifier::new(Vec::new());
    assert_eq!(classifier.suppressed_notifications(), ["permission_prompt"]);

    let prompt = input(json!({
        "hook_event_name": "Notification",
        "notification_type": "permission_prompt"
    }));
    assert!(classifier.is_suppressed(&prompt));
    assert!(classifier.classify(&prompt, origin()).is_none());
}

#[test]
fn duplicate_suppressed_subtypes_collapse() {
    let classifier =
        EventClassifier::new(vec!["permission_prompt".into(), "auth_success".into()]);
    assert_eq!(
        classifier.suppressed_notifications(),
        ["permission_prompt", "auth_success"]
    );
}

#[test]
fn suppression_applies_only_to_notifications() {
    let raw = input(json!({
        "hook_event_name": "Stop",
        "notification_type": "permission_prompt"
    }));
    assert!(!EventClassifier::default().is_suppressed(&raw));
}

// ---------------------------------------------------------------------------
// Wire shape
// ---------------------------------------------------------------------------

#[test]
fn record_serializes_with_null_tty_and_without_absent_fields() {
    let record = EventClassifier::default()
        .classify(
            &input(json!({ "hook_event_name": "SessionEnd", "session_id": "s" })),
            ProcessOrigin { pid: 7, tty: None },
        )
        .unwrap();

    let value = serde_json::to_value(&record).unwrap();
    assert_eq!(
        value,
        json!({
            "session_id": "s",
            "cwd": "",
            "event": "SessionEnd",
            "pid": 7,
            "tty": null,
            "status": "ended"
        })
    );
}

#[test]
fn status_serializes_snake_case() {
    let value = serde_json::to_value(SessionStatus::WaitingForApproval).unwrap();
    assert_eq!(value, json!("waiting_for_approval"));
    assert_eq!(SessionStatus::RunningTool.to_string(), "running_tool");
}
