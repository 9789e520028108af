pub mod classify;

pub use classify::EventClassifier;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{IslandHookError, Result};

/// Lifecycle notification as delivered by the tool on stdin.
///
/// Fields are kept as raw JSON so that a value of an unexpected type degrades
/// to the field's default instead of failing the whole document. Only a
/// non-object or unparseable document is rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HookInput {
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub hook_event_name: Option<Value>,
    #[serde(default)]
    pub cwd: Option<Value>,
    #[serde(default)]
    pub tool_name: Option<Value>,
    #[serde(default)]
    pub tool_input: Option<Value>,
    #[serde(default)]
    pub tool_use_id: Option<Value>,
    #[serde(default)]
    pub notification_type: Option<Value>,
    #[serde(default)]
    pub message: Option<Value>,
}

impl HookInput {
    /// Parse the raw stdin document.
    pub fn parse(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw).map_err(|e| IslandHookError::InvalidInput {
            reason: e.to_string(),
        })?;
        // Struct deserializers also accept sequences.
        if !value.is_object() {
            return Err(IslandHookError::InvalidInput {
                reason: "expected a JSON object".into(),
            });
        }
        serde_json::from_value(value).map_err(|e| IslandHookError::InvalidInput {
            reason: e.to_string(),
        })
    }

    pub fn session_id(&self) -> Option<&str> {
        text(&self.session_id)
    }

    pub fn cwd(&self) -> Option<&str> {
        text(&self.cwd)
    }

    pub fn tool_name(&self) -> Option<&str> {
        text(&self.tool_name)
    }

    pub fn tool_use_id(&self) -> Option<&str> {
        text(&self.tool_use_id)
    }

    pub fn notification_type(&self) -> Option<&str> {
        text(&self.notification_type)
    }

    pub fn message(&self) -> Option<&str> {
        text(&self.message)
    }

    /// The event name as sent on the wire. A non-string name is kept as its
    /// JSON text so the authority can still see what arrived.
    pub fn event_name(&self) -> String {
        match &self.hook_event_name {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(name)) => name.clone(),
            Some(other) => other.to_string(),
        }
    }

    pub fn kind(&self) -> HookEventKind {
        match &self.hook_event_name {
            Some(Value::String(name)) => HookEventKind::from_name(name),
            _ => HookEventKind::Unrecognized(self.event_name()),
        }
    }
}

fn text(field: &Option<Value>) -> Option<&str> {
    field.as_ref().and_then(Value::as_str)
}

/// The fixed set of lifecycle kinds the tool emits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEventKind {
    SessionStart,
    SessionEnd,
    UserPromptSubmit,
    PreToolUse,
    PostToolUse,
    PermissionRequest,
    Notification,
    Stop,
    SubagentStop,
    PreCompact,
    Unrecognized(String),
}

impl HookEventKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "SessionStart" => Self::SessionStart,
            "SessionEnd" => Self::SessionEnd,
            "UserPromptSubmit" => Self::UserPromptSubmit,
            "PreToolUse" => Self::PreToolUse,
            "PostToolUse" => Self::PostToolUse,
            "PermissionRequest" => Self::PermissionRequest,
            "Notification" => Self::Notification,
            "Stop" => Self::Stop,
            "SubagentStop" => Self::SubagentStop,
            "PreCompact" => Self::PreCompact,
            other => Self::Unrecognized(other.to_string()),
        }
    }
}

/// Session state the authority should display after this event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Processing,
    RunningTool,
    WaitingForApproval,
    WaitingForInput,
    Notification,
    Ended,
    Compacting,
    Unknown,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Processing => write!(f, "processing"),
            SessionStatus::RunningTool => write!(f, "running_tool"),
            SessionStatus::WaitingForApproval => write!(f, "waiting_for_approval"),
            SessionStatus::WaitingForInput => write!(f, "waiting_for_input"),
            SessionStatus::Notification => write!(f, "notification"),
            SessionStatus::Ended => write!(f, "ended"),
            SessionStatus::Compacting => write!(f, "compacting"),
            SessionStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// Normalized event sent to the authority. One per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub session_id: String,
    pub cwd: String,
    /// Raw `hook_event_name`, kept verbatim for unrecognized kinds.
    pub event: String,
    pub pid: u32,
    /// Serialized as `null` when unknown.
    pub tty: Option<String>,
    pub status: SessionStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_use_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notification_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl EventRecord {
    /// Only permission requests block for a reply.
    pub fn is_request(&self) -> bool {
        self.status == SessionStatus::WaitingForApproval
    }
}
