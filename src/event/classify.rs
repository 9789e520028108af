use serde_json::Value;

use crate::config::HookConfig;
use crate::event::{EventRecord, HookEventKind, HookInput, SessionStatus};
use crate::process::ProcessOrigin;

/// Notification subtype the permission request already covers; never forwarded.
pub const PERMISSION_PROMPT: &str = "permission_prompt";

/// Maps tool notifications onto session status records.
#[derive(Debug, Clone)]
pub struct EventClassifier {
    suppressed_notifications: Vec<String>,
}

impl Default for EventClassifier {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl EventClassifier {
    /// `extra_suppressed` is added to [`PERMISSION_PROMPT`], which is always suppressed.
    pub fn new(extra_suppressed: Vec<String>) -> Self {
        let mut suppressed_notifications = vec![PERMISSION_PROMPT.to_string()];
        for subtype in extra_suppressed {
            if !suppressed_notifications.contains(&subtype) {
                suppressed_notifications.push(subtype);
            }
        }
        Self {
            suppressed_notifications,
        }
    }

    pub fn from_config(config: &HookConfig) -> Self {
        Self::new(config.suppressed_notifications.clone())
    }

    /// Every notification subtype that produces no record.
    pub fn suppressed_notifications(&self) -> &[String] {
        &self.suppressed_notifications
    }

    /// Whether this input would produce no record at all.
    pub fn is_suppressed(&self, input: &HookInput) -> bool {
        input.kind() == HookEventKind::Notification
            && input
                .notification_type()
                .is_some_and(|t| self.suppressed_notifications.iter().any(|s| s == t))
    }

    /// Build the record for `input`, or `None` for a suppressed notification.
    pub fn classify(&self, input: &HookInput, origin: ProcessOrigin) -> Option<EventRecord> {
        if self.is_suppressed(input) {
            return None;
        }

        let mut record = EventRecord {
            session_id: input.session_id().unwrap_or("unknown").to_string(),
            cwd: input.cwd().unwrap_or_default().to_string(),
            event: input.event_name(),
            pid: origin.pid,
            tty: origin.tty,
            status: SessionStatus::Unknown,
            tool: None,
            tool_input: None,
            tool_use_id: None,
            notification_type: None,
            message: None,
        };

        match input.kind() {
            HookEventKind::UserPromptSubmit => record.status = SessionStatus::Processing,
            HookEventKind::PreToolUse => {
                record.status = SessionStatus::RunningTool;
                attach_tool(&mut record, input, true);
            }
            HookEventKind::PostToolUse => {
                record.status = SessionStatus::Processing;
                attach_tool(&mut record, input, true);
            }
            HookEventKind::PermissionRequest => {
                // The authority correlates with the PreToolUse it already cached.
                record.status = SessionStatus::WaitingForApproval;
                attach_tool(&mut record, input, false);
            }
            HookEventKind::Notification => {
                record.status = match input.notification_type() {
                    Some("idle_prompt") => SessionStatus::WaitingForInput,
                    _ => SessionStatus::Notification,
                };
                record.notification_type = input.notification_type().map(str::to_string);
                record.message = input.message().map(str::to_string);
            }
            HookEventKind::Stop | HookEventKind::SubagentStop | HookEventKind::SessionStart => {
                record.status = SessionStatus::WaitingForInput
            }
            HookEventKind::SessionEnd => record.status = SessionStatus::Ended,
            HookEventKind::PreCompact => record.status = SessionStatus::Compacting,
            HookEventKind::Unrecognized(name) => {
                tracing::debug!("unrecognized hook event {:?}", name);
                record.status = SessionStatus::Unknown;
            }
        }

        Some(record)
    }
}

fn attach_tool(record: &mut EventRecord, input: &HookInput, with_tool_use_id: bool) {
    record.tool = input.tool_name().map(str::to_string);
    record.tool_input = Some(
        input
            .tool_input
            .clone()
            .unwrap_or_else(|| Value::Object(Default::default())),
    );
    if with_tool_use_id {
        record.tool_use_id = input
            .tool_use_id()
            .filter(|id| !id.is_empty())
            .map(str::to_string);
    }
}
