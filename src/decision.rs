use serde::{Deserialize, Serialize};

/// The three possible permission verdicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Allow,
    Deny,
    /// Defer to the tool's own prompt. Also what a reply without a verdict means.
    #[default]
    Ask,
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Decision::Allow => write!(f, "allow"),
            Decision::Deny => write!(f, "deny"),
            Decision::Ask => write!(f, "ask"),
        }
    }
}

impl std::str::FromStr for Decision {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Decision::Allow),
            "deny" => Ok(Decision::Deny),
            "ask" => Ok(Decision::Ask),
            _ => Err(format!("unknown decision: {s}")),
        }
    }
}

/// Reply the authority sends for a permission request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuthorityReply {
    #[serde(default)]
    pub decision: Decision,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl AuthorityReply {
    pub fn new(decision: Decision, reason: Option<String>) -> Self {
        Self { decision, reason }
    }

    /// The reason, with an empty string treated as absent.
    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref().filter(|r| !r.is_empty())
    }
}

/// Control directive printed on stdout for the tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookOutput {
    #[serde(rename = "hookSpecificOutput")]
    pub hook_specific_output: HookSpecificOutput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookSpecificOutput {
    #[serde(rename = "hookEventName")]
    pub hook_event_name: String,
    pub decision: PermissionBehavior,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "behavior", rename_all = "lowercase")]
pub enum PermissionBehavior {
    Allow,
    Deny { message: String },
}

/// Turn the authority's reply into the tool's control output.
///
/// `None` means print nothing and let the tool fall back to its own prompt:
/// no reply, a transport failure, or an explicit `ask`.
pub fn render(reply: Option<&AuthorityReply>, default_deny_message: &str) -> Option<HookOutput> {
    let reply = reply?;
    let behavior = match reply.decision {
        Decision::Allow => PermissionBehavior::Allow,
        Decision::Deny => PermissionBehavior::Deny {
            message: reply.reason().unwrap_or(default_deny_message).to_string(),
        },
        Decision::Ask => return None,
    };

    Some(HookOutput {
        hook_specific_output: HookSpecificOutput {
            hook_event_name: "PermissionRequest".into(),
            decision: behavior,
        },
    })
}
