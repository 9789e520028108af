use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{IslandHookError, Result};
use crate::security;

/// Reporter tuning, read from `hook.yml` in the channel directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HookConfig {
    /// How long a permission request waits for the authority. Default: 300,
    /// which is also the ceiling.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Bound on connect + write for fire-and-forget events. Default: 5.
    #[serde(default = "default_send_timeout")]
    pub send_timeout_secs: u64,

    /// Largest reply accepted from the authority, in bytes.
    #[serde(default = "default_max_reply_bytes")]
    pub max_reply_bytes: usize,

    /// Notification subtypes never forwarded, in addition to
    /// `permission_prompt` which is always suppressed.
    #[serde(default)]
    pub suppressed_notifications: Vec<String>,

    /// Message attached to a deny decision that carries no reason.
    #[serde(default = "default_deny_message")]
    pub deny_message: String,
}

fn default_request_timeout() -> u64 {
    300
}
fn default_send_timeout() -> u64 {
    5
}
fn default_max_reply_bytes() -> usize {
    65_536
}
fn default_deny_message() -> String {
    "Denied by user via ClaudeIsland".into()
}

impl Default for HookConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_request_timeout(),
            send_timeout_secs: default_send_timeout(),
            max_reply_bytes: default_max_reply_bytes(),
            suppressed_notifications: Vec::new(),
            deny_message: default_deny_message(),
        }
    }
}

impl HookConfig {
    /// Load config from a YAML file. Returns default if the file doesn't exist.
    ///
    /// The file must belong to `expected_uid` and must not be writable by
    /// group or other.
    pub fn load_from(path: &Path, expected_uid: u32) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let file = std::fs::File::open(path)?;
        let meta = file.metadata()?;
        security::check_owner_only(&meta, expected_uid, 0o022).map_err(|violation| {
            IslandHookError::ConfigParse {
                path: path.to_path_buf(),
                reason: format!("untrusted file: {violation}"),
            }
        })?;
        let config: HookConfig =
            serde_yaml::from_reader(file).map_err(|e| IslandHookError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load config, falling back to defaults on any problem.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load_from(path, security::effective_uid()) {
            Ok(config) => config,
            Err(e) => {
                tracing::debug!("using default hook config: {}", e);
                Self::default()
            }
        }
    }

    /// Defaults when no channel directory could be resolved.
    pub fn load_optional(path: Option<&Path>) -> Self {
        path.map(Self::load_or_default).unwrap_or_default()
    }
}
