use std::io::Write;

use tokio::io::AsyncReadExt;

use crate::config::{ChannelPaths, HookConfig};
use crate::decision::{self, HookOutput};
use crate::error::{IslandHookError, Result};
use crate::event::{EventClassifier, HookInput};
use crate::ipc::socket_client::EventTransport;
use crate::process::ProcessOrigin;
use crate::security;

/// Run the reporter: read one notification from stdin, forward it, and print
/// a control directive if the authority decided a permission request.
///
/// The only error returned is malformed input.
pub async fn run_hook(paths: Option<&ChannelPaths>) -> Result<()> {
    let mut raw = String::new();
    tokio::io::stdin()
        .read_to_string(&mut raw)
        .await
        .map_err(|e| IslandHookError::InvalidInput {
            reason: format!("cannot read stdin: {}", e),
        })?;
    let input = HookInput::parse(&raw)?;

    let config = HookConfig::load_optional(paths.map(|p| p.config_path.as_path()));

    if let Some(output) = report(&input, paths, &config).await {
        match serde_json::to_string(&output) {
            Ok(json) => {
                let mut stdout = std::io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", json).and_then(|_| stdout.flush()) {
                    tracing::debug!("failed to write hook output: {}", e);
                }
            }
            Err(e) => tracing::debug!("failed to encode hook output: {}", e),
        }
    }
    Ok(())
}

/// Classify, deliver and render one notification.
pub async fn report(
    input: &HookInput,
    paths: Option<&ChannelPaths>,
    config: &HookConfig,
) -> Option<HookOutput> {
    let classifier = EventClassifier::from_config(config);
    if classifier.is_suppressed(input) {
        tracing::debug!("suppressed {:?} notification", input.notification_type());
        return None;
    }

    let record = classifier.classify(input, ProcessOrigin::current().await)?;

    let Some(paths) = paths else {
        tracing::debug!("no channel directory; authority unreachable");
        return None;
    };

    let transport = EventTransport::from_config(paths.endpoint(), config);
    let credential = security::read_credential(&paths.credential_path, security::effective_uid());
    let reply = transport.deliver(&record, credential.as_ref()).await;

    if !record.is_request() {
        return None;
    }
    decision::render(reply.as_ref(), &config.deny_message)
}
