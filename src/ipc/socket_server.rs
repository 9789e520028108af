use std::fs;
use std::future::Future;
use std::os::unix::fs::{DirBuilderExt, PermissionsExt};
use std::pin::Pin;
use std::sync::Arc;

use tokio::io::AsyncWriteExt;
use tokio::net::{UnixListener, UnixStream};
use tokio::sync::Notify;

use crate::config::ChannelPaths;
use crate::decision::AuthorityReply;
use crate::error::{IslandHookError, Result};
use crate::event::EventRecord;
use crate::ipc::{read_json_message, Envelope};
use crate::security::{write_credential, Credential};

/// Future returned by an event handler; resolves to the reply for requests.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Option<AuthorityReply>> + Send>>;

/// Largest envelope the authority accepts from a reporter.
const MAX_ENVELOPE_BYTES: usize = 1_048_576;

/// Minimal authority: owns the endpoint and the credential, and hands every
/// authenticated event to a handler. The handler's reply is only sent back
/// for permission requests.
pub struct IpcServer {
    paths: ChannelPaths,
    shutdown_signal: Arc<Notify>,
}

impl IpcServer {
    pub fn new(paths: ChannelPaths) -> Self {
        Self {
            paths,
            shutdown_signal: Arc::new(Notify::new()),
        }
    }

    /// Start listening for connections. Each connection is handled in a spawned task.
    pub async fn serve<F>(&self, handler: F) -> Result<()>
    where
        F: Fn(EventRecord) -> HandlerFuture + Send + Sync + 'static,
    {
        if !self.paths.base_dir.exists() {
            fs::DirBuilder::new()
                .recursive(true)
                .mode(0o700)
                .create(&self.paths.base_dir)?;
        }

        // Remove a stale socket from a previous run
        if self.paths.socket_path.exists() {
            fs::remove_file(&self.paths.socket_path)?;
        }

        let listener =
            UnixListener::bind(&self.paths.socket_path).map_err(|e| IslandHookError::Ipc {
                reason: format!(
                    "failed to bind socket at {}: {}",
                    self.paths.socket_path.display(),
                    e
                ),
            })?;
        fs::set_permissions(&self.paths.socket_path, fs::Permissions::from_mode(0o600))?;

        let credential = Arc::new(Credential::generate());
        write_credential(&self.paths.credential_path, &credential)?;

        tracing::info!("authority listening on {}", self.paths.socket_path.display());

        let handler = Arc::new(handler);
        let shutdown = self.shutdown_signal.clone();

        loop {
            tokio::select! {
                accept_result = listener.accept() => {
                    match accept_result {
                        Ok((stream, _addr)) => {
                            let handler = handler.clone();
                            let credential = credential.clone();
                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(stream, &credential, handler).await {
                                    tracing::warn!("connection error: {}", e);
                                }
                            });
                        }
                        Err(e) => {
                            tracing::warn!("accept error: {}", e);
                        }
                    }
                }
                _ = shutdown.notified() => {
                    tracing::info!("authority shutting down");
                    break;
                }
            }
        }

        let _ = fs::remove_file(&self.paths.socket_path);
        let _ = fs::remove_file(&self.paths.credential_path);
        Ok(())
    }

    /// Graceful shutdown.
    pub fn shutdown(&self) {
        self.shutdown_signal.notify_one();
    }
}

/// Handle a single reporter connection.
async fn handle_connection<F>(
    mut stream: UnixStream,
    credential: &Credential,
    handler: Arc<F>,
) -> Result<()>
where
    F: Fn(EventRecord) -> HandlerFuture + Send + Sync + 'static,
{
    let envelope: Envelope = read_json_message(&mut stream, MAX_ENVELOPE_BYTES).await?;

    if !tokens_match(envelope.auth_token.expose(), credential.expose()) {
        tracing::warn!("dropping event with invalid token");
        return Ok(());
    }

    let record = envelope.record;
    let is_request = record.is_request();
    let reply = handler(record).await;

    if !is_request {
        return Ok(());
    }

    if let Some(reply) = reply {
        let reply_json = serde_json::to_vec(&reply)?;
        stream
            .write_all(&reply_json)
            .await
            .map_err(|e| IslandHookError::Ipc {
                reason: format!("write failed: {}", e),
            })?;
    }
    stream.shutdown().await.map_err(|e| IslandHookError::Ipc {
        reason: format!("shutdown failed: {}", e),
    })?;

    Ok(())
}

/// Compare without short-circuiting on the first differing byte.
fn tokens_match(presented: &str, expected: &str) -> bool {
    let (a, b) = (presented.as_bytes(), expected.as_bytes());
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
