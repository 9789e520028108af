use std::future::Future;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::UnixStream;

use crate::config::HookConfig;
use crate::decision::AuthorityReply;
use crate::error::{IslandHookError, Result};
use crate::event::EventRecord;
use crate::ipc::{read_json_message, Envelope};
use crate::security::{verify_endpoint, Credential, EndpointDescriptor};

/// Hard ceiling on the wait for a permission decision.
pub const MAX_REQUEST_TIMEOUT_SECS: u64 = 300;

/// Unix socket client the reporter uses to reach the authority.
///
/// One connection per delivery, never retried.
pub struct EventTransport {
    endpoint: EndpointDescriptor,
    request_timeout_secs: u64,
    send_timeout_secs: u64,
    max_reply_bytes: usize,
}

impl EventTransport {
    pub fn new(endpoint: EndpointDescriptor) -> Self {
        Self::from_config(endpoint, &HookConfig::default())
    }

    pub fn from_config(endpoint: EndpointDescriptor, config: &HookConfig) -> Self {
        Self {
            endpoint,
            request_timeout_secs: config.request_timeout_secs.min(MAX_REQUEST_TIMEOUT_SECS),
            send_timeout_secs: config.send_timeout_secs,
            max_reply_bytes: config.max_reply_bytes,
        }
    }

    /// Deadline applied to a permission request exchange.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Send `record` and, for a request, wait for the authority's reply.
    ///
    /// Every failure is absorbed here and comes back as `None`; the caller
    /// cannot tell an absent authority from a misbehaving one.
    pub async fn deliver(
        &self,
        record: &EventRecord,
        credential: Option<&Credential>,
    ) -> Option<AuthorityReply> {
        match self.try_deliver(record, credential).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!("event {} not delivered: {}", record.event, e);
                None
            }
        }
    }

    /// Same as [`deliver`](Self::deliver) but with the failure reason kept.
    pub async fn try_deliver(
        &self,
        record: &EventRecord,
        credential: Option<&Credential>,
    ) -> Result<Option<AuthorityReply>> {
        verify_endpoint(&self.endpoint)?;
        let credential = credential.ok_or(IslandHookError::CredentialUnavailable)?;

        let envelope = Envelope {
            record: record.clone(),
            auth_token: credential.clone(),
        };
        let payload = serde_json::to_vec(&envelope)?;

        if !record.is_request() {
            with_deadline(self.send_timeout_secs, async {
                self.connect_and_send(&payload).await?;
                Ok(None)
            })
            .await
        } else {
            with_deadline(self.request_timeout_secs, async {
                let mut stream = self.connect_and_send(&payload).await?;
                let reply: AuthorityReply =
                    read_json_message(&mut stream, self.max_reply_bytes).await?;
                tracing::debug!("authority replied {}", reply.decision);
                Ok(Some(reply))
            })
            .await
        }
    }

    /// Connect, write the whole message and half-close the write side.
    async fn connect_and_send(&self, payload: &[u8]) -> Result<UnixStream> {
        let mut stream = UnixStream::connect(&self.endpoint.path)
            .await
            .map_err(|e| IslandHookError::Ipc {
                reason: format!("connect failed: {}", e),
            })?;
        stream
            .write_all(payload)
            .await
            .map_err(|e| IslandHookError::Ipc {
                reason: format!("write failed: {}", e),
            })?;
        stream.shutdown().await.map_err(|e| IslandHookError::Ipc {
            reason: format!("shutdown write failed: {}", e),
        })?;
        Ok(stream)
    }
}

async fn with_deadline<T>(timeout_secs: u64, fut: impl Future<Output = Result<T>>) -> Result<T> {
    match tokio::time::timeout(Duration::from_secs(timeout_secs), fut).await {
        Ok(result) => result,
        Err(_) => Err(IslandHookError::AuthorityTimeout { timeout_secs }),
    }
}
