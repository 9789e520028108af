pub mod socket_client;
pub mod socket_server;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::error::{IslandHookError, Result};
use crate::event::EventRecord;
use crate::security::Credential;

/// Wire message from reporter to authority: the record plus the shared secret.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(flatten)]
    pub record: EventRecord,

    #[serde(rename = "_auth_token")]
    pub auth_token: Credential,
}

/// Read one JSON document from `reader`.
///
/// A message ends at end-of-stream or as soon as the bytes read so far form a
/// complete JSON value, whichever comes first. Peers that keep the
/// connection open after writing are handled the same as peers that close it.
pub async fn read_json_message<R, T>(reader: &mut R, limit: usize) -> Result<T>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];

    loop {
        let n = reader.read(&mut chunk).await.map_err(|e| IslandHookError::Ipc {
            reason: format!("read failed: {}", e),
        })?;

        if n == 0 {
            if buf.is_empty() {
                return Err(IslandHookError::Ipc {
                    reason: "connection closed without a message".into(),
                });
            }
            return serde_json::from_slice(&buf).map_err(|e| IslandHookError::Ipc {
                reason: format!("invalid message JSON: {}", e),
            });
        }

        buf.extend_from_slice(&chunk[..n]);
        if buf.len() > limit {
            return Err(IslandHookError::MessageTooLarge { limit });
        }

        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&buf) {
            return serde_json::from_value(value).map_err(|e| IslandHookError::Ipc {
                reason: format!("unexpected message shape: {}", e),
            });
        }
    }
}
