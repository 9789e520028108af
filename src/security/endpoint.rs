use std::io::ErrorKind;
use std::os::unix::fs::{FileTypeExt, MetadataExt};
use std::path::PathBuf;

/// Where the authority's socket is expected and who must own it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointDescriptor {
    pub path: PathBuf,
    pub expected_uid: u32,
}

impl EndpointDescriptor {
    pub fn new(path: PathBuf, expected_uid: u32) -> Self {
        Self { path, expected_uid }
    }
}

/// Reason the endpoint was not trusted. These are steady-state outcomes
/// (the authority is usually just not running), not faults.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EndpointRejection {
    #[error("socket does not exist at {}", path.display())]
    Missing { path: PathBuf },

    #[error("socket owned by uid {actual}, expected {expected}")]
    WrongOwner { actual: u32, expected: u32 },

    #[error("path is not a socket")]
    NotASocket,

    #[error("cannot stat socket: {reason}")]
    Unreadable { reason: String },
}

/// Verify the endpoint before any byte is sent.
///
/// Order matters: existence, then owner, then kind. A socket planted by
/// another local user at the well-known path fails the owner check.
pub fn verify_endpoint(endpoint: &EndpointDescriptor) -> Result<(), EndpointRejection> {
    let meta = match std::fs::metadata(&endpoint.path) {
        Ok(meta) => meta,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(EndpointRejection::Missing {
                path: endpoint.path.clone(),
            })
        }
        Err(e) => {
            return Err(EndpointRejection::Unreadable {
                reason: e.to_string(),
            })
        }
    };

    if meta.uid() != endpoint.expected_uid {
        return Err(EndpointRejection::WrongOwner {
            actual: meta.uid(),
            expected: endpoint.expected_uid,
        });
    }

    if !meta.file_type().is_socket() {
        return Err(EndpointRejection::NotASocket);
    }

    Ok(())
}
