pub mod credential;
pub mod endpoint;

pub use credential::{read_credential, write_credential, Credential};
pub use endpoint::{verify_endpoint, EndpointDescriptor, EndpointRejection};

use std::fs::Metadata;
use std::os::unix::fs::MetadataExt;

/// Effective uid of this process.
pub fn effective_uid() -> u32 {
    // SAFETY: geteuid has no preconditions and cannot fail.
    unsafe { libc::geteuid() as u32 }
}

/// Why a file's metadata cannot be trusted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TrustViolation {
    #[error("owned by uid {actual}, expected {expected}")]
    Owner { actual: u32, expected: u32 },

    #[error("mode {mode:o} grants access beyond the owner")]
    Permissions { mode: u32 },
}

/// Require `meta` to be owned by `expected_uid` with none of `forbidden_bits` set.
pub fn check_owner_only(
    meta: &Metadata,
    expected_uid: u32,
    forbidden_bits: u32,
) -> std::result::Result<(), TrustViolation> {
    if meta.uid() != expected_uid {
        return Err(TrustViolation::Owner {
            actual: meta.uid(),
            expected: expected_uid,
        });
    }
    let mode = meta.mode() & 0o7777;
    if mode & forbidden_bits != 0 {
        return Err(TrustViolation::Permissions { mode });
    }
    Ok(())
}
