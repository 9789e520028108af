use std::fs;
use std::io::{Read, Write};
use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::security::check_owner_only;

/// Shared secret proving a message comes from the authority's own user.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self(secret.into())
    }

    /// 32 random bytes, hex encoded.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Read the credential, or `None` if it cannot be trusted.
///
/// Ownership and mode are checked on the opened handle, so the file that is
/// inspected is the file that is read. Any group/other bit disqualifies it.
pub fn read_credential(path: &Path, expected_uid: u32) -> Option<Credential> {
    let mut file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::debug!("credential unavailable at {}: {}", path.display(), e);
            return None;
        }
    };

    let meta = file.metadata().ok()?;
    if let Err(violation) = check_owner_only(&meta, expected_uid, 0o077) {
        tracing::debug!("ignoring credential at {}: {}", path.display(), violation);
        return None;
    }
    if !meta.is_file() {
        return None;
    }

    let mut contents = String::new();
    file.read_to_string(&mut contents).ok()?;
    let secret = contents.trim();
    if secret.is_empty() {
        return None;
    }
    Some(Credential(secret.to_string()))
}

/// Write the credential with mode 0600, replacing any previous file.
pub fn write_credential(path: &Path, credential: &Credential) -> Result<()> {
    let tmp_path = path.with_extension("tmp");
    let _ = fs::remove_file(&tmp_path);
    {
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .mode(0o600)
            .open(&tmp_path)?;
        file.write_all(credential.expose().as_bytes())?;
        file.sync_all()?;
    }
    fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}
