use std::ffi::{CStr, OsStr};
use std::os::unix::ffi::OsStrExt;
use std::path::{Path, PathBuf};

use crate::security::{self, EndpointDescriptor};

pub const SOCKET_FILE_NAME: &str = "claude-island.sock";
pub const CREDENTIAL_FILE_NAME: &str = "auth-token";
pub const CONFIG_FILE_NAME: &str = "hook.yml";

/// Well-known locations of the channel, computed once per invocation.
///
/// Nothing here touches the filesystem. A base directory that does not exist
/// simply makes the endpoint and credential checks fail later on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelPaths {
    pub base_dir: PathBuf,
    pub socket_path: PathBuf,
    pub credential_path: PathBuf,
    pub config_path: PathBuf,
}

impl ChannelPaths {
    /// Resolve the per-user base directory for the effective uid.
    /// Returns `None` if no home directory can be determined.
    pub fn resolve() -> Option<Self> {
        let home = home_dir(security::effective_uid())?;
        Some(Self::from_base_dir(base_dir_under(&home)))
    }

    /// Derive all paths from an explicit base directory.
    pub fn from_base_dir(base_dir: impl Into<PathBuf>) -> Self {
        let base_dir = base_dir.into();
        Self {
            socket_path: base_dir.join(SOCKET_FILE_NAME),
            credential_path: base_dir.join(CREDENTIAL_FILE_NAME),
            config_path: base_dir.join(CONFIG_FILE_NAME),
            base_dir,
        }
    }

    /// Endpoint descriptor expecting the socket to belong to the current user.
    pub fn endpoint(&self) -> EndpointDescriptor {
        EndpointDescriptor::new(self.socket_path.clone(), security::effective_uid())
    }
}

#[cfg(target_os = "macos")]
fn base_dir_under(home: &Path) -> PathBuf {
    home.join("Library")
        .join("Application Support")
        .join("ClaudeIsland")
}

#[cfg(not(target_os = "macos"))]
fn base_dir_under(home: &Path) -> PathBuf {
    home.join(".local").join("share").join("claude-island")
}

/// Home directory of `uid` from the password database, then `$HOME`.
fn home_dir(uid: u32) -> Option<PathBuf> {
    passwd_home(uid).or_else(|| {
        std::env::var_os("HOME")
            .filter(|home| !home.is_empty())
            .map(PathBuf::from)
    })
}

fn passwd_home(uid: u32) -> Option<PathBuf> {
    let mut buf = vec![0 as libc::c_char; 4096];
    // SAFETY: passwd is a plain C struct; all-zero is a valid initial value.
    let mut pwd: libc::passwd = unsafe { std::mem::zeroed() };
    let mut result: *mut libc::passwd = std::ptr::null_mut();

    // SAFETY: every pointer refers to live, correctly sized storage owned by this frame.
    let ret = unsafe {
        libc::getpwuid_r(
            uid as libc::uid_t,
            &mut pwd,
            buf.as_mut_ptr(),
            buf.len(),
            &mut result,
        )
    };
    if ret != 0 || result.is_null() || pwd.pw_dir.is_null() {
        return None;
    }

    // SAFETY: pw_dir points into `buf`, NUL-terminated by getpwuid_r.
    let dir = unsafe { CStr::from_ptr(pwd.pw_dir) };
    if dir.to_bytes().is_empty() {
        return None;
    }
    Some(PathBuf::from(OsStr::from_bytes(dir.to_bytes())))
}
