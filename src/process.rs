use std::ffi::CStr;
use std::os::unix::io::AsRawFd;
use std::process::Stdio;
use std::time::Duration;

use tokio::process::Command;

/// Upper bound on the `ps` lookup; the tool is blocked while the hook runs.
const PS_TIMEOUT: Duration = Duration::from_secs(2);

/// The external tool's process, as seen from the hook.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOrigin {
    pub pid: u32,
    pub tty: Option<String>,
}

impl ProcessOrigin {
    /// The hook is spawned directly by the tool, so the tool is our parent.
    pub async fn current() -> Self {
        let pid = parent_pid();
        let tty = match parent_tty(pid).await {
            Some(tty) => Some(tty),
            None => own_tty(),
        };
        Self { pid, tty }
    }
}

fn parent_pid() -> u32 {
    std::os::unix::process::parent_id()
}

/// Terminal of `pid` according to `ps`, as a `/dev/` path.
async fn parent_tty(pid: u32) -> Option<String> {
    let pid = pid.to_string();
    command_tty("ps", &["-p", &pid, "-o", "tty="], PS_TIMEOUT).await
}

/// Run `program` and read a tty name from its stdout, giving up after `limit`.
async fn command_tty(program: &str, args: &[&str], limit: Duration) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    let output = match tokio::time::timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            tracing::debug!("{} failed to run: {}", program, e);
            return None;
        }
        Err(_) => {
            tracing::debug!("{} did not finish within {:?}", program, limit);
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    normalize_ps_tty(&String::from_utf8_lossy(&output.stdout))
}

fn normalize_ps_tty(raw: &str) -> Option<String> {
    let tty = raw.trim();
    if tty.is_empty() || tty == "??" || tty == "-" || tty == "?" {
        return None;
    }
    if tty.starts_with("/dev/") {
        Some(tty.to_string())
    } else {
        Some(format!("/dev/{tty}"))
    }
}

/// Fallback: whichever of our own stdin/stdout is a terminal.
fn own_tty() -> Option<String> {
    ttyname(std::io::stdin().as_raw_fd()).or_else(|| ttyname(std::io::stdout().as_raw_fd()))
}

fn ttyname(fd: libc::c_int) -> Option<String> {
    let mut buf = [0 as libc::c_char; 256];
    // SAFETY: buf is valid for buf.len() bytes for the duration of the call.
    let ret = unsafe { libc::ttyname_r(fd, buf.as_mut_ptr(), buf.len()) };
    if ret != 0 {
        return None;
    }
    // SAFETY: on success ttyname_r NUL-terminates within buf.
    let name = unsafe { CStr::from_ptr(buf.as_ptr()) };
    Some(name.to_string_lossy().into_owned())
}
