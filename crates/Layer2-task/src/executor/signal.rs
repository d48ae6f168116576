//! Process signals - termination delivery and exit classification

use crate::job::NO_EXIT_CODE;
use std::process::ExitStatus;

/// Send a graceful termination request (SIGTERM) to `pid`.
///
/// The error string is the OS reason, e.g. when the process already exited.
#[cfg(unix)]
pub fn send_terminate(pid: u32) -> std::result::Result<(), String> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    // pid 0 / negative values would address a whole process group
    let raw = i32::try_from(pid).map_err(|_| format!("pid {} out of range", pid))?;
    if raw <= 0 {
        return Err("no process id recorded".to_string());
    }

    kill(Pid::from_raw(raw), Signal::SIGTERM).map_err(|e| e.to_string())
}

#[cfg(not(unix))]
pub fn send_terminate(_pid: u32) -> std::result::Result<(), String> {
    Err("signal delivery is not supported on this platform".to_string())
}

/// Map a wait result to `(exit_code, error_message)`.
///
/// - exit 0: `(0, "")`
/// - exit N: `(N, "exit status N")`
/// - killed by signal S (unix): `(128 + S, "signal: <desc> (<NAME>)")`
/// - anything else: exit code stays `NO_EXIT_CODE`, only the message is set
pub fn classify_exit(result: std::io::Result<ExitStatus>) -> (i32, String) {
    let status = match result {
        Ok(status) => status,
        Err(e) => return (NO_EXIT_CODE, format!("wait failed: {}", e)),
    };

    if status.success() {
        return (0, String::new());
    }
    if let Some(code) = status.code() {
        return (code, format!("exit status {}", code));
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            let mut message = format!("signal: {}", describe_signal(sig));
            if status.core_dumped() {
                message.push_str(" (core dumped)");
            }
            return (128 + sig, message);
        }
    }

    (NO_EXIT_CODE, status.to_string())
}

#[cfg(unix)]
fn describe_signal(sig: i32) -> String {
    use nix::sys::signal::Signal;

    let Ok(signal) = Signal::try_from(sig) else {
        return format!("signal {}", sig);
    };
    let desc = match signal {
        Signal::SIGHUP => "hangup",
        Signal::SIGINT => "interrupt",
        Signal::SIGQUIT => "quit",
        Signal::SIGABRT => "aborted",
        Signal::SIGKILL => "killed",
        Signal::SIGSEGV => "segmentation fault",
        Signal::SIGPIPE => "broken pipe",
        Signal::SIGTERM => "terminated",
        _ => return signal.as_str().to_string(),
    };
    format!("{} ({})", desc, signal.as_str())
}
