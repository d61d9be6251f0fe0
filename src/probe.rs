//! Host reachability checks via the system `ping` program.
use std::process::{Command, Output};

use crate::migrate::Probe;
use crate::platform::Os;

/// Captured output of a probe command.
#[derive(Debug)]
pub struct ExecResult {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not killed by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Probe hosts with ICMP echo requests.
#[derive(Debug, Clone)]
pub struct PingProbe {
    /// Echo requests per host.
    pub count: u32,
    /// Seconds to wait for each reply.
    pub timeout_secs: u32,
    os: Os,
}

impl PingProbe {
    /// Create a probe for the current platform.
    #[must_use]
    pub const fn new(count: u32, timeout_secs: u32) -> Self {
        Self {
            count,
            timeout_secs,
            os: Os::detect(),
        }
    }

    /// Run `ping` against `host` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if `ping` is not on `PATH` or cannot be spawned.
    pub fn ping(&self, host: &str) -> anyhow::Result<ExecResult> {
        use anyhow::Context as _;

        let program = which::which("ping").context("ping not found on PATH")?;
        let output = Command::new(&program)
            .args(self.os.ping_args(host, self.count, self.timeout_secs))
            .output()
            .with_context(|| format!("failed to execute: {}", program.display()))?;
        Ok(ExecResult::from(output))
    }
}

impl Probe for PingProbe {
    fn is_reachable(&self, host: &str) -> bool {
        match self.ping(host) {
            Ok(result) if result.success => true,
            Ok(result) => {
                tracing::debug!(
                    "ping {host} exited {}: {}",
                    result.code.unwrap_or(-1),
                    result.stdout.lines().last().unwrap_or_default().trim()
                );
                false
            }
            Err(e) => {
                tracing::warn!("cannot probe {host}: {e:#}");
                false
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn exec_result_from_output() {
        #[cfg(windows)]
        let output = Command::new("cmd").args(["/C", "echo", "hi"]).output().unwrap();
        #[cfg(not(windows))]
        let output = Command::new("echo").arg("hi").output().unwrap();
        let result = ExecResult::from(output);
        assert!(result.success);
        assert_eq!(result.code, Some(0));
        assert_eq!(result.stdout.trim(), "hi");
    }

    #[test]
    fn unresolvable_host_is_unreachable() {
        // Either ping is missing or the `.invalid` TLD fails to resolve.
        let probe = PingProbe::new(1, 1);
        assert!(!probe.is_reachable("no-such-host.invalid"));
    }
}
