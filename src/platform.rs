//! Platform detection.
use std::fmt;

/// Detected operating system family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Os {
    /// Linux and other Unix-like systems.
    Unix,
    /// Windows.
    Windows,
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unix => write!(f, "unix"),
            Self::Windows => write!(f, "windows"),
        }
    }
}

impl Os {
    /// Detect the current operating system family.
    #[must_use]
    pub const fn detect() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Unix
        }
    }

    /// Arguments for the system `ping` sending `count` echo requests and
    /// waiting `timeout_secs` for each reply.
    ///
    /// Windows takes the timeout in milliseconds; iputils takes seconds.
    #[must_use]
    pub fn ping_args(self, host: &str, count: u32, timeout_secs: u32) -> Vec<String> {
        let count = count.max(1).to_string();
        match self {
            Self::Windows => vec![
                "-n".to_string(),
                count,
                "-w".to_string(),
                (u64::from(timeout_secs) * 1000).to_string(),
                host.to_string(),
            ],
            Self::Unix => vec![
                "-c".to_string(),
                count,
                "-W".to_string(),
                timeout_secs.max(1).to_string(),
                host.to_string(),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display() {
        assert_eq!(Os::Unix.to_string(), "unix");
        assert_eq!(Os::Windows.to_string(), "windows");
    }

    #[test]
    fn detect_matches_cfg() {
        let os = Os::detect();
        if cfg!(windows) {
            assert_eq!(os, Os::Windows);
        } else {
            assert_eq!(os, Os::Unix);
        }
    }

    #[test]
    fn windows_ping_uses_milliseconds() {
        assert_eq!(
            Os::Windows.ping_args("SRV1", 2, 3),
            ["-n", "2", "-w", "3000", "SRV1"]
        );
    }

    #[test]
    fn unix_ping_uses_seconds_and_minimum_one() {
        assert_eq!(
            Os::Unix.ping_args("SRV1", 0, 0),
            ["-c", "1", "-W", "1", "SRV1"]
        );
    }
}
