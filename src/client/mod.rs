//! Tailscale client invocation.
//!
//! The sync flow only needs to hand the client an argument list and look
//! at what came back, so the seam is a single-method trait. The real
//! implementation shells out to the tailscale binary; tests script the
//! trait directly.

pub mod args;
pub mod tailscale;

pub use args::build_up_args;
pub use tailscale::TailscaleCli;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },
}

/// Captured result of one client invocation. A non-zero exit is data
/// here, not an error: the cleanup path expects `logout` to fail when
/// the node is already logged out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Interface for invoking the tailscale control binary.
pub trait ClientRunner {
    fn run(&self, args: &[String]) -> Result<CommandOutput, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_display() {
        let err = ClientError::Spawn {
            binary: "/config/tailscale/tailscale".to_string(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        };
        assert!(err
            .to_string()
            .starts_with("Failed to run /config/tailscale/tailscale"));
    }

    #[test]
    fn test_command_output_success() {
        let output = CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        };
        assert!(output.success());

        let output = CommandOutput { code: Some(1), ..output };
        assert!(!output.success());

        let output = CommandOutput { code: None, ..output };
        assert!(!output.success());
    }
}
