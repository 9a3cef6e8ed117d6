//! Subprocess-backed [`ClientRunner`].

use super::{ClientError, ClientRunner, CommandOutput};
use crate::settings::ClientSettings;
use std::path::PathBuf;
use std::process::Command;
use tracing::debug;

/// Invokes the tailscale control binary, through `sudo` by default (the
/// commit hook runs as the configuring user, not root).
pub struct TailscaleCli {
    binary: PathBuf,
    sudo: bool,
}

impl TailscaleCli {
    pub fn new(settings: &ClientSettings) -> Self {
        Self {
            binary: settings.binary.clone(),
            sudo: settings.sudo,
        }
    }
}

impl ClientRunner for TailscaleCli {
    fn run(&self, args: &[String]) -> Result<CommandOutput, ClientError> {
        let mut command = if self.sudo {
            let mut command = Command::new("sudo");
            command.arg(&self.binary);
            command
        } else {
            Command::new(&self.binary)
        };
        command.args(args);

        debug!("Invoking {:?}", command);
        let output = command.output().map_err(|source| ClientError::Spawn {
            binary: self.binary.display().to_string(),
            source,
        })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(binary: &str) -> TailscaleCli {
        TailscaleCli::new(&ClientSettings {
            binary: PathBuf::from(binary),
            sudo: false,
        })
    }

    #[test]
    fn test_run_captures_stdout_and_exit_code() {
        let output = cli("/bin/echo")
            .run(&["status".to_string(), "--json".to_string()])
            .unwrap();
        assert_eq!(output.code, Some(0));
        assert!(output.success());
        assert_eq!(output.stdout, "status --json\n");
        assert!(output.stderr.is_empty());
    }

    #[test]
    fn test_nonzero_exit_is_not_an_error() {
        let output = cli("/bin/false").run(&[]).unwrap();
        assert_eq!(output.code, Some(1));
        assert!(!output.success());
    }

    #[test]
    fn test_missing_binary_is_spawn_error() {
        let err = cli("/nonexistent/tailscale").run(&[]).unwrap_err();
        let ClientError::Spawn { binary, source } = err;
        assert_eq!(binary, "/nonexistent/tailscale");
        assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    }
}
