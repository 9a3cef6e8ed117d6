//! Runs `cli-shell-api` and interprets its outcome.
//!
//! The shell API distinguishes "that path is not configured" from "the
//! query itself failed" only through its output text, so the sentinel
//! check happens here before the exit status is consulted.

use super::{parse, ConfigMap, INVALID_PATH_MARKER};
use crate::settings::QuerySettings;
use std::process::Command;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to run cli-shell-api: {0}")]
    Spawn(#[from] std::io::Error),
    #[error("Configuration query failed (exit code {code:?}): {stderr}")]
    Failed { code: Option<i32>, stderr: String },
}

/// Queries the committed configuration subtree and parses it.
///
/// An absent subtree yields an empty map; only a failure to obtain the
/// rendering is an error.
pub fn fetch_config(query: &QuerySettings) -> Result<ConfigMap, QueryError> {
    let line = command_line(query);
    debug!("Querying committed configuration: {line}");

    let output = Command::new("/bin/bash").arg("-c").arg(&line).output()?;

    interpret(
        output.status.code(),
        &String::from_utf8_lossy(&output.stdout),
        &String::from_utf8_lossy(&output.stderr),
    )
}

/// The shell line handed to `bash -c`. The leading `eval` resets any
/// edit-level environment so `showCfg` resolves from the configuration
/// root rather than a session's edit point.
fn command_line(query: &QuerySettings) -> String {
    let api = query.shell_api.display();
    format!(
        "eval \"$({api} getEditResetEnv)\" && {api} showCfg {}",
        query.path.join(" ")
    )
}

fn interpret(code: Option<i32>, stdout: &str, stderr: &str) -> Result<ConfigMap, QueryError> {
    // The sentinel outranks the exit status: cli-shell-api reports a
    // missing path as a failure, but to us it means "not configured".
    if stdout.contains(INVALID_PATH_MARKER) || stderr.contains(INVALID_PATH_MARKER) {
        return Ok(ConfigMap::new());
    }

    if code != Some(0) {
        return Err(QueryError::Failed {
            code,
            stderr: stderr.trim_end().to_string(),
        });
    }

    Ok(parse(stdout))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cfgtree::ConfigValue;
    use std::path::PathBuf;

    fn query_settings(shell_api: &str) -> QuerySettings {
        QuerySettings {
            shell_api: PathBuf::from(shell_api),
            path: vec!["service".to_string(), "tailscale".to_string()],
        }
    }

    #[test]
    fn test_command_line_shape() {
        let line = command_line(&query_settings("/usr/bin/cli-shell-api"));
        assert_eq!(
            line,
            "eval \"$(/usr/bin/cli-shell-api getEditResetEnv)\" && \
             /usr/bin/cli-shell-api showCfg service tailscale"
        );
    }

    #[test]
    fn test_sentinel_on_stdout_is_not_configured() {
        let result = interpret(
            Some(1),
            "Specified configuration path is not valid\n",
            "",
        );
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_sentinel_on_stderr_is_not_configured() {
        let result = interpret(
            Some(1),
            "",
            "Specified configuration path is not valid\n",
        );
        assert!(result.unwrap().is_empty());
    }

    #[test]
    fn test_nonzero_exit_without_sentinel_fails() {
        let err = interpret(Some(2), "", "permission denied\n").unwrap_err();
        match err {
            QueryError::Failed { code, stderr } => {
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "permission denied");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_signal_termination_fails() {
        let err = interpret(None, "", "").unwrap_err();
        assert!(matches!(err, QueryError::Failed { code: None, .. }));
    }

    #[test]
    fn test_zero_exit_parses_stdout() {
        let config = interpret(Some(0), "ssh\nhostname gateway\n", "").unwrap();
        assert_eq!(config.get("ssh"), Some(&ConfigValue::Flag));
        assert_eq!(
            config.get("hostname"),
            Some(&ConfigValue::Scalar("gateway".to_string()))
        );
    }

    #[test]
    fn test_zero_exit_with_empty_output_is_not_configured() {
        assert!(interpret(Some(0), "", "").unwrap().is_empty());
    }

    #[test]
    fn test_fetch_with_missing_shell_api_fails() {
        // bash itself spawns; the nonexistent shell API makes the && chain
        // fail without producing the sentinel.
        let err = fetch_config(&query_settings("/nonexistent/cli-shell-api")).unwrap_err();
        assert!(matches!(err, QueryError::Failed { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = QueryError::Failed {
            code: Some(2),
            stderr: "boom".to_string(),
        };
        assert!(err.to_string().contains("exit code Some(2)"));
        assert!(err.to_string().contains("boom"));
    }
}
