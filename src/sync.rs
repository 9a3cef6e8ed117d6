//! Decision logic: what to do with the parsed configuration.
//!
//! Three terminal shapes, chosen by looking at the map:
//!
//! - empty map → nothing configured, do nothing;
//! - no `auth-key` → the operator removed the key, so tear the session
//!   down (best effort);
//! - `auth-key` present → `tailscale up` with the generated arguments,
//!   then report `tailscale status`.

use crate::cfgtree::{ConfigMap, QueryError};
use crate::client::args::AUTH_KEY;
use crate::client::{build_up_args, ClientError, ClientRunner};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Configuration query failed: {0}")]
    Query(#[from] QueryError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("tailscale up failed (exit code {code:?})")]
    UpFailed { code: Option<i32>, stderr: String },
}

/// How a run ended. The caller maps this onto the process exit code.
#[derive(Debug, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Nothing committed under the subtree.
    NoConfig,
    /// Auth key removed; logout/down attempted.
    LoggedOut,
    /// `up` succeeded; carries the exit code of the `status` report.
    Applied { status_code: Option<i32> },
}

/// Applies the committed configuration to the running client.
pub fn synchronize(
    client: &dyn ClientRunner,
    config: &ConfigMap,
) -> Result<SyncOutcome, SyncError> {
    if config.is_empty() {
        println!("No Tailscale configuration found, skipping.");
        return Ok(SyncOutcome::NoConfig);
    }

    if !config.contains_key(AUTH_KEY) {
        println!("Auth-key not found. Attempting to log out and bring connection down.");
        let logout = client.run(&["logout".to_string()])?;
        if !logout.success() {
            // Logout fails when the node is already logged out; try a
            // plain down and discard its exit status too. Only a spawn
            // failure aborts the cleanup.
            let down = client.run(&["down".to_string()])?;
            if !down.success() {
                debug!("tailscale down exited with {:?}, ignoring", down.code);
            }
        }
        return Ok(SyncOutcome::LoggedOut);
    }

    let args = build_up_args(config);
    info!("Bringing tailscale up with {} arguments", args.len() - 1);
    let up = client.run(&args)?;
    if !up.success() {
        return Err(SyncError::UpFailed {
            code: up.code,
            stderr: up.stderr,
        });
    }

    let status = client.run(&["status".to_string()])?;
    if !status.stdout.is_empty() {
        println!("Tailscale status:");
        print!("{}", status.stdout);
    }
    if !status.stderr.is_empty() {
        eprint!("{}", status.stderr);
    }

    Ok(SyncOutcome::Applied {
        status_code: status.code,
    })
}

/// Renders the actions `synchronize` would take, one line per action,
/// for `--dry-run`.
pub fn plan(config: &ConfigMap) -> Vec<String> {
    if config.is_empty() {
        return vec!["nothing to do: no tailscale configuration committed".to_string()];
    }

    if !config.contains_key(AUTH_KEY) {
        return vec![
            "would run: tailscale logout".to_string(),
            "would run: tailscale down (only if logout fails)".to_string(),
        ];
    }

    vec![
        format!("would run: tailscale {}", build_up_args(config).join(" ")),
        "would run: tailscale status".to_string(),
    ]
}
