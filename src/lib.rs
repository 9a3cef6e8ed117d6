//! vyos-tailscale - Tailscale configuration sync for VyOS routers
//!
//! Bridges the router's committed configuration tree and the tailscale
//! control binary: the `service tailscale` subtree is queried through
//! `cli-shell-api`, flattened into a key/value map, translated into a
//! `tailscale up` invocation (or a logout/down cleanup when the auth key
//! was removed), and the resulting `tailscale status` is reported.
//!
//! # Architecture
//!
//! - `cfgtree`: configuration subtree query and parsing
//! - `client`: argument generation and the tailscale subprocess seam
//! - `settings`: this tool's own TOML settings
//! - `sync`: the decision flow tying the above together
//!
//! # Usage
//!
//! Installed as a commit hook for the `service tailscale` subtree:
//! ```bash
//! vyos-tailscale            # apply the committed configuration
//! vyos-tailscale --dry-run  # show what would run
//! ```

pub mod cfgtree;
pub mod client;
pub mod settings;
pub mod sync;

pub use cfgtree::{fetch_config, parse, ConfigMap, ConfigValue};
pub use client::{build_up_args, ClientRunner, TailscaleCli};
pub use settings::Settings;
pub use sync::{plan, synchronize, SyncError, SyncOutcome};
