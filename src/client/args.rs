//! Maps the parsed configuration onto `tailscale up` arguments.

use crate::cfgtree::ConfigMap;

/// The one key whose presence decides between bringing the node up and
/// tearing the session down.
pub const AUTH_KEY: &str = "auth-key";

/// Builds the full `up` argument list from the parsed configuration.
///
/// Pure and deterministic: rules are evaluated in a fixed order so the
/// same map always produces the same list. `--accept-dns` and
/// `--snat-subnet-routes` default on and are switched off by the
/// presence of their opt-out keys; everything else maps presence (and
/// value) straight through. Values go in verbatim; the commit machinery
/// upstream already validated them, and no shell is involved.
pub fn build_up_args(config: &ConfigMap) -> Vec<String> {
    // 'up' both logs in and updates an existing session.
    let mut args = vec!["up".to_string()];

    if config.contains_key("ignore-dns") {
        args.push("--accept-dns=false".to_string());
    } else {
        args.push("--accept-dns".to_string());
    }

    if config.contains_key("exit-node") {
        args.push("--advertise-exit-node".to_string());
    }

    if let Some(routes) = config.get("route") {
        args.push(format!("--advertise-routes={}", routes.join(",")));
    }

    if let Some(tags) = config.get("tag") {
        let tags: Vec<String> = tags.values().iter().map(|t| format!("tag:{t}")).collect();
        args.push(format!("--advertise-tags={}", tags.join(",")));
    }

    if let Some(key) = config.get(AUTH_KEY) {
        args.push(format!("--auth-key={}", key.join(",")));
    }

    if let Some(hostname) = config.get("hostname") {
        args.push(format!("--hostname={}", hostname.join(",")));
    }

    if let Some(mode) = config.get("netfilter-mode") {
        args.push(format!("--netfilter-mode={}", mode.join(",")));
    }

    if config.contains_key("shields-up") {
        args.push("--shields-up".to_string());
    }

    if config.contains_key("stop-snat-subnet-routes") {
        args.push("--snat-subnet-routes=false".to_string());
    } else {
        args.push("--snat-subnet-routes".to_string());
    }

    if config.contains_key("ssh") {
        args.push("--ssh".to_string());
    }

    if config.contains_key("stateful-filtering") {
        args.push("--stateful-filtering".to_string());
    }

    if let Some(timeout) = config.get("timeout") {
        args.push(format!("--timeout={}", timeout.join(",")));
    }

    args
}
