//! Environment Router
//!
//! Production hosts reach the vendor directly. Development hosts (and any
//! environment that cannot hold long outbound calls) go through the proxy
//! endpoint served by this process.

use super::TransportKind;
use crate::config::DeploymentMode;

/// Pure, deterministic transport selection
pub fn route(mode: DeploymentMode) -> TransportKind {
    match mode {
        DeploymentMode::Production => TransportKind::Direct,
        DeploymentMode::Development => TransportKind::Proxied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route() {
        assert_eq!(route(DeploymentMode::Production), TransportKind::Direct);
        assert_eq!(route(DeploymentMode::Development), TransportKind::Proxied);
    }

    #[test]
    fn test_route_is_deterministic() {
        for _ in 0..3 {
            assert_eq!(
                route(DeploymentMode::default()),
                route(DeploymentMode::default())
            );
        }
    }
}
