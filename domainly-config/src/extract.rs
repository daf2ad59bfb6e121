//! Virtual host extraction
//!
//! Flattens parsed server blocks into per-hostname facts: which port the
//! host answers on, whether it terminates TLS, where it proxies to, and what
//! it serves from disk. Facts are derived snapshots; they hold no references
//! back into the parsed tree.

use crate::parser::{NginxConfig, ServerBlock};
use domainly_core::DEFAULT_HTTP_PORT;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

/// Default HTTPS port implied by a TLS listen directive
pub const HTTPS_PORT: u16 = 443;

static LISTEN_PORT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r":(\d+)").unwrap());

static PROXY_TARGET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"http://([^/]+)").unwrap());

/// Derived summary of one server name within a server block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualHost {
    pub name: String,
    pub port: u16,
    pub ssl: bool,
    /// Host part of a `proxy_pass` target; may name an upstream pool
    pub upstream: Option<String>,
    pub root: Option<String>,
}

/// Resolve port and TLS status from a block's listen directives
///
/// Scanned in declaration order with later matches overwriting earlier ones:
/// `443`/`ssl` forces the TLS pair, a `:<digits>` suffix or a bare leading
/// port number sets the port, and a block with no port-bearing listen
/// defaults to HTTP.
pub fn listen_port_and_tls(listen: &[String]) -> (u16, bool) {
    let mut port = DEFAULT_HTTP_PORT;
    let mut ssl = false;

    for clause in listen {
        if clause.contains("443") || clause.split_whitespace().any(|t| t == "ssl") {
            port = HTTPS_PORT;
            ssl = true;
        } else if let Some(captures) = LISTEN_PORT.captures(clause) {
            if let Ok(p) = captures[1].parse() {
                port = p;
            }
        } else if let Some(p) = clause
            .split_whitespace()
            .next()
            .and_then(|t| t.parse::<u16>().ok())
        {
            port = p;
        }
    }

    (port, ssl)
}

/// Host part of the last matching `proxy_pass` across the block's locations
fn proxy_target(server: &ServerBlock) -> Option<String> {
    let mut target = None;

    for location in &server.locations {
        if let Some(directive) = location.find("proxy_pass") {
            if let Some(value) = directive.value.as_str() {
                if let Some(captures) = PROXY_TARGET.captures(value) {
                    target = Some(captures[1].to_string());
                }
            }
        }
    }

    target
}

/// Whether a server name can map onto a concrete virtual host record
fn is_concrete_name(name: &str) -> bool {
    name != "_" && !name.contains('*')
}

/// Extract virtual hosts from a parsed configuration
///
/// A server block with N concrete names yields N facts; the wildcard
/// placeholder and glob names yield none.
pub fn extract_virtual_hosts(config: &NginxConfig) -> Vec<VirtualHost> {
    let mut hosts = Vec::new();

    for server in &config.servers {
        let (port, ssl) = listen_port_and_tls(&server.listen);
        let upstream = proxy_target(server);

        for name in &server.server_names {
            if !is_concrete_name(name) {
                continue;
            }

            hosts.push(VirtualHost {
                name: name.clone(),
                port,
                ssl,
                upstream: upstream.clone(),
                root: server.root.clone(),
            });
        }
    }

    hosts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn hosts_from(source: &str) -> Vec<VirtualHost> {
        extract_virtual_hosts(&parse(source))
    }

    #[test]
    fn test_listen_precedence_ssl_wins() {
        let (port, ssl) = listen_port_and_tls(&["80".to_string(), "443 ssl".to_string()]);
        assert_eq!(port, 443);
        assert!(ssl);
    }

    #[test]
    fn test_listen_suffix_port_last_wins() {
        let (port, ssl) =
            listen_port_and_tls(&["127.0.0.1:8080".to_string(), "[::]:9090".to_string()]);
        assert_eq!(port, 9090);
        assert!(!ssl);
    }

    #[test]
    fn test_listen_bare_port() {
        let (port, _) = listen_port_and_tls(&["3000".to_string()]);
        assert_eq!(port, 3000);
    }

    #[test]
    fn test_listen_default() {
        assert_eq!(listen_port_and_tls(&[]), (80, false));
        assert_eq!(listen_port_and_tls(&["[::]".to_string()]), (80, false));
    }

    #[test]
    fn test_wildcard_and_underscore_excluded() {
        let hosts = hosts_from(
            "server { server_name *.app.local _; listen 80; location / { proxy_pass http://127.0.0.1:5000; } }",
        );
        assert!(hosts.is_empty());
    }

    #[test]
    fn test_one_fact_per_name() {
        let hosts = hosts_from(
            "server { server_name example.local www.example.local; listen 80; root /var/www; }",
        );
        assert_eq!(hosts.len(), 2);
        assert_eq!(hosts[0].name, "example.local");
        assert_eq!(hosts[1].name, "www.example.local");
        assert_eq!(hosts[0].root.as_deref(), Some("/var/www"));
    }

    #[test]
    fn test_upstream_pool_target_without_resolution() {
        let hosts = hosts_from(
            "server { server_name api.local; listen 8080; location / { proxy_pass http://backend_pool; } }",
        );
        assert_eq!(hosts[0].upstream.as_deref(), Some("backend_pool"));
        assert_eq!(hosts[0].port, 8080);
    }

    #[test]
    fn test_upstream_host_with_path_stripped() {
        let hosts = hosts_from(
            "server { server_name app.local; location / { proxy_pass http://127.0.0.1:3000/app; } }",
        );
        assert_eq!(hosts[0].upstream.as_deref(), Some("127.0.0.1:3000"));
    }

    #[test]
    fn test_last_location_wins() {
        let hosts = hosts_from(
            r#"
            server {
                server_name app.local;
                location /api { proxy_pass http://api_servers; }
                location / { proxy_pass http://web_servers; }
            }
            "#,
        );
        assert_eq!(hosts[0].upstream.as_deref(), Some("web_servers"));
    }

    #[test]
    fn test_tls_block_end_to_end() {
        let hosts = hosts_from(
            r#"
            server {
                listen 443 ssl;
                listen [::]:443 ssl;
                server_name secure.local;
                ssl_certificate /etc/ssl/certs/secure.crt;
                ssl_certificate_key /etc/ssl/private/secure.key;
                root /var/www/secure;
                location / { proxy_pass http://backend_servers; }
            }
            "#,
        );
        assert_eq!(hosts.len(), 1);
        let host = &hosts[0];
        assert_eq!(host.port, 443);
        assert!(host.ssl);
        assert_eq!(host.upstream.as_deref(), Some("backend_servers"));
        assert_eq!(host.root.as_deref(), Some("/var/www/secure"));
    }
}
