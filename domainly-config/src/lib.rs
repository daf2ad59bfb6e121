//! nginx configuration parsing, generation and reconciliation for Domainly
//!
//! This crate is a pure text-in/text-out library: parsing builds a typed
//! model from directive text, extraction derives per-hostname facts from the
//! model, generation renders canonical text from managed domain records, and
//! reconciliation diffs the two worlds. Nothing here touches the filesystem
//! or the network; writing generated output and reloading the proxy are the
//! surrounding application's responsibility.
//!
//! # Example
//!
//! ```
//! let config = domainly_config::parse(r#"
//!     server {
//!         listen 8080;
//!         server_name api.local;
//!         location / { proxy_pass http://127.0.0.1:3000; }
//!     }
//! "#);
//!
//! let hosts = domainly_config::extract_virtual_hosts(&config);
//! assert_eq!(hosts[0].name, "api.local");
//! assert_eq!(hosts[0].port, 8080);
//! ```

pub mod extract;
pub mod generate;
pub mod parser;
pub mod reconcile;
pub mod validate;

pub use extract::{extract_virtual_hosts, listen_port_and_tls, VirtualHost, HTTPS_PORT};
pub use generate::{
    generate_config, generate_include, generate_server_block, ConfigOptions, ServerBlockOptions,
    DEFAULT_PROXY_PORT,
};
pub use parser::{
    parse, parse_directives, Directive, DirectiveValue, Location, NginxConfig, ServerBlock,
    Upstream,
};
pub use reconcile::{compare, PortMismatch, Reconciliation};
pub use validate::is_valid_server_name;

/// Parse configuration text straight to virtual host facts
pub fn parse_virtual_hosts(source: &str) -> Vec<VirtualHost> {
    extract_virtual_hosts(&parse(source))
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"
    # Global settings
    user www-data;
    worker_processes auto;

    events {
        worker_connections 768;
        multi_accept on;
    }

    http {
        sendfile on;
        keepalive_timeout 65;

        upstream backend_servers {
            server 127.0.0.1:3000;
            server 127.0.0.1:3001;
            server 127.0.0.1:3002;
        }

        upstream api_servers {
            server 127.0.0.1:4000 weight=3;
            server 127.0.0.1:4001 weight=2;
        }

        server {
            listen 80;
            listen [::]:80;
            server_name example.local www.example.local;
            root /var/www/example;

            location / {
                try_files $uri $uri/ =404;
            }

            location /api {
                proxy_pass http://api_servers;
                proxy_set_header Host $host;
            }
        }

        server {
            listen 443 ssl;
            listen [::]:443 ssl;
            server_name secure.local;

            ssl_certificate /etc/ssl/certs/secure.local.crt;
            ssl_certificate_key /etc/ssl/private/secure.local.key;

            root /var/www/secure;

            location / {
                proxy_pass http://backend_servers;
            }
        }

        server {
            listen 8080;
            server_name api.local;

            location / {
                proxy_pass http://127.0.0.1:3000;
                proxy_buffering off;
            }
        }

        server {
            listen 80;
            server_name *.app.local;

            location / {
                proxy_pass http://127.0.0.1:5000;
            }
        }
    }
    "#;

    #[test]
    fn test_full_document() {
        let config = parse(EXAMPLE);
        assert_eq!(config.servers.len(), 4);
        assert_eq!(config.upstreams.len(), 2);
        assert_eq!(config.upstreams[0].name, "backend_servers");
        assert_eq!(config.upstreams[0].servers.len(), 3);
        assert_eq!(config.upstreams[1].servers[0], "127.0.0.1:4000 weight=3");
        assert_eq!(config.main.len(), 2);
        assert_eq!(config.events.len(), 2);
    }

    #[test]
    fn test_extracted_hosts() {
        let hosts = parse_virtual_hosts(EXAMPLE);

        // The wildcard block contributes nothing
        let names: Vec<_> = hosts.iter().map(|h| h.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["example.local", "www.example.local", "secure.local", "api.local"]
        );

        assert_eq!(hosts[0].port, 80);
        assert_eq!(hosts[0].upstream.as_deref(), Some("api_servers"));

        assert_eq!(hosts[2].port, 443);
        assert!(hosts[2].ssl);
        assert_eq!(hosts[2].upstream.as_deref(), Some("backend_servers"));

        assert_eq!(hosts[3].port, 8080);
        assert_eq!(hosts[3].upstream.as_deref(), Some("127.0.0.1:3000"));
    }
}
