//! Classification of the generic directive tree into typed structures
//!
//! Recognized directive names are a closed enum so adding one is a
//! compile-checked change rather than a stringly-typed lookup.

use crate::parser::ast::{Directive, Location, NginxConfig, ServerBlock, Upstream};

/// Directive kinds recognized at server scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ServerDirective {
    ServerName,
    Listen,
    Root,
    SslCertificate,
    SslCertificateKey,
    Location,
    Other,
}

impl ServerDirective {
    fn from_name(name: &str) -> Self {
        match name {
            "server_name" => Self::ServerName,
            "listen" => Self::Listen,
            "root" => Self::Root,
            "ssl_certificate" => Self::SslCertificate,
            "ssl_certificate_key" => Self::SslCertificateKey,
            "location" => Self::Location,
            _ => Self::Other,
        }
    }
}

/// Directive kinds recognized at top level and inside `http`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TopLevelDirective {
    Http,
    Events,
    Server,
    Upstream,
    Other,
}

impl TopLevelDirective {
    fn from_name(name: &str) -> Self {
        match name {
            "http" => Self::Http,
            "events" => Self::Events,
            "server" => Self::Server,
            "upstream" => Self::Upstream,
            _ => Self::Other,
        }
    }
}

/// Classify a parsed directive tree into the typed configuration
///
/// `server` and `upstream` are accepted at top level as well as inside
/// `http`, which tolerates config fragments saved without the outer block.
pub fn classify(directives: Vec<Directive>) -> NginxConfig {
    let mut config = NginxConfig::default();

    for directive in directives {
        match TopLevelDirective::from_name(&directive.name) {
            TopLevelDirective::Http if directive.block.is_some() => {
                let block = directive.block.unwrap_or_default();
                classify_http_block(&block, &mut config);
                config.http = block;
            }
            TopLevelDirective::Events if directive.block.is_some() => {
                config.events = directive.block.unwrap_or_default();
            }
            TopLevelDirective::Server if directive.block.is_some() => {
                if let Some(server) = specialize_server(directive.children()) {
                    config.servers.push(server);
                }
            }
            TopLevelDirective::Upstream if directive.block.is_some() => {
                let name = directive.value.as_str().unwrap_or_default().to_string();
                if let Some(upstream) = specialize_upstream(name, directive.children()) {
                    config.upstreams.push(upstream);
                }
            }
            _ => config.main.push(directive),
        }
    }

    tracing::debug!(
        "Classified configuration: {} server(s), {} upstream(s)",
        config.servers.len(),
        config.upstreams.len()
    );

    config
}

/// Pull servers and upstreams out of an `http` block
fn classify_http_block(block: &[Directive], config: &mut NginxConfig) {
    for directive in block {
        match TopLevelDirective::from_name(&directive.name) {
            TopLevelDirective::Server if directive.block.is_some() => {
                if let Some(server) = specialize_server(directive.children()) {
                    config.servers.push(server);
                }
            }
            TopLevelDirective::Upstream if directive.block.is_some() => {
                let name = directive.value.as_str().unwrap_or_default().to_string();
                if let Some(upstream) = specialize_upstream(name, directive.children()) {
                    config.upstreams.push(upstream);
                }
            }
            _ => {}
        }
    }
}

/// Build a [`ServerBlock`] from a server directive's children
///
/// A block with no server names cannot represent a reachable virtual host
/// and is discarded.
fn specialize_server(directives: &[Directive]) -> Option<ServerBlock> {
    let mut server = ServerBlock::default();

    for directive in directives {
        match ServerDirective::from_name(&directive.name) {
            ServerDirective::ServerName => {
                server.server_names = directive
                    .value
                    .tokens()
                    .iter()
                    .flat_map(|t| t.split_whitespace())
                    .map(|s| s.to_string())
                    .collect();
            }
            ServerDirective::Listen => {
                // Appended, not replaced: dual-stack blocks declare several
                server.listen.push(directive.value.to_text());
            }
            ServerDirective::Root => {
                server.root = directive.value.as_str().map(|s| s.to_string());
            }
            ServerDirective::SslCertificate => {
                server.ssl_certificate = directive.value.as_str().map(|s| s.to_string());
            }
            ServerDirective::SslCertificateKey => {
                server.ssl_certificate_key = directive.value.as_str().map(|s| s.to_string());
            }
            ServerDirective::Location => {
                if let Some(block) = &directive.block {
                    server.locations.push(Location {
                        path: directive.value.to_text(),
                        directives: block.clone(),
                    });
                }
            }
            ServerDirective::Other => {
                server.directives.push(directive.clone());
            }
        }
    }

    if server.server_names.is_empty() {
        None
    } else {
        Some(server)
    }
}

/// Build an [`Upstream`] from an upstream directive's children
///
/// A pool with no `server` entries is discarded.
fn specialize_upstream(name: String, directives: &[Directive]) -> Option<Upstream> {
    let mut upstream = Upstream {
        name,
        ..Default::default()
    };

    for directive in directives {
        if directive.name == "server" {
            upstream.servers.push(directive.value.to_text());
        } else {
            upstream.directives.push(directive.clone());
        }
    }

    if upstream.servers.is_empty() {
        None
    } else {
        Some(upstream)
    }
}
