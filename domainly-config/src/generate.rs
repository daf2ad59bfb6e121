//! Configuration generation
//!
//! The inverse of parsing: renders canonical directive text from managed
//! domain records. Output is always regenerated from scratch; no attempt is
//! made to preserve the formatting of a previously parsed document.

use domainly_core::{DomainRecord, HierarchyIndex};

/// Fallback proxy port when a record carries no explicit target
pub const DEFAULT_PROXY_PORT: u16 = 3000;

/// Per-block generation options
#[derive(Debug, Clone, Default)]
pub struct ServerBlockOptions {
    /// Reverse-proxy the host to this local port
    pub proxy_port: Option<u16>,
    pub enable_ssl: bool,
    pub ssl_cert_path: Option<String>,
    pub ssl_key_path: Option<String>,
    /// Serve static files from this directory instead of proxying
    pub document_root: Option<String>,
}

/// Whole-document generation options
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Synthesize upstream pools from parent/child record groups
    pub include_upstreams: bool,
    pub default_proxy_port: Option<u16>,
}

/// Render one server block for a managed domain
///
/// Canonical order: listen pair, server_name, optional TLS group, then
/// exactly one content section chosen by priority: explicit proxy port,
/// explicit document root, fallback proxy to the default local port.
pub fn generate_server_block(record: &DomainRecord, options: &ServerBlockOptions) -> String {
    let mut lines = vec!["server {".to_string()];

    if options.enable_ssl {
        lines.push("    listen 443 ssl;".to_string());
        lines.push("    listen [::]:443 ssl;".to_string());
    } else {
        let port = record.effective_port();
        lines.push(format!("    listen {};", port));
        lines.push(format!("    listen [::]:{};", port));
    }

    lines.push(format!("    server_name {};", record.name));

    if options.enable_ssl {
        if let (Some(cert), Some(key)) = (&options.ssl_cert_path, &options.ssl_key_path) {
            lines.push(String::new());
            lines.push(format!("    ssl_certificate {};", cert));
            lines.push(format!("    ssl_certificate_key {};", key));
            lines.push("    ssl_protocols TLSv1.2 TLSv1.3;".to_string());
            lines.push("    ssl_ciphers HIGH:!aNULL:!MD5;".to_string());
        }
    }

    lines.push(String::new());
    if let Some(proxy_port) = options.proxy_port {
        lines.push("    location / {".to_string());
        lines.push(format!("        proxy_pass http://127.0.0.1:{};", proxy_port));
        lines.push("        proxy_http_version 1.1;".to_string());
        lines.push("        proxy_set_header Upgrade $http_upgrade;".to_string());
        lines.push("        proxy_set_header Connection 'upgrade';".to_string());
        lines.push("        proxy_set_header Host $host;".to_string());
        lines.push("        proxy_cache_bypass $http_upgrade;".to_string());
        lines.push("    }".to_string());
    } else if let Some(root) = &options.document_root {
        lines.push(format!("    root {};", root));
        lines.push("    index index.html index.htm;".to_string());
        lines.push(String::new());
        lines.push("    location / {".to_string());
        lines.push("        try_files $uri $uri/ =404;".to_string());
        lines.push("    }".to_string());
    } else {
        lines.push("    location / {".to_string());
        lines.push(format!(
            "        proxy_pass http://127.0.0.1:{};",
            DEFAULT_PROXY_PORT
        ));
        lines.push("        proxy_set_header Host $host;".to_string());
        lines.push("        proxy_set_header X-Real-IP $remote_addr;".to_string());
        lines.push("    }".to_string());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Render a complete `http { ... }` document for the active records
///
/// Inactive records are silently excluded; the fixed preamble carries the
/// recommended buffering, logging and compression settings.
pub fn generate_config(records: &[DomainRecord], options: &ConfigOptions) -> String {
    let mut lines = vec!["http {".to_string()];

    lines.push("    # Basic Settings".to_string());
    lines.push("    sendfile on;".to_string());
    lines.push("    tcp_nopush on;".to_string());
    lines.push("    tcp_nodelay on;".to_string());
    lines.push("    keepalive_timeout 65;".to_string());
    lines.push("    types_hash_max_size 2048;".to_string());
    lines.push(String::new());

    lines.push("    include /etc/nginx/mime.types;".to_string());
    lines.push("    default_type application/octet-stream;".to_string());
    lines.push(String::new());

    lines.push("    # Logging Settings".to_string());
    lines.push("    access_log /var/log/nginx/access.log;".to_string());
    lines.push("    error_log /var/log/nginx/error.log;".to_string());
    lines.push(String::new());

    lines.push("    # Gzip Settings".to_string());
    lines.push("    gzip on;".to_string());
    lines.push("    gzip_vary on;".to_string());
    lines.push("    gzip_proxied any;".to_string());
    lines.push("    gzip_comp_level 6;".to_string());
    lines.push("    gzip_types text/plain text/css text/xml text/javascript application/json application/javascript application/xml+rss application/rss+xml application/atom+xml image/svg+xml;".to_string());
    lines.push(String::new());

    let active: Vec<&DomainRecord> = records.iter().filter(|r| r.is_active).collect();

    if options.include_upstreams {
        for (pool_name, members) in upstream_groups(&active) {
            lines.push(format!("    upstream {} {{", pool_name));
            for member in members {
                let port = member
                    .port
                    .or(options.default_proxy_port)
                    .unwrap_or(DEFAULT_PROXY_PORT);
                lines.push(format!("        server 127.0.0.1:{};", port));
            }
            lines.push("    }".to_string());
            lines.push(String::new());
        }
    }

    for record in &active {
        let block_options = ServerBlockOptions {
            proxy_port: record.port.or(options.default_proxy_port),
            ..Default::default()
        };
        let block = generate_server_block(record, &block_options);
        for line in block.lines() {
            if line.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("    {}", line));
            }
        }
        lines.push(String::new());
    }

    lines.push("}".to_string());
    lines.join("\n")
}

/// Group active subdomains under their active root parents, insertion order
///
/// Pool name is the parent name with dots flattened plus a `_backend`
/// suffix, so `myapp.local` becomes `myapp_local_backend`.
fn upstream_groups<'a>(active: &[&'a DomainRecord]) -> Vec<(String, Vec<&'a DomainRecord>)> {
    let owned: Vec<DomainRecord> = active.iter().map(|r| (*r).clone()).collect();
    let index = HierarchyIndex::build(&owned);

    let mut groups: Vec<(String, Vec<&'a DomainRecord>)> = Vec::new();

    for (pos, record) in active.iter().enumerate() {
        let Some(parent_id) = record.parent_id else {
            continue;
        };
        let Some(parent) = index.get(parent_id) else {
            continue;
        };
        if parent.parent_id.is_some() {
            continue; // only roots become pools
        }

        let pool_name = format!("{}_backend", parent.name.replace('.', "_"));
        match groups.iter_mut().find(|(name, _)| *name == pool_name) {
            Some((_, members)) => members.push(active[pos]),
            None => groups.push((pool_name, vec![active[pos]])),
        }
    }

    groups
}

/// Render a flat include file: one commented server block per active domain
///
/// The timestamp is supplied by the caller so the structural content stays a
/// pure function of the records.
pub fn generate_include(records: &[DomainRecord], generated_at: Option<&str>) -> String {
    let active: Vec<&DomainRecord> = records.iter().filter(|r| r.is_active).collect();

    let mut lines = vec!["# Generated by Domainly".to_string()];
    if let Some(stamp) = generated_at {
        lines.push(format!("# Date: {}", stamp));
    }
    lines.push(format!("# Domains: {}", active.len()));
    lines.push(String::new());
    lines.push("# Include this file in your nginx.conf:".to_string());
    lines.push("# include /path/to/local-domains.conf;".to_string());
    lines.push(String::new());

    for record in &active {
        lines.push(format!("# Domain: {}", record.name));
        if let Some(description) = &record.description {
            lines.push(format!("# Description: {}", description));
        }
        lines.push(generate_server_block(record, &ServerBlockOptions::default()));
        lines.push(String::new());
    }

    lines.join("\n")
}
