//! Hosts-file model
//!
//! Parsing and rendering of the OS hosts file. The managed entries live in a
//! fenced block so repeated syncs replace the block instead of accumulating
//! lines. Everything here is text-in/text-out except the two thin read/write
//! wrappers at the bottom.

use crate::domain::DomainRecord;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Fence opening the managed section
pub const MANAGED_BEGIN: &str = "# BEGIN domainly managed block";

/// Fence closing the managed section
pub const MANAGED_END: &str = "# END domainly managed block";

/// One resolved line of the hosts file
#[derive(Debug, Clone, PartialEq)]
pub struct HostEntry {
    pub ip: String,
    pub hostname: String,
    pub comment: Option<String>,
}

/// Parse hosts-file content into entries
///
/// A line may map one address to several hostnames; each pair becomes its own
/// entry. Comment-only and blank lines are skipped, inline comments are kept.
pub fn parse_hosts(content: &str) -> Vec<HostEntry> {
    let mut entries = Vec::new();

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (body, comment) = match trimmed.find('#') {
            Some(idx) => (
                trimmed[..idx].trim_end(),
                Some(trimmed[idx..].to_string()),
            ),
            None => (trimmed, None),
        };

        let mut parts = body.split_whitespace();
        let Some(ip) = parts.next() else { continue };
        for hostname in parts {
            entries.push(HostEntry {
                ip: ip.to_string(),
                hostname: hostname.to_string(),
                comment: comment.clone(),
            });
        }
    }

    entries
}

/// Whether any entry resolves the given hostname
pub fn host_exists(content: &str, hostname: &str) -> bool {
    parse_hosts(content).iter().any(|e| e.hostname == hostname)
}

/// Render the managed block for the active records
pub fn render_managed_block(records: &[DomainRecord]) -> String {
    let mut lines = vec![MANAGED_BEGIN.to_string()];

    for record in records.iter().filter(|r| r.is_active) {
        match &record.description {
            Some(desc) => lines.push(format!("{}\t{}\t# {}", record.ip_address, record.name, desc)),
            None => lines.push(format!("{}\t{}", record.ip_address, record.name)),
        }
    }

    lines.push(MANAGED_END.to_string());
    lines.join("\n")
}

/// Replace the fenced managed section, or append one if absent
pub fn splice_managed_block(existing: &str, block: &str) -> String {
    let begin = existing.find(MANAGED_BEGIN);
    let end = existing.find(MANAGED_END);

    match (begin, end) {
        (Some(b), Some(e)) if e >= b => {
            let after = &existing[e + MANAGED_END.len()..];
            format!("{}{}{}", &existing[..b], block, after)
        }
        _ => {
            let mut out = existing.trim_end().to_string();
            if !out.is_empty() {
                out.push_str("\n\n");
            }
            out.push_str(block);
            out.push('\n');
            out
        }
    }
}

/// Platform hosts-file location
pub fn hosts_path() -> PathBuf {
    if cfg!(windows) {
        let root = std::env::var("SystemRoot").unwrap_or_else(|_| "C:\\Windows".to_string());
        PathBuf::from(root)
            .join("System32")
            .join("drivers")
            .join("etc")
            .join("hosts")
    } else {
        PathBuf::from("/etc/hosts")
    }
}

/// Read the hosts file
pub fn read_hosts(path: &std::path::Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            Error::Permission(format!("cannot read {}", path.display()))
        }
        _ => Error::Hosts(format!("failed to read {}: {}", path.display(), e)),
    })
}

/// Write the hosts file back
pub fn write_hosts(path: &std::path::Path, content: &str) -> Result<()> {
    std::fs::write(path, content).map_err(|e| match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            Error::Permission(format!("cannot write {}", path.display()))
        }
        _ => Error::Hosts(format!("failed to write {}: {}", path.display(), e)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::LOOPBACK_ADDR;

    fn record(name: &str, active: bool) -> DomainRecord {
        DomainRecord {
            id: 1,
            name: name.to_string(),
            ip_address: LOOPBACK_ADDR.to_string(),
            port: None,
            is_active: active,
            description: None,
            category: None,
            tags: None,
            parent_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_parse_multi_hostname_line() {
        let entries = parse_hosts("127.0.0.1 localhost myapp.local # dev\n");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].hostname, "localhost");
        assert_eq!(entries[1].hostname, "myapp.local");
        assert_eq!(entries[1].comment.as_deref(), Some("# dev"));
    }

    #[test]
    fn test_parse_skips_comments_and_blanks() {
        let content = "# system defaults\n\n127.0.0.1 localhost\n";
        let entries = parse_hosts(content);
        assert_eq!(entries.len(), 1);
        assert!(host_exists(content, "localhost"));
        assert!(!host_exists(content, "missing.local"));
    }

    #[test]
    fn test_render_skips_inactive() {
        let block = render_managed_block(&[record("on.local", true), record("off.local", false)]);
        assert!(block.contains("on.local"));
        assert!(!block.contains("off.local"));
        assert!(block.starts_with(MANAGED_BEGIN));
        assert!(block.ends_with(MANAGED_END));
    }

    #[test]
    fn test_splice_replaces_existing_block() {
        let existing = format!(
            "127.0.0.1 localhost\n\n{}\n127.0.0.1\told.local\n{}\n",
            MANAGED_BEGIN, MANAGED_END
        );
        let block = render_managed_block(&[record("new.local", true)]);
        let spliced = splice_managed_block(&existing, &block);

        assert!(spliced.contains("new.local"));
        assert!(!spliced.contains("old.local"));
        assert_eq!(spliced.matches(MANAGED_BEGIN).count(), 1);
        assert!(spliced.contains("127.0.0.1 localhost"));
    }

    #[test]
    fn test_splice_appends_when_missing() {
        let spliced = splice_managed_block(
            "127.0.0.1 localhost\n",
            &render_managed_block(&[record("new.local", true)]),
        );
        assert!(spliced.starts_with("127.0.0.1 localhost\n"));
        assert!(spliced.contains(MANAGED_BEGIN));
    }
}
