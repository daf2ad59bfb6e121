//! Managed domain records
//!
//! A [`DomainRecord`] is one locally managed hostname: the name itself, the
//! loopback address it resolves to, the port its service listens on, and
//! bookkeeping metadata. Records may form a tree via `parent_id` (a subdomain
//! grouped under its parent domain).

use serde::{Deserialize, Serialize};

/// Default HTTP port assumed when a record carries no explicit port
pub const DEFAULT_HTTP_PORT: u16 = 80;

/// The loopback address every managed domain resolves to
pub const LOOPBACK_ADDR: &str = "127.0.0.1";

/// One managed local domain
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DomainRecord {
    /// Unique record id
    pub id: i64,

    /// Fully qualified hostname (e.g. `api.myapp.local`)
    pub name: String,

    /// Address the hostname resolves to; loopback by policy
    pub ip_address: String,

    /// Port the local service listens on
    #[serde(default)]
    pub port: Option<u16>,

    /// Inactive records are kept but excluded from generated output
    pub is_active: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    /// Free-form tags, comma separated
    #[serde(default)]
    pub tags: Option<String>,

    /// Parent record id; defines the domain tree
    #[serde(default)]
    pub parent_id: Option<i64>,

    /// RFC 3339 creation timestamp
    pub created_at: String,

    /// RFC 3339 last-modification timestamp
    pub updated_at: String,
}

impl DomainRecord {
    /// Port this record's service listens on, defaulting to HTTP
    pub fn effective_port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_HTTP_PORT)
    }
}

/// Payload for creating or updating a record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DomainForm {
    pub name: String,

    #[serde(default)]
    pub ip_address: Option<String>,

    #[serde(default)]
    pub port: Option<u16>,

    #[serde(default = "default_active")]
    pub is_active: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub category: Option<String>,

    #[serde(default)]
    pub tags: Option<String>,

    #[serde(default)]
    pub parent_id: Option<i64>,
}

fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_port_default() {
        let record = DomainRecord {
            id: 1,
            name: "example.local".to_string(),
            ip_address: LOOPBACK_ADDR.to_string(),
            port: None,
            is_active: true,
            description: None,
            category: None,
            tags: None,
            parent_id: None,
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-01T00:00:00Z".to_string(),
        };
        assert_eq!(record.effective_port(), 80);
    }

    #[test]
    fn test_record_roundtrip_json() {
        let record = DomainRecord {
            id: 7,
            name: "api.local".to_string(),
            ip_address: LOOPBACK_ADDR.to_string(),
            port: Some(8080),
            is_active: false,
            description: Some("staging API".to_string()),
            category: Some("work".to_string()),
            tags: Some("api,staging".to_string()),
            parent_id: Some(1),
            created_at: "2025-01-01T00:00:00Z".to_string(),
            updated_at: "2025-01-02T00:00:00Z".to_string(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: DomainRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
