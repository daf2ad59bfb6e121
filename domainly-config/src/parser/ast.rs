//! Structural model for nginx-style configuration
//!
//! Two layers: the generic directive tree the parser produces, and the typed
//! structures the specializer derives from it (server blocks, upstream pools,
//! locations).

use serde::{Deserialize, Serialize};

/// Value of a simple directive
///
/// A directive with exactly one argument carries a scalar; two or more
/// arguments stay a sequence. Consumers depend on both representations
/// existing (`server_name` splits a scalar, scans a sequence), so the two
/// arms are not unified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DirectiveValue {
    One(String),
    Many(Vec<String>),
}

impl DirectiveValue {
    /// Empty value, used by block directives
    pub fn empty() -> Self {
        DirectiveValue::One(String::new())
    }

    /// Collapse a token list: one token becomes a scalar
    pub fn from_tokens(mut tokens: Vec<String>) -> Self {
        if tokens.len() == 1 {
            DirectiveValue::One(tokens.remove(0))
        } else {
            DirectiveValue::Many(tokens)
        }
    }

    /// The scalar value, if this is a single-argument directive
    pub fn as_str(&self) -> Option<&str> {
        match self {
            DirectiveValue::One(s) if !s.is_empty() => Some(s),
            _ => None,
        }
    }

    /// All argument tokens in order, whichever arm they live in
    pub fn tokens(&self) -> Vec<&str> {
        match self {
            DirectiveValue::One(s) if s.is_empty() => Vec::new(),
            DirectiveValue::One(s) => vec![s.as_str()],
            DirectiveValue::Many(v) => v.iter().map(|s| s.as_str()).collect(),
        }
    }

    /// Render the value as it appears in directive text
    pub fn to_text(&self) -> String {
        match self {
            DirectiveValue::One(s) => s.clone(),
            DirectiveValue::Many(v) => v.join(" "),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            DirectiveValue::One(s) => s.is_empty(),
            DirectiveValue::Many(v) => v.is_empty(),
        }
    }
}

/// One parsed directive: a `name value...;` leaf or a `name arg { ... }` block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Directive {
    pub name: String,
    pub value: DirectiveValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<Vec<Directive>>,
}

impl Directive {
    pub fn leaf(name: impl Into<String>, tokens: Vec<String>) -> Self {
        Self {
            name: name.into(),
            value: DirectiveValue::from_tokens(tokens),
            block: None,
        }
    }

    pub fn block(name: impl Into<String>, argument: String, block: Vec<Directive>) -> Self {
        Self {
            name: name.into(),
            value: DirectiveValue::One(argument),
            block: Some(block),
        }
    }

    pub fn is_block(&self) -> bool {
        self.block.is_some()
    }

    /// Block children, empty for leaf directives
    pub fn children(&self) -> &[Directive] {
        self.block.as_deref().unwrap_or(&[])
    }

    /// First child directive with the given name
    pub fn find(&self, name: &str) -> Option<&Directive> {
        self.children().iter().find(|d| d.name == name)
    }
}

/// A path-scoped sub-block inside a server block
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Match target (`/`, `/api`, ...)
    pub path: String,
    /// Contents, kept unspecialized; consumers scan by directive name
    pub directives: Vec<Directive>,
}

impl Location {
    /// First directive with the given name
    pub fn find(&self, name: &str) -> Option<&Directive> {
        self.directives.iter().find(|d| d.name == name)
    }
}

/// One virtual host's configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerBlock {
    /// Hostnames from `server_name`, declaration order; first is canonical
    pub server_names: Vec<String>,
    /// Raw `listen` clauses, unparsed
    pub listen: Vec<String>,
    pub root: Option<String>,
    pub ssl_certificate: Option<String>,
    pub ssl_certificate_key: Option<String>,
    pub locations: Vec<Location>,
    /// Everything not recognized above, preserved in order
    pub directives: Vec<Directive>,
}

impl ServerBlock {
    /// Canonical name for matching: the first listed server name
    pub fn primary_name(&self) -> Option<&str> {
        self.server_names.first().map(|s| s.as_str())
    }
}

/// A named pool of backend addresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Upstream {
    pub name: String,
    /// Raw `server` directive values (`127.0.0.1:3000`, `... weight=3`)
    pub servers: Vec<String>,
    /// Remaining pool directives (`least_conn;`, `keepalive 32;`, ...)
    pub directives: Vec<Directive>,
}

/// Fully classified configuration document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NginxConfig {
    pub servers: Vec<ServerBlock>,
    pub upstreams: Vec<Upstream>,
    /// The `http` block's directives, verbatim
    pub http: Vec<Directive>,
    /// The `events` block's directives, verbatim
    pub events: Vec<Directive>,
    /// Top-level directives outside any recognized block
    pub main: Vec<Directive>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_collapse() {
        let one = DirectiveValue::from_tokens(vec!["on".to_string()]);
        assert_eq!(one, DirectiveValue::One("on".to_string()));
        assert_eq!(one.as_str(), Some("on"));

        let many = DirectiveValue::from_tokens(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(
            many,
            DirectiveValue::Many(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(many.as_str(), None);
        assert_eq!(many.tokens(), vec!["a", "b"]);
    }

    #[test]
    fn test_empty_value() {
        assert!(DirectiveValue::empty().is_empty());
        assert!(DirectiveValue::empty().tokens().is_empty());
    }

    #[test]
    fn test_directive_find() {
        let d = Directive::block(
            "location",
            "/".to_string(),
            vec![Directive::leaf("proxy_pass", vec!["http://backend".to_string()])],
        );
        assert!(d.is_block());
        assert_eq!(d.find("proxy_pass").unwrap().value.as_str(), Some("http://backend"));
        assert!(d.find("root").is_none());
    }
}
