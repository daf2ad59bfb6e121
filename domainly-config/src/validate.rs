//! Server-name validation

/// Whether a name is usable as an nginx server name and local hostname
///
/// Requires dot-separated labels of 1–63 characters from `[A-Za-z0-9.-]`,
/// at least two labels, and no label starting or ending with a hyphen.
pub fn is_valid_server_name(name: &str) -> bool {
    if name.is_empty()
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return false;
    }

    let labels: Vec<&str> = name.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        assert!(is_valid_server_name("myapp.local"));
        assert!(is_valid_server_name("api.my-app.local"));
        assert!(is_valid_server_name("a1.b2.c3"));
    }

    #[test]
    fn test_needs_two_labels() {
        assert!(!is_valid_server_name("localhost"));
        assert!(!is_valid_server_name(""));
    }

    #[test]
    fn test_rejects_bad_characters() {
        assert!(!is_valid_server_name("my app.local"));
        assert!(!is_valid_server_name("*.app.local"));
        assert!(!is_valid_server_name("app_name.local"));
    }

    #[test]
    fn test_rejects_malformed_labels() {
        assert!(!is_valid_server_name(".local"));
        assert!(!is_valid_server_name("app..local"));
        assert!(!is_valid_server_name("-app.local"));
        assert!(!is_valid_server_name("app-.local"));
        assert!(!is_valid_server_name(&format!("{}.local", "a".repeat(64))));
    }
}
