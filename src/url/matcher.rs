/// Checks if a domain matches an allow-list pattern
///
/// Patterns take two forms:
/// 1. Exact: "example.com" matches only "example.com"
/// 2. Wildcard: "*.example.com" matches "example.com" and every subdomain
///    of it ("mail.example.com", "eu.mail.example.com")
///
/// Comparison ignores ASCII case, since both email domains and hostnames
/// are case-insensitive.
///
/// # Examples
///
/// ```
/// use lead_scout::url::matches_domain_pattern;
///
/// assert!(matches_domain_pattern("example.com", "Example.COM"));
/// assert!(matches_domain_pattern("*.example.com", "mail.example.com"));
/// assert!(!matches_domain_pattern("*.example.com", "myexample.com"));
/// ```
pub fn matches_domain_pattern(pattern: &str, domain: &str) -> bool {
    let pattern = pattern.trim().to_ascii_lowercase();
    let domain = domain.trim().to_ascii_lowercase();

    if domain.is_empty() {
        return false;
    }

    match pattern.strip_prefix("*.") {
        Some(base) => domain == base || domain.ends_with(&format!(".{}", base)),
        None => domain == pattern,
    }
}

/// Returns true if the domain matches at least one of the patterns
pub fn matches_any(patterns: &[String], domain: &str) -> bool {
    patterns
        .iter()
        .any(|pattern| matches_domain_pattern(pattern, domain))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern() {
        assert!(matches_domain_pattern("acme.org", "acme.org"));
        assert!(!matches_domain_pattern("acme.org", "sales.acme.org"));
        assert!(!matches_domain_pattern("acme.org", "acme.com"));
    }

    #[test]
    fn test_case_is_ignored() {
        assert!(matches_domain_pattern("ACME.org", "acme.ORG"));
        assert!(matches_domain_pattern("*.Acme.org", "Sales.ACME.org"));
    }

    #[test]
    fn test_wildcard_pattern() {
        assert!(matches_domain_pattern("*.acme.org", "acme.org"));
        assert!(matches_domain_pattern("*.acme.org", "sales.acme.org"));
        assert!(matches_domain_pattern("*.acme.org", "eu.sales.acme.org"));
        assert!(!matches_domain_pattern("*.acme.org", "notacme.org"));
        assert!(!matches_domain_pattern("*.acme.org", "acme.org.evil.com"));
    }

    #[test]
    fn test_empty_domain_never_matches() {
        assert!(!matches_domain_pattern("", ""));
        assert!(!matches_domain_pattern("*.acme.org", ""));
    }

    #[test]
    fn test_matches_any() {
        let patterns = vec!["acme.org".to_string(), "*.widgets.co.uk".to_string()];
        assert!(matches_any(&patterns, "acme.org"));
        assert!(matches_any(&patterns, "shop.widgets.co.uk"));
        assert!(!matches_any(&patterns, "gadgets.co.uk"));
        assert!(!matches_any(&[], "acme.org"));
    }
}
