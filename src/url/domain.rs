use std::net::IpAddr;
use url::Url;

/// Two-label public suffixes that need one more label to identify a site
const MULTI_LABEL_SUFFIXES: &[&str] = &[
    "co.uk", "org.uk", "ac.uk", "gov.uk", "me.uk", "ltd.uk", "plc.uk", "com.au", "net.au",
    "org.au", "edu.au", "gov.au", "co.nz", "org.nz", "co.jp", "ne.jp", "or.jp", "co.za",
    "org.za", "com.br", "com.mx", "com.ar", "com.tr", "com.cn", "com.hk", "com.sg", "co.in",
    "co.kr", "co.il",
];

/// Extracts the domain from a URL
///
/// Returns the lowercase host, or `None` if the URL has no host.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lead_scout::url::extract_domain;
///
/// let url = Url::parse("https://Blog.Example.com/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("blog.example.com".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Reduces a hostname to the registrable domain that identifies a site
///
/// `shop.example.com` and `www.example.com` both reduce to `example.com`,
/// while `news.bbc.co.uk` reduces to `bbc.co.uk`. IP addresses and
/// single-label hosts such as `localhost` are returned unchanged.
///
/// # Examples
///
/// ```
/// use lead_scout::url::registrable_domain;
///
/// assert_eq!(registrable_domain("www.example.com"), "example.com");
/// assert_eq!(registrable_domain("news.bbc.co.uk"), "bbc.co.uk");
/// assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
/// ```
pub fn registrable_domain(host: &str) -> String {
    let host = host.trim_end_matches('.').to_lowercase();

    let bare = host.trim_start_matches('[').trim_end_matches(']');
    if bare.parse::<IpAddr>().is_ok() {
        return host;
    }

    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() <= 2 {
        return host;
    }

    let last_two = labels[labels.len() - 2..].join(".");
    let keep = if MULTI_LABEL_SUFFIXES.contains(&last_two.as_str()) {
        3
    } else {
        2
    };

    labels[labels.len().saturating_sub(keep)..].join(".")
}

/// Returns true if both URLs belong to the same registrable domain
pub fn same_site(a: &Url, b: &Url) -> bool {
    match (a.host_str(), b.host_str()) {
        (Some(ha), Some(hb)) => registrable_domain(ha) == registrable_domain(hb),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain_lowercases() {
        let url = Url::parse("https://EXAMPLE.COM/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_extract_domain_ignores_port() {
        let url = Url::parse("https://example.com:8080/").unwrap();
        assert_eq!(extract_domain(&url), Some("example.com".to_string()));
    }

    #[test]
    fn test_registrable_domain_strips_subdomains() {
        assert_eq!(registrable_domain("example.com"), "example.com");
        assert_eq!(registrable_domain("www.example.com"), "example.com");
        assert_eq!(registrable_domain("a.b.c.example.com"), "example.com");
    }

    #[test]
    fn test_registrable_domain_multi_label_suffix() {
        assert_eq!(registrable_domain("bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("www.bbc.co.uk"), "bbc.co.uk");
        assert_eq!(registrable_domain("shop.acme.com.au"), "acme.com.au");
    }

    #[test]
    fn test_registrable_domain_ip_and_localhost() {
        assert_eq!(registrable_domain("127.0.0.1"), "127.0.0.1");
        assert_eq!(registrable_domain("[::1]"), "[::1]");
        assert_eq!(registrable_domain("localhost"), "localhost");
    }

    #[test]
    fn test_registrable_domain_trailing_dot() {
        assert_eq!(registrable_domain("www.example.com."), "example.com");
    }

    #[test]
    fn test_same_site() {
        let a = Url::parse("https://www.example.com/about").unwrap();
        let b = Url::parse("http://blog.example.com/post").unwrap();
        let c = Url::parse("https://example.org/").unwrap();
        assert!(same_site(&a, &b));
        assert!(!same_site(&a, &c));
    }

    #[test]
    fn test_same_site_local_server() {
        let a = Url::parse("http://127.0.0.1:4000/").unwrap();
        let b = Url::parse("http://127.0.0.1:4000/contact").unwrap();
        assert!(same_site(&a, &b));
    }
}
