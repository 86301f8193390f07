use crate::UrlError;
use url::Url;

/// Normalizes a URL so equivalent spellings compare equal
///
/// # Normalization Steps
///
/// 1. Trim whitespace; a bare host such as `example.com` is read as `https://example.com`
/// 2. Parse the URL; reject if malformed
/// 3. Accept only `http` and `https`
/// 4. Lowercase scheme and host, drop the scheme's default port
/// 5. Strip trailing slashes from the path (the root stays `/`)
/// 6. Remove the fragment
/// 7. Drop an empty query string (trailing `?`)
///
/// Unlike crawl-frontier normalization, `http` and `https` stay distinct and
/// query parameters are kept as-is: two spellings of the same visit must
/// collapse, but two different pages must not.
///
/// # Examples
///
/// ```
/// use lead_scout::url::normalize_url;
///
/// let url = normalize_url("HTTPS://Example.com:443/about/#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let trimmed = url_str.trim();
    if trimmed.is_empty() {
        return Err(UrlError::Parse("empty URL".to_string()));
    }

    let mut url = match Url::parse(trimmed) {
        Ok(url) => url,
        Err(url::ParseError::RelativeUrlWithoutBase) => {
            Url::parse(&format!("https://{}", trimmed)).map_err(|e| UrlError::Parse(e.to_string()))?
        }
        Err(e) => return Err(UrlError::Parse(e.to_string())),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    let host = match url.host_str() {
        Some(host) if !host.is_empty() => host.to_lowercase(),
        _ => return Err(UrlError::MissingDomain),
    };
    url.set_host(Some(&host))
        .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;

    if url.port().is_some() && url.port() == default_port(url.scheme()) {
        // The parser already elides default ports; this covers hosts set after parsing.
        url.set_port(None)
            .map_err(|_| UrlError::Malformed("Failed to clear default port".to_string()))?;
    }

    let path = strip_trailing_slashes(url.path());
    url.set_path(&path);

    url.set_fragment(None);

    if url.query() == Some("") {
        url.set_query(None);
    }

    Ok(url)
}

/// Returns the key a URL is stored under in the visited ledger
///
/// Normalizable URLs use their normalized form. Anything that cannot be
/// parsed falls back to the trimmed input so lookups stay total.
pub fn canonical_key(url_str: &str) -> String {
    match normalize_url(url_str) {
        Ok(url) => url.to_string(),
        Err(e) => {
            tracing::debug!("Using raw key for unparseable URL '{}': {}", url_str, e);
            url_str.trim().to_string()
        }
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

fn strip_trailing_slashes(path: &str) -> String {
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        "/".to_string()
    } else {
        stripped.to_string()
    }
}
