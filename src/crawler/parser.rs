//! Link and title extraction from fetched pages
//!
//! Email addresses are pulled out by [`crate::extract`]; this module only
//! finds where the crawl can go next.

use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Navigation data extracted from an HTML page
#[derive(Debug, Clone, Default)]
pub struct ParsedPage {
    /// The page title (from the `<title>` tag)
    pub title: Option<String>,

    /// Distinct absolute `http(s)` links, in document order, fragments removed
    pub links: Vec<Url>,
}

/// Parses an HTML page for its title and outgoing links
///
/// # Link Extraction Rules
///
/// **Include:** `<a href="...">` anywhere in the document, resolved against
/// `base_url`.
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` and `data:` targets
/// - Same-page anchors (`#section`)
/// - Anything that is not `http` or `https` after resolution
///
/// # Example
///
/// ```
/// use lead_scout::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<title>Team</title><a href="/contact">Contact</a>"#;
/// let base = Url::parse("https://acme.org/").unwrap();
/// let page = parse_html(html, &base);
/// assert_eq!(page.title.as_deref(), Some("Team"));
/// assert_eq!(page.links[0].as_str(), "https://acme.org/contact");
/// ```
pub fn parse_html(html: &str, base_url: &Url) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document, base_url),
    }
}

fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn extract_links(document: &Html, base_url: &Url) -> Vec<Url> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for element in document.select(&selector) {
        if element.value().attr("download").is_some() {
            continue;
        }

        let Some(link) = element
            .value()
            .attr("href")
            .and_then(|href| resolve_link(href, base_url))
        else {
            continue;
        };

        if seen.insert(link.as_str().to_string()) {
            links.push(link);
        }
    }

    links
}

/// Resolves an href against the page URL, rejecting non-navigable targets
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let mut url = base_url.join(href).ok()?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return None;
    }

    url.set_fragment(None);
    Some(url)
}
