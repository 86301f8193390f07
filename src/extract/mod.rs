//! Email extraction
//!
//! This module finds email addresses in page text and `mailto:` links,
//! filters placeholders and disposable providers, and assigns each address a
//! heuristic confidence score.

mod patterns;

pub use patterns::{is_excluded, is_valid_email, score_email};

use chrono::{DateTime, Utc};
use patterns::{round_score, EMAIL_REGEX};
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Characters of surrounding text kept on each side of a match
const CONTEXT_WINDOW: usize = 50;

/// Confidence bonus for addresses published as `mailto:` links
const MAILTO_BONUS: f64 = 0.1;

/// An address found on a page
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedEmail {
    /// Lowercased address
    pub email: String,

    /// Page the address was found on
    pub source_url: String,

    /// When the address was extracted
    pub found_at: DateTime<Utc>,

    /// Heuristic confidence in [0, 1]
    pub confidence: f64,

    /// Text surrounding the match, or "mailto link"
    pub context: Option<String>,
}

/// Finds and scores email addresses
#[derive(Debug, Clone)]
pub struct EmailExtractor {
    min_confidence: f64,
    include_context: bool,
}

impl Default for EmailExtractor {
    fn default() -> Self {
        Self::new(0.7)
    }
}

impl EmailExtractor {
    /// Creates an extractor that drops addresses scored below `min_confidence`
    pub fn new(min_confidence: f64) -> Self {
        Self {
            min_confidence,
            include_context: false,
        }
    }

    /// Keeps a snippet of surrounding text with each match
    pub fn with_context(mut self, include_context: bool) -> Self {
        self.include_context = include_context;
        self
    }

    pub fn min_confidence(&self) -> f64 {
        self.min_confidence
    }

    /// Extracts addresses from plain text
    ///
    /// Every match is reported, including repeats; use [`deduplicate`] to
    /// collapse them.
    pub fn extract_from_text(&self, text: &str, source_url: &str) -> Vec<ExtractedEmail> {
        let mut emails = Vec::new();

        for m in EMAIL_REGEX.find_iter(text) {
            let email = m.as_str().to_lowercase();

            let Some(confidence) = self.accept(&email, 0.0) else {
                continue;
            };

            let context = if self.include_context {
                Some(context_around(text, m.start(), m.end()))
            } else {
                None
            };

            emails.push(ExtractedEmail {
                email,
                source_url: source_url.to_string(),
                found_at: Utc::now(),
                confidence,
                context,
            });
        }

        emails
    }

    /// Extracts addresses from an HTML document
    ///
    /// Scans the visible text (script and style contents are ignored) and the
    /// targets of `mailto:` links, which score slightly higher. The result is
    /// deduplicated by address.
    pub fn extract_from_html(&self, html: &str, source_url: &str) -> Vec<ExtractedEmail> {
        let document = Html::parse_document(html);

        let mut emails = self.extract_from_text(&visible_text(&document), source_url);

        for email in mailto_addresses(&document) {
            if let Some(confidence) = self.accept(&email, MAILTO_BONUS) {
                emails.push(ExtractedEmail {
                    email,
                    source_url: source_url.to_string(),
                    found_at: Utc::now(),
                    confidence,
                    context: Some("mailto link".to_string()),
                });
            }
        }

        let emails = deduplicate(emails);
        tracing::trace!("Extracted {} emails from {}", emails.len(), source_url);
        emails
    }

    /// Validates and scores an address, returning its confidence if it is kept
    ///
    /// The threshold applies to the base score; `bonus` is added only to
    /// addresses that already pass it.
    fn accept(&self, email: &str, bonus: f64) -> Option<f64> {
        if is_excluded(email) {
            tracing::trace!("Excluded email: {}", email);
            return None;
        }

        if !is_valid_email(email) {
            tracing::debug!("Invalid email {}", email);
            return None;
        }

        let confidence = score_email(email);
        if confidence < self.min_confidence {
            tracing::trace!(
                "Dropping {} with confidence {:.2} below {:.2}",
                email,
                confidence,
                self.min_confidence
            );
            return None;
        }

        Some(round_score((confidence + bonus).min(1.0)))
    }
}

/// Removes repeated addresses, keeping the highest-confidence occurrence
///
/// First-seen order is preserved; on equal confidence the earlier entry wins.
pub fn deduplicate(emails: Vec<ExtractedEmail>) -> Vec<ExtractedEmail> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut unique: Vec<ExtractedEmail> = Vec::new();

    for email in emails {
        match index.get(&email.email) {
            Some(&i) => {
                if email.confidence > unique[i].confidence {
                    unique[i] = email;
                }
            }
            None => {
                index.insert(email.email.clone(), unique.len());
                unique.push(email);
            }
        }
    }

    unique
}

/// Concatenates the document's text nodes, skipping script and style blocks
pub fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.tree.root().descendants() {
        let Some(text) = node.value().as_text() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| matches!(el.name(), "script" | "style" | "noscript" | "template"))
                .unwrap_or(false)
        });

        let text: &str = text;
        if !hidden && !text.trim().is_empty() {
            parts.push(text.trim());
        }
    }

    parts.join(" ")
}

/// Lowercased addresses from `mailto:` link targets
fn mailto_addresses(document: &Html) -> Vec<String> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut addresses = Vec::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let href = href.trim();
        let rest = match href.get(..7) {
            Some(scheme) if scheme.eq_ignore_ascii_case("mailto:") => &href[7..],
            _ => continue,
        };

        let target = rest.split(|c: char| c == '?' || c == '&').next().unwrap_or_default();
        for address in target.split(',') {
            let address = address.trim().to_lowercase();
            if !address.is_empty() {
                addresses.push(address);
            }
        }
    }

    addresses
}

/// Up to [`CONTEXT_WINDOW`] bytes either side of a match, on char boundaries,
/// with whitespace collapsed
fn context_around(text: &str, start: usize, end: usize) -> String {
    let mut from = start.saturating_sub(CONTEXT_WINDOW);
    while !text.is_char_boundary(from) {
        from -= 1;
    }

    let mut to = (end + CONTEXT_WINDOW).min(text.len());
    while !text.is_char_boundary(to) {
        to += 1;
    }

    text[from..to].split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://acme.org/contact";

    #[test]
    fn test_extract_from_text() {
        let extractor = EmailExtractor::new(0.7);
        let text = "Contact Sales@Acme.org or support@acme.org. Ignore info@example.com.";

        let emails = extractor.extract_from_text(text, SOURCE);
        let addresses: Vec<&str> = emails.iter().map(|e| e.email.as_str()).collect();

        assert_eq!(addresses, vec!["sales@acme.org", "support@acme.org"]);
        assert!(emails.iter().all(|e| e.source_url == SOURCE));
        assert!(emails.iter().all(|e| e.context.is_none()));
    }

    #[test]
    fn test_empty_text() {
        assert!(EmailExtractor::default().extract_from_text("", SOURCE).is_empty());
    }

    #[test]
    fn test_min_confidence_filters() {
        let text = "ab@acme.io and team@acme.org";

        let strict = EmailExtractor::new(0.9);
        let emails = strict.extract_from_text(text, SOURCE);
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].email, "team@acme.org");

        let lenient = EmailExtractor::new(0.0);
        assert_eq!(lenient.extract_from_text(text, SOURCE).len(), 2);
    }

    #[test]
    fn test_disposable_domains_skipped() {
        let emails =
            EmailExtractor::new(0.0).extract_from_text("spam@mailinator.com", SOURCE);
        assert!(emails.is_empty());
    }

    #[test]
    fn test_context_window() {
        let extractor = EmailExtractor::new(0.0).with_context(true);
        let text = format!("{}Reach   our team at hello@acme.org today{}", "x".repeat(80), "y".repeat(80));

        let emails = extractor.extract_from_text(&text, SOURCE);
        let context = emails[0].context.as_deref().unwrap();
        assert!(context.contains("Reach our team at hello@acme.org today"));
        assert!(context.len() < text.len());
    }

    #[test]
    fn test_context_respects_char_boundaries() {
        let extractor = EmailExtractor::new(0.0).with_context(true);
        let text = format!("{} hello@acme.org {}", "é".repeat(40), "ü".repeat(40));

        let emails = extractor.extract_from_text(&text, SOURCE);
        assert_eq!(emails.len(), 1);
        assert!(emails[0].context.as_deref().unwrap().contains("hello@acme.org"));
    }

    #[test]
    fn test_extract_from_html_with_mailto() {
        let html = r#"
            <html><head>
              <style>.x { content: "hidden@acme.org"; }</style>
              <script>var e = "script@acme.org";</script>
            </head><body>
              <p>Questions? info@acme.org</p>
              <a href="mailto:Press@Acme.org?subject=Hi">Email the press team</a>
              <a href="MAILTO:info@acme.org">info@acme.org</a>
            </body></html>
        "#;

        let emails = EmailExtractor::new(0.7).extract_from_html(html, SOURCE);
        let mut addresses: Vec<&str> = emails.iter().map(|e| e.email.as_str()).collect();
        addresses.sort();
        assert_eq!(addresses, vec!["info@acme.org", "press@acme.org"]);

        let press = emails.iter().find(|e| e.email == "press@acme.org").unwrap();
        assert_eq!(press.context.as_deref(), Some("mailto link"));
    }

    #[test]
    fn test_mailto_bonus_applies() {
        let html = r#"<a href="mailto:info@acme.io">write</a>"#;
        let emails = EmailExtractor::new(0.0).extract_from_html(html, SOURCE);
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].confidence, 0.9);
    }

    #[test]
    fn test_mailto_bonus_does_not_lift_over_threshold() {
        // Scores 0.6 on its own: short enough, but long local part and a digit run
        let weak = "a1234567890123456789012345678901@shop.io";
        let html = format!(
            r#"<a href="mailto:{}">write</a> <a href="mailto:ab@shop.io">or here</a>"#,
            weak
        );

        let emails = EmailExtractor::new(0.7).extract_from_html(&html, SOURCE);
        assert_eq!(emails.len(), 1);
        assert_eq!(emails[0].email, "ab@shop.io");
        assert_eq!(emails[0].confidence, 0.8);

        let lenient = EmailExtractor::new(0.6).extract_from_html(&html, SOURCE);
        let weak_score = lenient.iter().find(|e| e.email == weak).unwrap().confidence;
        assert_eq!(weak_score, 0.7);
    }

    #[test]
    fn test_deduplicate_keeps_highest() {
        let at = Utc::now();
        let make = |email: &str, confidence: f64, source: &str| ExtractedEmail {
            email: email.to_string(),
            source_url: source.to_string(),
            found_at: at,
            confidence,
            context: None,
        };

        let unique = deduplicate(vec![
            make("a@acme.org", 0.8, "https://acme.org/1"),
            make("b@acme.org", 0.9, "https://acme.org/1"),
            make("a@acme.org", 0.95, "https://acme.org/2"),
            make("b@acme.org", 0.9, "https://acme.org/3"),
        ]);

        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].email, "a@acme.org");
        assert_eq!(unique[0].source_url, "https://acme.org/2");
        assert_eq!(unique[1].source_url, "https://acme.org/1");
    }

    #[test]
    fn test_visible_text_skips_scripts() {
        let document = Html::parse_document(
            "<html><body><p>Hello</p><script>nope()</script><p>World</p></body></html>",
        );
        assert_eq!(visible_text(&document), "Hello World");
    }
}
