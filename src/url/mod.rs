//! URL handling module for Lead-Scout
//!
//! This module provides URL normalization (used as the visited-ledger key),
//! domain extraction, site membership checks and domain allow-list matching.

mod domain;
mod matcher;
mod normalize;

pub use domain::{extract_domain, registrable_domain, same_site};
pub use matcher::{matches_any, matches_domain_pattern};
pub use normalize::{canonical_key, normalize_url};

use ::url::Url;

/// File extensions that never contain contact pages
const SKIPPED_EXTENSIONS: &[&str] = &[".pdf", ".zip", ".jpg", ".png", ".gif", ".mp4", ".mp3"];

/// Path fragments for account and checkout flows
const SKIPPED_PATHS: &[&str] = &["/login", "/signup", "/cart", "/checkout", "/admin"];

/// Decides whether a discovered link should be followed during a site crawl
///
/// A link is followed when it:
/// - uses `http` or `https`
/// - belongs to the same registrable domain as the site being crawled
/// - does not point at a binary file (pdf, zip, images, media)
/// - is not part of a login, signup, cart, checkout or admin flow
///
/// # Examples
///
/// ```
/// use url::Url;
/// use lead_scout::url::should_follow;
///
/// let site = Url::parse("https://example.com/").unwrap();
/// let contact = Url::parse("https://www.example.com/contact").unwrap();
/// let brochure = Url::parse("https://example.com/brochure.pdf").unwrap();
///
/// assert!(should_follow(&site, &contact));
/// assert!(!should_follow(&site, &brochure));
/// ```
pub fn should_follow(site: &Url, link: &Url) -> bool {
    if link.scheme() != "http" && link.scheme() != "https" {
        return false;
    }

    if !same_site(site, link) {
        return false;
    }

    let path = link.path().to_lowercase();

    if SKIPPED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
        return false;
    }

    if SKIPPED_PATHS.iter().any(|skip| path.contains(skip)) {
        return false;
    }

    true
}
