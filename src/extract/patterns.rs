use lazy_static::lazy_static;
use regex::Regex;

/// Domains of throwaway mailbox providers
const DISPOSABLE_DOMAINS: &[&str] = &[
    "tempmail.com",
    "throwaway.email",
    "guerrillamail.com",
    "mailinator.com",
    "10minutemail.com",
    "trashmail.com",
];

/// Top-level domains that raise confidence
const COMMON_TLDS: &[&str] = &[".com", ".org", ".net", ".edu", ".gov"];

lazy_static! {
    // Addresses embedded in free text
    pub(crate) static ref EMAIL_REGEX: Regex = Regex::new(
        r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b"
    ).unwrap();

    // A whole string that is exactly one address
    static ref EMAIL_EXACT_REGEX: Regex = Regex::new(
        r"^[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}$"
    ).unwrap();

    // Placeholder addresses and image names that look like addresses
    static ref EXCLUDE_REGEX: Regex = Regex::new(
        r"(?i)(@(example|domain|test|email)\.(com|org|net)$|@(placeholder|yourdomain|yourcompany)\.|\.(png|jpg|gif|svg)@)"
    ).unwrap();

    static ref DIGIT_RUN_REGEX: Regex = Regex::new(r"\d{5,}").unwrap();
}

/// Returns true if `email` (already lowercased) is a syntactically usable address
///
/// Beyond the address pattern, the local part and every domain label must be
/// non-empty and must not start or end with a dot or hyphen.
pub fn is_valid_email(email: &str) -> bool {
    if !EMAIL_EXACT_REGEX.is_match(email) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.starts_with('.') || local.ends_with('.') || local.contains("..") {
        return false;
    }

    domain
        .split('.')
        .all(|label| !label.is_empty() && !label.starts_with('-') && !label.ends_with('-'))
}

/// Returns true for placeholder, image-name and disposable addresses
pub fn is_excluded(email: &str) -> bool {
    if EXCLUDE_REGEX.is_match(email) {
        return true;
    }

    match email.rsplit_once('@') {
        Some((_, domain)) => DISPOSABLE_DOMAINS.contains(&domain),
        None => false,
    }
}

/// Heuristic confidence that an extracted address is real
///
/// Starts at 0.5 and adds 0.2 for a common TLD, 0.1 for an address shorter
/// than 50 characters, 0.1 for a local part of 3 to 30 characters and 0.1
/// when there is no run of five or more digits. Capped at 1.0 and rounded
/// to two decimals so thresholds compare exactly.
pub fn score_email(email: &str) -> f64 {
    let mut confidence: f64 = 0.5;

    if COMMON_TLDS.iter().any(|tld| email.ends_with(tld)) {
        confidence += 0.2;
    }

    if email.chars().count() < 50 {
        confidence += 0.1;
    }

    let local_len = email
        .split_once('@')
        .map(|(local, _)| local.chars().count())
        .unwrap_or(0);
    if (3..=30).contains(&local_len) {
        confidence += 0.1;
    }

    if !DIGIT_RUN_REGEX.is_match(email) {
        confidence += 0.1;
    }

    round_score(confidence.min(1.0))
}

/// Rounds a score to two decimals
pub(crate) fn round_score(score: f64) -> f64 {
    (score * 100.0).round() / 100.0
}
