//! # URL Utilities
//!
//! Hand-rolled URL splitting, validation and normalization for record keys.
//! Record stores never normalize keys themselves; callers that want
//! `HTTP://News.Example/a` and `http://news.example/a` to dedup run
//! [`normalize_url`] before submitting.

use serde::{Deserialize, Serialize};

/// Domains treated as news publishers by [`is_news_site`]
pub const NEWS_DOMAINS: &[&str] = &[
    "news.naver.com",
    "news.daum.net",
    "chosun.com",
    "joongang.co.kr",
    "donga.com",
    "hani.co.kr",
    "khan.co.kr",
    "mk.co.kr",
    "ytn.co.kr",
    "sbs.co.kr",
    "kbs.co.kr",
    "mbc.co.kr",
];

/// Components of a URL string. Absent parts are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedUrl {
    pub protocol: String,
    pub hostname: String,
    pub port: String,
    pub pathname: String,
    pub search: String,
    pub hash: String,
}

/// Split a URL into its components.
///
/// Peels off, in order: `scheme://`, `#fragment`, `?query`, `/path`, then
/// splits `host:port`. Never fails; garbage in yields a best-effort split.
pub fn parse_url(input: &str) -> ParsedUrl {
    let mut url = ParsedUrl::default();
    let mut rest = input;

    if let Some(end) = rest.find("://") {
        url.protocol = rest[..end].to_string();
        rest = &rest[end + 3..];
    }

    if let Some(idx) = rest.find('#') {
        url.hash = rest[idx + 1..].to_string();
        rest = &rest[..idx];
    }

    if let Some(idx) = rest.find('?') {
        url.search = rest[idx + 1..].to_string();
        rest = &rest[..idx];
    }

    if let Some(idx) = rest.find('/') {
        url.pathname = rest[idx..].to_string();
        rest = &rest[..idx];
    }

    match rest.find(':') {
        Some(idx) => {
            url.hostname = rest[..idx].to_string();
            url.port = rest[idx + 1..].to_string();
        }
        None => url.hostname = rest.to_string(),
    }

    url
}

pub fn extract_domain(input: &str) -> String {
    parse_url(input).hostname
}

/// Accepts `http(s)://` URLs whose authority starts with at least one
/// DNS label followed by an alphabetic TLD of two or more letters.
pub fn validate_url(input: &str) -> bool {
    if input.trim().is_empty() {
        return false;
    }

    let rest = match input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))
    {
        Some(rest) => rest,
        None => return false,
    };

    let mut rest = rest;
    loop {
        let Some(dot) = rest.find('.') else {
            return false;
        };
        if !is_dns_label(&rest[..dot]) {
            return false;
        }
        rest = &rest[dot + 1..];

        let tld_chars = rest.chars().take(2).filter(|c| c.is_ascii_alphabetic()).count();
        if tld_chars == 2 {
            return true;
        }
    }
}

fn is_dns_label(label: &str) -> bool {
    let bytes = label.as_bytes();
    if bytes.is_empty() || bytes.len() > 63 {
        return false;
    }
    let edge_ok = |b: u8| b.is_ascii_alphanumeric();
    edge_ok(bytes[0])
        && edge_ok(bytes[bytes.len() - 1])
        && bytes.iter().all(|&b| b.is_ascii_alphanumeric() || b == b'-')
}

/// True when the host is a known news domain or one of its subdomains
pub fn is_news_site(input: &str) -> bool {
    let domain = extract_domain(input);
    NEWS_DOMAINS.iter().any(|news| {
        domain == *news
            || domain
                .strip_suffix(news)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Trim, then lowercase the scheme and host. Path, query and fragment keep
/// their case.
pub fn normalize_url(input: &str) -> String {
    let trimmed = input.trim();

    let Some(scheme_end) = trimmed.find("://") else {
        return trimmed.to_string();
    };

    let protocol = trimmed[..scheme_end].to_lowercase();
    let rest = &trimmed[scheme_end + 3..];

    match rest.find('/') {
        Some(host_end) => format!(
            "{}://{}{}",
            protocol,
            rest[..host_end].to_lowercase(),
            &rest[host_end..]
        ),
        None => format!("{}://{}", protocol, rest.to_lowercase()),
    }
}
