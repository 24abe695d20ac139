//! # Searching
//!
//! - [`linear_search`]: predicate scan, all matches in input order, O(n)
//! - [`binary_search_by`]: midpoint narrowing over a pre-sorted slice, O(log n)
//! - [`string_match`]: case-insensitive naive substring test, O(text · pattern)
//! - [`extract_keywords`]: lowercase word set of a text

use std::cmp::Ordering;
use std::collections::HashSet;

/// Every element satisfying `predicate`, in original order
pub fn linear_search<T, P>(items: &[T], predicate: P) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    items.iter().filter(|item| predicate(item)).cloned().collect()
}

/// Binary search over `sorted`, which must be ordered consistently with
/// `compare`. `compare` reports how an element relates to the target.
///
/// Returns the index of the first exact match probed, which under duplicate
/// keys is not necessarily the leftmost one.
pub fn binary_search_by<T, F>(sorted: &[T], compare: F) -> Option<usize>
where
    F: Fn(&T) -> Ordering,
{
    let mut lo = 0usize;
    let mut hi = sorted.len();

    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        match compare(&sorted[mid]) {
            Ordering::Equal => return Some(mid),
            Ordering::Greater => hi = mid,
            Ordering::Less => lo = mid + 1,
        }
    }

    None
}

/// Case-insensitive substring test by direct character comparison.
///
/// An empty pattern matches everything.
pub fn string_match(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().flat_map(char::to_lowercase).collect();
    let pattern: Vec<char> = pattern.chars().flat_map(char::to_lowercase).collect();

    if pattern.len() > text.len() {
        return false;
    }

    (0..=text.len() - pattern.len()).any(|start| {
        pattern
            .iter()
            .zip(&text[start..])
            .all(|(p, t)| p == t)
    })
}

#[inline]
fn is_hangul_syllable(c: char) -> bool {
    ('\u{AC00}'..='\u{D7A3}').contains(&c)
}

/// Distinct lowercase words of at least `min_len` characters, first-seen order.
///
/// Anything other than ASCII word characters, whitespace and Hangul syllables
/// acts as a separator.
pub fn extract_keywords(text: &str, min_len: usize) -> Vec<String> {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c.is_whitespace() || is_hangul_syllable(c) {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    let mut seen = HashSet::new();
    cleaned
        .split_whitespace()
        .filter(|word| word.chars().count() >= min_len)
        .filter(|word| seen.insert(*word))
        .map(str::to_string)
        .collect()
}
