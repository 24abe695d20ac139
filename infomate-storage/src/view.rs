//! # Record Views
//!
//! Comparators and filters used to derive sorted and searched views. Views
//! borrow records from the log and are never persisted.

use std::cmp::Ordering;

use infomate_core::{Payload, Record, SearchField, SortKey, SortOrder};
use infomate_index::string_match;

/// Numeric value a record sorts by under `key`.
///
/// Dates compare as epoch milliseconds of the last update; absent payload
/// fields have already resolved to 0 / the epoch.
pub fn sort_value<P: Payload>(record: &Record<P>, key: SortKey) -> f64 {
    match key {
        SortKey::Date => record.updated_at.timestamp_millis() as f64,
        SortKey::Score => record.payload.score(),
        SortKey::Count => f64::from(record.occurrence_count),
    }
}

pub fn compare_records<P: Payload>(
    a: &Record<P>,
    b: &Record<P>,
    key: SortKey,
    order: SortOrder,
) -> Ordering {
    let ordering = sort_value(a, key).total_cmp(&sort_value(b, key));
    match order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Comparator over borrowed records, as fed to the sorters
pub fn comparator<'a, P: Payload>(
    key: SortKey,
    order: SortOrder,
) -> impl Fn(&&'a Record<P>, &&'a Record<P>) -> Ordering {
    move |a, b| compare_records(a, b, key, order)
}

/// Case-insensitive substring match of `query` against the chosen fields
pub fn matches_query<P: Payload>(record: &Record<P>, query: &str, field: SearchField) -> bool {
    let in_url = || string_match(&record.url, query);
    let in_metadata = || {
        record
            .payload
            .metadata_text()
            .is_some_and(|text| string_match(text, query))
    };

    match field {
        SearchField::Url => in_url(),
        SearchField::Metadata => in_metadata(),
        SearchField::All => in_url() || in_metadata(),
    }
}
