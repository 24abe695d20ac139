//! # Sorting
//!
//! Comparator-driven sorts that return a new vector and leave the input
//! untouched. Both take a three-way comparator returning [`Ordering`].
//!
//! | algorithm        | time (avg / worst)  | extra space | stable |
//! |------------------|---------------------|-------------|--------|
//! | `partition_sort` | O(n log n) / O(n²)  | O(n)        | no     |
//! | `merge_sort`     | O(n log n)          | O(n)        | yes    |

use std::cmp::Ordering;

use infomate_core::SortAlgorithm;

/// Sort `items` with the chosen algorithm
pub fn sort<T, F>(items: &[T], algorithm: SortAlgorithm, compare: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    match algorithm {
        SortAlgorithm::Partition => partition_sort(items, &compare),
        SortAlgorithm::Merge => merge_sort(items, &compare),
    }
}

/// Three-way partition quicksort.
///
/// Pivot is the middle element. One pass splits the slice into strictly
/// less, equal and strictly greater groups; the outer two are sorted
/// recursively and the result is `less ++ equal ++ greater`. Equal keys always
/// end up contiguous, which keeps heavily duplicated inputs cheap.
pub fn partition_sort<T, F>(items: &[T], compare: &F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let pivot = &items[items.len() / 2];
    let mut less = Vec::new();
    let mut equal = Vec::new();
    let mut greater = Vec::new();

    for item in items {
        match compare(item, pivot) {
            Ordering::Less => less.push(item.clone()),
            Ordering::Equal => equal.push(item.clone()),
            Ordering::Greater => greater.push(item.clone()),
        }
    }

    let mut sorted = partition_sort(&less, compare);
    sorted.append(&mut equal);
    sorted.append(&mut partition_sort(&greater, compare));
    sorted
}

/// Top-down mergesort. Ties take the left element, so equal keys keep their
/// input order.
pub fn merge_sort<T, F>(items: &[T], compare: &F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() <= 1 {
        return items.to_vec();
    }

    let mid = items.len() / 2;
    let left = merge_sort(&items[..mid], compare);
    let right = merge_sort(&items[mid..], compare);
    merge(left, right, compare)
}

fn merge<T, F>(left: Vec<T>, right: Vec<T>, compare: &F) -> Vec<T>
where
    F: Fn(&T, &T) -> Ordering,
{
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_left = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) != Ordering::Greater,
            _ => break,
        };
        let next = if take_left { left.next() } else { right.next() };
        merged.extend(next);
    }

    merged.extend(left);
    merged.extend(right);
    merged
}
