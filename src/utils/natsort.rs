//! Natural ("human") ordering for sample ids and group names.
//!
//! Digit runs compare by numeric value so `S2` sorts before `S10`.
//! Runs with a leading zero compare digit by digit, and whitespace is
//! ignored.

use std::cmp::Ordering;

/// Compare two strings in natural order.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    natord::compare(a, b)
}

/// Sort a slice of strings in natural order.
pub fn natural_sort<S: AsRef<str>>(items: &mut [S]) {
    items.sort_by(|a, b| natural_cmp(a.as_ref(), b.as_ref()));
}
