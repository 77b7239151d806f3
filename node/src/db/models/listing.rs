use chrono::{DateTime, Utc};
use itertools::Itertools;
use std::cmp::Ordering;

/// Capability shared by every record the registry lists.
///
/// Listing order is title first, identity second; implementors pick their
/// title field but must not change the comparison contract.
pub trait Listable {
    fn title(&self) -> &str;
    fn identity(&self) -> &str;
    fn created(&self) -> DateTime<Utc>;

    fn compare(&self, other: &Self) -> Ordering {
        self.title()
            .cmp(other.title())
            .then_with(|| self.identity().cmp(other.identity()))
    }
}

/// Sort listing by title then identity
pub fn sort_listing<T: Listable>(records: Vec<T>) -> Vec<T> {
    records.into_iter().sorted_by(|a, b| a.compare(b)).collect()
}
