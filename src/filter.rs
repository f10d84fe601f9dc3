// Filter engine producing derived views over a record collection

use crate::predicate::PredicateSet;
use crate::record::Record;
use std::cmp::Ordering;
use tracing::debug;

type Comparator<T> = Box<dyn Fn(&T, &T) -> Ordering + Send + Sync>;

/// Total order applied to a view after filtering
pub struct SortRule<T> {
    cmp: Comparator<T>,
}

impl<T: 'static> SortRule<T> {
    pub fn new<F>(cmp: F) -> Self
    where
        F: Fn(&T, &T) -> Ordering + Send + Sync + 'static,
    {
        Self { cmp: Box::new(cmp) }
    }

    /// Ascending by an extracted key
    pub fn by_key<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(move |a, b| key(a).cmp(&key(b)))
    }

    /// Descending by an extracted key
    pub fn by_key_desc<K, F>(key: F) -> Self
    where
        K: Ord,
        F: Fn(&T) -> K + Send + Sync + 'static,
    {
        Self::new(move |a, b| key(b).cmp(&key(a)))
    }

    /// Break ties of `self` with `next`
    pub fn then(self, next: SortRule<T>) -> Self {
        let first = self.cmp;
        let second = next.cmp;
        Self::new(move |a, b| first(a, b).then_with(|| second(a, b)))
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.cmp)(a, b)
    }
}

impl<T> std::fmt::Debug for SortRule<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SortRule(..)")
    }
}

/// Borrowed, ordered subset of a record collection
#[derive(Debug)]
pub struct FilteredView<'a, T> {
    records: Vec<&'a T>,
}

impl<'a, T: Record> FilteredView<'a, T> {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a T> + '_ {
        self.records.iter().copied()
    }

    pub fn get(&self, index: usize) -> Option<&'a T> {
        self.records.get(index).copied()
    }

    pub fn as_slice(&self) -> &[&'a T] {
        &self.records
    }

    pub fn ids(&self) -> Vec<&'a str> {
        self.records.iter().map(|r| r.id()).collect()
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.records.iter().any(|r| r.id() == id)
    }

    /// Clone the viewed records out of the store
    pub fn to_records(&self) -> Vec<T> {
        self.records.iter().map(|r| (*r).clone()).collect()
    }
}

impl<'a, 'v, T> IntoIterator for &'v FilteredView<'a, T> {
    type Item = &'a T;
    type IntoIter = std::iter::Copied<std::slice::Iter<'v, &'a T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter().copied()
    }
}

/// Applies a predicate set to a collection, optionally sorting the result
///
/// The engine holds no state about the collection it filters: every call to
/// `apply` walks its input once and builds a fresh view, so callers re-invoke
/// it whenever the store or the predicates change.
#[derive(Debug)]
pub struct FilterEngine<T> {
    sort: Option<SortRule<T>>,
}

impl<T> Default for FilterEngine<T> {
    fn default() -> Self {
        Self { sort: None }
    }
}

impl<T: Record> FilterEngine<T> {
    pub fn new() -> Self {
        Self { sort: None }
    }

    pub fn with_sort(sort: SortRule<T>) -> Self {
        Self { sort: Some(sort) }
    }

    pub fn sort_rule(&self) -> Option<&SortRule<T>> {
        self.sort.as_ref()
    }

    /// Keep records matching `predicates`, in input order unless a sort rule is attached
    pub fn apply<'a, I>(&self, records: I, predicates: &PredicateSet) -> FilteredView<'a, T>
    where
        I: IntoIterator<Item = &'a T>,
    {
        let mut kept: Vec<&'a T> = records.into_iter().filter(|r| predicates.matches(*r)).collect();

        if let Some(rule) = &self.sort {
            // sort_by is stable, equal-ranked records keep their relative order
            kept.sort_by(|a, b| rule.compare(a, b));
        }

        debug!(
            collection = T::collection_name(),
            kept = kept.len(),
            predicates = predicates.predicates().len(),
            sorted = self.sort.is_some(),
            "apply: filtered view computed"
        );

        FilteredView { records: kept }
    }
}
