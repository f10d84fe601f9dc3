// Summary statistics over any record collection

use crate::record::Record;
use std::collections::BTreeMap;

/// Group key used for records that lack the grouped field
pub const MISSING: &str = "";

/// Count records per value of `field`
///
/// Works on whatever collection is passed in (a whole store or a filtered
/// view). Records without the field land under [`MISSING`], so the counts
/// always add up to the number of records given.
pub fn count_by<'a, T, I>(records: I, field: &str) -> BTreeMap<String, usize>
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    let mut counts = BTreeMap::new();
    for record in records {
        let key = record.field(field).map(|v| v.to_string()).unwrap_or_default();
        *counts.entry(key).or_insert(0) += 1;
    }
    counts
}

/// Sum a numeric field; non-numeric or missing values count as zero
pub fn sum<'a, T, I>(records: I, field: &str) -> f64
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
{
    records
        .into_iter()
        .filter_map(|r| r.field(field).and_then(|v| v.as_f64()))
        .sum()
}

/// Count records satisfying a condition
pub fn count_where<'a, T, I, F>(records: I, mut pred: F) -> usize
where
    T: Record,
    I: IntoIterator<Item = &'a T>,
    F: FnMut(&T) -> bool,
{
    records.into_iter().filter(|r| pred(*r)).count()
}

/// Count and total of one numeric field, with the per-value breakdown of another
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub total: f64,
    pub groups: BTreeMap<String, usize>,
}

impl Summary {
    pub fn compute<'a, T, I>(records: I, group_field: &str, sum_field: Option<&str>) -> Self
    where
        T: Record,
        I: IntoIterator<Item = &'a T>,
    {
        let records: Vec<&'a T> = records.into_iter().collect();
        let groups = count_by(records.iter().copied(), group_field);
        let total = sum_field
            .map(|field| sum(records.iter().copied(), field))
            .unwrap_or(0.0);

        Self {
            count: records.len(),
            total,
            groups,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::FilterEngine;
    use crate::models::{Client, Document};
    use crate::predicate::PredicateSet;
    use crate::samples;

    #[test]
    fn test_count_by_status_on_sample_documents() {
        let docs = samples::documents();
        let counts = count_by(&docs, "status");

        let expected: BTreeMap<String, usize> = [("pending", 2), ("processed", 2), ("reviewed", 2)]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        assert_eq!(counts, expected);
    }

    #[test]
    fn test_group_counts_sum_to_length() {
        let docs = samples::documents();
        for field in ["status", "category", "client_name", "no_such_field"] {
            let counts = count_by(&docs, field);
            assert_eq!(counts.values().sum::<usize>(), docs.len(), "field {}", field);
        }

        let counts = count_by(&docs, "no_such_field");
        assert_eq!(counts.get(MISSING), Some(&docs.len()));
    }

    #[test]
    fn test_sum_of_empty_collection_is_zero() {
        let none: Vec<Client> = Vec::new();
        assert_eq!(sum(&none, "monthly_fee"), 0.0);
        assert!(count_by(&none, "status").is_empty());
    }

    #[test]
    fn test_sum_ignores_non_numeric() {
        let clients = samples::clients();
        let expected: f64 = clients.iter().map(|c| c.monthly_fee).sum();
        assert!((sum(&clients, "monthly_fee") - expected).abs() < 1e-9);
        assert_eq!(sum(&clients, "status"), 0.0);
        assert_eq!(
            sum(&clients, "pending_documents"),
            clients.iter().map(|c| c.pending_documents).sum::<i64>() as f64
        );
    }

    #[test]
    fn test_aggregates_accept_filtered_views() {
        let docs = samples::documents();
        let engine = FilterEngine::new();
        let predicates = PredicateSet::new().with_equals("category", "irpf").unwrap();
        let view = engine.apply(&docs, &predicates);

        let counts = count_by(&view, "category");
        assert_eq!(counts.get("irpf"), Some(&2));
        assert_eq!(counts.len(), 1);

        let size: f64 = view.iter().map(|d| d.size_kb as f64).sum();
        assert_eq!(sum(&view, "size_kb"), size);
    }

    #[test]
    fn test_count_where_and_summary() {
        let docs: Vec<Document> = samples::documents();
        let pending = count_where(&docs, |d: &Document| d.status.as_str() == "pending");
        assert_eq!(pending, 2);

        let summary = Summary::compute(&docs, "category", Some("size_kb"));
        assert_eq!(summary.count, 6);
        assert_eq!(summary.groups.values().sum::<usize>(), 6);
        assert_eq!(summary.total, docs.iter().map(|d| d.size_kb as f64).sum::<f64>());

        let summary = Summary::compute(&docs, "status", None);
        assert_eq!(summary.total, 0.0);
    }
}
