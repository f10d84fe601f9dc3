// Composable filter criteria over catalog records

use crate::error::{CatalogError, CatalogResult};
use crate::record::{IndexValue, Record};
use std::collections::BTreeMap;

/// Selector value that disables a predicate
pub const ALL: &str = "all";

/// One filter dimension
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// Case-insensitive substring over the record's searchable labels
    Text(String),
    /// Exact match on a named field
    Equals { field: String, value: String },
}

impl Predicate {
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        match self {
            Predicate::Text(query) => text_matches(record, &query.to_lowercase()),
            Predicate::Equals { field, value } => field_equals(record, field, value),
        }
    }
}

impl std::fmt::Display for Predicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Predicate::Text(query) => write!(f, "text ~ {:?}", query),
            Predicate::Equals { field, value } => write!(f, "{} = {}", field, value),
        }
    }
}

fn text_matches<T: Record>(record: &T, needle: &str) -> bool {
    record.primary_text().to_lowercase().contains(needle)
        || record
            .search_labels()
            .iter()
            .any(|label| label.to_lowercase().contains(needle))
}

fn field_equals<T: Record>(record: &T, field: &str, wanted: &str) -> bool {
    record.field(field).is_some_and(|actual| value_equals(&actual, wanted))
}

/// Numeric fields compare by value, so `49`, `49.0` and `49.00` all match 49.0
fn value_equals(actual: &IndexValue, wanted: &str) -> bool {
    match actual {
        IndexValue::String(s) => s == wanted,
        IndexValue::Int(_) | IndexValue::Float(_) => match (actual.as_f64(), wanted.parse::<f64>()) {
            (Some(a), Ok(w)) => a == w,
            _ => false,
        },
        IndexValue::Bool(b) => wanted.parse::<bool>().is_ok_and(|w| w == *b),
    }
}

fn is_inactive(value: &str) -> bool {
    let value = value.trim();
    value.is_empty() || value == ALL
}

/// The active filter criteria for one list view
///
/// At most one text predicate and one equality predicate per field are held;
/// setting a dimension replaces its previous value. Records must satisfy every
/// active predicate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredicateSet {
    text: Option<String>,
    equals: BTreeMap<String, String>,
}

impl PredicateSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text query; `"all"` or blank clears it
    pub fn set_text(&mut self, value: &str) {
        if is_inactive(value) {
            self.text = None;
        } else {
            self.text = Some(value.trim().to_string());
        }
    }

    /// Replace the equality selector for `field`; `"all"` or blank clears it
    pub fn set_equals(&mut self, field: &str, value: &str) -> CatalogResult<()> {
        validate_field_name(field)?;

        if is_inactive(value) {
            self.equals.remove(field);
        } else {
            self.equals.insert(field.to_string(), value.trim().to_string());
        }
        Ok(())
    }

    /// Builder form of `set_text`
    pub fn with_text(mut self, value: &str) -> Self {
        self.set_text(value);
        self
    }

    /// Builder form of `set_equals`
    pub fn with_equals(mut self, field: &str, value: &str) -> CatalogResult<Self> {
        self.set_equals(field, value)?;
        Ok(self)
    }

    /// Install a predicate, replacing the one for the same dimension
    pub fn apply_predicate(&mut self, predicate: Predicate) -> CatalogResult<()> {
        match predicate {
            Predicate::Text(value) => {
                self.set_text(&value);
                Ok(())
            }
            Predicate::Equals { field, value } => self.set_equals(&field, &value),
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub fn equals(&self, field: &str) -> Option<&str> {
        self.equals.get(field).map(String::as_str)
    }

    /// Active predicates, text first, then equality selectors by field name
    pub fn predicates(&self) -> Vec<Predicate> {
        let mut out = Vec::with_capacity(self.equals.len() + 1);
        if let Some(text) = &self.text {
            out.push(Predicate::Text(text.clone()));
        }
        for (field, value) in &self.equals {
            out.push(Predicate::Equals {
                field: field.clone(),
                value: value.clone(),
            });
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.equals.is_empty()
    }

    pub fn clear(&mut self) {
        self.text = None;
        self.equals.clear();
    }

    /// Conjunction of all active predicates
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        if let Some(text) = &self.text {
            if !text_matches(record, &text.to_lowercase()) {
                return false;
            }
        }

        self.equals.iter().all(|(field, value)| field_equals(record, field, value))
    }
}

/// Parse a `field=value` selector as typed on the command line
pub fn parse_selector(raw: &str) -> CatalogResult<(String, String)> {
    let (field, value) = raw
        .split_once('=')
        .ok_or_else(|| CatalogError::invalid_field(raw, "expected field=value"))?;
    let field = field.trim();
    validate_field_name(field)?;
    Ok((field.to_string(), value.trim().to_string()))
}

pub(crate) fn validate_field_name(name: &str) -> CatalogResult<()> {
    if name.is_empty() {
        return Err(CatalogError::invalid_field(name, "field name cannot be empty"));
    }
    if name.len() > 64 {
        return Err(CatalogError::invalid_field(name, "field name too long (max 64 chars)"));
    }
    if !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(CatalogError::invalid_field(name, "must be alphanumeric with _"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Client, Document};
    use crate::samples;

    fn client_named(name: &str) -> Client {
        let mut client = samples::clients().remove(0);
        client.name = name.to_string();
        client
    }

    #[test]
    fn test_empty_set_matches_everything() {
        let set = PredicateSet::new();
        assert!(set.is_empty());
        assert!(samples::documents().iter().all(|d| set.matches(d)));
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let set = PredicateSet::new().with_text("ANA");
        assert!(set.matches(&client_named("Ana Martín Sánchez")));
        assert!(!set.matches(&client_named("Pedro López")));

        // Unicode lowercasing applies to accented letters too
        let set = PredicateSet::new().with_text("MARTÍN");
        assert!(set.matches(&client_named("Ana Martín Sánchez")));
    }

    #[test]
    fn test_text_matches_secondary_labels() {
        let docs: Vec<Document> = samples::documents();
        let owner = docs[0].client_name.clone();
        let set = PredicateSet::new().with_text(&owner);
        assert!(set.matches(&docs[0]));
    }

    #[test]
    fn test_all_and_blank_clear_predicates() {
        let mut set = PredicateSet::new().with_text("ana").with_equals("status", "pending").unwrap();
        assert_eq!(set.predicates().len(), 2);

        set.set_text("   ");
        set.set_equals("status", "all").unwrap();
        assert!(set.is_empty());

        set.set_equals("status", "").unwrap();
        assert!(set.is_empty());
    }

    #[test]
    fn test_equals_replaces_previous_value() {
        let mut set = PredicateSet::new();
        set.set_equals("status", "pending").unwrap();
        set.set_equals("status", "reviewed").unwrap();
        assert_eq!(set.equals("status"), Some("reviewed"));
        assert_eq!(
            set.predicates(),
            vec![Predicate::Equals {
                field: "status".to_string(),
                value: "reviewed".to_string()
            }]
        );
    }

    #[test]
    fn test_equals_requires_field_present() {
        let set = PredicateSet::new().with_equals("colour", "red").unwrap();
        assert!(!samples::documents().iter().any(|d| set.matches(d)));
    }

    #[test]
    fn test_conjunction() {
        let docs = samples::documents();
        let set = PredicateSet::new()
            .with_equals("category", "irpf")
            .unwrap()
            .with_equals("status", "pending")
            .unwrap();

        for doc in &docs {
            let expected = doc.category.as_str() == "irpf" && doc.status.as_str() == "pending";
            assert_eq!(set.matches(doc), expected);
        }
    }

    #[test]
    fn test_predicate_matches_agrees_with_set() {
        let docs = samples::documents();
        let predicate = Predicate::Equals {
            field: "category".to_string(),
            value: "iva".to_string(),
        };
        let mut set = PredicateSet::new();
        set.apply_predicate(predicate.clone()).unwrap();

        for doc in &docs {
            assert_eq!(predicate.matches(doc), set.matches(doc));
        }
    }

    #[test]
    fn test_invalid_field_names() {
        let mut set = PredicateSet::new();
        assert!(set.set_equals("", "x").is_err());
        assert!(set.set_equals("bad-field", "x").is_err());
        assert!(set.set_equals(&"a".repeat(65), "x").is_err());
        assert!(set.is_empty());
    }

    #[test]
    fn test_parse_selector() {
        assert_eq!(
            parse_selector("status=pending").unwrap(),
            ("status".to_string(), "pending".to_string())
        );
        assert!(parse_selector("status").is_err());
        assert!(parse_selector("st atus=x").is_err());
    }

    #[test]
    fn test_equals_value_is_trimmed() {
        let docs = samples::documents();
        let set = PredicateSet::new()
            .with_text("ana")
            .with_equals("status", " pending ")
            .unwrap();

        assert_eq!(set.equals("status"), Some("pending"));
        assert!(set.matches(&docs[0]));
    }

    #[test]
    fn test_numeric_fields_compare_by_value() {
        let services = samples::services();
        let price = services[0].price;
        let mut set = PredicateSet::new();

        for typed in [format!("{}", price), format!("{:.1}", price), format!("{:.2}", price)] {
            set.set_equals("price", &typed).unwrap();
            assert!(set.matches(&services[0]), "{} should match {}", typed, price);
        }

        set.set_equals("price", "not a number").unwrap();
        assert!(!set.matches(&services[0]));
    }

    #[test]
    fn test_bool_fields_compare_by_value() {
        let services = samples::services();
        let featured = services.iter().find(|s| s.featured).unwrap();
        let set = PredicateSet::new().with_equals("featured", "true").unwrap();
        assert!(set.matches(featured));
        assert!(services.iter().filter(|s| set.matches(*s)).all(|s| s.featured));
    }
}
