// In-memory record store for one entity type

use crate::error::{CatalogError, CatalogResult};
use crate::filter::{FilterEngine, FilteredView};
use crate::predicate::PredicateSet;
use crate::record::{IndexValue, Record};
use crate::source::RecordSource;
use std::collections::HashSet;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Authoritative, insertion-ordered collection of records for one session
///
/// Every mutation either succeeds completely or leaves the collection exactly
/// as it was.
#[derive(Debug, Clone)]
pub struct Store<T: Record> {
    records: Vec<T>,
}

impl<T: Record> Default for Store<T> {
    fn default() -> Self {
        Self { records: Vec::new() }
    }
}

impl<T: Record> Store<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`, rejecting duplicate or blank ids
    pub fn from_records(records: Vec<T>) -> CatalogResult<Self> {
        Self::validate_batch(&records)?;
        Ok(Self { records })
    }

    pub fn collection(&self) -> &'static str {
        T::collection_name()
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.records.iter().map(|r| r.id()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// Filter this store's records
    pub fn view<'a>(&'a self, engine: &FilterEngine<T>, predicates: &PredicateSet) -> FilteredView<'a, T> {
        engine.apply(&self.records, predicates)
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a record keeping its id
    pub fn append(&mut self, record: T) -> CatalogResult<()> {
        let id = record.id().to_string();
        Self::validate_id(&id)?;

        if self.contains(&id) {
            return Err(CatalogError::DuplicateId {
                collection: T::collection_name(),
                id,
            });
        }

        debug!(collection = T::collection_name(), id = %id, "append: record added");
        self.records.push(record);
        Ok(())
    }

    /// Append a record under a freshly generated id and return that id
    pub fn create(&mut self, mut record: T) -> CatalogResult<String> {
        let id = Uuid::now_v7().to_string();
        record.set_id(id.clone());
        self.append(record)?;
        Ok(id)
    }

    /// Replace one field of the record with `id`
    pub fn update_field(&mut self, id: &str, field: &str, value: impl Into<IndexValue>) -> CatalogResult<()> {
        let value = value.into();
        let index = self.position(id).ok_or_else(|| self.not_found(id))?;

        // Work on a copy so a rejected value cannot leave a half-updated record
        let mut updated = self.records[index].clone();
        updated.set_field(field, &value)?;
        self.records[index] = updated;

        debug!(
            collection = T::collection_name(),
            id,
            field,
            value = %value,
            "update_field: record updated"
        );
        Ok(())
    }

    /// Remove and return the record with `id`
    pub fn remove(&mut self, id: &str) -> CatalogResult<T> {
        let index = self.position(id).ok_or_else(|| self.not_found(id))?;
        let record = self.records.remove(index);

        debug!(collection = T::collection_name(), id, "remove: record removed");
        Ok(record)
    }

    /// Swap in a whole new collection, keeping the current one if `records` is invalid
    pub fn replace_all(&mut self, records: Vec<T>) -> CatalogResult<()> {
        Self::validate_batch(&records)?;
        info!(
            collection = T::collection_name(),
            previous = self.records.len(),
            count = records.len(),
            "replace_all: store replaced"
        );
        self.records = records;
        Ok(())
    }

    // ========================================================================
    // Loading
    // ========================================================================

    /// Fetch records from `source` and replace the store with them
    ///
    /// On failure the previous records stay in place and the error is returned.
    pub async fn load<S>(&mut self, source: &S) -> CatalogResult<usize>
    where
        S: RecordSource<T> + ?Sized,
    {
        let records = match source.fetch().await {
            Ok(records) => records,
            Err(e) => {
                warn!(
                    collection = T::collection_name(),
                    source = %source.describe(),
                    error = %e,
                    "load: fetch failed, keeping previous records"
                );
                return Err(CatalogError::LoadFailed {
                    collection: T::collection_name(),
                    source: e,
                });
            }
        };

        let count = records.len();
        self.replace_all(records)?;
        Ok(count)
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn position(&self, id: &str) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn not_found(&self, id: &str) -> CatalogError {
        CatalogError::NotFound {
            collection: T::collection_name(),
            id: id.to_string(),
        }
    }

    fn validate_batch(records: &[T]) -> CatalogResult<()> {
        let mut seen = HashSet::with_capacity(records.len());
        for record in records {
            Self::validate_id(record.id())?;
            if !seen.insert(record.id()) {
                return Err(CatalogError::DuplicateId {
                    collection: T::collection_name(),
                    id: record.id().to_string(),
                });
            }
        }
        Ok(())
    }

    /// Validate record ID
    fn validate_id(id: &str) -> CatalogResult<()> {
        // Check not empty or whitespace-only
        if id.trim().is_empty() {
            return Err(CatalogError::invalid_field("id", "cannot be empty or whitespace-only"));
        }

        if id.len() > 256 {
            return Err(CatalogError::invalid_field(
                "id",
                format!("too long: {} chars (max 256)", id.len()),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SourceError;
    use crate::models::{Client, Document, DocumentStatus};
    use crate::samples;
    use crate::source::StaticSource;

    fn document_store() -> Store<Document> {
        Store::from_records(samples::documents()).unwrap()
    }

    fn new_document(id: &str) -> Document {
        let mut doc = samples::documents().remove(0);
        doc.id = id.to_string();
        doc.name = "Justificante bancario".to_string();
        doc
    }

    struct FailingSource;

    #[async_trait::async_trait]
    impl RecordSource<Document> for FailingSource {
        async fn fetch(&self) -> Result<Vec<Document>, SourceError> {
            Err(SourceError::Unavailable("service down".to_string()))
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    #[test]
    fn test_from_records_rejects_duplicates() {
        let mut docs = samples::documents();
        docs.push(docs[0].clone());

        let err = Store::from_records(docs).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { ref id, .. } if id == "1"));
    }

    #[test]
    fn test_append_then_remove_restores_length() {
        let mut store = document_store();
        let before = store.len();

        store.append(new_document("7")).unwrap();
        assert_eq!(store.len(), before + 1);
        assert_eq!(store.ids().iter().filter(|id| **id == "7").count(), 1);

        let removed = store.remove("7").unwrap();
        assert_eq!(removed.id, "7");
        assert_eq!(store.len(), before);
    }

    #[test]
    fn test_append_duplicate_is_rejected() {
        let mut store = document_store();
        let before = store.records().to_vec();

        let err = store.append(new_document("3")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_append_blank_id_is_rejected() {
        let mut store = document_store();
        assert!(store.append(new_document("   ")).is_err());
        assert!(store.append(new_document(&"x".repeat(257))).is_err());
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_create_assigns_fresh_ids() {
        let mut store: Store<Document> = Store::new();
        let a = store.create(new_document("ignored")).unwrap();
        let b = store.create(new_document("ignored")).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
        assert!(store.get(&a).is_some());
        assert!(!store.contains("ignored"));
    }

    #[test]
    fn test_update_field() {
        let mut store = document_store();
        store.update_field("1", "status", "archived").unwrap();
        assert_eq!(store.get("1").unwrap().status, DocumentStatus::Archived);
    }

    #[test]
    fn test_update_missing_id_is_not_found() {
        let mut store = document_store();
        let before = store.records().to_vec();

        let err = store.update_field("nonexistent-id", "status", "archived").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_update_bad_value_leaves_record() {
        let mut store = document_store();
        let before = store.records().to_vec();

        assert!(store.update_field("1", "status", "shredded").is_err());
        assert!(store.update_field("1", "no_field", "x").is_err());
        assert_eq!(store.records(), before.as_slice());
    }

    #[test]
    fn test_remove_missing_id() {
        let mut store = document_store();
        assert!(matches!(store.remove("99"), Err(CatalogError::NotFound { .. })));
        assert_eq!(store.len(), 6);
    }

    #[test]
    fn test_removed_record_never_in_view() {
        let mut store = document_store();
        store.remove("5").unwrap();

        let engine = FilterEngine::new();
        for predicates in [
            PredicateSet::new(),
            PredicateSet::new().with_equals("category", "irpf").unwrap(),
            PredicateSet::new().with_text("certificado"),
        ] {
            assert!(!store.view(&engine, &predicates).contains_id("5"));
        }
    }

    #[test]
    fn test_view_on_clients() {
        let store = Store::from_records(samples::clients()).unwrap();
        let engine = FilterEngine::new();
        let view = store.view(&engine, &PredicateSet::new().with_text("ana"));

        assert_eq!(view.len(), 1);
        let client: &Client = view.get(0).unwrap();
        assert_eq!(client.name, "Ana Martín Sánchez");
    }

    #[tokio::test]
    async fn test_load_replaces_store() {
        let mut store = document_store();
        let source = StaticSource::new(samples::documents().into_iter().take(2).collect());

        let count = store.load(&source).await.unwrap();
        assert_eq!(count, 2);
        assert_eq!(store.ids(), vec!["1", "2"]);
    }

    #[tokio::test]
    async fn test_failed_load_keeps_previous_records() {
        let mut store = document_store();
        let before = store.records().to_vec();

        let err = store.load(&FailingSource).await.unwrap_err();
        assert!(matches!(err, CatalogError::LoadFailed { .. }));
        assert_eq!(store.records(), before.as_slice());
    }

    #[tokio::test]
    async fn test_load_with_duplicates_keeps_previous_records() {
        let mut store = document_store();
        let mut docs = samples::documents();
        docs.push(docs[1].clone());

        let err = store.load(&StaticSource::new(docs)).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { .. }));
        assert_eq!(store.len(), 6);
    }
}
