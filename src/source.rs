// Record sources feeding a store's load operation

use crate::error::SourceError;
use crate::record::Record;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Asynchronous producer of a full record collection
#[async_trait]
pub trait RecordSource<T: Record>: Send + Sync {
    /// Fetch every record the source currently holds
    async fn fetch(&self) -> Result<Vec<T>, SourceError>;

    /// Short human readable name for logs
    fn describe(&self) -> String;
}

/// Fixed in-memory dataset, optionally delayed to mimic a network round trip
#[derive(Debug, Clone)]
pub struct StaticSource<T> {
    records: Vec<T>,
    latency: Duration,
}

impl<T: Record> StaticSource<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            latency: Duration::ZERO,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl<T: Record> RecordSource<T> for StaticSource<T> {
    async fn fetch(&self) -> Result<Vec<T>, SourceError> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        debug!(
            collection = T::collection_name(),
            count = self.records.len(),
            latency_ms = self.latency.as_millis() as u64,
            "fetch: static records served"
        );
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("static:{}", T::collection_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Task;
    use crate::samples;

    #[tokio::test(start_paused = true)]
    async fn test_static_source_waits_for_latency() {
        let source = StaticSource::new(samples::tasks()).with_latency(Duration::from_millis(800));

        let start = tokio::time::Instant::now();
        let records: Vec<Task> = source.fetch().await.unwrap();
        assert_eq!(records.len(), 6);
        assert!(start.elapsed() >= Duration::from_millis(800));
        assert_eq!(source.describe(), "static:tasks");
    }

    #[tokio::test]
    async fn test_static_source_returns_copies() {
        let source = StaticSource::new(samples::clients());
        let mut first = source.fetch().await.unwrap();
        first.clear();

        let second = source.fetch().await.unwrap();
        assert_eq!(second.len(), 5);
    }
}
