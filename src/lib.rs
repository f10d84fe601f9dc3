// CatalogStore - In-memory catalog filtering, aggregation and cart state

pub mod aggregate;
pub mod cart;
pub mod config;
pub mod debounce;
pub mod error;
pub mod filter;
pub mod jsonl;
pub mod loader;
pub mod models;
pub mod predicate;
pub mod record;
pub mod samples;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use cart::{Cart, CartItem};
pub use config::Config;
pub use debounce::{Debouncer, FilterInput};
pub use error::{CatalogError, CatalogResult, SourceError};
pub use filter::{FilterEngine, FilteredView, SortRule};
pub use jsonl::JsonlSource;
pub use loader::{LoadOutcome, SharedStore};
pub use predicate::{Predicate, PredicateSet};
pub use record::{IndexValue, Record};
pub use source::{RecordSource, StaticSource};
pub use store::Store;
