pub mod catalog;
pub mod category;
pub mod config;
pub mod date;
pub mod fuzzy;
pub mod pipeline;
pub mod store;

pub use catalog::{CatalogError, ProductCatalog};
pub use category::{CategoryLookup, CategoryResolver, LookupError, RemoteMatch, DEFAULT_CATEGORY};
pub use config::{NormalizeConfig, DEFAULT_RETAILER, DEFAULT_THRESHOLD};
pub use date::resolve_date;
pub use fuzzy::{best_match, FuzzyMatch};
pub use pipeline::ReceiptNormalizer;
pub use store::normalize_store;
