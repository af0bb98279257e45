pub mod catalog;
pub mod collections;

pub use catalog::{CatalogService, GameDetail, GameInput};
pub use collections::{CollectionDetail, CollectionInput, CollectionService};
