//! Catalog query state: named lists, genres, the detail view and the
//! user's movie collections.

mod reducer;
mod state;

/// Message recorded when a search query is blank.
pub const EMPTY_QUERY_MESSAGE: &str = "Search query cannot be empty";

/// Message recorded when a later search page is requested for another query.
pub const QUERY_MISMATCH_MESSAGE: &str = "Search query changed; load page 1 first";

pub use reducer::{CatalogEvent, reduce};
pub use state::{
    CatalogState, CollectionKind, CollectionState, DetailsState, FiltersPatch, GenresState,
    ListKind, ListRequest, MovieSet, QueryState, Slot,
};
