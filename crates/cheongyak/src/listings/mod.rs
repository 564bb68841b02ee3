//! Listing search filters and their query-string form.

pub mod catalog;
pub mod codec;
mod filter;

pub use codec::{api_query, decode, encode, encode_submission};
pub use filter::{
    AmountRange, FilterSelection, ListingStatus, SizeBand, Sort, SortDirection, SortKey,
};
