//! Selected-aircraft detail: flight history lookup and its cache.
//!
//! [`DetailFetcher::resolve_detail`] consults the [`DetailCache`] first and
//! only reaches the API on a miss. The controller splits the two halves:
//! it calls [`DetailFetcher::cached`] synchronously and runs
//! [`fetch_latest_flight`] as a cancellable future, feeding the outcome back
//! through [`DetailFetcher::apply`].

mod cache;
mod fetcher;

pub use cache::{DetailCache, DetailCacheStats, DEFAULT_DETAIL_CACHE_CAPACITY};
pub use fetcher::{fetch_latest_flight, DetailFetcher};
