pub mod aggregate;
pub mod client;
pub mod dedup;
pub mod error;
pub mod locate;
pub mod normalize;
pub mod page;
pub mod pagination;
pub mod resolve;

pub use aggregate::{aggregate, RunEnd, RunOptions, RunReport};
pub use client::{ListingClient, PageSource, ProbeReport};
pub use dedup::dedup_listings;
pub use error::ScraperError;
pub use locate::{locate_structured_data, Attempt, ExtractionOutcome, LocatedDocument, Strategy};
pub use normalize::normalize_record;
pub use page::{parse_listing_page, PageResult};
pub use pagination::{Paginator, Step, StopReason};
pub use resolve::resolve_items;
