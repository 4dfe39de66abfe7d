pub mod client;
pub mod collect;
pub mod error;
pub mod normalize;
pub mod response;

pub use client::{PageClient, PageClientSettings};
pub use collect::{
    collect_records, CollectOptions, Collection, CollectionOutcome, PageRequest, PageSource,
    StopReason,
};
pub use error::{RecordError, ScraperError};
pub use normalize::parse_record;
pub use response::{extract_record_list, records_from_payload};
