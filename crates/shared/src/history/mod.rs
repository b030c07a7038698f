pub mod epoch;
pub mod extract;
pub mod location;

pub use extract::{
    HistoryError, HistoryQuerySpec, HistoryRecord, NO_MATCHING_HISTORY_MESSAGE, fetch_history,
    format_history,
};
pub use location::{HistoryStoreLocation, StoreKind, resolve_store_location};
