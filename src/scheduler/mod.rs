//! Background schedulers

mod listing_refresh;

pub use listing_refresh::ListingRefreshScheduler;
