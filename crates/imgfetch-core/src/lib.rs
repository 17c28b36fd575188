pub mod config;
pub mod logging;

pub mod fetcher;
pub mod report;
pub mod url_model;

pub use fetcher::{FetchError, FetchErrorKind, Fetched, Fetcher};
