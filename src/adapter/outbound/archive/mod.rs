//! On-disk archive of scraped company records.

mod json;

pub use json::JsonCompanyStore;
