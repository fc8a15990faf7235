//! Building blocks for one run of the recipe pipeline.
//!
//! This crate provides:
//! - `ItemOutcome` and `Partition` for per-item keep/drop results
//! - `fan_out` for issuing one call per item with bounded concurrency
//! - `dedup_by_key` for order-preserving deduplication
//!
//! ## Example Usage
//! ```ignore
//! use pipeline::{fan_out_partitioned, ItemOutcome};
//!
//! let pages = fan_out_partitioned(urls, 8, |url| async move {
//!     match client.fetch_html(&url).await {
//!         Ok(Some(page)) => ItemOutcome::Kept(page),
//!         Ok(None) => ItemOutcome::dropped(url, "no page returned"),
//!         Err(e) => ItemOutcome::dropped(url, e),
//!     }
//! })
//! .await;
//! pages.log_dropped("html_fetch");
//! ```

pub mod dedup;
pub mod fan_out;
pub mod outcome;

pub use dedup::dedup_by_key;
pub use fan_out::{fan_out, fan_out_partitioned};
pub use outcome::{Dropped, ItemOutcome, Partition};
