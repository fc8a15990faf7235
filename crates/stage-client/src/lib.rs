//! Client for the recipe pipeline's collaborator services.
//!
//! Every stage of the pipeline is a JSON-over-HTTP call to a separate
//! service. This crate handles:
//! - Where each collaborator lives and how long it may take (`stage`)
//! - The request/response bodies each collaborator speaks (`contracts`)
//! - Issuing a call and normalizing its outcome (`client`)
//! - Classifying failures as transport, timeout, status or decode errors (`error`)

pub mod calls;
pub mod client;
pub mod contracts;
pub mod error;
pub mod stage;

pub use client::{RetryPolicy, StageClient};
pub use contracts::{ExtractedRecipe, HtmlPage, SearchResult};
pub use error::{Result, StageError};
pub use stage::{Stage, StageEndpoint, StageEndpoints};
