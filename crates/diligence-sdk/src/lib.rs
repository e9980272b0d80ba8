//! Diligence Rust SDK
//!
//! Client library for the Diligence lookup server: per-source lookups, the
//! four-way search fan-out, result normalization and the consolidated
//! opinion request.
//!
//! # Example
//!
//! ```no_run
//! use diligence_domain::Identifier;
//! use diligence_sdk::DiligenceClient;
//!
//! # async fn run() -> Result<(), diligence_sdk::SdkError> {
//! let client = DiligenceClient::new("http://localhost:3000")?;
//! let identifier = Identifier::parse("11.222.333/0001-81")?;
//!
//! let results = client.search(&identifier).await;
//! for entry in results.entries() {
//!     println!("{}: listed = {}", entry.source(), entry.is_listed());
//! }
//!
//! let opinion = client.request_opinion(&results).await;
//! println!("{}", opinion);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod client;
mod error;
mod results;
mod state;

pub use client::{DiligenceClient, ServerHealth, DEFAULT_TIMEOUT_SECS, OPINION_FAILURE};
pub use error::SdkError;
pub use results::{DisplayEntry, SearchResults, SourceOutcome, NOT_LISTED_MESSAGE};
pub use state::SearchState;
