//! Content-generation boundary for Atlas.
//!
//! Exposes the [`GenerationClient`] seam the request lifecycle awaits, and
//! the Google Gemini implementation behind it. The remote call is treated as
//! opaque: one attempt, no in-process retry, any error surfaces as a
//! [`GenerationError`] for the caller to convert into a user-facing message.

mod google;
mod types;

pub use google::{GoogleClient, GoogleConfig};
pub use types::{GenerationClient, GenerationError};
