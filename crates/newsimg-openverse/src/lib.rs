//! Client for the Openverse image search API.
//!
//! Search results are normalized into [`newsimg_core::ImageCandidate`]s;
//! asset downloads return the raw response bytes.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{OpenverseClient, ALLOWED_LICENSES};
pub use error::OpenverseError;
pub use normalize::normalize_result;
