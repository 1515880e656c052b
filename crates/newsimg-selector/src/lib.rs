//! Image selection for news stories.
//!
//! [`Selector::resolve`] turns a story title into a cached, attributed image:
//! cache lookup, keyword search, ranking, download, rendition, and a single
//! insert into the store.

pub mod error;
pub mod rendition;
pub mod selector;

pub use error::SelectorError;
pub use rendition::{fit_within, Rendition};
pub use selector::{short_title, Resolution, Selector, SelectorConfig};
