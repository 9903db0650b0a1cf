//! Remote track catalog: record types, the HTTP client and the background
//! loader that sequences requests.
//!
//! Every successful fetch yields a complete snapshot; callers replace their
//! list wholesale and never merge.

mod client;
mod error;
mod loader;
mod model;

pub use client::*;
pub use error::*;
pub use loader::*;
pub use model::*;
