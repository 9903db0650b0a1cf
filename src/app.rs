//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the loaded catalog
//! snapshot, the search filter, facet panels and navigation state.

mod facets;
mod model;

pub use facets::Facets;
pub use model::*;
