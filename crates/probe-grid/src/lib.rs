//! Umbrella crate for the `probe-grid` workspace.
//!
//! Re-exports the geometry primitives and the progressive scan grid.

pub use pg_core::*;
pub use pg_grid::*;
