//! Foundational primitives for progressive probe grids.
//!
//! ## Coordinates
//! All coordinates are integer image coordinates (`i32`). Integer values
//! address pixel centers; `x` grows to the right and `y` grows with the row
//! index.
//!
//! ## Regions
//! A [`Region`] is an inclusive rectangle `[x_min, x_max] x [y_min, y_max]`.
//! The span along an axis is `max - min`, so a `w x h` image has spans
//! `(w - 1, h - 1)`.

mod error;
mod geom;

pub use error::Error;
pub use geom::{PixelLoc, Region};
