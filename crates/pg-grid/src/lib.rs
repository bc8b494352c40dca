//! Progressive probe grid for cheap feature search.
//!
//! A [`ScanGrid`] enumerates candidate pixel locations inside a [`Region`]
//! without touching pixel data. It starts with one large "+"-shaped cross
//! centered over the region and, once the whole domain is tiled at the current
//! resolution, halves the cross span and tiles again with four times as many
//! crosses. The search ends when the span drops below the minimum feature size
//! derived from [`ScanConfig`].
//!
//! Grid-local policy:
//! - The grid works in a square domain `[0, max_extent]^2` where `max_extent`
//!   is the smallest value of `1, 3, 7, 15, ...` covering the region's larger
//!   span.
//! - That square is centered over the region; samples landing outside the
//!   region are reported as [`LocStatus::Bad`] by [`ScanGrid::next_coordinate`]
//!   and skipped by [`ScanGrid::pop_location`].
//! - Within a cross, arm samples come first and the shared center last.
//!
//! [`Region`]: pg_core::Region

mod config;
mod grid;
mod level;
mod span;

pub use config::ScanConfig;
pub use grid::{GridSample, LocStatus, ScanGrid};
pub use level::LevelInfo;
pub use span::{is_span_value, next_span, span_sequence};
