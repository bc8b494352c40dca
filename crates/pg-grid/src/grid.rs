use pg_core::{Error, PixelLoc, Region};

use crate::config::ScanConfig;
use crate::level::LevelInfo;
use crate::span::next_span;

/// Classification of one raw grid sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocStatus {
    /// Inside the search region.
    Good,
    /// Outside the search region. Only [`ScanGrid::next_coordinate`] reports it.
    Bad,
    /// Every level down to the minimum feature size has been visited.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridSample {
    pub status: LocStatus,
    pub loc: PixelLoc,
}

impl GridSample {
    const END: GridSample = GridSample {
        status: LocStatus::End,
        loc: PixelLoc::NONE,
    };
}

/// Progressive cross-pattern search state for one region.
///
/// Arithmetic is carried out in `i64` grid-local coordinates so that regions
/// anywhere in the `i32` plane are handled without overflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanGrid {
    region: Region,
    min_extent: i64,
    max_extent: i64,
    x_offset: i64,
    y_offset: i64,
    total: u64,

    // Per-level state, rebuilt by `derive_level`.
    extent: i64,
    jump_size: i64,
    pixel_total: i64,
    start_pos: i64,
    pixel_count: i64,
    x_center: i64,
    y_center: i64,
}

impl ScanGrid {
    /// Builds the grid for `region`.
    ///
    /// Fails with [`Error::InvalidRegion`] unless at least one axis spans more
    /// than one pixel step, and with [`Error::InvalidScale`] when
    /// `cfg.scale == 0`.
    pub fn new(region: Region, cfg: &ScanConfig) -> Result<Self, Error> {
        let smallest_feature = cfg.smallest_feature()?;

        let max_span = region.max_span();
        if max_span <= 1 {
            return Err(Error::InvalidRegion {
                x_span: region.x_span(),
                y_span: region.y_span(),
            });
        }

        let mut min_extent = 0;
        let mut extent = 1;
        while extent < max_span {
            if extent <= smallest_feature {
                min_extent = extent;
            }
            extent = next_span(extent);
        }
        let max_extent = extent;

        let x_offset = (i64::from(region.x_min) + i64::from(region.x_max) - max_extent) / 2;
        let y_offset = (i64::from(region.y_min) + i64::from(region.y_max) - max_extent) / 2;

        tracing::debug!(
            ?region,
            smallest_feature,
            min_extent,
            max_extent,
            x_offset,
            y_offset,
            "scan grid initialized"
        );

        let mut grid = Self {
            region,
            min_extent,
            max_extent,
            x_offset,
            y_offset,
            total: 1,
            extent: max_extent,
            jump_size: 0,
            pixel_total: 0,
            start_pos: 0,
            pixel_count: 0,
            x_center: 0,
            y_center: 0,
        };
        grid.derive_level();
        Ok(grid)
    }

    /// Rewinds to the first sample of the coarsest level.
    pub fn restart(&mut self) {
        self.total = 1;
        self.extent = self.max_extent;
        self.derive_level();
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Smallest cross span that will still be visited (0 means down to
    /// single-point crosses).
    pub fn min_extent(&self) -> i64 {
        self.min_extent
    }

    /// Side of the grid-local square domain; constant for the grid lifetime.
    pub fn max_extent(&self) -> i64 {
        self.max_extent
    }

    /// Translation from grid-local to image coordinates.
    pub fn offset(&self) -> (i64, i64) {
        (self.x_offset, self.y_offset)
    }

    /// Cross half-span of the level currently being visited.
    pub fn extent(&self) -> i64 {
        self.extent
    }

    /// Refinements applied so far; 0 while visiting the coarsest level.
    pub fn level_index(&self) -> usize {
        let mut extent = self.max_extent;
        let mut level = 0;
        while extent > self.extent {
            extent /= 2;
            level += 1;
        }
        level
    }

    /// Progress counter, quadrupled on every refinement.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_terminated(&self) -> bool {
        self.extent == 0 || self.extent < self.min_extent
    }

    /// Every level a fresh grid visits, coarsest first.
    pub fn levels(&self) -> Vec<LevelInfo> {
        let mut levels = Vec::new();
        let mut extent = self.max_extent;
        while extent != 0 && extent >= self.min_extent {
            levels.push(LevelInfo::new(extent, self.max_extent));
            extent /= 2;
        }
        levels
    }

    /// Number of [`next_coordinate`](Self::next_coordinate) calls a fresh grid
    /// answers before the first [`LocStatus::End`].
    pub fn sample_budget(&self) -> u64 {
        self.levels()
            .iter()
            .fold(0u64, |acc, l| acc.saturating_add(l.num_samples()))
    }

    /// Produces the next raw sample, in or out of the region, and advances.
    pub fn next_coordinate(&mut self) -> GridSample {
        if self.is_terminated() {
            return GridSample::END;
        }

        if self.pixel_count >= self.pixel_total {
            self.pixel_count = 0;
            self.x_center += self.jump_size;
        }

        if self.x_center > self.max_extent {
            self.x_center = self.start_pos;
            self.y_center += self.jump_size;
        }

        if self.y_center > self.max_extent {
            self.refine();
        }

        if self.is_terminated() {
            return GridSample::END;
        }

        let (x, y) = self.cross_sample();
        let x = x + self.x_offset;
        let y = y + self.y_offset;

        let status = if self.region.contains_i64(x, y) {
            LocStatus::Good
        } else {
            LocStatus::Bad
        };

        // Sequencing contract: the index moves only after the sample is taken.
        self.pixel_count += 1;

        GridSample {
            status,
            loc: PixelLoc::new(saturate_i32(x), saturate_i32(y)),
        }
    }

    /// Returns the next in-region sample, or [`LocStatus::End`] once exhausted.
    pub fn pop_location(&mut self) -> GridSample {
        loop {
            let sample = self.next_coordinate();
            if sample.status != LocStatus::Bad {
                return sample;
            }
        }
    }

    fn refine(&mut self) {
        self.total = self.total.saturating_mul(4);
        self.extent /= 2;
        self.derive_level();

        if self.is_terminated() {
            tracing::debug!(
                min_extent = self.min_extent,
                total = self.total,
                "scan grid exhausted"
            );
        } else {
            tracing::trace!(extent = self.extent, total = self.total, "refined level");
        }
    }

    fn derive_level(&mut self) {
        self.jump_size = self.extent + 1;
        self.pixel_total = 2 * self.extent - 1;
        self.start_pos = self.extent / 2;
        self.pixel_count = 0;
        self.x_center = self.start_pos;
        self.y_center = self.start_pos;
    }

    /// Grid-local position of sample `pixel_count` within the current cross.
    ///
    /// Each arm visits offsets `-quarter..0` ascending, then `half - quarter..1`
    /// descending; the shared center comes last.
    fn cross_sample(&self) -> (i64, i64) {
        let count = self.pixel_count;
        if count == self.pixel_total - 1 {
            return (self.x_center, self.y_center);
        }

        let half = self.pixel_total / 2;
        let quarter = half / 2;
        let arm_offset = |c: i64| if c < quarter { c - quarter } else { half - c };

        if count < half {
            (self.x_center + arm_offset(count), self.y_center)
        } else {
            (self.x_center, self.y_center + arm_offset(count - half))
        }
    }
}

impl Iterator for ScanGrid {
    type Item = PixelLoc;

    fn next(&mut self) -> Option<Self::Item> {
        match self.pop_location() {
            GridSample {
                status: LocStatus::Good,
                loc,
            } => Some(loc),
            _ => None,
        }
    }
}

impl core::iter::FusedIterator for ScanGrid {}

fn saturate_i32(v: i64) -> i32 {
    v.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use pg_core::{Error, PixelLoc, Region};

    use super::{GridSample, LocStatus, ScanGrid};
    use crate::ScanConfig;

    fn unit_gap() -> ScanConfig {
        ScanConfig {
            scale: 1,
            min_gap: 1,
        }
    }

    fn drain_good(grid: &mut ScanGrid) -> Vec<(i32, i32)> {
        let mut out = Vec::new();
        loop {
            let s = grid.pop_location();
            match s.status {
                LocStatus::Good => out.push((s.loc.x, s.loc.y)),
                LocStatus::End => return out,
                LocStatus::Bad => panic!("pop_location must never surface Bad"),
            }
        }
    }

    #[test]
    fn construction_4x4() {
        let grid = ScanGrid::new(Region::new(0, 3, 0, 3), &unit_gap()).expect("valid region");
        assert_eq!(grid.max_extent(), 3);
        assert_eq!(grid.min_extent(), 1);
        assert_eq!(grid.offset(), (0, 0));
        assert_eq!(grid.extent(), 3);
        assert_eq!(grid.total(), 1);
        assert!(!grid.is_terminated());
    }

    #[test]
    fn pop_sequence_4x4() {
        let mut grid = ScanGrid::new(Region::new(0, 3, 0, 3), &unit_gap()).expect("valid region");
        let seq = drain_good(&mut grid);
        assert_eq!(
            seq,
            vec![
                (0, 1),
                (2, 1),
                (1, 0),
                (1, 2),
                (1, 1),
                (0, 0),
                (2, 0),
                (0, 2),
                (2, 2),
            ]
        );
        assert_eq!(grid.total(), 16);
        assert!(grid.is_terminated());
    }

    #[test]
    fn end_is_absorbing() {
        let mut grid = ScanGrid::new(Region::new(0, 3, 0, 3), &unit_gap()).expect("valid region");
        let _ = drain_good(&mut grid);
        for _ in 0..5 {
            let s = grid.next_coordinate();
            assert_eq!(s.status, LocStatus::End);
            assert_eq!(s.loc, PixelLoc::NONE);
        }
        assert_eq!(grid.pop_location().status, LocStatus::End);
        assert_eq!(grid.total(), 16);
    }

    #[test]
    fn tiny_regions_are_rejected() {
        let err = ScanGrid::new(Region::new(0, 1, 0, 1), &unit_gap()).expect_err("2x2 region");
        assert_eq!(
            err,
            Error::InvalidRegion {
                x_span: 1,
                y_span: 1
            }
        );

        assert!(ScanGrid::new(Region::new(5, 5, 5, 5), &unit_gap()).is_err());
        assert!(ScanGrid::new(Region::new(9, 0, 9, 0), &unit_gap()).is_err());

        // One long axis is enough.
        assert!(ScanGrid::new(Region::new(0, 0, 0, 2), &unit_gap()).is_ok());
    }

    #[test]
    fn zero_scale_is_rejected() {
        let cfg = ScanConfig {
            scale: 0,
            min_gap: 1,
        };
        assert_eq!(
            ScanGrid::new(Region::new(0, 10, 0, 10), &cfg),
            Err(Error::InvalidScale)
        );
    }

    #[test]
    fn min_extent_follows_scaled_gap() {
        let region = Region::new(0, 15, 0, 15);

        let coarse = ScanGrid::new(
            region,
            &ScanConfig {
                scale: 1,
                min_gap: 3,
            },
        )
        .expect("valid region");
        assert_eq!(coarse.max_extent(), 15);
        assert_eq!(coarse.min_extent(), 3);
        let extents: Vec<i64> = coarse.levels().iter().map(|l| l.extent).collect();
        assert_eq!(extents, vec![15, 7, 3]);

        let scaled = ScanGrid::new(
            region,
            &ScanConfig {
                scale: 2,
                min_gap: 3,
            },
        )
        .expect("valid region");
        assert_eq!(scaled.min_extent(), 1);
        assert_eq!(scaled.levels().len(), 4);

        let no_gap = ScanGrid::new(
            region,
            &ScanConfig {
                scale: 1,
                min_gap: 0,
            },
        )
        .expect("valid region");
        assert_eq!(no_gap.min_extent(), 0);
        assert_eq!(no_gap.levels().len(), 4);
    }

    #[test]
    fn gap_wider_than_region_keeps_coarse_levels() {
        let grid = ScanGrid::new(
            Region::new(0, 3, 0, 3),
            &ScanConfig {
                scale: 1,
                min_gap: 100,
            },
        )
        .expect("valid region");
        assert_eq!(grid.min_extent(), 1);
        assert!(grid.min_extent() <= grid.max_extent());
    }

    #[test]
    fn offsets_truncate_toward_zero() {
        let grid = ScanGrid::new(Region::new(0, 4, 0, 0), &unit_gap()).expect("valid region");
        assert_eq!(grid.max_extent(), 7);
        // (0 + 4 - 7) / 2 and (0 + 0 - 7) / 2
        assert_eq!(grid.offset(), (-1, -3));
    }

    #[test]
    fn first_cross_order_on_8x8() {
        let mut grid = ScanGrid::new(Region::new(0, 7, 0, 7), &unit_gap()).expect("valid region");
        let first: Vec<(i32, i32)> = (0..13)
            .map(|_| {
                let s = grid.next_coordinate();
                assert_eq!(s.status, LocStatus::Good);
                (s.loc.x, s.loc.y)
            })
            .collect();
        assert_eq!(
            first,
            vec![
                (0, 3),
                (1, 3),
                (2, 3),
                (6, 3),
                (5, 3),
                (4, 3),
                (3, 0),
                (3, 1),
                (3, 2),
                (3, 6),
                (3, 5),
                (3, 4),
                (3, 3),
            ]
        );
        assert_eq!(grid.extent(), 7);
        assert_eq!(grid.level_index(), 0);

        // Next call moves to the finer level.
        let s = grid.next_coordinate();
        assert_eq!(grid.extent(), 3);
        assert_eq!(grid.level_index(), 1);
        assert_eq!(s.loc, PixelLoc::new(0, 1));
    }

    #[test]
    fn out_of_region_samples_are_bad_and_skipped() {
        let region = Region::new(0, 5, 0, 1);
        let mut raw = ScanGrid::new(region, &unit_gap()).expect("valid region");

        let mut bad = 0usize;
        let mut good = Vec::new();
        loop {
            let GridSample { status, loc } = raw.next_coordinate();
            match status {
                LocStatus::Good => good.push(loc),
                LocStatus::Bad => {
                    assert!(!region.contains(loc));
                    bad += 1;
                }
                LocStatus::End => break,
            }
        }
        assert!(bad > 0);

        let mut popped = ScanGrid::new(region, &unit_gap()).expect("valid region");
        let via_pop: Vec<PixelLoc> = popped.by_ref().collect();
        assert_eq!(via_pop, good);
    }

    #[test]
    fn budget_matches_raw_sample_count() {
        for region in [
            Region::new(0, 3, 0, 3),
            Region::new(0, 5, 0, 1),
            Region::new(-20, 17, 3, 40),
        ] {
            let mut grid = ScanGrid::new(region, &unit_gap()).expect("valid region");
            let budget = grid.sample_budget();
            for _ in 0..budget {
                assert_ne!(grid.next_coordinate().status, LocStatus::End);
            }
            assert_eq!(grid.next_coordinate().status, LocStatus::End);
        }
    }

    #[test]
    fn restart_replays_sequence() {
        let mut grid =
            ScanGrid::new(Region::new(10, 40, -5, 12), &unit_gap()).expect("valid region");
        let first: Vec<PixelLoc> = grid.by_ref().collect();
        assert!(grid.is_terminated());

        grid.restart();
        assert_eq!(grid.total(), 1);
        assert_eq!(grid.extent(), grid.max_extent());
        let second: Vec<PixelLoc> = grid.by_ref().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn iterator_is_fused() {
        let mut grid = ScanGrid::new(Region::new(0, 3, 0, 3), &unit_gap()).expect("valid region");
        assert_eq!(grid.by_ref().count(), 9);
        assert_eq!(grid.next(), None);
        assert_eq!(grid.next(), None);
    }
}
