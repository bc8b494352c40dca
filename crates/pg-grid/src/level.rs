/// Geometry of one refinement level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelInfo {
    /// Cross half-span at this level.
    pub extent: i64,
    /// Spacing between neighboring cross centers.
    pub jump_size: i64,
    /// Samples per cross, center included.
    pub pixel_total: i64,
    /// Grid-local coordinate of the first cross center on each axis.
    pub start_pos: i64,
    /// Cross centers per axis that fit in `[0, max_extent]`.
    pub crosses_per_axis: i64,
}

impl LevelInfo {
    pub fn new(extent: i64, max_extent: i64) -> Self {
        let jump_size = extent + 1;
        let start_pos = extent / 2;
        let crosses_per_axis = if start_pos > max_extent {
            0
        } else {
            (max_extent - start_pos) / jump_size + 1
        };

        Self {
            extent,
            jump_size,
            pixel_total: 2 * extent - 1,
            start_pos,
            crosses_per_axis,
        }
    }

    pub fn num_crosses(&self) -> u64 {
        let n = self.crosses_per_axis.max(0) as u64;
        n.saturating_mul(n)
    }

    /// Raw samples produced while tiling this level, out-of-region ones
    /// included.
    pub fn num_samples(&self) -> u64 {
        self.num_crosses()
            .saturating_mul(self.pixel_total.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::LevelInfo;

    #[test]
    fn top_level_is_single_cross() {
        let top = LevelInfo::new(15, 15);
        assert_eq!(top.jump_size, 16);
        assert_eq!(top.pixel_total, 29);
        assert_eq!(top.start_pos, 7);
        assert_eq!(top.crosses_per_axis, 1);
        assert_eq!(top.num_samples(), 29);
    }

    #[test]
    fn each_refinement_doubles_crosses_per_axis() {
        let counts: Vec<i64> = [15, 7, 3, 1]
            .into_iter()
            .map(|e| LevelInfo::new(e, 15).crosses_per_axis)
            .collect();
        assert_eq!(counts, vec![1, 2, 4, 8]);

        let finest = LevelInfo::new(1, 15);
        assert_eq!(finest.pixel_total, 1);
        assert_eq!(finest.num_samples(), 64);
    }
}
