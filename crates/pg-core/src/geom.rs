#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PixelLoc {
    pub x: i32,
    pub y: i32,
}

impl PixelLoc {
    /// Sentinel reported alongside an exhausted search.
    pub const NONE: PixelLoc = PixelLoc { x: -1, y: -1 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Inclusive rectangular search region in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Region {
    pub x_min: i32,
    pub x_max: i32,
    pub y_min: i32,
    pub y_max: i32,
}

impl Region {
    pub const fn new(x_min: i32, x_max: i32, y_min: i32, y_max: i32) -> Self {
        Self {
            x_min,
            x_max,
            y_min,
            y_max,
        }
    }

    /// Whole-image region `(0, width - 1, 0, height - 1)`.
    ///
    /// Dimensions beyond `i32::MAX` are clamped.
    pub fn from_image_size(width: usize, height: usize) -> Self {
        let last = |len: usize| i32::try_from(len).unwrap_or(i32::MAX) - 1;
        Self::new(0, last(width), 0, last(height))
    }

    pub fn x_span(&self) -> i64 {
        i64::from(self.x_max) - i64::from(self.x_min)
    }

    pub fn y_span(&self) -> i64 {
        i64::from(self.y_max) - i64::from(self.y_min)
    }

    pub fn max_span(&self) -> i64 {
        self.x_span().max(self.y_span())
    }

    pub fn width(&self) -> usize {
        usize::try_from(self.x_span() + 1).unwrap_or(0)
    }

    pub fn height(&self) -> usize {
        usize::try_from(self.y_span() + 1).unwrap_or(0)
    }

    pub fn contains(&self, p: PixelLoc) -> bool {
        self.contains_i64(i64::from(p.x), i64::from(p.y))
    }

    /// Containment test for coordinates that may not fit in `i32`.
    pub fn contains_i64(&self, x: i64, y: i64) -> bool {
        x >= i64::from(self.x_min)
            && x <= i64::from(self.x_max)
            && y >= i64::from(self.y_min)
            && y <= i64::from(self.y_max)
    }
}
