use pg_core::Error;

/// Search resolution settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanConfig {
    /// Downsampling factor already applied to the image being searched.
    pub scale: u32,
    /// Minimum gap between features, in full-resolution pixels.
    pub min_gap: u32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scale: 1,
            min_gap: 1,
        }
    }
}

impl ScanConfig {
    /// Minimum gap expressed in scaled pixels (`min_gap / scale`).
    pub fn smallest_feature(&self) -> Result<i64, Error> {
        if self.scale == 0 {
            return Err(Error::InvalidScale);
        }
        Ok(i64::from(self.min_gap / self.scale))
    }
}
