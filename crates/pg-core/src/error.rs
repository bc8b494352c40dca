use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Neither axis of the region spans more than one pixel step.
    InvalidRegion { x_span: i64, y_span: i64 },
    InvalidScale,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidRegion { x_span, y_span } => {
                write!(
                    f,
                    "invalid region: spans ({x_span}, {y_span}) leave no room to refine"
                )
            }
            Self::InvalidScale => write!(f, "invalid scale: must be at least 1"),
        }
    }
}

impl std::error::Error for Error {}
