//! Error types for the transform pipeline.

use std::fmt;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for pipeline operations.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// Block size must be at least 1
    InvalidBlockSize(usize),
    /// Invalid plane or image dimensions (zero width or height)
    InvalidDimensions {
        /// Plane width
        width: usize,
        /// Plane height
        height: usize,
    },
    /// Pixel buffer too small for the declared geometry
    BufferTooSmall {
        /// Minimum buffer size in bytes
        expected: usize,
        /// Actual buffer size in bytes
        actual: usize,
    },
    /// Keep count larger than the number of coefficients in a block
    InvalidKeepCount {
        /// Requested keep count
        keep: usize,
        /// Coefficients per block (N²)
        max: usize,
    },
    /// Unknown chroma subsampling ratio
    InvalidSubsampling(String),
    /// A NaN or infinite sample reached a checked entry point
    NonFiniteSample {
        /// Position of the offending sample
        index: usize,
    },
    /// Coefficient grid does not fit the requested plane
    DimensionMismatch {
        /// Expected (width, height)
        expected: (usize, usize),
        /// Actual (width, height)
        actual: (usize, usize),
    },
    /// Quantization tables exist only for 8x8 blocks
    QuantizationUnsupported(usize),
    /// Malformed bitmap file
    InvalidBitmap(&'static str),
    /// Only 24-bit bitmaps are read
    UnsupportedBitDepth(u16),
    /// I/O error
    Io(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidBlockSize(n) => {
                write!(f, "Invalid block size: {} (must be at least 1)", n)
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid dimensions: {}x{}", width, height)
            }
            Error::BufferTooSmall { expected, actual } => {
                write!(
                    f,
                    "Pixel buffer too small: expected at least {} bytes, got {}",
                    expected, actual
                )
            }
            Error::InvalidKeepCount { keep, max } => {
                write!(f, "Invalid keep count: {} (must be 0-{})", keep, max)
            }
            Error::InvalidSubsampling(ratio) => {
                write!(f, "Invalid chrominance subsampling ratio: {}", ratio)
            }
            Error::NonFiniteSample { index } => {
                write!(f, "Non-finite sample at index {}", index)
            }
            Error::DimensionMismatch { expected, actual } => {
                write!(
                    f,
                    "Dimension mismatch: expected {}x{}, got {}x{}",
                    expected.0, expected.1, actual.0, actual.1
                )
            }
            Error::QuantizationUnsupported(n) => {
                write!(f, "Quantization needs 8x8 blocks, got {}x{}", n, n)
            }
            Error::InvalidBitmap(reason) => write!(f, "Invalid bitmap: {}", reason),
            Error::UnsupportedBitDepth(bpp) => {
                write!(f, "Unsupported bitmap depth: {} bits per pixel", bpp)
            }
            Error::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err.to_string())
    }
}
