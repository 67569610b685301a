//! Resynthesis error enum.
use std::collections::TryReserveError;

use crate::coord::Coord;

/// Error for resynthesis calculations.
#[derive(Debug)]
pub enum ResynthError {
    /// The image channel count is not one of `1`, `2`, `3`, or `4`.
    InvalidChannelCount(u8),
    /// A raw pixel buffer's length does not match `width * height * channels`.
    MismatchedBuffer {
        /// Expected buffer length.
        expected: usize,
        /// Actual buffer length.
        actual: usize,
    },
    /// The corpus or the output has zero pixels; no synthesis was performed.
    InvalidDimensions {
        /// Number of points in the corpus image.
        corpus_area: usize,
        /// Number of points in the output image.
        data_area: usize,
    },
    /// Space could not be reserved for a buffer required by synthesis.
    Reserve(TryReserveError),
    /// A general error occurred.
    General(&'static str),
}

impl std::fmt::Display for ResynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidChannelCount(c) => {
                write!(f, "channel count {c} is not one of 1, 2, 3, or 4")
            }
            Self::MismatchedBuffer { expected, actual } => write!(
                f,
                "pixel buffer length {actual} does not match expected length {expected}"
            ),
            Self::InvalidDimensions {
                corpus_area,
                data_area,
            } => write!(
                f,
                "invalid sizes: corpus has {corpus_area} points, output has {data_area} points"
            ),
            Self::Reserve(e) => write!(f, "{e}"),
            Self::General(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for ResynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Reserve(e) => e.source(),
            Self::InvalidChannelCount(_)
            | Self::MismatchedBuffer { .. }
            | Self::InvalidDimensions { .. }
            | Self::General(_) => None,
        }
    }
}

impl From<TryReserveError> for ResynthError {
    fn from(error: TryReserveError) -> Self {
        Self::Reserve(error)
    }
}

impl From<&'static str> for ResynthError {
    fn from(error: &'static str) -> Self {
        Self::General(error)
    }
}

/// Panics with a diagnostic naming the output position and corpus candidate.
///
/// The score accumulator is documented to stay well within `i64` range for
/// any parameters within their clamped domains; reaching this path means a
/// parameter or data-structure invariant was violated upstream.
#[cold]
#[inline(never)]
pub(crate) fn overflow_panic(position: Coord, candidate: Coord) -> ! {
    panic!(
        "score accumulator overflowed while scoring candidate {candidate:?} for output position {position:?}"
    );
}
