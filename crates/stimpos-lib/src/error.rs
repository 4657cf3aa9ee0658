//! Error types for trace construction, configuration and segmentation.

use thiserror::Error;

/// Errors raised while validating input or segmenting a waveform.
///
/// Degenerate recordings (nothing above threshold, no midpoint crossings)
/// are not errors; they produce empty region lists instead.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// Time and voltage sequences differ in length.
    #[error("time has {time} samples but voltage has {voltage}")]
    LengthMismatch {
        /// Number of time stamps
        time: usize,
        /// Number of voltage samples
        voltage: usize,
    },

    /// Time stamps must be strictly increasing.
    #[error("time is not strictly increasing at sample {index}")]
    NonIncreasingTime {
        /// First offending sample
        index: usize,
    },

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The triangle trace did not yield matched rising/falling half cycles.
    #[error("number of even half cycles ({even}) != number of odd half cycles ({odd})")]
    HalfCycleParity {
        /// Half cycles at even positions
        even: usize,
        /// Half cycles at odd positions
        odd: usize,
    },
}

pub type SegmentResult<T> = std::result::Result<T, SegmentError>;
