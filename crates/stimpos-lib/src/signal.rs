use crate::error::{SegmentError, SegmentResult};
use serde::{Deserialize, Serialize};

/// Recorded stimulus-position voltage with its sample times.
///
/// Time is strictly increasing but need not be uniformly spaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawTrace")]
pub struct StimulusTrace {
    time: Vec<f64>,
    volt: Vec<f64>,
}

#[derive(Deserialize)]
struct RawTrace {
    time: Vec<f64>,
    volt: Vec<f64>,
}

impl TryFrom<RawTrace> for StimulusTrace {
    type Error = SegmentError;

    fn try_from(raw: RawTrace) -> SegmentResult<Self> {
        Self::new(raw.time, raw.volt)
    }
}

impl StimulusTrace {
    /// Build a trace from explicit time stamps, validating length and ordering.
    pub fn new(time: Vec<f64>, volt: Vec<f64>) -> SegmentResult<Self> {
        if time.len() != volt.len() {
            return Err(SegmentError::LengthMismatch {
                time: time.len(),
                voltage: volt.len(),
            });
        }
        if let Some(pos) = time.windows(2).position(|w| !(w[1] > w[0])) {
            return Err(SegmentError::NonIncreasingTime { index: pos + 1 });
        }
        Ok(Self { time, volt })
    }

    /// Build a trace sampled at a uniform rate `fs` (Hz), starting at t = 0.
    pub fn from_uniform(fs: f64, volt: Vec<f64>) -> SegmentResult<Self> {
        if !(fs.is_finite() && fs > 0.0) {
            return Err(SegmentError::InvalidConfig(format!(
                "sampling frequency must be positive, got {}",
                fs
            )));
        }
        let time = (0..volt.len()).map(|i| i as f64 / fs).collect();
        Ok(Self { time, volt })
    }

    pub fn time(&self) -> &[f64] {
        &self.time
    }

    pub fn volt(&self) -> &[f64] {
        &self.volt
    }

    pub fn len(&self) -> usize {
        self.volt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.volt.is_empty()
    }

    /// Span between the first and last time stamp.
    pub fn duration(&self) -> f64 {
        match (self.time.first(), self.time.last()) {
            (Some(first), Some(last)) => last - first,
            _ => 0.0,
        }
    }

    /// Replace the voltage with a continuous version, see [`crate::unwrap::unwrap`].
    pub fn unwrapped(&self, discont: f64) -> Self {
        Self {
            time: self.time.clone(),
            volt: crate::unwrap::unwrap(&self.volt, discont),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_length_mismatch() {
        let err = StimulusTrace::new(vec![0.0, 1.0], vec![0.0]).unwrap_err();
        assert_eq!(
            err,
            SegmentError::LengthMismatch {
                time: 2,
                voltage: 1
            }
        );
    }

    #[test]
    fn rejects_repeated_time_stamp() {
        let err = StimulusTrace::new(vec![0.0, 1.0, 1.0], vec![0.0; 3]).unwrap_err();
        assert_eq!(err, SegmentError::NonIncreasingTime { index: 2 });
    }

    #[test]
    fn uniform_trace_has_expected_duration() {
        let trace = StimulusTrace::from_uniform(100.0, vec![0.0; 101]).unwrap();
        assert_eq!(trace.len(), 101);
        assert!((trace.duration() - 1.0).abs() < 1e-12);
        assert!(StimulusTrace::from_uniform(0.0, vec![1.0]).is_err());
    }

    #[test]
    fn deserialization_validates_time() {
        let ok: StimulusTrace =
            serde_json::from_str(r#"{"time":[0.0,0.5],"volt":[1.0,2.0]}"#).unwrap();
        assert_eq!(ok.len(), 2);
        let bad = serde_json::from_str::<StimulusTrace>(r#"{"time":[0.5,0.0],"volt":[1.0,2.0]}"#);
        assert!(bad.is_err());
    }

    #[test]
    fn non_uniform_time_is_accepted() {
        let trace = StimulusTrace::new(vec![0.0, 0.1, 0.35, 0.4], vec![1.0; 4]).unwrap();
        assert_eq!(trace.time()[2], 0.35);
    }
}
