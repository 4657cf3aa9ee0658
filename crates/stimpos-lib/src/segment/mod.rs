//! Waveform segmentation into pretrial, trial, full and half cycles.
//!
//! Both segmenters produce a [`Segmentation`] holding half-open index
//! regions. Boolean masks are only built on request via
//! [`Segmentation::masks`].

pub mod square;
pub mod triangle;

pub use square::{segment_square, SquareSegmentation};
pub use triangle::{midpoint_crossings, segment_triangle};

use crate::config::Config;
use crate::error::SegmentResult;
use crate::region::{Mask, Region};
use crate::signal::StimulusTrace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Region layout of one stimulus recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segmentation {
    /// Number of samples in the segmented trace.
    pub len: usize,
    pub pretrial: Region,
    pub trial: Region,
    /// Full cycles in time order.
    pub cycles: Vec<Region>,
    /// All half cycles in time order.
    pub half_cycles: Vec<Region>,
    pub even_half_cycles: Vec<Region>,
    pub odd_half_cycles: Vec<Region>,
}

impl Segmentation {
    /// Assemble a segmentation from time-ordered half cycles and their pairing into cycles.
    ///
    /// The trial starts at the first sample of the earliest half cycle; with no
    /// half cycles the whole trace is pretrial.
    pub(crate) fn from_parts(
        len: usize,
        half_cycles: Vec<Region>,
        even_half_cycles: Vec<Region>,
        odd_half_cycles: Vec<Region>,
        cycles: Vec<Region>,
    ) -> Self {
        let trial_start = half_cycles
            .iter()
            .filter(|r| !r.is_empty())
            .map(|r| r.start)
            .min()
            .unwrap_or(len);
        Self {
            len,
            pretrial: Region::new(0, trial_start),
            trial: Region::new(trial_start, len),
            cycles,
            half_cycles,
            even_half_cycles,
            odd_half_cycles,
        }
    }

    /// True when no cycling was detected.
    pub fn is_degenerate(&self) -> bool {
        self.half_cycles.is_empty()
    }

    pub fn pretrial_mask(&self) -> Mask {
        self.pretrial.to_mask(self.len)
    }

    pub fn trial_mask(&self) -> Mask {
        self.trial.to_mask(self.len)
    }

    pub fn cycle_masks(&self) -> Vec<Mask> {
        self.cycles.iter().map(|r| r.to_mask(self.len)).collect()
    }

    /// Named mask mapping: `pretrial`, `trial`, `cycles`, `half_cycles`,
    /// `even_half_cycles` and `odd_half_cycles`.
    pub fn masks(&self) -> RegionMasks {
        let list = |regions: &[Region]| {
            MaskEntry::List(regions.iter().map(|r| r.to_mask(self.len)).collect())
        };
        let mut out = BTreeMap::new();
        out.insert("pretrial".to_string(), MaskEntry::Single(self.pretrial_mask()));
        out.insert("trial".to_string(), MaskEntry::Single(self.trial_mask()));
        out.insert("cycles".to_string(), list(&self.cycles));
        out.insert("half_cycles".to_string(), list(&self.half_cycles));
        out.insert("even_half_cycles".to_string(), list(&self.even_half_cycles));
        out.insert("odd_half_cycles".to_string(), list(&self.odd_half_cycles));
        out
    }
}

/// A named region is either one mask or an ordered list of masks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaskEntry {
    Single(Mask),
    List(Vec<Mask>),
}

impl MaskEntry {
    pub fn as_single(&self) -> Option<&Mask> {
        match self {
            MaskEntry::Single(mask) => Some(mask),
            MaskEntry::List(_) => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Mask]> {
        match self {
            MaskEntry::Single(_) => None,
            MaskEntry::List(masks) => Some(masks),
        }
    }
}

pub type RegionMasks = BTreeMap<String, MaskEntry>;

/// Known stimulus waveform shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StimulusShape {
    Square,
    Triangle,
}

/// Segment `trace` with the segmenter for `shape`, unwrapping first when
/// `cfg.unwrap` is set.
pub fn segment(
    trace: &StimulusTrace,
    shape: StimulusShape,
    cfg: &Config,
) -> SegmentResult<Segmentation> {
    cfg.validate()?;
    let unwrapped;
    let trace = match &cfg.unwrap {
        Some(u) => {
            unwrapped = trace.unwrapped(u.discont);
            &unwrapped
        }
        None => trace,
    };
    match shape {
        StimulusShape::Square => Ok(segment_square(trace.volt(), &cfg.square)?.segmentation),
        StimulusShape::Triangle => segment_triangle(trace, &cfg.triangle),
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Segmentation;

    /// Assert the invariants every segmentation must satisfy.
    pub fn check_invariants(seg: &Segmentation) {
        let pre = seg.pretrial_mask();
        let trial = seg.trial_mask();
        assert_eq!(pre.len(), seg.len);
        assert_eq!(trial.len(), seg.len);
        for (i, (p, t)) in pre.iter().zip(&trial).enumerate() {
            assert!(p ^ t, "sample {} must be in exactly one of pretrial/trial", i);
        }
        assert_eq!(seg.even_half_cycles.len(), seg.odd_half_cycles.len());
        assert_eq!(seg.cycles.len(), seg.even_half_cycles.len());
        for ((cycle, even), odd) in seg
            .cycles
            .iter()
            .zip(&seg.even_half_cycles)
            .zip(&seg.odd_half_cycles)
        {
            assert!(cycle.covers(even), "{:?} does not cover {:?}", cycle, even);
            assert!(cycle.covers(odd), "{:?} does not cover {:?}", cycle, odd);
            assert!(seg.trial.covers(cycle));
        }
    }
}
