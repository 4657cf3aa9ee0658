use super::Segmentation;
use crate::config::SquareConfig;
use crate::error::SegmentResult;
use crate::region::{find_runs, Mask, Region};
use serde::{Deserialize, Serialize};

/// Square-wave segmentation plus the threshold classification it was built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquareSegmentation {
    pub segmentation: Segmentation,
    /// Samples strictly above the threshold.
    pub above: Mask,
    /// Complement of `above`, with the final sample forced below.
    pub below: Mask,
    /// Sorted half-cycle boundaries: excursion starts and ends, then the trace length.
    pub boundaries: Vec<usize>,
}

/// Segment a two-level signal by its excursions above `cfg.threshold`.
///
/// Every excursion above the threshold is an even half cycle and the
/// stretch below the threshold up to the next excursion is the matching odd
/// half cycle. A full cycle runs from one excursion start to the next; the
/// last one runs to the end of the trace. Everything before the first
/// excursion is pretrial.
///
/// A trace with no excursion yields no cycles and an all-pretrial partition.
pub fn segment_square(volt: &[f64], cfg: &SquareConfig) -> SegmentResult<SquareSegmentation> {
    cfg.validate()?;
    let n = volt.len();
    let above: Mask = volt.iter().map(|&v| v > cfg.threshold).collect();
    let mut below: Mask = above.iter().map(|a| !a).collect();

    // A cycle only closes below threshold. Recordings cut off mid-excursion
    // would otherwise lose their final cycle.
    if let Some(last) = below.last_mut() {
        *last = true;
    }

    // Gaps between consecutive below samples, with a virtual below sample before index 0.
    let excursions = find_runs(&below, false);

    let mut boundaries = Vec::with_capacity(2 * excursions.len() + 1);
    let mut half_cycles = Vec::with_capacity(2 * excursions.len());
    let mut even = Vec::with_capacity(excursions.len());
    let mut odd = Vec::with_capacity(excursions.len());
    let mut cycles = Vec::with_capacity(excursions.len());

    for (k, excursion) in excursions.iter().enumerate() {
        let next_start = excursions.get(k + 1).map_or(n, |next| next.start);
        let return_leg = Region::new(excursion.end, next_start);
        boundaries.push(excursion.start);
        boundaries.push(excursion.end);
        half_cycles.push(*excursion);
        half_cycles.push(return_leg);
        even.push(*excursion);
        odd.push(return_leg);
        cycles.push(Region::new(excursion.start, next_start));
    }
    if n > 0 {
        boundaries.push(n);
    }

    log::debug!(
        "square segmentation: {} excursions above {} in {} samples",
        excursions.len(),
        cfg.threshold,
        n
    );

    Ok(SquareSegmentation {
        segmentation: Segmentation::from_parts(n, half_cycles, even, odd, cycles),
        above,
        below,
        boundaries,
    })
}
