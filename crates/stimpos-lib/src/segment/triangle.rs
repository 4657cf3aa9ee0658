use super::Segmentation;
use crate::config::TriangleConfig;
use crate::error::{SegmentError, SegmentResult};
use crate::region::{find_runs, Mask, Region};
use crate::signal::StimulusTrace;

/// Segment a ramped (triangle) stimulus into half and full cycles.
///
/// Half cycles are anchored on midpoint crossings and grown in both
/// directions until the voltage leaves `[lower_threshold, upper_threshold]`.
/// Consecutive (even, odd) half cycles pair into full cycles that also cover
/// any samples between the two.
///
/// Returns [`SegmentError::HalfCycleParity`] when the rising and falling
/// half cycles do not pair up, since the trace is then not a usable
/// periodic triangle stimulus.
pub fn segment_triangle(
    trace: &StimulusTrace,
    cfg: &TriangleConfig,
) -> SegmentResult<Segmentation> {
    cfg.validate()?;
    let half_cycles = find_half_cycles(trace.volt(), cfg);

    let even: Vec<Region> = half_cycles.iter().step_by(2).copied().collect();
    let odd: Vec<Region> = half_cycles.iter().skip(1).step_by(2).copied().collect();
    if even.len() != odd.len() {
        return Err(SegmentError::HalfCycleParity {
            even: even.len(),
            odd: odd.len(),
        });
    }

    let cycles = even
        .iter()
        .zip(&odd)
        .map(|(e, o)| time_span(trace.time(), e, o))
        .collect();

    Ok(Segmentation::from_parts(trace.len(), half_cycles, even, odd, cycles))
}

/// Half cycles of `volt` in time order, one per accepted midpoint crossing.
pub fn find_half_cycles(volt: &[f64], cfg: &TriangleConfig) -> Vec<Region> {
    let crossings = midpoint_crossings(
        volt,
        cfg.midpoint_window_width,
        cfg.midpoint_window_min_len,
    );
    let half_cycles: Vec<Region> = crossings
        .iter()
        .filter_map(|crossing| {
            grow_half_cycle(volt, *crossing, cfg.lower_threshold, cfg.upper_threshold)
        })
        .collect();
    log::debug!(
        "triangle segmentation: {} midpoint crossings, {} half cycles in {} samples",
        crossings.len(),
        half_cycles.len(),
        volt.len()
    );
    half_cycles
}

/// Runs of at least `min_len` samples lying strictly within `width / 2` of
/// the trace midpoint `(max + min) / 2`.
pub fn midpoint_crossings(volt: &[f64], width: f64, min_len: usize) -> Vec<Region> {
    let Some(midpoint) = midpoint_value(volt) else {
        return Vec::new();
    };
    let near = window_mask(volt, midpoint, width);
    find_runs(&near, true)
        .into_iter()
        .filter(|run| run.len() >= min_len)
        .collect()
}

/// Mean of the extreme values, ignoring NaN samples.
pub fn midpoint_value(volt: &[f64]) -> Option<f64> {
    let (min, max) = volt
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })?;
    Some(0.5 * (max + min))
}

/// Mask of samples strictly inside `center ± width / 2`.
pub fn window_mask(x: &[f64], center: f64, width: f64) -> Mask {
    let lo = center - 0.5 * width;
    let hi = center + 0.5 * width;
    x.iter().map(|&v| v > lo && v < hi).collect()
}

/// Grow a half cycle around one midpoint crossing.
///
/// Walks backward from the last crossing sample and forward from the first
/// one while the voltage stays within the thresholds. Hitting either end of
/// the trace simply ends the walk.
fn grow_half_cycle(volt: &[f64], crossing: Region, lower: f64, upper: f64) -> Option<Region> {
    let within = |v: f64| lower <= v && v <= upper;

    let mut back = crossing.end;
    while back > 0 && within(volt[back - 1]) {
        back -= 1;
    }
    let backward = Region::new(back, crossing.end);

    let mut fwd = crossing.start;
    while fwd < volt.len() && within(volt[fwd]) {
        fwd += 1;
    }
    let forward = Region::new(crossing.start, fwd);

    match (backward.is_empty(), forward.is_empty()) {
        (true, true) => {
            log::warn!(
                "midpoint crossing at {:?} lies outside [{}, {}], skipped",
                crossing.range(),
                lower,
                upper
            );
            None
        }
        (false, true) => Some(backward),
        (true, false) => Some(forward),
        (false, false) if backward.start <= forward.end => Some(backward.span(&forward)),
        (false, false) => {
            // the crossing itself leaves the threshold band
            let kept = if forward.len() > backward.len() {
                forward
            } else {
                backward
            };
            log::warn!(
                "midpoint crossing at {:?} straddles a threshold, keeping {:?}",
                crossing.range(),
                kept.range()
            );
            Some(kept)
        }
    }
}

/// Samples with `t_min <= t <= t_max` over the two half cycles.
fn time_span(time: &[f64], a: &Region, b: &Region) -> Region {
    let hull = a.span(b);
    if hull.is_empty() {
        return hull;
    }
    let t_min = time[hull.start];
    let t_max = time[hull.end - 1];
    let start = time.partition_point(|&t| t < t_min);
    let end = time.partition_point(|&t| t <= t_max);
    Region::new(start, end)
}
