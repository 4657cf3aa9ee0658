//! Per-cycle helpers for averaging and aligning segmented recordings.

use crate::region::Region;

/// Samples of `values` covered by `region`, clipped to the slice.
pub fn extract<'a>(values: &'a [f64], region: &Region) -> &'a [f64] {
    let end = region.end.min(values.len());
    let start = region.start.min(end);
    &values[start..end]
}

/// Time stamps of `region` shifted so the region starts at zero.
pub fn aligned_time(time: &[f64], region: &Region) -> Vec<f64> {
    let slice = extract(time, region);
    match slice.first() {
        Some(&t0) => slice.iter().map(|t| t - t0).collect(),
        None => Vec::new(),
    }
}

/// One row per cycle, each truncated to the length of the shortest cycle.
pub fn cycle_matrix(values: &[f64], cycles: &[Region]) -> Vec<Vec<f64>> {
    let rows: Vec<&[f64]> = cycles.iter().map(|c| extract(values, c)).collect();
    let width = rows.iter().map(|r| r.len()).min().unwrap_or(0);
    rows.into_iter().map(|r| r[..width].to_vec()).collect()
}

/// Sample-wise mean over the rows of [`cycle_matrix`].
pub fn mean_cycle(values: &[f64], cycles: &[Region]) -> Vec<f64> {
    let matrix = cycle_matrix(values, cycles);
    let Some(width) = matrix.first().map(Vec::len) else {
        return Vec::new();
    };
    let count = matrix.len() as f64;
    (0..width)
        .map(|j| matrix.iter().map(|row| row[j]).sum::<f64>() / count)
        .collect()
}

/// Triangle thresholds placed `fraction` of the voltage range inside the
/// extrema: `(min + fraction * range, max - fraction * range)`.
///
/// `None` for traces without finite samples.
pub fn auto_thresholds(volt: &[f64], fraction: f64) -> Option<(f64, f64)> {
    let mut finite = volt.iter().copied().filter(|v| v.is_finite());
    let first = finite.next()?;
    let (min, max) = finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let range = max - min;
    Some((min + fraction * range, max - fraction * range))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_clips_to_bounds() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(extract(&values, &Region::new(1, 10)), &[2.0, 3.0]);
        assert!(extract(&values, &Region::new(5, 8)).is_empty());
    }

    #[test]
    fn aligned_time_starts_at_zero() {
        let time = [0.0, 0.5, 1.0, 1.5];
        assert_eq!(aligned_time(&time, &Region::new(2, 4)), vec![0.0, 0.5]);
    }

    #[test]
    fn matrix_truncates_to_shortest_cycle() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let cycles = [Region::new(0, 4), Region::new(4, 7)];
        let matrix = cycle_matrix(&values, &cycles);
        assert_eq!(matrix, vec![vec![0.0, 1.0, 2.0], vec![4.0, 5.0, 6.0]]);
        assert_eq!(mean_cycle(&values, &cycles), vec![2.0, 3.0, 4.0]);
    }

    #[test]
    fn mean_of_no_cycles_is_empty() {
        assert!(mean_cycle(&[1.0, 2.0], &[]).is_empty());
    }

    #[test]
    fn thresholds_from_range() {
        let (lo, hi) = auto_thresholds(&[0.0, 5.0, 10.0, f64::NAN], 0.01).unwrap();
        assert!((lo - 0.1).abs() < 1e-12);
        assert!((hi - 9.9).abs() < 1e-12);
        assert!(auto_thresholds(&[], 0.01).is_none());
    }
}
