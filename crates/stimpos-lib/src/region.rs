use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Boolean membership vector over the sample index space of a trace.
pub type Mask = Vec<bool>;

/// Half-open sample index range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Region {
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "region start {} past end {}", start, end);
        Self { start, end }
    }

    pub fn empty_at(index: usize) -> Self {
        Self::new(index, index)
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// True when every index of `other` also lies in `self`.
    pub fn covers(&self, other: &Region) -> bool {
        other.is_empty() || (self.start <= other.start && other.end <= self.end)
    }

    /// Smallest region holding both `self` and `other`, including any gap between them.
    pub fn span(&self, other: &Region) -> Region {
        Region::new(self.start.min(other.start), self.end.max(other.end))
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Materialize as a mask over `len` samples.
    pub fn to_mask(&self, len: usize) -> Mask {
        let mut mask = vec![false; len];
        let end = self.end.min(len);
        if self.start < end {
            mask[self.start..end].iter_mut().for_each(|m| *m = true);
        }
        mask
    }
}

impl From<Range<usize>> for Region {
    fn from(range: Range<usize>) -> Self {
        Region::new(range.start, range.end)
    }
}

/// Maximal runs of `value` in `mask`, in index order.
///
/// A run still open when the sequence ends is closed at `mask.len()`.
pub fn find_runs(mask: &[bool], value: bool) -> Vec<Region> {
    let mut runs = Vec::new();
    let mut open: Option<usize> = None;
    for (idx, &item) in mask.iter().enumerate() {
        match (item == value, open) {
            (true, None) => open = Some(idx),
            (false, Some(start)) => {
                runs.push(Region::new(start, idx));
                open = None;
            }
            _ => {}
        }
    }
    if let Some(start) = open {
        runs.push(Region::new(start, mask.len()));
    }
    runs
}

/// Like [`find_runs`], but each run is returned as its own mask over the full index space.
pub fn find_contiguous_regions(mask: &[bool], value: bool) -> Vec<Mask> {
    find_runs(mask, value)
        .into_iter()
        .map(|run| run.to_mask(mask.len()))
        .collect()
}

/// Logical OR of a set of regions, as a mask over `len` samples.
pub fn union_mask(regions: &[Region], len: usize) -> Mask {
    let mut mask = vec![false; len];
    for region in regions {
        let end = region.end.min(len);
        if region.start < end {
            mask[region.start..end].iter_mut().for_each(|m| *m = true);
        }
    }
    mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_interior_runs() {
        let mask = [false, true, true, false, true, false];
        assert_eq!(
            find_runs(&mask, true),
            vec![Region::new(1, 3), Region::new(4, 5)]
        );
        assert_eq!(
            find_runs(&mask, false),
            vec![Region::new(0, 1), Region::new(3, 4), Region::new(5, 6)]
        );
    }

    #[test]
    fn flushes_run_open_at_end() {
        let mask = [false, false, true, true];
        assert_eq!(find_runs(&mask, true), vec![Region::new(2, 4)]);
        let all = [true; 5];
        assert_eq!(find_runs(&all, true), vec![Region::new(0, 5)]);
    }

    #[test]
    fn empty_and_absent() {
        assert!(find_runs(&[], true).is_empty());
        assert!(find_runs(&[false, false], true).is_empty());
    }

    #[test]
    fn contiguous_region_masks_span_full_index_space() {
        let mask = [true, false, true, true];
        let regions = find_contiguous_regions(&mask, true);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0], vec![true, false, false, false]);
        assert_eq!(regions[1], vec![false, false, true, true]);
        assert!(regions.iter().all(|r| r.len() == mask.len()));
    }

    #[test]
    fn span_bridges_gap() {
        let a = Region::new(2, 5);
        let b = Region::new(8, 12);
        let s = a.span(&b);
        assert_eq!(s, Region::new(2, 12));
        assert!(s.covers(&a) && s.covers(&b));
        assert!(s.contains(6));
    }

    #[test]
    fn union_of_regions() {
        let mask = union_mask(&[Region::new(0, 2), Region::new(4, 5)], 6);
        assert_eq!(mask, vec![true, true, false, false, true, false]);
    }
}
