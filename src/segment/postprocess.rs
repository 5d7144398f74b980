//! Cleanup of raw segmentation bands.
//!
//! Input is the band list from [`Segmenter::segment`](super::Segmenter::segment),
//! sorted by `y`. Output is still sorted, never longer, has no two
//! consecutive bands overlapping and no empty bands.

use std::collections::HashSet;

use crate::model::BBox;

use super::ContainmentMode;

/// Run deduplication, containment merge and overlap resolution in order.
///
/// Bands squeezed to zero height by overlap resolution are dropped.
pub fn process_bboxes(bboxes: Vec<BBox>, containment: ContainmentMode) -> Vec<BBox> {
    let before = bboxes.len();
    let bboxes = remove_duplicate_bboxes(bboxes);
    let mut bboxes = match containment {
        ContainmentMode::ForwardPass => merge_contained_bboxes(bboxes),
        ContainmentMode::OrderIndependent => merge_contained_bboxes_all(bboxes),
    };
    resolve_overlaps(&mut bboxes);
    bboxes.retain(|b| !b.is_empty());

    log::debug!("Post-processed {} bands into {}", before, bboxes.len());
    bboxes
}

/// Drop bands starting at a `y` already seen; the first occurrence wins.
pub fn remove_duplicate_bboxes(bboxes: Vec<BBox>) -> Vec<BBox> {
    let mut seen = HashSet::new();
    bboxes.into_iter().filter(|b| seen.insert(b.y)).collect()
}

/// Drop bands strictly inside a band kept earlier in the scan.
///
/// Single forward pass: a band is only tested against bands already kept,
/// so a later band that would contain an earlier one does not remove it.
pub fn merge_contained_bboxes(bboxes: Vec<BBox>) -> Vec<BBox> {
    let mut kept: Vec<BBox> = Vec::with_capacity(bboxes.len());
    for bbox in bboxes {
        if !kept.iter().any(|k| k.strictly_contains_vertically(&bbox)) {
            kept.push(bbox);
        }
    }
    kept
}

/// Drop every band strictly inside any other band, independent of order.
pub fn merge_contained_bboxes_all(bboxes: Vec<BBox>) -> Vec<BBox> {
    bboxes
        .iter()
        .filter(|b| !bboxes.iter().any(|other| other.strictly_contains_vertically(b)))
        .copied()
        .collect()
}

/// Split each overlap between consecutive bands at its midpoint.
///
/// One forward pass over adjacent pairs; the shared edge is the integer
/// midpoint of the current bottom and the next top.
pub fn resolve_overlaps(bboxes: &mut [BBox]) {
    for i in 1..bboxes.len() {
        let (head, tail) = bboxes.split_at_mut(i);
        let current = &mut head[i - 1];
        let next = &mut tail[0];

        if current.overlaps_next(next) {
            let mid = (current.y_bottom() + next.y) / 2;
            current.set_bottom(mid);
            next.set_top(mid);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn band(y: u32, height: u32) -> BBox {
        BBox::new(0, y, 100, height)
    }

    fn spans(bboxes: &[BBox]) -> Vec<(u32, u32)> {
        bboxes.iter().map(|b| (b.y, b.y_bottom())).collect()
    }

    fn assert_clean(bboxes: &[BBox]) {
        for w in bboxes.windows(2) {
            assert!(w[0].y <= w[1].y, "unsorted: {} then {}", w[0], w[1]);
            assert!(w[0].y_bottom() <= w[1].y, "overlap: {} then {}", w[0], w[1]);
        }
    }

    #[test]
    fn test_dedup_first_wins() {
        let out = remove_duplicate_bboxes(vec![band(0, 20), band(0, 15), band(30, 40)]);
        assert_eq!(spans(&out), vec![(0, 20), (30, 70)]);
    }

    #[test]
    fn test_process_drops_duplicate_without_overlap() {
        let out = process_bboxes(
            vec![band(0, 20), band(0, 15), band(30, 40)],
            ContainmentMode::ForwardPass,
        );
        assert_eq!(spans(&out), vec![(0, 20), (30, 70)]);
    }

    #[test]
    fn test_overlap_split_at_midpoint() {
        let mut bboxes = vec![band(0, 50), band(40, 50)];
        resolve_overlaps(&mut bboxes);
        assert_eq!(spans(&bboxes), vec![(0, 45), (45, 90)]);
    }

    #[test]
    fn test_overlap_midpoint_truncates() {
        let mut bboxes = vec![band(0, 51), band(40, 50)];
        resolve_overlaps(&mut bboxes);
        assert_eq!(spans(&bboxes), vec![(0, 45), (45, 90)]);
    }

    #[test]
    fn test_touching_bands_are_left_alone() {
        let mut bboxes = vec![band(0, 40), band(40, 10)];
        resolve_overlaps(&mut bboxes);
        assert_eq!(spans(&bboxes), vec![(0, 40), (40, 50)]);
    }

    #[test]
    fn test_forward_containment() {
        let out = merge_contained_bboxes(vec![band(0, 100), band(10, 20), band(50, 60)]);
        // (10,30) is inside (0,100); (50,110) sticks out
        assert_eq!(spans(&out), vec![(0, 100), (50, 110)]);
    }

    #[test]
    fn test_forward_containment_is_order_dependent() {
        // The container comes second, so the forward pass keeps both
        let input = vec![band(20, 10), band(10, 50)];
        assert_eq!(merge_contained_bboxes(input.clone()).len(), 2);
        assert_eq!(spans(&merge_contained_bboxes_all(input)), vec![(10, 60)]);
    }

    #[test]
    fn test_shared_edge_is_not_contained() {
        let out = merge_contained_bboxes(vec![band(0, 100), band(10, 90)]);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_cascading_overlaps_stay_sorted() {
        let out = process_bboxes(
            vec![band(0, 100), band(90, 110), band(91, 209)],
            ContainmentMode::ForwardPass,
        );
        assert_eq!(out.len(), 3);
        assert_clean(&out);
        assert_eq!(out[0].y, 0);
        assert_eq!(out[2].y_bottom(), 300);
    }

    #[test]
    fn test_sorted_inputs_come_out_clean() {
        // Deterministic pseudo-random sorted sequences
        let mut seed = 0x2545_f491_u32;
        let mut next = move |m: u32| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed % m
        };

        for _ in 0..200 {
            let n = next(12) as usize;
            let mut bboxes: Vec<BBox> = (0..n).map(|_| band(next(300), next(120))).collect();
            bboxes.sort_by_key(|b| b.y);

            for mode in [ContainmentMode::ForwardPass, ContainmentMode::OrderIndependent] {
                let out = process_bboxes(bboxes.clone(), mode);
                assert!(out.len() <= bboxes.len());
                assert!(out.iter().all(|b| !b.is_empty()));
                assert_clean(&out);
            }
        }
    }

    #[test]
    fn test_band_squeezed_to_nothing_is_dropped() {
        let mut bboxes = vec![band(0, 200), band(10, 190), band(11, 239)];
        resolve_overlaps(&mut bboxes);
        assert_eq!(spans(&bboxes), vec![(0, 105), (105, 105), (105, 250)]);

        let out = process_bboxes(
            vec![band(0, 200), band(10, 190), band(11, 239)],
            ContainmentMode::ForwardPass,
        );
        assert_eq!(spans(&out), vec![(0, 105), (105, 250)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(process_bboxes(Vec::new(), ContainmentMode::ForwardPass).is_empty());
    }
}
