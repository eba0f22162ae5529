//! Duplicate box detection.
//!
//! Every pair of boxes within one frame is compared once. A pair whose
//! corners agree within a small tolerance is an exact duplicate; otherwise a
//! pair whose IoU reaches the near-duplicate threshold is a near duplicate.
//! A pair is never counted as both.

use serde::Serialize;

use crate::model::{BoxRecord, BoxRef};

/// Options for duplicate detection.
#[derive(Clone, Copy, Debug)]
pub struct DuplicateOptions {
    /// Absolute per-coordinate tolerance for exact duplicates.
    pub exact_epsilon: f64,
    /// Minimum IoU for a near duplicate.
    pub near_iou_threshold: f64,
}

impl Default for DuplicateOptions {
    fn default() -> Self {
        Self {
            exact_epsilon: 1e-6,
            near_iou_threshold: 0.99,
        }
    }
}

/// How a matched pair was classified.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateKind {
    Exact,
    Near,
}

/// A matched pair of boxes within one frame.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DuplicatePair {
    pub frame_id: i64,
    pub box_a: BoxRef,
    pub box_b: BoxRef,
    pub kind: DuplicateKind,
}

/// Aggregated duplicate findings.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DuplicateReport {
    /// Pairs with (near-)identical corners.
    pub exact_count: usize,
    /// Pairs with IoU at or above the threshold that are not exact.
    pub near_count: usize,
    /// Matched pairs in frame order, then pair order.
    pub pairs: Vec<DuplicatePair>,
}

impl DuplicateReport {
    /// Compares every pair of boxes in one frame and records matches.
    ///
    /// Boxes without geometry are skipped. Positions used for `index:<n>`
    /// fallbacks refer to the full box list, not the filtered one.
    pub fn scan_frame(&mut self, frame_id: i64, boxes: &[BoxRecord], opts: &DuplicateOptions) {
        let candidates: Vec<(usize, &BoxRecord)> = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.geometry.is_some())
            .collect();

        for (i, &(pos_a, a)) in candidates.iter().enumerate() {
            for &(pos_b, b) in &candidates[i + 1..] {
                let (Some(geom_a), Some(geom_b)) = (a.geometry, b.geometry) else {
                    continue;
                };

                let kind = if geom_a.same_corners(&geom_b, opts.exact_epsilon) {
                    DuplicateKind::Exact
                } else if geom_a.iou(&geom_b) >= opts.near_iou_threshold {
                    DuplicateKind::Near
                } else {
                    continue;
                };

                match kind {
                    DuplicateKind::Exact => self.exact_count += 1,
                    DuplicateKind::Near => self.near_count += 1,
                }
                self.pairs.push(DuplicatePair {
                    frame_id,
                    box_a: BoxRef::for_box(a.id, pos_a),
                    box_b: BoxRef::for_box(b.id, pos_b),
                    kind,
                });
            }
        }
    }
}

/// Runs duplicate detection over a sequence of `(frame id, boxes)`.
pub fn detect_duplicates<'a, I>(frames: I, opts: &DuplicateOptions) -> DuplicateReport
where
    I: IntoIterator<Item = (i64, &'a [BoxRecord])>,
{
    let mut report = DuplicateReport::default();
    for (frame_id, boxes) in frames {
        report.scan_frame(frame_id, boxes, opts);
    }
    report
}
