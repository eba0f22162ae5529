//! Range-filtered box statistics.
//!
//! This module aggregates a parsed [`Document`] over an inclusive frame id
//! range. Every call recomputes from scratch; nothing is cached between
//! calls, so the same inputs always give the same report.

mod report;

pub use report::{DetailedRangeStats, FrameRange, LabelTotal, RangeStats};

use std::collections::{BTreeMap, HashSet};

use crate::duplicates::{detect_duplicates, DuplicateOptions};
use crate::model::{Document, Frame};

/// Options for a range query.
#[derive(Clone, Debug, Default)]
pub struct RangeOptions {
    /// First frame id; `None` means the document's first frame.
    pub start: Option<i64>,
    /// Last frame id; `None` means the document's last frame.
    pub end: Option<i64>,
    /// Labels excluded from the final count, matched case-insensitively.
    pub exclude_labels: Vec<String>,
    /// Duplicate detection thresholds.
    pub duplicates: DuplicateOptions,
}

impl FrameRange {
    /// Clamps a requested range to the document's frame ids.
    ///
    /// `start` is clamped into `[min_frame, max_frame]`; `end` is clamped
    /// into `[start, max_frame]`, so the range is never inverted.
    pub fn clamped(document: &Document, start: Option<i64>, end: Option<i64>) -> Self {
        let (min, max) = (document.min_frame, document.max_frame);
        let start = start.unwrap_or(min).min(max).max(min);
        let end = end.unwrap_or(max).min(max).max(start);
        Self { start, end }
    }

    /// True if `frame` has a valid id inside the range.
    pub fn contains(&self, frame: &Frame) -> bool {
        frame
            .id
            .is_some_and(|id| id >= self.start && id <= self.end)
    }
}

/// Compute statistics for the frames of `document` selected by `opts`.
pub fn range_stats(document: &Document, opts: &RangeOptions) -> RangeStats {
    let range = FrameRange::clamped(document, opts.start, opts.end);
    let frames: Vec<&Frame> = document
        .frames
        .iter()
        .filter(|f| range.contains(f))
        .collect();

    let exclude_set: HashSet<String> = opts
        .exclude_labels
        .iter()
        .map(|l| l.to_lowercase())
        .collect();

    let excl_area_count: usize = frames.iter().map(|f| f.excl_boxes).sum();
    let user_excluded_count: usize = frames
        .iter()
        .flat_map(|f| f.boxes.iter())
        .filter(|b| !b.label.is_empty() && exclude_set.contains(&b.label.to_lowercase()))
        .count();
    // A passed frame drops all of its boxes; otherwise only skip-labeled ones.
    let skipped_count: usize = frames
        .iter()
        .map(|f| if f.has_pass { f.total_boxes } else { f.skip_boxes })
        .sum();

    let exclude_count = excl_area_count + user_excluded_count + skipped_count;
    let total_boxes_count: usize = frames.iter().map(|f| f.total_boxes).sum();

    let box_ids = frames.iter().flat_map(|f| f.boxes.iter().filter_map(|b| b.id));
    let (first_box_id, last_box_id) = box_ids
        .fold(None, |acc: Option<(i64, i64)>, id| match acc {
            Some((lo, hi)) => Some((lo.min(id), hi.max(id))),
            None => Some((id, id)),
        })
        .map_or((None, None), |(lo, hi)| (Some(lo), Some(hi)));

    let duplicates = detect_duplicates(
        frames.iter().filter_map(|f| f.id.map(|id| (id, f.boxes.as_slice()))),
        &opts.duplicates,
    );

    RangeStats {
        range,
        exclude_count,
        total_boxes_count,
        total_after_exclude: total_boxes_count.saturating_sub(exclude_count),
        frames_with_skip_count: frames.iter().filter(|f| f.has_skip()).count(),
        first_box_id,
        last_box_id,
        total_frames: frames.len(),
        no_box_frames_count: frames.iter().map(|f| f.no_box()).sum(),
        duplicate_exact_100_count: duplicates.exact_count,
        duplicate_near_99_count: duplicates.near_count,
        labels: label_totals(&frames),
        duplicates: duplicates.pairs,
    }
}

/// Sum per-label counts, sorted by label, dropping zero totals.
fn label_totals(frames: &[&Frame]) -> Vec<LabelTotal> {
    let mut totals: BTreeMap<&str, usize> = BTreeMap::new();
    for frame in frames {
        for (label, count) in &frame.label_counts {
            *totals.entry(label.as_str()).or_insert(0) += count;
        }
    }

    totals
        .into_iter()
        .filter(|(_, total)| *total > 0)
        .map(|(label, total)| LabelTotal {
            label: label.to_string(),
            total,
        })
        .collect()
}
