//! Range statistics report types and terminal formatting.
//!
//! The report is plain data: it serializes to JSON for programmatic use and
//! renders as boxed text sections in the terminal.

use serde::Serialize;
use std::fmt;

use crate::duplicates::{DuplicateKind, DuplicatePair};

/// Placeholder shown when no box id exists in the range.
const NO_ID: &str = "—";

/// The inclusive frame id range a report covers, after clamping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct FrameRange {
    pub start: i64,
    pub end: i64,
}

/// Total boxes for one label across the range.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelTotal {
    pub label: String,
    pub total: usize,
}

/// The result of aggregating a frame range.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RangeStats {
    /// Frame ids actually covered.
    pub range: FrameRange,
    /// Boxes excluded by `_excl_area`, user labels and skip/pass rules.
    pub exclude_count: usize,
    /// All boxes in the range, including those with unreadable geometry.
    pub total_boxes_count: usize,
    /// `total_boxes_count - exclude_count`, floored at zero.
    pub total_after_exclude: usize,
    /// Frames that are empty, contain a skip label, or are passed.
    pub frames_with_skip_count: usize,
    /// Smallest box id in the range.
    pub first_box_id: Option<i64>,
    /// Largest box id in the range.
    pub last_box_id: Option<i64>,
    /// Frames in the range.
    pub total_frames: usize,
    /// Frames in the range without any box.
    pub no_box_frames_count: usize,
    pub duplicate_exact_100_count: usize,
    pub duplicate_near_99_count: usize,
    /// Per-label totals, sorted by label.
    pub labels: Vec<LabelTotal>,
    /// Matched duplicate pairs.
    pub duplicates: Vec<DuplicatePair>,
}

impl RangeStats {
    /// Returns a view that also lists per-label totals and duplicate pairs.
    pub fn detailed(&self) -> DetailedRangeStats<'_> {
        DetailedRangeStats(self)
    }

    fn fmt_summary(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("Frames {}..={}", self.range.start, self.range.end);
        writeln!(f, "┌─ {} {}┐", header, "─".repeat(56usize.saturating_sub(header.chars().count())))?;
        row(f, "Frames", self.total_frames)?;
        row(f, "Frames with skip", self.frames_with_skip_count)?;
        row(f, "Empty frames", self.no_box_frames_count)?;
        writeln!(f, "│{:59}│", "")?;
        row(f, "Total boxes", self.total_boxes_count)?;
        row(f, "Excluded", self.exclude_count)?;
        row(f, "After exclusions", self.total_after_exclude)?;
        writeln!(f, "│{:59}│", "")?;
        row(f, "First box id", fmt_id(self.first_box_id))?;
        row(f, "Last box id", fmt_id(self.last_box_id))?;
        writeln!(f, "│{:59}│", "")?;
        row(f, "Duplicates (exact)", self.duplicate_exact_100_count)?;
        row(f, "Duplicates (IoU)", self.duplicate_near_99_count)?;
        writeln!(f, "└{}┘", "─".repeat(59))
    }

    fn fmt_labels(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("Labels ({})", self.labels.len());
        writeln!(f, "┌─ {} {}┐", header, "─".repeat(56usize.saturating_sub(header.chars().count())))?;
        if self.labels.is_empty() {
            writeln!(f, "│   {:<56}│", "No labeled boxes in range.")?;
        }
        for entry in &self.labels {
            row(f, &truncate_label(&entry.label, 30), entry.total)?;
        }
        writeln!(f, "└{}┘", "─".repeat(59))
    }

    fn fmt_duplicates(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header = format!("Duplicate pairs ({})", self.duplicates.len());
        writeln!(f, "┌─ {} {}┐", header, "─".repeat(56usize.saturating_sub(header.chars().count())))?;
        if self.duplicates.is_empty() {
            writeln!(f, "│   {:<56}│", "No duplicate boxes in range.")?;
        }
        for pair in &self.duplicates {
            let kind = match pair.kind {
                DuplicateKind::Exact => "exact",
                DuplicateKind::Near => "IoU",
            };
            let line = format!(
                "frame {}: {} <-> {} ({kind})",
                pair.frame_id, pair.box_a, pair.box_b
            );
            writeln!(f, "│   {:<56}│", line)?;
        }
        writeln!(f, "└{}┘", "─".repeat(59))
    }
}

impl fmt::Display for RangeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_summary(f)
    }
}

/// Display wrapper for the full report.
pub struct DetailedRangeStats<'a>(&'a RangeStats);

impl fmt::Display for DetailedRangeStats<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt_summary(f)?;
        writeln!(f)?;
        self.0.fmt_labels(f)?;
        writeln!(f)?;
        self.0.fmt_duplicates(f)
    }
}

fn row(f: &mut fmt::Formatter<'_>, name: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "│   {:<32} {:>22} │", format!("{name}:"), value.to_string())
}

fn fmt_id(id: Option<i64>) -> String {
    id.map_or_else(|| NO_ID.to_string(), |id| id.to_string())
}

fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        label.to_string()
    } else {
        let cut: String = label.chars().take(max - 1).collect();
        format!("{cut}…")
    }
}
