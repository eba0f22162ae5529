//! Parsed annotation document model.
//!
//! A [`Document`] is built once per loaded file and never mutated. All
//! per-frame fields the range aggregator needs are derived here, at
//! construction time.

use serde::Serialize;
use std::collections::BTreeMap;

use super::bbox::BoxGeometry;

/// Reserved label for boxes that are always excluded from final counts.
pub const EXCLUSION_AREA_LABEL: &str = "_excl_area";

/// Name of the per-label attribute that marks a whole frame as passed.
pub const PASS_ATTRIBUTE: &str = "pass";

/// A parsed annotation export.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Document {
    /// Smallest valid frame id (0 if no frame has a valid id).
    pub min_frame: i64,
    /// Largest valid frame id (0 if no frame has a valid id).
    pub max_frame: i64,
    /// Label definitions declared in the export.
    pub labels: LabelSchema,
    /// Frames in document order.
    pub frames: Vec<Frame>,
}

impl Document {
    /// Assembles a document, deriving the frame id bounds.
    pub fn new(labels: LabelSchema, frames: Vec<Frame>) -> Self {
        let ids = frames.iter().filter_map(|f| f.id);
        let (min_frame, max_frame) = ids
            .fold(None, |acc: Option<(i64, i64)>, id| match acc {
                Some((lo, hi)) => Some((lo.min(id), hi.max(id))),
                None => Some((id, id)),
            })
            .unwrap_or((0, 0));

        Self {
            min_frame,
            max_frame,
            labels,
            frames,
        }
    }

    /// Total number of boxes across all frames.
    pub fn box_count(&self) -> usize {
        self.frames.iter().map(|f| f.total_boxes).sum()
    }
}

/// Declared labels and their attribute names.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(transparent)]
pub struct LabelSchema {
    labels: BTreeMap<String, LabelDef>,
}

/// One declared label.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LabelDef {
    /// Non-empty attribute names in declaration order.
    pub attribute_names: Vec<String>,
    /// True if the label declares any attribute element, named or not.
    pub has_attributes: bool,
}

impl LabelDef {
    /// Position of the `pass` attribute among the declared names, if any.
    pub fn pass_index(&self) -> Option<usize> {
        self.attribute_names
            .iter()
            .position(|name| name.trim().eq_ignore_ascii_case(PASS_ATTRIBUTE))
    }
}

impl LabelSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a label definition. A later definition with the same name
    /// replaces the earlier one.
    pub fn insert(&mut self, name: impl Into<String>, def: LabelDef) {
        self.labels.insert(name.into(), def);
    }

    pub fn get(&self, name: &str) -> Option<&LabelDef> {
        self.labels.get(name)
    }

    pub fn has_attributes(&self, name: &str) -> bool {
        self.labels.get(name).is_some_and(|def| def.has_attributes)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Iterates labels in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &LabelDef)> {
        self.labels.iter().map(|(name, def)| (name.as_str(), def))
    }
}

/// One bounding-box annotation.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct BoxRecord {
    /// Declared or synthesized id; `None` if the declared id is not numeric.
    pub id: Option<i64>,
    /// Trimmed label; empty if the box declares none.
    pub label: String,
    /// Corner geometry; `None` if any coordinate failed to parse.
    pub geometry: Option<BoxGeometry>,
    /// Text of nested `<attribute>` elements, trimmed, in document order.
    pub attribute_values: Vec<String>,
}

impl BoxRecord {
    /// True if the label contains "skip" in any case.
    pub fn is_skip(&self) -> bool {
        self.label.to_lowercase().contains("skip")
    }

    /// True if the label is exactly the reserved exclusion-area label.
    pub fn is_exclusion_area(&self) -> bool {
        self.label == EXCLUSION_AREA_LABEL
    }

    /// True if the box's label declares a `pass` attribute and the value at
    /// the same position in this box is truthy.
    pub fn is_passed(&self, labels: &LabelSchema) -> bool {
        labels
            .get(&self.label)
            .and_then(LabelDef::pass_index)
            .and_then(|idx| self.attribute_values.get(idx))
            .is_some_and(|value| is_truthy(value))
    }
}

/// One annotated image or video frame.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Frame {
    /// Frame id; `None` if the declared id is not numeric.
    pub id: Option<i64>,
    pub name: String,
    pub boxes: Vec<BoxRecord>,
    /// Occurrences of each non-empty label.
    pub label_counts: BTreeMap<String, usize>,
    pub total_boxes: usize,
    /// Boxes labeled exactly `_excl_area`.
    pub excl_boxes: usize,
    /// Non-empty-label boxes whose label contains "skip".
    pub skip_boxes: usize,
    /// True if any box resolves a truthy `pass` attribute.
    pub has_pass: bool,
}

impl Frame {
    /// Builds a frame and derives its counters in one pass over `boxes`.
    pub fn new(
        id: Option<i64>,
        name: impl Into<String>,
        boxes: Vec<BoxRecord>,
        labels: &LabelSchema,
    ) -> Self {
        let mut label_counts = BTreeMap::new();
        let mut excl_boxes = 0;
        let mut skip_boxes = 0;
        let mut has_pass = false;

        for b in &boxes {
            if b.is_exclusion_area() {
                excl_boxes += 1;
            }
            if b.label.is_empty() {
                continue;
            }

            *label_counts.entry(b.label.clone()).or_insert(0) += 1;
            if b.is_skip() {
                skip_boxes += 1;
            }
            if !has_pass && b.is_passed(labels) {
                has_pass = true;
            }
        }

        Self {
            id,
            name: name.into(),
            total_boxes: boxes.len(),
            boxes,
            label_counts,
            excl_boxes,
            skip_boxes,
            has_pass,
        }
    }

    /// True if the frame has no boxes at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total_boxes == 0
    }

    /// 1 for an empty frame, else 0.
    #[inline]
    pub fn no_box(&self) -> usize {
        usize::from(self.is_empty())
    }

    /// True if the frame is empty, has a skip-labeled box, or is passed.
    pub fn has_skip(&self) -> bool {
        self.is_empty() || self.boxes.iter().any(BoxRecord::is_skip) || self.has_pass
    }
}

/// True for the tokens CVAT checkbox attributes serialize to when set.
pub fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "y" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labeled(label: &str) -> BoxRecord {
        BoxRecord {
            label: label.to_string(),
            ..Default::default()
        }
    }

    fn schema_with_pass() -> LabelSchema {
        let mut schema = LabelSchema::new();
        schema.insert(
            "car",
            LabelDef {
                attribute_names: vec!["color".to_string(), " Pass ".to_string()],
                has_attributes: true,
            },
        );
        schema
    }

    #[test]
    fn truthy_tokens() {
        for v in ["true", "1", "YES", " y ", "On"] {
            assert!(is_truthy(v), "{v}");
        }
        for v in ["", "false", "0", "no", "2", "passed"] {
            assert!(!is_truthy(v), "{v}");
        }
    }

    #[test]
    fn frame_derives_counts() {
        let schema = LabelSchema::new();
        let boxes = vec![
            labeled("car"),
            labeled("car"),
            labeled("Skip_me"),
            labeled("_excl_area"),
            labeled("_EXCL_AREA"),
            labeled(""),
        ];
        let frame = Frame::new(Some(3), "f.jpg", boxes, &schema);

        assert_eq!(frame.total_boxes, 6);
        assert_eq!(frame.label_counts.get("car"), Some(&2));
        assert_eq!(frame.label_counts.get(""), None);
        assert_eq!(frame.skip_boxes, 1);
        assert_eq!(frame.excl_boxes, 1);
        assert_eq!(frame.no_box(), 0);
        assert!(frame.has_skip());
        assert!(!frame.has_pass);
    }

    #[test]
    fn pass_resolves_positionally() {
        let schema = schema_with_pass();
        let passed = BoxRecord {
            label: "car".to_string(),
            attribute_values: vec!["red".to_string(), "yes".to_string()],
            ..Default::default()
        };
        let not_passed = BoxRecord {
            label: "car".to_string(),
            attribute_values: vec!["yes".to_string()],
            ..Default::default()
        };
        assert!(passed.is_passed(&schema));
        assert!(!not_passed.is_passed(&schema));

        let frame = Frame::new(Some(1), "", vec![not_passed, passed], &schema);
        assert!(frame.has_pass);
        assert!(frame.has_skip());
    }

    #[test]
    fn empty_frame() {
        let frame = Frame::new(Some(0), "", vec![], &LabelSchema::new());
        assert!(frame.is_empty());
        assert_eq!(frame.no_box(), 1);
        assert!(frame.has_skip());
    }

    #[test]
    fn document_bounds_ignore_invalid_ids() {
        let schema = LabelSchema::new();
        let frames = vec![
            Frame::new(Some(4), "", vec![], &schema),
            Frame::new(None, "", vec![], &schema),
            Frame::new(Some(-2), "", vec![], &schema),
        ];
        let doc = Document::new(schema, frames);
        assert_eq!((doc.min_frame, doc.max_frame), (-2, 4));

        let empty = Document::new(LabelSchema::new(), vec![Frame::new(None, "", vec![], &LabelSchema::new())]);
        assert_eq!((empty.min_frame, empty.max_frame), (0, 0));
    }
}
