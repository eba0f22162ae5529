#![allow(dead_code)]

use std::fmt::Write;

use proptest::prelude::*;
use proptest::strategy::BoxedStrategy;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

use boxcount::model::BoxGeometry;

/// Labels drawn for generated boxes. Covers the exclusion area, a skip
/// label, the passable `car` and two case variants of the same word.
pub const LABEL_POOL: [&str; 6] = ["car", "rider", "Rider", "skip_frame", "_excl_area", "truck"];

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

#[derive(Clone, Debug)]
pub struct GenBox {
    pub label: &'static str,
    pub geometry: BoxGeometry,
    pub passed: bool,
}

#[derive(Clone, Debug)]
pub struct GenFrame {
    pub boxes: Vec<GenBox>,
}

/// A generated export: consecutive frame ids starting at `first_frame`.
#[derive(Clone, Debug)]
pub struct GenExport {
    pub first_frame: i64,
    pub frames: Vec<GenFrame>,
}

impl GenExport {
    pub fn last_frame(&self) -> i64 {
        self.first_frame + self.frames.len() as i64 - 1
    }

    pub fn box_count(&self) -> usize {
        self.frames.iter().map(|f| f.boxes.len()).sum()
    }

    /// Render as CVAT XML. Box ids are assigned 1.. in document order.
    pub fn to_xml(&self) -> String {
        let mut xml = String::from(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<annotations>\n  <meta><task><labels>\n",
        );
        xml.push_str(
            "    <label><name>car</name><attributes>\
             <attribute><name>pass</name></attribute>\
             </attributes></label>\n",
        );
        for label in LABEL_POOL.iter().filter(|l| **l != "car") {
            let _ = writeln!(xml, "    <label><name>{label}</name></label>");
        }
        xml.push_str("  </labels></task></meta>\n");

        let mut next_id = 1;
        for (offset, frame) in self.frames.iter().enumerate() {
            let _ = writeln!(
                xml,
                "  <image id=\"{}\" name=\"frame_{offset:04}.jpg\">",
                self.first_frame + offset as i64
            );
            for b in &frame.boxes {
                let g = &b.geometry;
                let _ = write!(
                    xml,
                    "    <box id=\"{next_id}\" label=\"{}\" xtl=\"{}\" ytl=\"{}\" xbr=\"{}\" ybr=\"{}\">",
                    b.label, g.xtl, g.ytl, g.xbr, g.ybr
                );
                if b.label == "car" {
                    let _ = write!(xml, "<attribute name=\"pass\">{}</attribute>", b.passed);
                }
                xml.push_str("</box>\n");
                next_id += 1;
            }
            xml.push_str("  </image>\n");
        }
        xml.push_str("</annotations>\n");
        xml
    }
}

pub fn arb_geometry() -> BoxedStrategy<BoxGeometry> {
    (0.0f64..500.0, 0.0f64..500.0, 0.5f64..200.0, 0.5f64..200.0)
        .prop_map(|(x, y, w, h)| BoxGeometry::new(x, y, x + w, y + h))
        .boxed()
}

pub fn arb_box() -> BoxedStrategy<GenBox> {
    (
        proptest::sample::select(LABEL_POOL.to_vec()),
        arb_geometry(),
        proptest::bool::weighted(0.1),
    )
        .prop_map(|(label, geometry, passed)| GenBox {
            label,
            geometry,
            passed,
        })
        .boxed()
}

pub fn arb_export(max_frames: usize, max_boxes: usize) -> BoxedStrategy<GenExport> {
    let frame = proptest::collection::vec(arb_box(), 0..=max_boxes)
        .prop_map(|boxes| GenFrame { boxes });
    (-20i64..20, proptest::collection::vec(frame, 1..=max_frames))
        .prop_map(|(first_frame, frames)| GenExport {
            first_frame,
            frames,
        })
        .boxed()
}
