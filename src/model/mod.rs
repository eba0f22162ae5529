//! In-memory model of a CVAT annotation export.
//!
//! The model keeps only what box statistics need: frames, their boxes and
//! the declared label schema. Each [`Frame`] carries counters derived at
//! parse time, so range queries never revisit the XML.
//!
//! # Example
//!
//! ```
//! use boxcount::model::io_cvat_xml::from_cvat_xml_str;
//!
//! let xml = r#"<annotations>
//!   <image id="1" name="a.jpg">
//!     <box label="car" xtl="0" ytl="0" xbr="10" ybr="10"/>
//!   </image>
//! </annotations>"#;
//!
//! let doc = from_cvat_xml_str(xml).unwrap();
//! assert_eq!(doc.frames[0].label_counts["car"], 1);
//! ```

mod bbox;
mod document;
mod ids;
pub mod io_cvat_xml;
mod lenient;

pub use bbox::BoxGeometry;
pub use document::{
    is_truthy, BoxRecord, Document, Frame, LabelDef, LabelSchema, EXCLUSION_AREA_LABEL,
    PASS_ATTRIBUTE,
};
pub use ids::BoxRef;
pub use lenient::{parse_float_prefix, parse_int_prefix};
