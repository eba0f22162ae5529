//! CVAT XML reader.
//!
//! This reader is deliberately tolerant. It accepts CVAT "for images" task
//! exports as well as video exports and hand-edited files:
//! - every `<image>` element anywhere in the tree is a frame
//! - every `<box>` nested under a frame is a box of that frame
//! - every `<label>` element declares a label and its `<attribute>` names
//!
//! Anything else (polygons, tracks, tags) is ignored. Malformed numbers do
//! not fail the parse; they leave the affected field empty.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use log::debug;
use roxmltree::{Document as XmlDocument, Node, NodeId, ParsingOptions};

use super::document::{BoxRecord, Document, Frame, LabelDef, LabelSchema};
use super::lenient::{parse_float_prefix, parse_int_prefix};
use super::BoxGeometry;
use crate::error::BoxCountError;

/// Attributes consulted for a box's label, in priority order.
const LABEL_ATTRIBUTES: [&str; 3] = ["label", "label_name", "name"];

/// Parse CVAT XML from a string.
pub fn from_cvat_xml_str(xml: &str) -> Result<Document, BoxCountError> {
    parse_cvat_xml_str(xml, Path::new("<string>"))
}

/// Parse CVAT XML from bytes (must be valid UTF-8).
pub fn from_cvat_xml_slice(bytes: &[u8]) -> Result<Document, BoxCountError> {
    let xml = std::str::from_utf8(bytes).map_err(|source| BoxCountError::MalformedXml {
        path: PathBuf::from("<bytes>"),
        message: format!("input is not valid UTF-8: {source}"),
    })?;
    parse_cvat_xml_str(xml, Path::new("<bytes>"))
}

/// Parse CVAT XML text, attributing errors to `path`.
pub fn parse_cvat_xml_str(xml: &str, path: &Path) -> Result<Document, BoxCountError> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml_doc = XmlDocument::parse_with_options(xml, options).map_err(|source| {
        BoxCountError::MalformedXml {
            path: path.to_path_buf(),
            message: source.to_string(),
        }
    })?;

    let image_nodes: Vec<Node<'_, '_>> = xml_doc
        .descendants()
        .filter(|n| n.has_tag_name("image"))
        .collect();
    if image_nodes.is_empty() {
        return Err(BoxCountError::NoFrames {
            path: path.to_path_buf(),
        });
    }

    let labels = extract_label_schema(&xml_doc);
    let box_ids = resolve_box_ids(&xml_doc);

    let frames: Vec<Frame> = image_nodes
        .into_iter()
        .enumerate()
        .map(|(position, node)| parse_image_element(node, position, &box_ids, &labels))
        .collect();

    let document = Document::new(labels, frames);
    debug!(
        "parsed {}: {} frame(s), {} box(es), {} label(s), frame ids {}..={}",
        path.display(),
        document.frames.len(),
        document.box_count(),
        document.labels.len(),
        document.min_frame,
        document.max_frame
    );

    Ok(document)
}

/// Collects `<label>` definitions from anywhere in the document.
fn extract_label_schema(xml_doc: &XmlDocument<'_>) -> LabelSchema {
    let mut schema = LabelSchema::new();

    for label_node in xml_doc.descendants().filter(|n| n.has_tag_name("label")) {
        let name = element_name(label_node);

        let attr_nodes: Vec<Node<'_, '_>> = label_node
            .descendants()
            .filter(|n| n.has_tag_name("attribute"))
            .collect();

        let attribute_names = attr_nodes
            .iter()
            .map(|n| element_name(*n))
            .filter(|n| !n.is_empty())
            .collect();

        schema.insert(
            name,
            LabelDef {
                attribute_names,
                has_attributes: !attr_nodes.is_empty(),
            },
        );
    }

    schema
}

/// Resolves the id of every `<box>` in document order.
///
/// Boxes without an `id` attribute get their 1-based position among all
/// boxes of the document, so numbering never restarts per frame.
fn resolve_box_ids(xml_doc: &XmlDocument<'_>) -> HashMap<NodeId, Option<i64>> {
    xml_doc
        .descendants()
        .filter(|n| n.has_tag_name("box"))
        .enumerate()
        .map(|(idx, node)| {
            let id = match node.attribute("id").filter(|raw| !raw.is_empty()) {
                Some(raw) => parse_int_prefix(raw),
                None => i64::try_from(idx + 1).ok(),
            };
            (node.id(), id)
        })
        .collect()
}

fn parse_image_element(
    node: Node<'_, '_>,
    position: usize,
    box_ids: &HashMap<NodeId, Option<i64>>,
    labels: &LabelSchema,
) -> Frame {
    let id = match node.attribute("id").filter(|raw| !raw.is_empty()) {
        Some(raw) => parse_int_prefix(raw),
        None => i64::try_from(position).ok(),
    };
    let name = node.attribute("name").unwrap_or("");

    let boxes = node
        .descendants()
        .filter(|n| n.has_tag_name("box"))
        .map(|box_node| parse_box_element(box_node, box_ids))
        .collect();

    Frame::new(id, name, boxes, labels)
}

fn parse_box_element(node: Node<'_, '_>, box_ids: &HashMap<NodeId, Option<i64>>) -> BoxRecord {
    let label = LABEL_ATTRIBUTES
        .iter()
        .filter_map(|attr| node.attribute(*attr))
        .find(|raw| !raw.is_empty())
        .unwrap_or("")
        .trim()
        .to_string();

    let coord = |attr: &str| node.attribute(attr).and_then(parse_float_prefix);
    let geometry = match (coord("xtl"), coord("ytl"), coord("xbr"), coord("ybr")) {
        (Some(xtl), Some(ytl), Some(xbr), Some(ybr)) => {
            Some(BoxGeometry::new(xtl, ytl, xbr, ybr))
        }
        _ => None,
    };

    let attribute_values = node
        .descendants()
        .filter(|n| n.has_tag_name("attribute"))
        .map(|n| text_content(n).trim().to_string())
        .collect();

    BoxRecord {
        id: box_ids.get(&node.id()).copied().flatten(),
        label,
        geometry,
        attribute_values,
    }
}

/// Name of a `<label>` or `<attribute>` definition: the first descendant
/// `<name>` element's text, falling back to the `name` attribute.
fn element_name(node: Node<'_, '_>) -> String {
    let from_child = node
        .descendants()
        .find(|n| n.has_tag_name("name"))
        .map(|n| text_content(n).trim().to_string())
        .unwrap_or_default();

    if from_child.is_empty() {
        node.attribute("name").unwrap_or("").to_string()
    } else {
        from_child
    }
}

/// Concatenated text of all descendant text nodes.
fn text_content(node: Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect()
}
