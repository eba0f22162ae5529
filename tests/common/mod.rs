#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Write};
use std::path::Path;

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A small task export exercising every exclusion rule.
///
/// Frame 0: two identical cars, one `_excl_area`.
/// Frame 1: a passed car plus a rider.
/// Frame 2: empty.
/// Frame 3: a skip box, a Rider and a box with broken geometry.
pub const SAMPLE_XML: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<annotations>
  <version>1.1</version>
  <meta>
    <task>
      <labels>
        <label>
          <name>car</name>
          <attributes>
            <attribute><name>occluded_by</name></attribute>
            <attribute><name>pass</name></attribute>
          </attributes>
        </label>
        <label><name>rider</name></label>
        <label><name>skip_frame</name></label>
      </labels>
    </task>
  </meta>
  <image id="0" name="f0.jpg" width="100" height="100">
    <box id="1" label="car" xtl="0" ytl="0" xbr="10" ybr="10"/>
    <box id="2" label="car" xtl="0" ytl="0" xbr="10" ybr="10"/>
    <box id="3" label="_excl_area" xtl="50" ytl="50" xbr="90" ybr="90"/>
  </image>
  <image id="1" name="f1.jpg" width="100" height="100">
    <box id="4" label="car" xtl="0" ytl="0" xbr="10" ybr="10">
      <attribute name="occluded_by">none</attribute>
      <attribute name="pass">true</attribute>
    </box>
    <box id="5" label="rider" xtl="20" ytl="20" xbr="30" ybr="30"/>
  </image>
  <image id="2" name="f2.jpg" width="100" height="100"></image>
  <image id="3" name="f3.jpg" width="100" height="100">
    <box id="6" label="skip_frame" xtl="0" ytl="0" xbr="100" ybr="100"/>
    <box id="7" label="Rider" xtl="20" ytl="20" xbr="30" ybr="30"/>
    <box id="8" label="car" xtl="oops" ytl="0" xbr="10" ybr="10"/>
  </image>
</annotations>
"#;

/// Builds an in-memory ZIP archive from `(name, content)` entries.
pub fn zip_bytes(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, content) in entries {
        writer.start_file(*name, options).expect("start zip entry");
        writer
            .write_all(content.as_bytes())
            .expect("write zip entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

pub fn write_file(path: &Path, bytes: &[u8]) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dir");
    }
    fs::write(path, bytes).expect("write file");
}
