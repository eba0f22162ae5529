//! Axis-aligned box geometry in CVAT's corner format.

use serde::{Deserialize, Serialize};

/// An axis-aligned bounding box given by its top-left and bottom-right
/// corners, in pixels.
///
/// Like CVAT itself, this type does NOT enforce `xtl <= xbr` or
/// `ytl <= ybr`. Inverted boxes are representable and simply have zero area.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub xtl: f64,
    pub ytl: f64,
    pub xbr: f64,
    pub ybr: f64,
}

impl BoxGeometry {
    /// Creates a new box from explicit corner coordinates.
    #[inline]
    pub fn new(xtl: f64, ytl: f64, xbr: f64, ybr: f64) -> Self {
        Self { xtl, ytl, xbr, ybr }
    }

    /// Returns the width of the box.
    ///
    /// May be negative if the box is inverted.
    #[inline]
    pub fn width(&self) -> f64 {
        self.xbr - self.xtl
    }

    /// Returns the height of the box.
    ///
    /// May be negative if the box is inverted.
    #[inline]
    pub fn height(&self) -> f64 {
        self.ybr - self.ytl
    }

    /// Returns the area of the box, clamping negative extents to zero.
    #[inline]
    pub fn area(&self) -> f64 {
        self.width().max(0.0) * self.height().max(0.0)
    }

    /// Area of the overlap with `other` (0 when the boxes are disjoint).
    pub fn intersection_area(&self, other: &BoxGeometry) -> f64 {
        let left = self.xtl.max(other.xtl);
        let top = self.ytl.max(other.ytl);
        let right = self.xbr.min(other.xbr);
        let bottom = self.ybr.min(other.ybr);

        (right - left).max(0.0) * (bottom - top).max(0.0)
    }

    /// Intersection over union with `other`.
    ///
    /// Returns 0 when the union is empty, which covers two degenerate boxes.
    pub fn iou(&self, other: &BoxGeometry) -> f64 {
        let inter = self.intersection_area(other);
        let union = self.area() + other.area() - inter;
        if union <= 0.0 {
            return 0.0;
        }
        inter / union
    }

    /// True if all four corners differ by at most `epsilon`.
    pub fn same_corners(&self, other: &BoxGeometry, epsilon: f64) -> bool {
        (self.xtl - other.xtl).abs() <= epsilon
            && (self.ytl - other.ytl).abs() <= epsilon
            && (self.xbr - other.xbr).abs() <= epsilon
            && (self.ybr - other.ybr).abs() <= epsilon
    }
}
