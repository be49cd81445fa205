//! Bounding-box helpers: coordinate-convention conversion, canvas
//! normalization and grid quantization.
//!
//! The similarity metrics never convert boxes themselves. Everything here is
//! meant to be applied by the caller before layouts are compared, so that both
//! sides of a comparison share one convention and one scale.

use crate::core::types::{BBox, BoxFormat, Canvas, DiscreteBBox};

/// Convert a left-top-width-height box to left-top-right-bottom
#[must_use]
pub fn ltwh_to_ltrb(b: BBox) -> BBox {
    [b[0], b[1], b[0] + b[2], b[1] + b[3]]
}

/// Convert a left-top-right-bottom box to left-top-width-height
#[must_use]
pub fn ltrb_to_ltwh(b: BBox) -> BBox {
    [b[0], b[1], b[2] - b[0], b[3] - b[1]]
}

/// Convert a box between conventions (no-op when they agree)
#[must_use]
pub fn convert(b: BBox, from: BoxFormat, to: BoxFormat) -> BBox {
    match (from, to) {
        (BoxFormat::Ltwh, BoxFormat::Ltrb) => ltwh_to_ltrb(b),
        (BoxFormat::Ltrb, BoxFormat::Ltwh) => ltrb_to_ltwh(b),
        _ => b,
    }
}

/// Width and height of a box in the given convention
#[must_use]
pub fn size(b: &BBox, format: BoxFormat) -> [f64; 2] {
    match format {
        BoxFormat::Ltwh => [b[2], b[3]],
        BoxFormat::Ltrb => [b[2] - b[0], b[3] - b[1]],
    }
}

/// Scale absolute coordinates into the unit square of a `width` x `height` canvas.
///
/// Works for both conventions since every component is either horizontal or
/// vertical. Returns `None` if either canvas dimension is not positive.
#[must_use]
pub fn normalize(b: BBox, width: f64, height: f64) -> Option<BBox> {
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    Some([b[0] / width, b[1] / height, b[2] / width, b[3] / height])
}

/// Quantize a unit-square box onto the canvas grid.
///
/// Coordinates are clipped to `[0, 1]` first, then floored, so a box
/// narrower than one grid cell collapses to zero size.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn discretize(b: BBox, canvas: Canvas) -> DiscreteBBox {
    let w = f64::from(canvas.width);
    let h = f64::from(canvas.height);
    let q = |v: f64, scale: f64| (v.clamp(0.0, 1.0) * scale).floor() as i64;
    [q(b[0], w), q(b[1], h), q(b[2], w), q(b[3], h)]
}
