//! Content-overlap similarity over rasterized salient-content regions.

use crate::core::types::{Canvas, DiscreteBBox};

/// Added to both intersection and union so that two layouts without any
/// content regions score 1.0 instead of 0/0.
pub const CONTENT_IOU_SMOOTHING: f64 = 1.0;

/// Binary occupancy grid the size of a canvas
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Raster {
    canvas: Canvas,
    cells: Vec<bool>,
}

impl Raster {
    #[must_use]
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            cells: vec![false; canvas.area()],
        }
    }

    /// Rasterize LTWH grid boxes as filled rectangles.
    ///
    /// Both corners are inclusive, so a `w`×`h` box covers `(w+1)×(h+1)`
    /// cells. Parts outside the canvas are clipped.
    #[must_use]
    pub fn from_boxes(canvas: Canvas, boxes: &[DiscreteBBox]) -> Self {
        let mut raster = Self::new(canvas);
        for b in boxes {
            raster.fill(*b);
        }
        raster
    }

    /// Fill one LTWH box
    #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
    pub fn fill(&mut self, b: DiscreteBBox) {
        let [l, t, w, h] = b;
        let max_x = i64::from(self.canvas.width) - 1;
        let max_y = i64::from(self.canvas.height) - 1;

        let (x0, x1) = ordered(l, l.saturating_add(w));
        let (y0, y1) = ordered(t, t.saturating_add(h));
        if max_x < 0 || max_y < 0 || x1 < 0 || y1 < 0 || x0 > max_x || y0 > max_y {
            return;
        }

        let width = self.canvas.width as usize;
        for y in y0.max(0)..=y1.min(max_y) {
            let row = y as usize * width;
            for x in x0.max(0)..=x1.min(max_x) {
                self.cells[row + x as usize] = true;
            }
        }
    }

    /// Number of filled cells
    #[must_use]
    pub fn count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }

    /// (intersection, union) cell counts with another raster of the same canvas
    #[must_use]
    pub fn overlap(&self, other: &Self) -> (usize, usize) {
        self.cells
            .iter()
            .zip(&other.cells)
            .fold((0, 0), |(inter, union), (a, b)| {
                (inter + usize::from(*a && *b), union + usize::from(*a || *b))
            })
    }
}

fn ordered(a: i64, b: i64) -> (i64, i64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Smoothed intersection-over-union of two sets of content regions:
/// `(|A∩B| + 1) / (|A∪B| + 1)` over canvas cells.
#[must_use]
pub fn content_iou(a: &[DiscreteBBox], b: &[DiscreteBBox], canvas: Canvas) -> f64 {
    let (inter, union) = Raster::from_boxes(canvas, a).overlap(&Raster::from_boxes(canvas, b));
    raster_iou(inter, union)
}

#[allow(clippy::cast_precision_loss)]
fn raster_iou(inter: usize, union: usize) -> f64 {
    (inter as f64 + CONTENT_IOU_SMOOTHING) / (union as f64 + CONTENT_IOU_SMOOTHING)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CANVAS: Canvas = Canvas::new(10, 10);

    #[test]
    fn test_fill_is_inclusive() {
        let raster = Raster::from_boxes(CANVAS, &[[0, 0, 1, 1]]);
        assert_eq!(raster.count(), 4);
    }

    #[test]
    fn test_fill_clips_to_canvas() {
        let raster = Raster::from_boxes(CANVAS, &[[8, 8, 5, 5]]);
        assert_eq!(raster.count(), 4);
        let outside = Raster::from_boxes(CANVAS, &[[20, 20, 2, 2], [-5, -5, 2, 2]]);
        assert_eq!(outside.count(), 0);
    }

    #[test]
    fn test_fill_extreme_coordinates_saturate() {
        let far = Raster::from_boxes(CANVAS, &[[i64::MAX, 0, 1, 1], [0, i64::MAX, i64::MAX, 1]]);
        assert_eq!(far.count(), 0);

        // ends at x = -1, left of the canvas
        let huge = Raster::from_boxes(CANVAS, &[[i64::MIN, i64::MIN, i64::MAX, i64::MAX]]);
        assert_eq!(huge.count(), 0);
        let across = Raster::from_boxes(CANVAS, &[[-5, 0, i64::MAX, 0]]);
        assert_eq!(across.count(), 10);

        // the off-canvas box contributes nothing: (0 + 1) / (4 + 1)
        let iou = content_iou(&[[i64::MAX, 0, 1, 1]], &[[0, 0, 1, 1]], CANVAS);
        assert!((iou - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_content_iou_identical() {
        let boxes = [[1, 1, 3, 3]];
        assert!((content_iou(&boxes, &boxes, CANVAS) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_content_iou_both_empty_is_one() {
        assert!((content_iou(&[], &[], CANVAS) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_content_iou_disjoint() {
        // 4 cells each, no overlap: (0 + 1) / (8 + 1)
        let iou = content_iou(&[[0, 0, 1, 1]], &[[5, 5, 1, 1]], CANVAS);
        assert!((iou - 1.0 / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_content_iou_partial() {
        // A covers x 0..=1, B covers x 1..=2, both y 0..=1: inter 2, union 6
        let iou = content_iou(&[[0, 0, 1, 1]], &[[1, 0, 1, 1]], CANVAS);
        assert!((iou - 3.0 / 7.0).abs() < 1e-12);
    }
}
