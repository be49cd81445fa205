//! Centralized validation of layouts read from untrusted files.

use crate::core::layout::Layout;
use crate::core::types::{BoxFormat, Canvas, DiscreteBBox};

/// Maximum number of elements allowed in a single layout (DOS protection)
pub const MAX_ELEMENTS: usize = 1_000;

/// Maximum number of layouts allowed in a single corpus file
pub const MAX_LAYOUTS: usize = 1_000_000;

/// Maximum number of cells in a rasterized canvas (4096 x 4096)
pub const MAX_CANVAS_AREA: usize = 1 << 24;

/// Largest magnitude allowed for a grid coordinate or size
pub const MAX_GRID_COORDINATE: i64 = 1 << 20;

/// Layout validation error types
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Layout has {labels} labels but {boxes} bounding boxes")]
    BoxCountMismatch { labels: usize, boxes: usize },

    #[error("Layout has {expected} elements but {field} has {actual} entries")]
    FieldLengthMismatch {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Non-finite coordinate in element {element}")]
    NonFiniteCoordinate { element: usize },

    #[error("Negative box size in element {element}")]
    NegativeSize { element: usize },

    #[error("Too many elements: {0} exceeds maximum of {MAX_ELEMENTS}")]
    TooManyElements(usize),

    #[error("Too many layouts: exceeds maximum of {MAX_LAYOUTS}")]
    TooManyLayouts,

    #[error("Too many content boxes: {0} exceeds maximum of {MAX_ELEMENTS}")]
    TooManyContentBoxes(usize),

    #[error("Invalid {field} entry {index}: sizes must be non-negative and coordinates within {MAX_GRID_COORDINATE}")]
    InvalidGridBox { field: &'static str, index: usize },

    #[error("Canvas {width}x{height} must cover between 1 and {MAX_CANVAS_AREA} cells")]
    InvalidCanvas { width: u32, height: u32 },
}

/// Check if adding another layout would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new layout.
///
/// # Errors
///
/// Returns `ValidationError::TooManyLayouts` if the limit is reached.
pub fn check_layout_limit(count: usize) -> Result<(), ValidationError> {
    if count >= MAX_LAYOUTS {
        Err(ValidationError::TooManyLayouts)
    } else {
        Ok(())
    }
}

/// Check that a canvas is non-empty and small enough to rasterize.
///
/// # Errors
///
/// Returns `ValidationError::InvalidCanvas` for a zero-area canvas or one
/// larger than [`MAX_CANVAS_AREA`].
pub fn check_canvas(canvas: Canvas) -> Result<(), ValidationError> {
    let area = canvas.area();
    if area == 0 || area > MAX_CANVAS_AREA {
        Err(ValidationError::InvalidCanvas {
            width: canvas.width,
            height: canvas.height,
        })
    } else {
        Ok(())
    }
}

/// Validate the structure of a layout.
///
/// Checks:
/// - element count is within [`MAX_ELEMENTS`]
/// - every per-element field has one entry per label
/// - every coordinate is finite and widths/heights are non-negative
///   (LTWH layouts only)
/// - grid boxes stay within [`MAX_GRID_COORDINATE`]; content boxes are
///   LTWH with non-negative sizes
///
/// Content boxes describe the canvas, not the elements, so their count only
/// has the [`MAX_ELEMENTS`] cap.
///
/// # Errors
///
/// Returns the first problem found.
pub fn validate_layout(layout: &Layout) -> Result<(), ValidationError> {
    let n = layout.labels.len();
    if n > MAX_ELEMENTS {
        return Err(ValidationError::TooManyElements(n));
    }
    if layout.bounding_boxes.len() != n {
        return Err(ValidationError::BoxCountMismatch {
            labels: n,
            boxes: layout.bounding_boxes.len(),
        });
    }

    check_len("depth", n, layout.depth.as_ref().map(Vec::len))?;
    check_len("rotation", n, layout.rotation.as_ref().map(Vec::len))?;
    check_len(
        "text_alignment",
        n,
        layout.text_alignment.as_ref().map(Vec::len),
    )?;
    check_len(
        "discrete_bounding_boxes",
        n,
        layout.discrete_bounding_boxes.as_ref().map(Vec::len),
    )?;

    let is_ltwh = layout.box_format == BoxFormat::Ltwh;
    for (element, bbox) in layout.bounding_boxes.iter().enumerate() {
        if bbox.iter().any(|v| !v.is_finite()) {
            return Err(ValidationError::NonFiniteCoordinate { element });
        }
        if is_ltwh && (bbox[2] < 0.0 || bbox[3] < 0.0) {
            return Err(ValidationError::NegativeSize { element });
        }
    }

    if let Some(discrete) = &layout.discrete_bounding_boxes {
        check_grid_boxes("discrete_bounding_boxes", discrete, is_ltwh)?;
    }
    if let Some(content) = &layout.discrete_content_bounding_boxes {
        if content.len() > MAX_ELEMENTS {
            return Err(ValidationError::TooManyContentBoxes(content.len()));
        }
        check_grid_boxes("discrete_content_bounding_boxes", content, true)?;
    }

    Ok(())
}

fn check_grid_boxes(
    field: &'static str,
    boxes: &[DiscreteBBox],
    sizes_non_negative: bool,
) -> Result<(), ValidationError> {
    for (index, b) in boxes.iter().enumerate() {
        let out_of_range = b
            .iter()
            .any(|v| v.unsigned_abs() > MAX_GRID_COORDINATE.unsigned_abs());
        if out_of_range || (sizes_non_negative && (b[2] < 0 || b[3] < 0)) {
            return Err(ValidationError::InvalidGridBox { field, index });
        }
    }
    Ok(())
}

fn check_len(
    field: &'static str,
    expected: usize,
    actual: Option<usize>,
) -> Result<(), ValidationError> {
    match actual {
        Some(actual) if actual != expected => Err(ValidationError::FieldLengthMismatch {
            field,
            expected,
            actual,
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_layout() {
        let layout = Layout::new(vec![1, 2], vec![[0.1, 0.1, 0.2, 0.2], [0.5, 0.5, 0.1, 0.1]])
            .with_depth(vec![0, 1]);
        assert!(validate_layout(&layout).is_ok());
    }

    #[test]
    fn test_box_count_mismatch() {
        let layout = Layout::new(vec![1, 2], vec![[0.1, 0.1, 0.2, 0.2]]);
        assert_eq!(
            validate_layout(&layout),
            Err(ValidationError::BoxCountMismatch { labels: 2, boxes: 1 })
        );
    }

    #[test]
    fn test_field_length_mismatch() {
        let layout = Layout::new(vec![1], vec![[0.1, 0.1, 0.2, 0.2]]).with_rotation(vec![0.0, 90.0]);
        assert!(matches!(
            validate_layout(&layout),
            Err(ValidationError::FieldLengthMismatch {
                field: "rotation",
                expected: 1,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_non_finite_and_negative() {
        let layout = Layout::new(vec![1], vec![[f64::NAN, 0.1, 0.2, 0.2]]);
        assert_eq!(
            validate_layout(&layout),
            Err(ValidationError::NonFiniteCoordinate { element: 0 })
        );

        let layout = Layout::new(vec![1], vec![[0.1, 0.1, -0.2, 0.2]]);
        assert_eq!(
            validate_layout(&layout),
            Err(ValidationError::NegativeSize { element: 0 })
        );
    }

    #[test]
    fn test_too_many_elements() {
        let n = MAX_ELEMENTS + 1;
        let layout = Layout::new(vec![0; n], vec![[0.0; 4]; n]);
        assert_eq!(
            validate_layout(&layout),
            Err(ValidationError::TooManyElements(n))
        );
    }

    #[test]
    fn test_content_boxes_are_bounded() {
        let base = Layout::new(vec![1], vec![[0.1, 0.1, 0.2, 0.2]]);
        assert!(validate_layout(&base.clone().with_content_boxes(vec![[0, 0, 40, 60]])).is_ok());

        let far = base.clone().with_content_boxes(vec![[0, 0, 1, 1], [i64::MAX, 0, 1, 1]]);
        assert_eq!(
            validate_layout(&far),
            Err(ValidationError::InvalidGridBox {
                field: "discrete_content_bounding_boxes",
                index: 1
            })
        );

        let negative = base.clone().with_content_boxes(vec![[10, 10, -3, 2]]);
        assert!(matches!(
            validate_layout(&negative),
            Err(ValidationError::InvalidGridBox { index: 0, .. })
        ));

        let many = base.with_content_boxes(vec![[0, 0, 1, 1]; MAX_ELEMENTS + 1]);
        assert_eq!(
            validate_layout(&many),
            Err(ValidationError::TooManyContentBoxes(MAX_ELEMENTS + 1))
        );
    }

    #[test]
    fn test_discrete_boxes_are_bounded() {
        let layout = Layout::new(vec![1], vec![[0.1, 0.1, 0.2, 0.2]])
            .with_discrete_bounding_boxes(vec![[i64::MIN, 0, 5, 5]]);
        assert_eq!(
            validate_layout(&layout),
            Err(ValidationError::InvalidGridBox {
                field: "discrete_bounding_boxes",
                index: 0
            })
        );
    }

    #[test]
    fn test_canvas_limit() {
        assert!(check_canvas(Canvas::default()).is_ok());
        assert!(check_canvas(Canvas::new(4096, 4096)).is_ok());
        assert_eq!(
            check_canvas(Canvas::new(4097, 4096)),
            Err(ValidationError::InvalidCanvas {
                width: 4097,
                height: 4096
            })
        );
        assert!(check_canvas(Canvas::new(0, 150)).is_err());
        assert!(check_canvas(Canvas::new(u32::MAX, u32::MAX)).is_err());
    }

    #[test]
    fn test_layout_limit() {
        assert!(check_layout_limit(0).is_ok());
        assert!(check_layout_limit(MAX_LAYOUTS - 1).is_ok());
        assert_eq!(
            check_layout_limit(MAX_LAYOUTS),
            Err(ValidationError::TooManyLayouts)
        );
    }
}
