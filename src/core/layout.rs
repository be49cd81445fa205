use serde::{Deserialize, Serialize};

use crate::core::bbox;
use crate::core::types::{BBox, BoxFormat, Canvas, DiscreteBBox, Label};

/// One slide, page or screen: a set of typed, positioned elements.
///
/// `labels` and `bounding_boxes` are aligned index-for-index. The optional
/// aspects are only populated for tasks that use them; when present, the
/// per-element ones (`depth`, `rotation`, `text_alignment`,
/// `discrete_bounding_boxes`) have one entry per element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    /// Free-form identifier (file name, slide number, dataset index)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Category code per element
    pub labels: Vec<Label>,

    /// Box per element, in `box_format`
    pub bounding_boxes: Vec<BBox>,

    /// Coordinate convention of `bounding_boxes`
    #[serde(default)]
    pub box_format: BoxFormat,

    /// z-order rank per element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depth: Option<Vec<i64>>,

    /// Rotation in degrees per element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec<f64>>,

    /// Small fixed-length alignment code vector per element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_alignment: Option<Vec<Vec<i64>>>,

    /// Grid-quantized copy of `bounding_boxes`, same convention
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_bounding_boxes: Option<Vec<DiscreteBBox>>,

    /// Salient-content regions (LTWH, grid units); not aligned with elements
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discrete_content_bounding_boxes: Option<Vec<DiscreteBBox>>,

    /// Fixed-length summary vector of the layout's free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f64>>,
}

impl Layout {
    /// Create a layout with only labels and LTWH boxes
    #[must_use]
    pub fn new(labels: Vec<Label>, bounding_boxes: Vec<BBox>) -> Self {
        Self {
            id: None,
            labels,
            bounding_boxes,
            box_format: BoxFormat::Ltwh,
            depth: None,
            rotation: None,
            text_alignment: None,
            discrete_bounding_boxes: None,
            discrete_content_bounding_boxes: None,
            embedding: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Declare the convention of the boxes already stored (does not convert)
    #[must_use]
    pub fn with_box_format(mut self, format: BoxFormat) -> Self {
        self.box_format = format;
        self
    }

    #[must_use]
    pub fn with_depth(mut self, depth: Vec<i64>) -> Self {
        self.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Vec<f64>) -> Self {
        self.rotation = Some(rotation);
        self
    }

    #[must_use]
    pub fn with_text_alignment(mut self, alignment: Vec<Vec<i64>>) -> Self {
        self.text_alignment = Some(alignment);
        self
    }

    #[must_use]
    pub fn with_discrete_bounding_boxes(mut self, boxes: Vec<DiscreteBBox>) -> Self {
        self.discrete_bounding_boxes = Some(boxes);
        self
    }

    /// Quantize the continuous boxes onto `canvas`, replacing any existing
    /// discrete boxes
    #[must_use]
    pub fn with_discretized_boxes(mut self, canvas: Canvas) -> Self {
        let boxes = self
            .bounding_boxes
            .iter()
            .map(|b| bbox::discretize(*b, canvas))
            .collect();
        self.discrete_bounding_boxes = Some(boxes);
        self
    }

    #[must_use]
    pub fn with_content_boxes(mut self, boxes: Vec<DiscreteBBox>) -> Self {
        self.discrete_content_bounding_boxes = Some(boxes);
        self
    }

    #[must_use]
    pub fn with_embedding(mut self, embedding: Vec<f64>) -> Self {
        self.embedding = Some(embedding);
        self
    }

    /// Number of elements
    #[must_use]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Width and height of every element, honoring `box_format`
    #[must_use]
    pub fn sizes(&self) -> Vec<[f64; 2]> {
        self.bounding_boxes
            .iter()
            .map(|b| bbox::size(b, self.box_format))
            .collect()
    }

    /// A copy of this layout with its boxes (continuous and discrete)
    /// re-expressed in `format`
    #[must_use]
    pub fn to_format(&self, format: BoxFormat) -> Self {
        let mut converted = self.clone();
        if format == self.box_format {
            return converted;
        }
        converted.bounding_boxes = self
            .bounding_boxes
            .iter()
            .map(|b| bbox::convert(*b, self.box_format, format))
            .collect();
        converted.discrete_bounding_boxes = self.discrete_bounding_boxes.as_ref().map(|boxes| {
            boxes
                .iter()
                .map(|d| match format {
                    BoxFormat::Ltrb => [
                        d[0],
                        d[1],
                        d[0].saturating_add(d[2]),
                        d[1].saturating_add(d[3]),
                    ],
                    BoxFormat::Ltwh => [
                        d[0],
                        d[1],
                        d[2].saturating_sub(d[0]),
                        d[3].saturating_sub(d[1]),
                    ],
                })
                .collect()
        });
        converted.box_format = format;
        converted
    }

    /// True when no element has any extent, i.e. the layout carries no real
    /// geometry and is useless as an exemplar.
    ///
    /// The grid-quantized boxes are preferred when present, so elements that
    /// round down to nothing on the canvas also count as empty. A layout with
    /// no elements is degenerate.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        if let Some(discrete) = &self.discrete_bounding_boxes {
            return discrete.iter().all(|d| {
                let (w, h) = match self.box_format {
                    BoxFormat::Ltwh => (d[2], d[3]),
                    BoxFormat::Ltrb => (d[2].saturating_sub(d[0]), d[3].saturating_sub(d[1])),
                };
                w == 0 && h == 0
            });
        }
        self.sizes().iter().all(|[w, h]| *w == 0.0 && *h == 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sizes_respect_format() {
        let ltwh = Layout::new(vec![1], vec![[0.1, 0.1, 0.2, 0.3]]);
        assert_eq!(ltwh.sizes(), vec![[0.2, 0.3]]);

        let ltrb = Layout::new(vec![1], vec![[0.1, 0.1, 0.3, 0.4]]).with_box_format(BoxFormat::Ltrb);
        let [w, h] = ltrb.sizes()[0];
        assert!((w - 0.2).abs() < 1e-9);
        assert!((h - 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_is_degenerate() {
        let zero = Layout::new(vec![1, 2], vec![[0.1, 0.2, 0.0, 0.0], [0.5, 0.5, 0.0, 0.0]]);
        assert!(zero.is_degenerate());

        // One element with real size is enough to keep the layout
        let mixed = Layout::new(vec![1, 2], vec![[0.1, 0.2, 0.0, 0.0], [0.5, 0.5, 0.1, 0.1]]);
        assert!(!mixed.is_degenerate());

        // Zero width alone is not degenerate
        let thin = Layout::new(vec![1], vec![[0.1, 0.2, 0.0, 0.4]]);
        assert!(!thin.is_degenerate());

        assert!(Layout::new(vec![], vec![]).is_degenerate());
    }

    #[test]
    fn test_is_degenerate_prefers_discrete_boxes() {
        let layout = Layout::new(vec![1], vec![[0.5, 0.5, 0.001, 0.001]])
            .with_discrete_bounding_boxes(vec![[51, 75, 0, 0]]);
        assert!(layout.is_degenerate());
    }

    #[test]
    fn test_is_degenerate_ltrb() {
        // right == left and bottom == top
        let flat = Layout::new(vec![1, 2], vec![[0.2, 0.3, 0.2, 0.3], [0.6, 0.1, 0.6, 0.1]])
            .with_box_format(BoxFormat::Ltrb);
        assert!(flat.is_degenerate());

        let wide =
            Layout::new(vec![1], vec![[0.2, 0.3, 0.4, 0.3]]).with_box_format(BoxFormat::Ltrb);
        assert!(!wide.is_degenerate());
    }

    #[test]
    fn test_is_degenerate_ltrb_discrete() {
        let point = Layout::new(vec![1], vec![[0.05, 0.05, 0.051, 0.051]])
            .with_box_format(BoxFormat::Ltrb)
            .with_discrete_bounding_boxes(vec![[5, 5, 5, 5]]);
        assert!(point.is_degenerate());

        // width 4, height 0
        let line = Layout::new(vec![1], vec![[0.0, 0.0, 0.0, 0.0]])
            .with_box_format(BoxFormat::Ltrb)
            .with_discrete_bounding_boxes(vec![[5, 5, 9, 5]]);
        assert!(!line.is_degenerate());

        let extreme = Layout::new(vec![1], vec![[0.0; 4]])
            .with_box_format(BoxFormat::Ltrb)
            .with_discrete_bounding_boxes(vec![[i64::MIN, 0, i64::MAX, 0]]);
        assert!(!extreme.is_degenerate());
    }

    #[test]
    fn test_discretized_tiny_boxes_are_degenerate() {
        let layout = Layout::new(vec![1, 2], vec![[0.5, 0.5, 0.005, 0.004]; 2])
            .with_discretized_boxes(Canvas::new(102, 150));
        assert_eq!(layout.discrete_bounding_boxes, Some(vec![[51, 75, 0, 0]; 2]));
        assert!(layout.is_degenerate());
    }

    #[test]
    fn test_to_format_round_trip() {
        let layout = Layout::new(vec![3], vec![[0.1, 0.2, 0.3, 0.4]])
            .with_discrete_bounding_boxes(vec![[10, 20, 30, 40]]);
        let ltrb = layout.to_format(BoxFormat::Ltrb);
        assert_eq!(ltrb.box_format, BoxFormat::Ltrb);
        assert_eq!(ltrb.discrete_bounding_boxes, Some(vec![[10, 20, 40, 60]]));
        assert!((ltrb.bounding_boxes[0][2] - 0.4).abs() < 1e-9);

        let back = ltrb.to_format(BoxFormat::Ltwh);
        assert_eq!(back.discrete_bounding_boxes, layout.discrete_bounding_boxes);
        assert!(!back.is_degenerate());
    }

    #[test]
    fn test_deserialize_minimal_layout() {
        let json = r#"{"labels": [1, 2], "bounding_boxes": [[0, 0, 0.1, 0.1], [0.5, 0.5, 0.1, 0.1]]}"#;
        let layout: Layout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.box_format, BoxFormat::Ltwh);
        assert!(layout.depth.is_none());
        assert!(layout.embedding.is_none());
    }
}
