use serde::{Deserialize, Serialize};

/// Integer category code of a layout element
pub type Label = u32;

/// A bounding box as four coordinates; meaning depends on [`BoxFormat`]
pub type BBox = [f64; 4];

/// A bounding box quantized to integer grid units
pub type DiscreteBBox = [i64; 4];

/// Coordinate convention of a layout's bounding boxes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxFormat {
    /// left, top, width, height
    #[default]
    Ltwh,
    /// left, top, right, bottom
    Ltrb,
}

impl std::fmt::Display for BoxFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ltwh => write!(f, "LTWH"),
            Self::Ltrb => write!(f, "LTRB"),
        }
    }
}

/// Optional per-layout data that only some tasks need
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Aspect {
    Depth,
    Rotation,
    TextAlignment,
    DiscreteBoundingBoxes,
    DiscreteContentBoundingBoxes,
    Embedding,
}

impl std::fmt::Display for Aspect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Depth => write!(f, "depth"),
            Self::Rotation => write!(f, "rotation"),
            Self::TextAlignment => write!(f, "text_alignment"),
            Self::DiscreteBoundingBoxes => write!(f, "discrete_bounding_boxes"),
            Self::DiscreteContentBoundingBoxes => write!(f, "discrete_content_bounding_boxes"),
            Self::Embedding => write!(f, "embedding"),
        }
    }
}

/// Canvas dimensions in grid units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of grid cells on the canvas
    #[must_use]
    pub fn area(&self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }
}

impl Default for Canvas {
    fn default() -> Self {
        CanvasPreset::PosterLayout.canvas()
    }
}

/// Canvas sizes of the public layout datasets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum CanvasPreset {
    Rico,
    Publaynet,
    #[value(name = "posterlayout")]
    #[serde(rename = "posterlayout")]
    PosterLayout,
    Webui,
}

impl CanvasPreset {
    #[must_use]
    pub const fn canvas(self) -> Canvas {
        match self {
            Self::Rico => Canvas::new(90, 160),
            Self::Publaynet => Canvas::new(120, 160),
            Self::PosterLayout => Canvas::new(102, 150),
            Self::Webui => Canvas::new(120, 120),
        }
    }
}

impl std::fmt::Display for CanvasPreset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rico => write!(f, "rico"),
            Self::Publaynet => write!(f, "publaynet"),
            Self::PosterLayout => write!(f, "posterlayout"),
            Self::Webui => write!(f, "webui"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_canvas_is_posterlayout() {
        assert_eq!(Canvas::default(), Canvas::new(102, 150));
        assert_eq!(Canvas::default().area(), 102 * 150);
    }

    #[test]
    fn test_box_format_serde() {
        let json = serde_json::to_string(&BoxFormat::Ltrb).unwrap();
        assert_eq!(json, "\"ltrb\"");
        let parsed: BoxFormat = serde_json::from_str("\"ltwh\"").unwrap();
        assert_eq!(parsed, BoxFormat::Ltwh);
    }
}
