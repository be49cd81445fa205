//! Core data types for layouts.
//!
//! - [`Layout`]: labelled, positioned elements plus optional per-task aspects
//! - [`BoxFormat`]: LTWH vs. LTRB coordinate conventions
//! - [`Canvas`], [`CanvasPreset`]: grid dimensions of the public layout datasets
//! - [`bbox`]: conversion, normalization and quantization helpers
//!
//! ## Coordinate conventions
//!
//! | Format | Components | Size |
//! |--------|------------|------|
//! | LTWH   | left, top, width, height | `[2]`, `[3]` |
//! | LTRB   | left, top, right, bottom | `[2] - [0]`, `[3] - [1]` |
//!
//! Similarity metrics assume both sides of a comparison share one convention
//! and are normalized to the unit square.

pub mod bbox;
pub mod layout;
pub mod types;

pub use layout::Layout;
pub use types::{Aspect, BBox, BoxFormat, Canvas, CanvasPreset, DiscreteBBox, Label};
