//! Loading layout corpora and query layouts from JSON files.
//!
//! A corpus file is either a bare JSON array of layouts or a versioned object:
//!
//! ```json
//! { "version": "1.0.0", "layouts": [ { "labels": [1], "bounding_boxes": [[0.1, 0.1, 0.5, 0.2]] } ] }
//! ```
//!
//! Files ending in `.gz` are decompressed on the fly. Every layout is
//! validated with [`crate::utils::validation::validate_layout`] before it is
//! returned.

pub mod store;

pub use store::{load_corpus, load_layout, CorpusData, CorpusError, CORPUS_VERSION};
