use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::layout::Layout;
use crate::utils::validation::{check_layout_limit, validate_layout, ValidationError};

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read layouts: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse layouts: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Invalid layout at index {index}: {source}")]
    InvalidLayout {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("{0}")]
    Limit(#[from] ValidationError),
}

/// Corpus version for compatibility checking
pub const CORPUS_VERSION: &str = "1.0.0";

/// Serializable versioned corpus format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusData {
    pub version: String,
    pub layouts: Vec<Layout>,
}

impl CorpusData {
    #[must_use]
    pub fn new(layouts: Vec<Layout>) -> Self {
        Self {
            version: CORPUS_VERSION.to_string(),
            layouts,
        }
    }

    /// Parse a corpus from JSON, accepting a bare array or a versioned object
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed, a layout fails validation,
    /// or the corpus is too large.
    pub fn from_json(json: &str) -> Result<Self, CorpusError> {
        let data = match serde_json::from_str(json)? {
            CorpusFile::Bare(layouts) => Self::new(layouts),
            CorpusFile::Versioned(data) => {
                // Version check (warn but don't fail)
                if data.version != CORPUS_VERSION {
                    warn!(
                        "Corpus version mismatch (expected {}, found {})",
                        CORPUS_VERSION, data.version
                    );
                }
                data
            }
        };

        for (index, layout) in data.layouts.iter().enumerate() {
            check_layout_limit(index)?;
            validate_layout(layout).map_err(|source| CorpusError::InvalidLayout { index, source })?;
        }

        Ok(data)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CorpusFile {
    Bare(Vec<Layout>),
    Versioned(CorpusData),
}

fn is_gzipped(path: &Path) -> bool {
    path.to_string_lossy().to_lowercase().ends_with(".gz")
}

fn read_text(path: &Path) -> Result<String, std::io::Error> {
    let file = File::open(path)?;
    let mut content = String::new();
    if is_gzipped(path) {
        BufReader::new(GzDecoder::new(file)).read_to_string(&mut content)?;
    } else {
        BufReader::new(file).read_to_string(&mut content)?;
    }
    Ok(content)
}

/// Load and validate every layout in a corpus file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if any layout is
/// invalid.
pub fn load_corpus(path: &Path) -> Result<Vec<Layout>, CorpusError> {
    let data = CorpusData::from_json(&read_text(path)?)?;
    debug!("Loaded {} layouts from {}", data.layouts.len(), path.display());
    Ok(data.layouts)
}

/// Load and validate a single layout (e.g. a query)
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the layout is
/// invalid.
pub fn load_layout(path: &Path) -> Result<Layout, CorpusError> {
    let layout: Layout = serde_json::from_str(&read_text(path)?)?;
    validate_layout(&layout).map_err(|source| CorpusError::InvalidLayout { index: 0, source })?;
    Ok(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const ONE_LAYOUT: &str = r#"{"labels": [1, 2], "bounding_boxes": [[0.1, 0.1, 0.2, 0.2], [0.5, 0.5, 0.1, 0.1]]}"#;

    #[test]
    fn test_bare_array() {
        let data = CorpusData::from_json(&format!("[{ONE_LAYOUT}, {ONE_LAYOUT}]")).unwrap();
        assert_eq!(data.version, CORPUS_VERSION);
        assert_eq!(data.layouts.len(), 2);
        assert_eq!(data.layouts[0].labels, vec![1, 2]);
    }

    #[test]
    fn test_versioned_object() {
        let json = format!(r#"{{"version": "0.9.0", "layouts": [{ONE_LAYOUT}]}}"#);
        let data = CorpusData::from_json(&json).unwrap();
        assert_eq!(data.version, "0.9.0");
        assert_eq!(data.layouts.len(), 1);
    }

    #[test]
    fn test_invalid_layout_reports_index() {
        let bad = r#"{"labels": [1, 2], "bounding_boxes": [[0.1, 0.1, 0.2, 0.2]]}"#;
        let err = CorpusData::from_json(&format!("[{ONE_LAYOUT}, {bad}]")).unwrap_err();
        assert!(matches!(err, CorpusError::InvalidLayout { index: 1, .. }));
    }

    #[test]
    fn test_malformed_json() {
        let err = CorpusData::from_json("{not json").unwrap_err();
        assert!(matches!(err, CorpusError::ParseError(_)));
    }

    #[test]
    fn test_load_plain_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "[{ONE_LAYOUT}]").unwrap();
        let layouts = load_corpus(file.path()).unwrap();
        assert_eq!(layouts.len(), 1);
    }

    #[test]
    fn test_load_gzipped_file() {
        let file = tempfile::Builder::new().suffix(".json.gz").tempfile().unwrap();
        let mut encoder = GzEncoder::new(file.reopen().unwrap(), Compression::default());
        write!(encoder, "[{ONE_LAYOUT}, {ONE_LAYOUT}, {ONE_LAYOUT}]").unwrap();
        encoder.finish().unwrap();

        let layouts = load_corpus(file.path()).unwrap();
        assert_eq!(layouts.len(), 3);
    }

    #[test]
    fn test_load_layout() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{ONE_LAYOUT}").unwrap();
        let layout = load_layout(file.path()).unwrap();
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_corpus(Path::new("/nonexistent/corpus.json")).unwrap_err();
        assert!(matches!(err, CorpusError::ReadError(_)));
    }
}
