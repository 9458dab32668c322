//! Parser module — per-file line parsing plus the cross-file fold.

pub mod apt;
pub mod merge;

use crate::model::{Extraction, SourceFailure};
use std::fs;
use std::path::PathBuf;

/// Extract rule documentation from an ordered batch of APT files.
///
/// Each file is parsed independently; the per-file mappings are folded in
/// input order, so earlier files are authoritative for descriptions. A file
/// that cannot be read is recorded as a failure and contributes no entries.
pub fn extract_files(paths: &[PathBuf]) -> Extraction {
    let mut extraction = Extraction::default();
    for path in paths {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                extraction.failures.push(SourceFailure {
                    path: path.clone(),
                    reason: err.to_string(),
                });
                continue;
            }
        };
        merge::fold(&mut extraction, apt::parse(&content));
    }
    extraction
}
