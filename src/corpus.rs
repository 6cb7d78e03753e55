// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Corpus input format.
//!
//! The corpus is a single JSON file of play scenes:
//!
//! ```json
//! {"corpus": [{"playId": "...", "sceneId": "...", "sceneNum": 1, "text": "..."}]}
//! ```
//!
//! Documents get dense ids from their position in the array, starting at 0.
//! Tokenization is deliberately dumb: split on whitespace, drop empty
//! segments, keep everything else verbatim. No stemming, no stopwords, no
//! case folding — positions in the index must line up with the raw token
//! stream.

use std::fs::File;
use std::io;
use std::path::Path;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Corpus {
    pub corpus: Vec<Scene>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    pub play_id: String,
    pub scene_id: String,
    pub scene_num: u32,
    pub text: String,
}

/// Load the corpus file. A missing or unparsable corpus fails the build;
/// there is nothing to fall back to.
pub fn load_corpus(path: &Path) -> io::Result<Corpus> {
    let file = File::open(path).map_err(|e| {
        io::Error::new(
            e.kind(),
            format!("Failed to open corpus {}: {}", path.display(), e),
        )
    })?;
    serde_json::from_reader(io::BufReader::new(file)).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid corpus JSON in {}: {}", path.display(), e),
        )
    })
}

/// Whitespace tokenization with empty segments dropped.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split_whitespace().collect()
}
