// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index configuration.
//!
//! Everything about an index that is not derived from the corpus lives here:
//! where the data and the artifacts sit, which binary framing to use, and
//! whether posting lists stay resident in memory. The config is itself one of
//! the persisted artifacts (the `config` JSON file under the index directory),
//! so a query process can pick up an index without re-specifying how it was
//! built. Flags given on the command line override whatever was stored.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::scoring::RetrievalModel;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Corpus file name under `data_dir`.
    pub data_file_name: String,
    /// Use the varbyte-compressed framing for posting lists.
    pub compressed: bool,
    /// Keep all posting lists resident; otherwise each lookup reads the
    /// inverted-lists file.
    pub in_memory: bool,
    /// Default scoring model for the flat query driver.
    pub retrieval_model: RetrievalModel,
    pub data_dir: String,
    pub index_dir: String,
    pub compressed_dir: String,
    pub uncompressed_dir: String,
    pub config_file_name: String,
    pub inverted_lists_file_name: String,
    pub lookup_table_file_name: String,
    pub docs_meta_file_name: String,
    pub collection_stats_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file_name: "shakespeare-scenes.json".to_string(),
            compressed: true,
            in_memory: false,
            retrieval_model: RetrievalModel::Dirichlet,
            data_dir: "data".to_string(),
            index_dir: "index".to_string(),
            compressed_dir: "compressed".to_string(),
            uncompressed_dir: "uncompressed".to_string(),
            config_file_name: "config".to_string(),
            inverted_lists_file_name: "inverted_lists".to_string(),
            lookup_table_file_name: "lookup_table".to_string(),
            docs_meta_file_name: "docs_meta".to_string(),
            collection_stats_file_name: "collection_stats".to_string(),
        }
    }
}

impl Config {
    /// Read a stored config from `<index_dir>/config`, if one exists.
    pub fn load(index_dir: &Path) -> Option<Config> {
        let file = File::open(index_dir.join("config")).ok()?;
        serde_json::from_reader(file).ok()
    }

    /// Write this config to its own `config` artifact.
    pub fn save(&self) -> io::Result<()> {
        let file = File::create(self.config_path())?;
        serde_json::to_writer(file, self).map_err(io::Error::from)
    }

    pub fn data_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join(&self.data_file_name)
    }

    pub fn index_path(&self) -> PathBuf {
        PathBuf::from(&self.index_dir)
    }

    /// Directory holding the binary lists and lookup table for one framing.
    pub fn lists_dir(&self, compressed: bool) -> PathBuf {
        let sub = if compressed {
            &self.compressed_dir
        } else {
            &self.uncompressed_dir
        };
        self.index_path().join(sub)
    }

    pub fn inverted_lists_path(&self, compressed: bool) -> PathBuf {
        self.lists_dir(compressed).join(&self.inverted_lists_file_name)
    }

    pub fn lookup_table_path(&self, compressed: bool) -> PathBuf {
        self.lists_dir(compressed).join(&self.lookup_table_file_name)
    }

    pub fn docs_meta_path(&self) -> PathBuf {
        self.index_path().join(&self.docs_meta_file_name)
    }

    pub fn collection_stats_path(&self) -> PathBuf {
        self.index_path().join(&self.collection_stats_file_name)
    }

    pub fn config_path(&self) -> PathBuf {
        self.index_path().join(&self.config_file_name)
    }
}
