// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Build pipeline: corpus in, index artifacts out.
//!
//! The [`Indexer`] owns the whole life cycle. `build` streams the corpus
//! through the tokenizer and into the index maps, `persist` writes the five
//! artifacts (`config`, `collection_stats`, `docs_meta`, and per-framing
//! `inverted_lists` + `lookup_table`), and `load` rehydrates them.
//! `get_inverted_index` is the entry point everything else uses: load if the
//! artifacts are there, otherwise build, persist, and carry on. A missing or
//! unreadable *corpus* is the one unrecoverable case.
//!
//! Offsets are the subtle part of persistence: each term's
//! `posting_list_position` is the file offset just before its encoded list is
//! appended, so the lookup table can only be written after the binary file is
//! complete.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};

use indicatif::{ProgressBar, ProgressStyle};

use crate::binary::postings_to_bytes;
use crate::config::Config;
use crate::corpus::{load_corpus, tokenize};
use crate::index::InvertedIndex;
use crate::types::{DocMeta, InvertedList, TermStats};

pub struct Indexer {
    config: Config,
}

impl Indexer {
    pub fn new(config: Config) -> Self {
        Indexer { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the index from disk, or build and persist it if any artifact is
    /// missing. This is the primary recovery path: a half-written or deleted
    /// index directory heals itself on the next run.
    pub fn get_inverted_index(&self) -> io::Result<InvertedIndex> {
        match self.load() {
            Ok(index) => Ok(index),
            Err(_) => {
                let mut index = self.build()?;
                self.persist(&mut index)?;
                if !self.config.in_memory {
                    index.delete_map();
                }
                Ok(index)
            }
        }
    }

    /// Build a fresh index from the corpus.
    ///
    /// Documents are assigned dense ids in corpus order; positions within a
    /// document arrive in ascending order straight from the tokenizer.
    pub fn build(&self) -> io::Result<InvertedIndex> {
        let corpus = load_corpus(&self.config.data_path())?;
        let mut index = InvertedIndex::new(self.config.clone(), self.config.compressed);

        let progress = ProgressBar::new(corpus.corpus.len() as u64);
        progress.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:<10} [{bar:40.cyan/dim}] {pos}/{len} {msg}",
            )
            .unwrap()
            .progress_chars("━━╸"),
        );
        progress.set_prefix("Indexing");

        for (doc_id, scene) in corpus.corpus.iter().enumerate() {
            let doc_id = doc_id as u32;
            let terms = tokenize(&scene.text);
            index.update_docs_meta(
                doc_id,
                DocMeta {
                    play_id: scene.play_id.clone(),
                    scene_id: scene.scene_id.clone(),
                    scene_num: scene.scene_num,
                    scene_length: terms.len() as u32,
                },
            );
            index.add_doc_length(terms.len() as u32);
            for (position, term) in terms.iter().enumerate() {
                index.update_map(term, doc_id, position as u32);
            }
            progress.inc(1);
        }
        progress.finish_with_message(format!("{} scenes", corpus.corpus.len()));

        index.finalize_collection_stats();
        index.load_vocabulary();
        Ok(index)
    }

    /// Write all five artifacts under the index directory.
    pub fn persist(&self, index: &mut InvertedIndex) -> io::Result<()> {
        let compressed = index.compressed();
        fs::create_dir_all(self.config.lists_dir(compressed))?;

        // Binary lists first: the lookup table needs the offsets.
        self.persist_inverted_lists(index)?;

        write_json(
            &self.config.lookup_table_path(compressed),
            index.lookup_table(),
        )?;
        write_json(
            &self.config.collection_stats_path(),
            index.collection_stats(),
        )?;
        write_json(&self.config.docs_meta_path(), index.docs_meta())?;
        self.config.save()?;
        Ok(())
    }

    /// Append every term's encoded list to the inverted-lists file, recording
    /// each list's offset and size in the lookup table as it goes. Terms are
    /// written in vocabulary order so a given corpus always produces the same
    /// bytes.
    fn persist_inverted_lists(&self, index: &mut InvertedIndex) -> io::Result<()> {
        let compressed = index.compressed();
        let path = self.config.inverted_lists_path(compressed);
        let file = File::create(&path)?;
        let mut writer = BufWriter::new(file);

        let terms: Vec<String> = index.get_vocabulary().to_vec();
        let mut offset = 0u64;
        for term in &terms {
            let list = &index.map()[term];
            let bytes = postings_to_bytes(list, compressed);
            writer.write_all(&bytes)?;
            index.set_list_location(term, offset, bytes.len() as u64);
            offset += bytes.len() as u64;
        }
        writer.flush()
    }

    /// Rehydrate an index from the artifacts for the configured framing.
    /// Fails if any artifact is missing or unparsable.
    pub fn load(&self) -> io::Result<InvertedIndex> {
        let compressed = self.config.compressed;
        let mut index = InvertedIndex::new(self.config.clone(), compressed);

        index.load_collection_stats(read_json(&self.config.collection_stats_path())?);
        index.load_docs_meta(read_json(&self.config.docs_meta_path())?);
        index.load_lookup_table(read_json(&self.config.lookup_table_path(compressed))?);
        index.load_vocabulary();

        if self.config.in_memory {
            let path = self.config.inverted_lists_path(compressed);
            let mut file = File::open(&path)?;
            let mut map: HashMap<String, InvertedList> = HashMap::new();
            let stats: Vec<(String, TermStats)> = index
                .lookup_table()
                .iter()
                .map(|(term, stats)| (term.clone(), stats.clone()))
                .collect();
            for (term, stats) in stats {
                let list = InvertedIndex::read_list_from(&mut file, &stats, compressed)?;
                map.insert(term, list);
            }
            index.load_map(map);
        }

        Ok(index)
    }
}

fn write_json<T: serde::Serialize>(path: &std::path::Path, value: &T) -> io::Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer(BufWriter::new(file), value).map_err(io::Error::from)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &std::path::Path) -> io::Result<T> {
    let file = File::open(path)?;
    serde_json::from_reader(io::BufReader::new(file)).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("Invalid JSON in {}: {}", path.display(), e),
        )
    })
}
