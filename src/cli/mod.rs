// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the prosody command-line interface.
//!
//! Four subcommands: `index` builds and persists the index, `search` runs the
//! flat bag-of-words driver, `structured` runs an inference-network operator,
//! and `inspect` prints index statistics. The query-side commands read the
//! index directory's stored config and let explicit flags override it.

pub mod display;

use clap::{Args, Parser, Subcommand};

use crate::network::StructuredOperator;
use crate::query::QueryMode;
use crate::scoring::RetrievalModel;

#[derive(Parser)]
#[command(
    name = "prosody",
    about = "Positional inverted-index search engine",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that opens an existing index.
#[derive(Args)]
pub struct IndexLocation {
    /// Index directory holding the persisted artifacts
    #[arg(long, default_value = "index")]
    pub index_dir: String,

    /// Use the uncompressed posting-list framing
    #[arg(long)]
    pub uncompressed: bool,

    /// Keep all posting lists resident in memory
    #[arg(long)]
    pub in_memory: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the index from a corpus file and persist it
    Index {
        #[command(flatten)]
        location: IndexLocation,

        /// Directory containing the corpus file
        #[arg(long, default_value = "data")]
        data_dir: String,

        /// Corpus JSON file name under the data directory
        #[arg(long, default_value = "shakespeare-scenes.json")]
        data_file: String,
    },

    /// Run a bag-of-words query against the index
    Search {
        /// Query string (whitespace-delimited terms)
        query: String,

        #[command(flatten)]
        location: IndexLocation,

        /// Scoring model
        #[arg(long, value_enum, default_value = "dirichlet")]
        model: RetrievalModel,

        /// Retrieval algorithm
        #[arg(long, value_enum, default_value = "term")]
        mode: QueryMode,

        /// Number of documents to return
        #[arg(short, long, default_value = "10")]
        count: usize,

        /// BM25 k1 parameter
        #[arg(long, default_value = "1.2")]
        k1: f64,

        /// BM25 k2 parameter
        #[arg(long, default_value = "100")]
        k2: f64,

        /// BM25 b parameter
        #[arg(long, default_value = "0.75")]
        b: f64,

        /// Jelinek-Mercer alpha_D parameter
        #[arg(long, default_value = "0.1")]
        alpha_d: f64,

        /// Dirichlet mu parameter
        #[arg(long, default_value = "1500")]
        mu: f64,
    },

    /// Run a structured operator through the inference network
    Structured {
        /// Query string (whitespace-delimited terms)
        query: String,

        #[command(flatten)]
        location: IndexLocation,

        /// Structured query operator
        #[arg(long, value_enum)]
        op: StructuredOperator,

        /// Window size for the window operators
        #[arg(long, default_value = "3")]
        window: u32,

        /// Number of documents to return
        #[arg(short, long, default_value = "10")]
        count: usize,
    },

    /// Print collection statistics and the most frequent terms
    Inspect {
        #[command(flatten)]
        location: IndexLocation,

        /// How many top terms to show
        #[arg(long, default_value = "10")]
        terms: usize,

        /// Show the top Dice-coefficient pairs for this term
        #[arg(long)]
        dice: Option<String>,
    },
}
