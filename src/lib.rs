//! Positional inverted-index search engine.
//!
//! Builds a term → postings index with full positional information from a
//! JSON corpus of play scenes, persists it in uncompressed and
//! varbyte-compressed binary forms, and serves ranked retrieval over it:
//! bag-of-words scoring through four retrieval models, and structured
//! proximity/belief/filter operators through an inference network.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────┐    ┌───────────┐    ┌───────────────┐    ┌──────────────┐
//! │ corpus.rs│───▶│ build.rs  │───▶│   index.rs    │───▶│   query.rs   │
//! │ (scenes, │    │ (Indexer: │    │(InvertedIndex │    │ network.rs   │
//! │ tokenize)│    │build/load)│    │    facade)    │    │ (retrieval)  │
//! └──────────┘    └───────────┘    └───────────────┘    └──────────────┘
//!                       │                  │                    │
//!                       ▼                  ▼                    ▼
//!                 ┌───────────────────────────────┐    ┌──────────────┐
//!                 │           binary/             │    │ operators/   │
//!                 │ (varbyte + delta codec,       │    │ (QueryNode   │
//!                 │  posting-list serialization)  │    │  sum type)   │
//!                 └───────────────────────────────┘    └──────────────┘
//! ```
//!
//! The index is built once per corpus and frozen; queries only read. With
//! `in_memory` off, each posting-list lookup seeks into the binary
//! inverted-lists file using the offsets recorded in the lookup table.

// Module declarations
pub mod binary;
pub mod build;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod dice;
pub mod index;
pub mod network;
pub mod operators;
pub mod query;
pub mod scoring;
pub mod types;

#[doc(hidden)]
pub mod testing;

// Re-exports for public API
pub use build::Indexer;
pub use config::Config;
pub use corpus::{load_corpus, tokenize, Corpus, Scene};
pub use dice::DiceCoefficient;
pub use index::InvertedIndex;
pub use network::{InferenceNetwork, StructuredOperator};
pub use operators::QueryNode;
pub use query::{Query, QueryMode};
pub use scoring::{RetrievalModel, RetrievalModels, ScoringParams};
pub use types::{CollectionStats, DocMeta, InvertedList, Posting, SearchResult, TermStats};
