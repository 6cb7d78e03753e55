// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Prosody CLI: build, query, and inspect positional inverted indexes.
//!
//! ```bash
//! # Build an index from a corpus of play scenes
//! prosody index --data-dir ./data --data-file shakespeare-scenes.json
//!
//! # Ranked retrieval with a chosen model
//! prosody search "king of france" --model bm25 --count 10
//!
//! # Structured operators over the same index
//! prosody structured "to be or not to be" --op unordered-window --window 6
//!
//! # Collection statistics and frequent terms
//! prosody inspect --terms 20
//! ```

use clap::Parser;

use prosody::build::Indexer;
use prosody::cli::display::{print_dice_pairs, print_results, styled, BOLD, DIM};
use prosody::cli::{Cli, Commands, IndexLocation};
use prosody::config::Config;
use prosody::dice::DiceCoefficient;
use prosody::network::InferenceNetwork;
use prosody::query::Query;
use prosody::scoring::ScoringParams;

fn main() {
    let cli = Cli::parse();
    let outcome = match cli.command {
        Commands::Index {
            location,
            data_dir,
            data_file,
        } => run_index(&location, data_dir, data_file),
        Commands::Search {
            query,
            location,
            model,
            mode,
            count,
            k1,
            k2,
            b,
            alpha_d,
            mu,
        } => run_search(
            &query,
            &location,
            model,
            mode,
            count,
            ScoringParams {
                k1,
                k2,
                b,
                alpha_d,
                mu,
            },
        ),
        Commands::Structured {
            query,
            location,
            op,
            window,
            count,
        } => run_structured(&query, &location, op, window, count),
        Commands::Inspect {
            location,
            terms,
            dice,
        } => run_inspect(&location, terms, dice),
    };

    if let Err(e) = outcome {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

/// Stored config overridden by command-line flags. The index directory's own
/// config wins over defaults so query commands match whatever was built.
fn resolve_config(location: &IndexLocation) -> Config {
    let mut config =
        Config::load(std::path::Path::new(&location.index_dir)).unwrap_or_default();
    config.index_dir = location.index_dir.clone();
    if location.uncompressed {
        config.compressed = false;
    }
    if location.in_memory {
        config.in_memory = true;
    }
    config
}

fn run_index(location: &IndexLocation, data_dir: String, data_file: String) -> std::io::Result<()> {
    let mut config = resolve_config(location);
    config.data_dir = data_dir;
    config.data_file_name = data_file;

    let indexer = Indexer::new(config);
    let mut index = indexer.build()?;
    indexer.persist(&mut index)?;

    let stats = index.collection_stats();
    println!(
        "{} {} scenes, {} tokens, {} terms, average length {:.2}",
        styled("indexed", BOLD),
        stats.number_of_docs,
        stats.total_length,
        index.get_vocabulary().len(),
        stats.average_length,
    );
    Ok(())
}

fn run_search(
    query_string: &str,
    location: &IndexLocation,
    model: prosody::scoring::RetrievalModel,
    mode: prosody::query::QueryMode,
    count: usize,
    params: ScoringParams,
) -> std::io::Result<()> {
    let indexer = Indexer::new(resolve_config(location));
    let index = indexer.get_inverted_index()?;

    let query = Query::new(&index, mode, model, count, params);
    let results = query.get_documents(query_string)?;
    print_results(&results);
    Ok(())
}

fn run_structured(
    query_string: &str,
    location: &IndexLocation,
    operator: prosody::network::StructuredOperator,
    window: u32,
    count: usize,
) -> std::io::Result<()> {
    let indexer = Indexer::new(resolve_config(location));
    let index = indexer.get_inverted_index()?;

    let network = InferenceNetwork::new(&index);
    let mut root = network.get_operator(query_string, operator, window)?;
    let results = network.get_documents(&mut root, count);
    print_results(&results);
    Ok(())
}

fn run_inspect(
    location: &IndexLocation,
    top_terms: usize,
    dice_term: Option<String>,
) -> std::io::Result<()> {
    let indexer = Indexer::new(resolve_config(location));
    let index = indexer.get_inverted_index()?;

    let stats = index.collection_stats();
    println!("{}", styled("collection", BOLD));
    println!("  scenes          {}", stats.number_of_docs);
    println!("  tokens          {}", stats.total_length);
    println!("  average length  {:.2}", stats.average_length);
    println!("  vocabulary      {}", index.get_vocabulary().len());

    let mut by_ctf: Vec<(&String, u64)> = index
        .get_vocabulary()
        .iter()
        .map(|term| (term, index.get_ctf(term)))
        .collect();
    by_ctf.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));

    println!("{}", styled("most frequent terms", BOLD));
    for (term, ctf) in by_ctf.into_iter().take(top_terms) {
        println!("  {}  {}", styled(&format!("{term:<24}"), DIM), ctf);
    }

    if let Some(term) = dice_term {
        let dice = DiceCoefficient::new(&index);
        let pairs = dice.calculate(&term, top_terms)?;
        print_dice_pairs(&term, &pairs);
    }
    Ok(())
}
