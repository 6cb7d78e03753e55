// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers: ANSI styling that degrades to plain text.
//!
//! Colors only fire when stdout is a real terminal; piping results into a
//! file or another tool gets clean unstyled text.

use crate::types::SearchResult;

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const CYAN: &str = "\x1b[36m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

/// Wrap `text` in a style if stdout is a TTY.
pub fn styled(text: &str, style: &str) -> String {
    if atty::is(atty::Stream::Stdout) {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// Print a ranked result table: rank, scene, play, score.
pub fn print_results(results: &[SearchResult]) {
    if results.is_empty() {
        println!("{}", styled("no matching documents", DIM));
        return;
    }

    println!(
        "{}",
        styled(
            &format!(
                "{}  {}  {}  {}",
                pad_right("#", 4),
                pad_right("scene", 32),
                pad_right("play", 24),
                "score"
            ),
            BOLD,
        )
    );
    for (rank, result) in results.iter().enumerate() {
        println!(
            "{}  {}  {}  {}",
            pad_right(&format!("{}", rank + 1), 4),
            styled(&pad_right(&result.meta.scene_id, 32), CYAN),
            pad_right(&result.meta.play_id, 24),
            styled(&format!("{:.6}", result.score), GREEN),
        );
    }
}

/// Print `(term, coefficient)` pairs from the Dice calculator.
pub fn print_dice_pairs(term: &str, pairs: &[(String, f64)]) {
    println!(
        "{} {}",
        styled("highest Dice coefficients for", DIM),
        styled(term, BOLD)
    );
    for (other, coefficient) in pairs {
        println!(
            "  {}  {}",
            styled(&pad_right(other, 24), YELLOW),
            format!("{coefficient:.6}")
        );
    }
}
