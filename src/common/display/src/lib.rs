//! Display utilities for tabulon.
//!
//! Provides text rendering for column trees and value previews.

mod tree;

pub use tree::{DisplayTree, TreeNode};

/// Truncate a string to at most `max_chars` characters, marking the cut with `...`.
pub fn truncate_string(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}

/// Indent a multi-line string.
pub fn indent(s: &str, prefix: &str) -> String {
    s.lines()
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n")
}
