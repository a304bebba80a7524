//! Shared helper functions for CLI commands
//!
//! This module contains utility functions that are used across multiple
//! command modules to avoid code duplication.

use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, IsTerminal, Write};
use std::path::Path;

/// Truncate a string to max_len characters, adding "..." if truncated
///
/// Counts characters rather than bytes so multi-byte names never split.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Whether a person is at the keyboard (both stdin and stdout are terminals)
pub fn interactive() -> bool {
    std::io::stdin().is_terminal() && console::user_attended()
}

/// Write to a file, or stdout when no path is given
pub fn write_output(content: &str, output_path: Option<&Path>) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

/// Split a command line into words, honouring single and double quotes
///
/// Returns `None` when a quote is left open.
pub fn split_args(line: &str) -> Option<Vec<String>> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;
    let mut chars = line.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some('"'), '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (Some(_), c) => current.push(c),
            (None, '"') | (None, '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return None;
    }
    if in_word {
        words.push(current);
    }
    Some(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_str() {
        assert_eq!(truncate_str("hello", 10), "hello");
        assert_eq!(truncate_str("hello world", 8), "hello...");
        assert_eq!(truncate_str("hi", 2), "hi");
        assert_eq!(truncate_str("스마트 재고 관리 시스템", 6), "스마트...");
    }

    #[test]
    fn test_split_args() {
        assert_eq!(
            split_args(r#"add A-1 "Red Apple" --qty 3"#).unwrap(),
            vec!["add", "A-1", "Red Apple", "--qty", "3"]
        );
        assert_eq!(
            split_args("  list   'green tea' ").unwrap(),
            vec!["list", "green tea"]
        );
        assert_eq!(split_args(r#"add X """#).unwrap(), vec!["add", "X", ""]);
        assert_eq!(
            split_args(r#"add X "say \"hi\"""#).unwrap(),
            vec!["add", "X", "say \"hi\""]
        );
        assert!(split_args(r#"add "unterminated"#).is_none());
        assert!(split_args("").unwrap().is_empty());
    }
}
