//! Configuration file loader.
//!
//! Format, whitespace separated, blank lines ignored:
//!
//! ```text
//! 3          <- number of resource types
//! 10 5 7     <- available instances of each type
//! 5          <- number of processes
//! 7 5 3      <- max demand of process 0
//! 3 2 2      <- max demand of process 1
//! ...
//! ```

use std::path::Path;

use thiserror::Error;

use crate::allocator::AllocatorError;
use crate::models::SystemConfig;

/// Errors that can occur while loading a configuration file.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Can't open file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Missing {0}")]
    MissingLine(&'static str),
    #[error("Line {line}: invalid number {token:?}")]
    InvalidNumber { line: usize, token: String },
    #[error("Line {line}: expected {expected} values, found {found}")]
    WrongLength {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error("Expected {expected} process rows, found {found}")]
    WrongRowCount { expected: usize, found: usize },
    #[error(transparent)]
    Config(#[from] AllocatorError),
}

/// Read and parse a configuration file.
pub fn load_config(path: impl AsRef<Path>) -> Result<SystemConfig, LoaderError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoaderError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_config(&text)
}

/// Parse configuration text.
pub fn parse_config(text: &str) -> Result<SystemConfig, LoaderError> {
    // (1-based line number, content) for every non-blank line
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, content) = lines.next().ok_or(LoaderError::MissingLine("resource count"))?;
    let resource_count = parse_single(line, content)?;

    let (line, content) = lines
        .next()
        .ok_or(LoaderError::MissingLine("available resources"))?;
    let available = parse_row(line, content, resource_count)?;

    let (line, content) = lines.next().ok_or(LoaderError::MissingLine("process count"))?;
    let process_count = parse_single(line, content)?;

    let max = lines
        .map(|(line, content)| parse_row(line, content, resource_count))
        .collect::<Result<Vec<_>, _>>()?;
    if max.len() != process_count {
        return Err(LoaderError::WrongRowCount {
            expected: process_count,
            found: max.len(),
        });
    }

    let config = SystemConfig {
        resource_count,
        process_count,
        available,
        max,
    };
    config.validate()?;
    Ok(config)
}

fn parse_number<T: std::str::FromStr>(line: usize, token: &str) -> Result<T, LoaderError> {
    token.parse().map_err(|_| LoaderError::InvalidNumber {
        line,
        token: token.to_string(),
    })
}

fn parse_single(line: usize, content: &str) -> Result<usize, LoaderError> {
    let tokens: Vec<&str> = content.split_whitespace().collect();
    if tokens.len() != 1 {
        return Err(LoaderError::WrongLength {
            line,
            expected: 1,
            found: tokens.len(),
        });
    }
    parse_number(line, tokens[0])
}

fn parse_row(line: usize, content: &str, expected: usize) -> Result<Vec<u32>, LoaderError> {
    let row = content
        .split_whitespace()
        .map(|token| parse_number(line, token))
        .collect::<Result<Vec<u32>, _>>()?;
    if row.len() != expected {
        return Err(LoaderError::WrongLength {
            line,
            expected,
            found: row.len(),
        });
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLASSIC: &str = "3\n10 5 7\n5\n7 5 3\n3 2 2\n9 0 2\n2 2 2\n4 3 3\n";

    #[test]
    fn test_parse_classic() {
        let config = parse_config(CLASSIC).unwrap();
        assert_eq!(config.resource_count, 3);
        assert_eq!(config.process_count, 5);
        assert_eq!(config.available, vec![10, 5, 7]);
        assert_eq!(config.max[2], vec![9, 0, 2]);
    }

    #[test]
    fn test_blank_lines_and_extra_spaces() {
        let text = "\n2\n  4   4 \n\n1\n2 2\n\n\n";
        let config = parse_config(text).unwrap();
        assert_eq!(config.available, vec![4, 4]);
        assert_eq!(config.max, vec![vec![2, 2]]);
    }

    #[test]
    fn test_missing_lines() {
        assert!(matches!(
            parse_config(""),
            Err(LoaderError::MissingLine("resource count"))
        ));
        assert!(matches!(
            parse_config("2\n1 1\n"),
            Err(LoaderError::MissingLine("process count"))
        ));
    }

    #[test]
    fn test_invalid_number_reports_line() {
        let err = parse_config("2\n1 x\n1\n1 1\n").unwrap_err();
        match err {
            LoaderError::InvalidNumber { line, token } => {
                assert_eq!(line, 2);
                assert_eq!(token, "x");
            }
            other => panic!("unexpected error: {}", other),
        }
        // Negative counts are rejected
        assert!(parse_config("1\n-1\n1\n1\n").is_err());
    }

    #[test]
    fn test_row_length_and_count() {
        assert!(matches!(
            parse_config("2\n1 1\n1\n1 1 1\n"),
            Err(LoaderError::WrongLength {
                line: 4,
                expected: 2,
                found: 3
            })
        ));
        assert!(matches!(
            parse_config("1\n1\n2\n1\n"),
            Err(LoaderError::WrongRowCount {
                expected: 2,
                found: 1
            })
        ));
        assert!(matches!(
            parse_config("1\n1\n1\n1\n1\n"),
            Err(LoaderError::WrongRowCount {
                expected: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_zero_processes_is_config_error() {
        assert!(matches!(
            parse_config("1\n1\n0\n"),
            Err(LoaderError::Config(AllocatorError::InvalidConfig(_)))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_config("/nonexistent/banker.cfg").unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/banker.cfg"));
    }
}
