#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
//! Readers for the two text files describing a puzzle.
//!
//! A structure file has one line per grid row. An underscore (`_`) marks a cell that belongs
//! to the crossword; any other character is blocked. Rows may differ in length, the grid is
//! as wide as its longest row. Blank lines at the end of the file are ignored.
//!
//! A word file has one word per line. Words are trimmed and upper-cased, blank lines are
//! skipped and repeated words collapse into one. Words with anything other than ASCII letters
//! are skipped with a warning.

use crate::crossword::Crossword;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

/// Marks an open cell in a structure file.
pub const OPEN_CELL: char = '_';

/// Errors raised while reading a puzzle.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// A file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// The file being read.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The structure file holds no row.
    #[error("Empty structure")]
    EmptyStructure,

    /// The structure has no run of two or more open cells.
    #[error("Structure has no slot of two or more cells")]
    NoSlots,

    /// The word file holds no word.
    #[error("Empty word list")]
    EmptyWordList,
}

impl ParseError {
    /// Returns the error code for this error variant.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Io { .. } => "E001",
            Self::EmptyStructure => "E002",
            Self::NoSlots => "E003",
            Self::EmptyWordList => "E004",
        }
    }
}

/// Reads a structure into an occupancy matrix, `true` meaning open.
///
/// Rows are returned as read; padding to a rectangle is left to [`Crossword::new`].
///
/// # Errors
///
/// [`ParseError::Io`] if reading fails, [`ParseError::EmptyStructure`] if there is no row.
pub fn parse_structure<R: BufRead>(reader: R) -> Result<Vec<Vec<bool>>, ParseError> {
    let mut rows = reader
        .lines()
        .map(|line| {
            line.map(|l| l.chars().map(|c| c == OPEN_CELL).collect::<Vec<_>>())
                .map_err(|source| ParseError::Io {
                    path: PathBuf::new(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    while rows.last().is_some_and(Vec::is_empty) {
        rows.pop();
    }

    if rows.is_empty() {
        return Err(ParseError::EmptyStructure);
    }
    Ok(rows)
}

/// Reads a word list.
///
/// # Errors
///
/// [`ParseError::Io`] if reading fails, [`ParseError::EmptyWordList`] if no word is left.
/// Words with a character outside `A-Z`/`a-z` are skipped, not reported.
pub fn parse_words<R: BufRead>(reader: R) -> Result<Vec<String>, ParseError> {
    let mut words = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ParseError::Io {
            path: PathBuf::new(),
            source,
        })?;
        let word = line.trim();
        if word.is_empty() {
            continue;
        }
        if !word.chars().all(|c| c.is_ascii_alphabetic()) {
            log::warn!("Skipping word {word:?} on line {} (only A-Z allowed)", index + 1);
            continue;
        }
        words.push(word.to_ascii_uppercase());
    }

    if words.is_empty() {
        return Err(ParseError::EmptyWordList);
    }
    Ok(words)
}

/// Builds a puzzle from a structure file and a word file.
///
/// # Errors
///
/// Any error of [`parse_structure`] or [`parse_words`], with the offending path attached to
/// I/O errors, and [`ParseError::NoSlots`] if the structure yields no variable.
pub fn parse_files(structure: &Path, words: &Path) -> Result<Crossword, ParseError> {
    let rows = parse_structure(open(structure)?).map_err(|e| with_path(e, structure))?;
    let words = parse_words(open(words)?).map_err(|e| with_path(e, words))?;

    let puzzle = Crossword::new(rows, words);
    if puzzle.num_vars() == 0 {
        return Err(ParseError::NoSlots);
    }

    log::debug!(
        "Parsed {}: {}x{} grid, {} slots, {} words",
        structure.display(),
        puzzle.height(),
        puzzle.width(),
        puzzle.num_vars(),
        puzzle.num_words()
    );
    Ok(puzzle)
}

fn open(path: &Path) -> Result<BufReader<File>, ParseError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| ParseError::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn with_path(error: ParseError, path: &Path) -> ParseError {
    match error {
        ParseError::Io { source, .. } => ParseError::Io {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    }
}
