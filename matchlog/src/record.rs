//! Reconstruction of a nested record from flat `path = value` log lines.

use std::io::BufRead;
use thiserror::Error;

/// Separator between the key path and the value on every log line.
const SEPARATOR: &str = " = ";

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: missing ` = ` separator in {text:?}")]
    MissingSeparator { line: usize, text: String },
    #[error("empty key path")]
    EmptyKeyPath,
    #[error("failed to read log: {0}")]
    Io(#[from] std::io::Error),
}

/// A node in the reconstructed record: a raw text leaf or a nested table.
///
/// Leaves stay text until the walker converts them; the log format carries
/// no type information of its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Text(String),
    Table(Record),
}

impl Value {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Table(_) => None,
        }
    }

    #[must_use]
    pub fn as_table(&self) -> Option<&Record> {
        match self {
            Self::Text(_) => None,
            Self::Table(table) => Some(table),
        }
    }
}

/// Insertion-ordered string map.
///
/// The config echo is rendered in the order keys first appeared in the log,
/// so lookups run over a small vec instead of a hashed map. Re-inserting an
/// existing key replaces its value in place and keeps its position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    entries: Vec<(String, Value)>,
}

impl Record {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Key/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn insert(&mut self, key: &str, value: Value) {
        match self.entries.iter_mut().find(|(name, _)| name == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    /// Assign `value` at the end of a dot-path, creating nested tables for
    /// the interior segments.
    ///
    /// Duplicate paths silently take the last-seen value; this mirrors the
    /// producer's own log semantics and is load-bearing, not an oversight. A
    /// leaf occupying an interior segment is likewise displaced by a fresh
    /// table.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::EmptyKeyPath`] for a zero-segment path. Callers
    /// that split a non-empty string never produce one.
    pub fn set_path(&mut self, path: &[&str], value: String) -> Result<(), ParseError> {
        let (last, interior) = path.split_last().ok_or(ParseError::EmptyKeyPath)?;
        let mut node = self;
        for segment in interior {
            node = node.table_at(segment);
        }
        node.insert(last, Value::Text(value));
        Ok(())
    }

    fn table_at(&mut self, key: &str) -> &mut Record {
        let index = match self.entries.iter().position(|(name, _)| name == key) {
            Some(index) => index,
            None => {
                self.entries
                    .push((key.to_string(), Value::Table(Record::new())));
                self.entries.len() - 1
            }
        };
        if !matches!(self.entries[index].1, Value::Table(_)) {
            self.entries[index].1 = Value::Table(Record::new());
        }
        match &mut self.entries[index].1 {
            Value::Table(table) => table,
            Value::Text(_) => unreachable!("entry was just replaced with a table"),
        }
    }
}

/// Rebuild the nested record encoded by a flat log stream.
///
/// Each line is trimmed of surrounding whitespace and split on the first
/// `" = "`; the left side is the dot-separated key path and the right side
/// is the value, verbatim (any further `" = "` stays in the value).
///
/// # Errors
///
/// Fails on the first line without a separator or on a read error; no
/// partial record is returned.
pub fn parse_log<R: BufRead>(reader: R) -> Result<Record, ParseError> {
    let mut root = Record::new();
    let mut lines = 0usize;

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        let (path, value) = text
            .split_once(SEPARATOR)
            .ok_or_else(|| ParseError::MissingSeparator {
                line: index + 1,
                text: text.to_string(),
            })?;
        let segments: Vec<&str> = path.split('.').collect();
        root.set_path(&segments, value.to_string())?;
        lines = index + 1;
    }

    log::debug!("reconstructed record from {lines} log lines");
    Ok(root)
}
