//! JSON document store
//!
//! Every operation is a full load, mutate and rewrite cycle against the file
//! at the given path. Nothing is cached between calls.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use thiserror::Error;

/// Default indentation width used when rewriting a document
pub const DEFAULT_INDENT: usize = 4;

/// Errors raised by document store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("the selected file is empty: {}", path.display())]
    EmptyFile { path: PathBuf },

    #[error("malformed JSON in {}", path.display())]
    MalformedJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("value is not valid JSON")]
    InvalidEntry(#[source] serde_json::Error),

    #[error("cannot append to {}: root value is {found}, not an array", path.display())]
    NotArray { path: PathBuf, found: &'static str },

    #[error("failed to access {}", path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl StoreError {
    fn io(path: &Path, source: io::Error) -> Self {
        Self::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Load the document at `path`.
///
/// A zero-byte file is reported as [`StoreError::EmptyFile`] without a parse
/// attempt. The root value is not type-checked.
pub fn load(path: &Path) -> Result<Value, StoreError> {
    let bytes = fs::read(path).map_err(|e| StoreError::io(path, e))?;
    if bytes.is_empty() {
        return Err(StoreError::EmptyFile {
            path: path.to_path_buf(),
        });
    }

    let value = serde_json::from_slice(&bytes).map_err(|source| StoreError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!("Loaded document: {}", path.display());
    Ok(value)
}

/// Load the document at `path` and require an array root
pub fn load_array(path: &Path) -> Result<Vec<Value>, StoreError> {
    match load(path)? {
        Value::Array(entries) => Ok(entries),
        other => Err(StoreError::NotArray {
            path: path.to_path_buf(),
            found: json_type_name(&other),
        }),
    }
}

/// Parse candidate entry text into a JSON value
pub fn parse_entry(text: &str) -> Result<Value, StoreError> {
    serde_json::from_str(text).map_err(StoreError::InvalidEntry)
}

/// Dry-run probe: report whether `text` would be accepted as a JSON entry
/// for the document at `path`.
///
/// The document is still loaded so that an unreadable or non-array document
/// surfaces as an error here. Only format errors in `text` become `false`.
/// Nothing is written.
pub fn try_parse_as_json(path: &Path, text: &str) -> Result<bool, StoreError> {
    load_array(path)?;
    let valid = parse_entry(text).is_ok();
    tracing::debug!("Probe of {:?} against {}: {}", text, path.display(), valid);
    Ok(valid)
}

/// Name of a JSON value's type, as used in error messages
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pretty printer that can escape every non-ASCII character as `\uXXXX`
struct DocumentFormatter<'a> {
    pretty: PrettyFormatter<'a>,
    ascii_only: bool,
}

impl Formatter for DocumentFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if !self.ascii_only || fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for c in fragment.chars() {
            if c.is_ascii() {
                writer.write_all(&[c as u8])?;
            } else {
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}

/// Appends entries to array documents and rewrites them pretty-printed
#[derive(Debug, Clone)]
pub struct DocumentStore {
    indent: String,
    ascii_only: bool,
}

impl Default for DocumentStore {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl DocumentStore {
    /// Create a store that rewrites documents with `indent` spaces per level
    /// and non-ASCII characters escaped
    pub fn new(indent: usize) -> Self {
        Self {
            indent: " ".repeat(indent),
            ascii_only: true,
        }
    }

    /// Write non-ASCII characters as `\uXXXX` escapes (the default) or as UTF-8
    pub fn ascii_only(mut self, ascii_only: bool) -> Self {
        self.ascii_only = ascii_only;
        self
    }

    /// Parse `text` as JSON and append it. Returns the new entry count.
    ///
    /// Invalid `text` fails with [`StoreError::InvalidEntry`] before the file
    /// is touched.
    pub fn append_json(&self, path: &Path, text: &str) -> Result<usize, StoreError> {
        let value = parse_entry(text)?;
        self.append_value(path, value)
    }

    /// Append `text` verbatim as a string entry. Returns the new entry count.
    pub fn append_raw(&self, path: &Path, text: &str) -> Result<usize, StoreError> {
        self.append_value(path, Value::String(text.to_string()))
    }

    /// Reload the array at `path`, push `value` and rewrite the whole file
    pub fn append_value(&self, path: &Path, value: Value) -> Result<usize, StoreError> {
        let mut entries = load_array(path)?;
        entries.push(value);
        let count = entries.len();

        self.write(path, &Value::Array(entries))?;
        tracing::info!("Appended entry {} to {}", count - 1, path.display());
        Ok(count)
    }

    /// Replace the file at `path` with `value`
    fn write(&self, path: &Path, value: &Value) -> Result<(), StoreError> {
        let formatter = DocumentFormatter {
            pretty: PrettyFormatter::with_indent(self.indent.as_bytes()),
            ascii_only: self.ascii_only,
        };
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        value
            .serialize(&mut serializer)
            .map_err(|e| StoreError::io(path, e.into()))?;

        fs::write(path, buf).map_err(|e| StoreError::io(path, e))
    }
}
