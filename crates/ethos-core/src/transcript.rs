//! Transcript parsing.
//!
//! A transcript is a JSONL file: one JSON object per line, blank lines
//! ignored. Line order is the sequencing source of truth for graph
//! construction.
//!
//! An [`Event`] retains the raw JSON object exactly as parsed. This matters
//! for integrity: the node content hash is computed over the event as it
//! appeared in the transcript, so no defaulted or normalized field may leak
//! into the hashed bytes.

use std::path::Path;

use serde_json::{Map, Value};
use thiserror::Error;

/// The `type` tag marking a tool invocation event.
pub const EVENT_KIND_TOOL_CALL: &str = "tool_call";

/// The `type` assumed when an event carries no tag.
pub const EVENT_KIND_DEFAULT: &str = "event";

/// Errors that can occur while reading a transcript.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum TranscriptError {
    /// The transcript file could not be read.
    #[error("transcript I/O failed for {path}: {source}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A line is not valid JSON.
    #[error("transcript line {line} is not valid JSON: {detail}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// Description of the parse failure.
        detail: String,
    },

    /// A line parsed to something other than a JSON object.
    #[error("transcript line {line} is not a JSON object")]
    NotAnObject {
        /// 1-based line number.
        line: usize,
    },
}

/// One transcript record, immutable once read.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    fields: Map<String, Value>,
}

impl Event {
    /// Wraps a parsed JSON value as an event.
    ///
    /// # Errors
    ///
    /// Returns [`TranscriptError::NotAnObject`] (reported with line 0) if
    /// the value is not an object. Callers with position information should
    /// use [`load_transcript`].
    pub fn from_value(value: Value) -> Result<Self, TranscriptError> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(TranscriptError::NotAnObject { line: 0 }),
        }
    }

    /// The event's `type` tag, defaulting to [`EVENT_KIND_DEFAULT`].
    #[must_use]
    pub fn kind(&self) -> &str {
        self.fields
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or(EVENT_KIND_DEFAULT)
    }

    /// True when this event is a tool invocation.
    #[must_use]
    pub fn is_tool_call(&self) -> bool {
        self.kind() == EVENT_KIND_TOOL_CALL
    }

    /// The event's timestamp, if present.
    #[must_use]
    pub fn ts(&self) -> Option<&str> {
        self.fields.get("ts").and_then(Value::as_str)
    }

    /// The event's role, if present.
    #[must_use]
    pub fn role(&self) -> Option<&str> {
        self.fields.get("role").and_then(Value::as_str)
    }

    /// The tool name, if present.
    #[must_use]
    pub fn tool_name(&self) -> Option<&str> {
        self.fields.get("tool_name").and_then(Value::as_str)
    }

    /// The tool-call payload, if present.
    #[must_use]
    pub fn payload(&self) -> Option<&Value> {
        self.fields.get("payload")
    }

    /// The raw event object, exactly as parsed.
    #[must_use]
    pub fn as_value(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

/// Reads an ordered transcript from a JSONL file.
///
/// Blank lines are skipped; every other line must parse to a JSON object.
///
/// # Errors
///
/// Returns [`TranscriptError::Io`] if the file cannot be read, or a
/// line-numbered parse error for the first malformed line.
pub fn load_transcript(path: &Path) -> Result<Vec<Event>, TranscriptError> {
    let text = std::fs::read_to_string(path).map_err(|source| TranscriptError::Io {
        path: path.display().to_string(),
        source,
    })?;
    parse_transcript(&text)
}

/// Parses transcript text in JSONL form.
///
/// # Errors
///
/// Returns a line-numbered error for the first malformed or non-object
/// line.
pub fn parse_transcript(text: &str) -> Result<Vec<Event>, TranscriptError> {
    let mut events = Vec::new();
    for (index, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value =
            serde_json::from_str(line).map_err(|e| TranscriptError::Parse {
                line: index + 1,
                detail: e.to_string(),
            })?;
        match value {
            Value::Object(fields) => events.push(Event { fields }),
            _ => return Err(TranscriptError::NotAnObject { line: index + 1 }),
        }
    }
    Ok(events)
}
