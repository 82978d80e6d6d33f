//! Header + body codec for record files.
//!
//! A record file is a YAML header between two `---` lines followed by a
//! free-form markdown body:
//!
//! ```text
//! ---
//! id: PROJ-001
//! status: draft
//! ---
//! ## Body
//! ```
//!
//! Parsing never fails loudly: anything that is not a well-formed header
//! mapping comes back as `None`.

use crate::error::{Result, SwarmError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

pub const DELIMITER: &str = "---";

/// A decoded record file.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub header: Mapping,
    pub body: String,
}

impl Document {
    pub fn new(header: Mapping, body: impl Into<String>) -> Self {
        Self {
            header,
            body: body.into(),
        }
    }

    /// Decode the header into a typed record.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_yaml::from_value(Value::Mapping(self.header.clone()))?)
    }

    /// Look up a string-valued header field.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.header.get(key).and_then(Value::as_str)
    }

    pub fn to_text(&self) -> Result<String> {
        serialize(&self.header, &self.body)
    }
}

/// Parse `text` into a header mapping and a body.
///
/// Returns `None` when the text does not open with a delimiter line, when no
/// closing delimiter line exists, when the header block is not valid YAML, or
/// when it decodes to anything other than a mapping (including an empty block).
/// At most one newline after the closing delimiter is stripped from the body.
pub fn parse(text: &str) -> Option<Document> {
    let rest = text.strip_prefix(DELIMITER)?;
    let rest = rest
        .strip_prefix("\r\n")
        .or_else(|| rest.strip_prefix('\n'))?;

    let mut offset = 0;
    loop {
        let line_end = rest[offset..]
            .find('\n')
            .map(|i| offset + i)
            .unwrap_or(rest.len());
        let line = rest[offset..line_end].trim_end_matches('\r');

        if line == DELIMITER {
            let block = &rest[..offset];
            let after = &rest[line_end..];
            let body = after.strip_prefix('\n').unwrap_or(after);
            return match serde_yaml::from_str::<Value>(block) {
                Ok(Value::Mapping(header)) => Some(Document::new(header, body)),
                _ => None,
            };
        }

        if line_end == rest.len() {
            return None;
        }
        offset = line_end + 1;
    }
}

/// Parse and decode the header as `T` in one step.
pub fn parse_as<T: DeserializeOwned>(text: &str) -> Option<(T, String)> {
    let doc = parse(text)?;
    let header = doc.decode().ok()?;
    Some((header, doc.body))
}

/// Serialize a header and body into record text.
///
/// The body is appended verbatim; long scalars are not wrapped.
pub fn serialize<T: Serialize + ?Sized>(header: &T, body: &str) -> Result<String> {
    let value = serde_yaml::to_value(header)?;
    if !value.is_mapping() {
        return Err(SwarmError::HeaderNotMapping);
    }
    let yaml = serde_yaml::to_string(&value)?;
    Ok(format!("{DELIMITER}\n{yaml}{DELIMITER}\n{body}"))
}

/// Serialize any header into an ordered mapping.
pub fn to_mapping<T: Serialize + ?Sized>(header: &T) -> Result<Mapping> {
    match serde_yaml::to_value(header)? {
        Value::Mapping(m) => Ok(m),
        _ => Err(SwarmError::HeaderNotMapping),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
