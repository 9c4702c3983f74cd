use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{ResourceError, Result};

/// An RFC 2045 style media type, e.g. `text/plain; charset=utf-8`.
///
/// Type, subtype and parameter names are normalized to lowercase, as is the
/// value of the `charset` parameter. Parameters are kept ordered by name, so
/// two media types compare equal whenever they carry the same parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct MediaType {
    kind: String,
    subtype: String,
    parameters: BTreeMap<String, String>,
}

const CHARSET: &str = "charset";

impl MediaType {
    pub fn new(kind: &str, subtype: &str) -> Self {
        MediaType {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn parse(input: &str) -> Result<Self> {
        let invalid = || ResourceError::InvalidMediaType(input.to_string());

        let mut parts = split_parameters(input).into_iter();
        let essence = parts.next().unwrap_or_default().trim();
        let (kind, subtype) = essence.split_once('/').ok_or_else(invalid)?;
        if !is_token(kind) || !is_token(subtype) {
            return Err(invalid());
        }

        let mut media_type = MediaType::new(kind, subtype);
        for parameter in parts {
            let parameter = parameter.trim();
            if parameter.is_empty() {
                continue;
            }
            let (name, value) = parameter.split_once('=').ok_or_else(invalid)?;
            let name = name.trim();
            let value = unquote(value.trim()).ok_or_else(invalid)?;
            if !is_token(name) || value.is_empty() {
                return Err(invalid());
            }
            media_type = media_type.with_parameter(name, &value);
        }
        Ok(media_type)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `type/subtype` without parameters.
    pub fn essence(&self) -> String {
        format!("{}/{}", self.kind, self.subtype)
    }

    pub fn parameters(&self) -> &BTreeMap<String, String> {
        &self.parameters
    }

    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn with_parameter(mut self, name: &str, value: &str) -> Self {
        let name = name.to_ascii_lowercase();
        let value = if name == CHARSET {
            value.to_ascii_lowercase()
        } else {
            value.to_string()
        };
        self.parameters.insert(name, value);
        self
    }

    pub fn charset(&self) -> Option<&str> {
        self.parameter(CHARSET)
    }

    pub fn with_charset(self, charset: Charset) -> Self {
        self.with_parameter(CHARSET, charset.name())
    }

    /// Whether `self` falls within `range`, where `range` may use `*` for its
    /// type or subtype. Parameters present in `range` must match too.
    pub fn is(&self, range: &MediaType) -> bool {
        let kind_matches = range.kind == "*" || range.kind == self.kind;
        let subtype_matches = range.subtype == "*" || range.subtype == self.subtype;
        kind_matches
            && subtype_matches
            && range
                .parameters
                .iter()
                .all(|(name, value)| self.parameters.get(name) == Some(value))
    }

    pub fn octet_stream() -> Self {
        MediaType::new("application", "octet-stream")
    }

    pub fn plain_text_utf8() -> Self {
        MediaType::new("text", "plain").with_charset(Charset::Utf8)
    }

    pub fn json_utf8() -> Self {
        MediaType::new("application", "json").with_charset(Charset::Utf8)
    }

    pub fn yaml_utf8() -> Self {
        MediaType::new("application", "yaml").with_charset(Charset::Utf8)
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)?;
        for (name, value) in &self.parameters {
            if is_token(value) {
                write!(f, "; {}={}", name, value)?;
            } else {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {}=\"{}\"", name, escaped)?;
            }
        }
        Ok(())
    }
}

impl FromStr for MediaType {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self> {
        MediaType::parse(s)
    }
}

impl TryFrom<String> for MediaType {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self> {
        MediaType::parse(&value)
    }
}

impl From<MediaType> for String {
    fn from(media_type: MediaType) -> Self {
        media_type.to_string()
    }
}

/// Character encodings supported by character streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    UsAscii,
}

impl Charset {
    pub fn name(&self) -> &'static str {
        match self {
            Charset::Utf8 => "utf-8",
            Charset::UsAscii => "us-ascii",
        }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "us-ascii" | "ascii" => Ok(Charset::UsAscii),
            _ => Err(ResourceError::UnsupportedCharset(name.to_string())),
        }
    }

    /// The charset declared by `media_type`, defaulting to UTF-8.
    pub fn for_media_type(media_type: &MediaType) -> Result<Self> {
        media_type
            .charset()
            .map_or(Ok(Charset::Utf8), Charset::from_name)
    }
}

fn is_token(text: &str) -> bool {
    !text.is_empty()
        && text
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}

/// Splits on `;` outside of quoted strings.
fn split_parameters(input: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut quoted = false;
    let mut escaped = false;
    for (index, c) in input.char_indices() {
        match c {
            _ if escaped => escaped = false,
            '\\' if quoted => escaped = true,
            '"' => quoted = !quoted,
            ';' if !quoted => {
                parts.push(&input[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    parts.push(&input[start..]);
    parts
}

/// Strips the quotes of a quoted string and resolves its `\` escapes.
/// `None` for an unterminated quoted string.
fn unquote(value: &str) -> Option<String> {
    let Some(inner) = value.strip_prefix('"') else {
        return Some(value.to_string());
    };
    let mut unquoted = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => unquoted.push(chars.next()?),
            '"' => return chars.as_str().is_empty().then_some(unquoted),
            _ => unquoted.push(c),
        }
    }
    None
}
