use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};

use crate::errors::{ResourceError, Result};
use crate::media_type::MediaType;

/// Query parameter carrying the media type of the resource a URI names.
pub const MEDIA_TYPE_PARAM: &str = "mediaType";

const FRAGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'<')
    .add(b'>')
    .add(b'`')
    .add(b'%');
const PATH: &AsciiSet = &FRAGMENT.add(b'#').add(b'?').add(b'{').add(b'}');
const AUTHORITY: &AsciiSet = &PATH.add(b'/');
const QUERY: &AsciiSet = &FRAGMENT.add(b'#').add(b'&').add(b'=');

/// A URI decomposed into scheme, authority, path, query and fragment.
///
/// Components are stored percent-decoded and query parameters are kept
/// ordered by name, so equality is structural: `demo:a%20b?x=1&y=2` equals
/// `demo:a b?y=2&x=1`. Whether the text used the `scheme://authority` or the
/// opaque `scheme:authority` form only affects [`Display`](fmt::Display).
///
/// Both forms put the text before the first `/`, `?` or `#` into the
/// authority, so `demo:foo` has scheme `demo` and authority `foo`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Uri {
    scheme: String,
    authority: Option<String>,
    path: String,
    query: BTreeMap<String, String>,
    fragment: Option<String>,
    hierarchical: bool,
}

impl Uri {
    pub fn parse(input: &str) -> Result<Self> {
        let (scheme, rest) = input
            .split_once(':')
            .ok_or_else(|| ResourceError::invalid_uri(input, "missing scheme delimiter ':'"))?;
        if !is_valid_scheme(scheme) {
            return Err(ResourceError::invalid_uri(input, "invalid scheme"));
        }
        if rest.is_empty() {
            return Err(ResourceError::invalid_uri(
                input,
                "empty scheme-specific part",
            ));
        }

        let (rest, fragment) = match rest.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment)),
            None => (rest, None),
        };
        let (hier, query) = match rest.split_once('?') {
            Some((hier, query)) => (hier, Some(query)),
            None => (rest, None),
        };
        let (hierarchical, hier) = match hier.strip_prefix("//") {
            Some(hier) => (true, hier),
            None => (false, hier),
        };
        let (authority, path) = hier.split_at(hier.find('/').unwrap_or(hier.len()));

        let authority = decode(input, authority)?;
        let query = query
            .map(|q| parse_query(input, q))
            .transpose()?
            .unwrap_or_default();

        Ok(Uri {
            scheme: scheme.to_string(),
            authority: (!authority.is_empty()).then_some(authority),
            path: decode(input, path)?,
            query,
            fragment: fragment.map(|f| decode(input, f)).transpose()?,
            hierarchical,
        })
    }

    pub fn builder(scheme: impl Into<String>) -> UriBuilder {
        UriBuilder {
            scheme: scheme.into(),
            ..Default::default()
        }
    }

    /// A URI with nothing but a scheme, displayed as `scheme:?`.
    pub fn scheme_only(scheme: &'static str) -> Self {
        debug_assert!(is_valid_scheme(scheme), "invalid scheme {scheme}");
        Uri {
            scheme: scheme.to_string(),
            authority: None,
            path: String::new(),
            query: BTreeMap::new(),
            fragment: None,
            hierarchical: false,
        }
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn authority(&self) -> Option<&str> {
        self.authority.as_deref()
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    pub fn fragment(&self) -> Option<&str> {
        self.fragment.as_deref()
    }

    /// Authority followed by path, e.g. `models/demo.yaml` for both
    /// `classpath:models/demo.yaml` and `classpath:/models/demo.yaml`.
    pub fn location(&self) -> String {
        let location = format!("{}{}", self.authority().unwrap_or_default(), self.path);
        match self.authority {
            Some(_) => location,
            None => location.trim_start_matches('/').to_string(),
        }
    }

    /// Returns a copy with its path replaced; a non-empty path is made absolute.
    pub fn with_path(&self, path: &str) -> Self {
        let mut uri = self.clone();
        uri.path = absolute(path);
        uri
    }

    /// Returns a copy with its authority replaced, keeping the textual form.
    /// The authority may contain `/`; it is escaped when displayed, so
    /// [`location`](Uri::location) of the re-parsed URI returns it unchanged.
    pub fn with_authority(&self, authority: &str) -> Self {
        let mut uri = self.clone();
        uri.authority = (!authority.is_empty()).then(|| authority.to_string());
        uri
    }

    pub fn with_query_param(&self, name: &str, value: &str) -> Self {
        let mut uri = self.clone();
        uri.query.insert(name.to_string(), value.to_string());
        uri
    }

    /// Returns a copy carrying `media_type` in its `mediaType` query parameter.
    pub fn with_media_type(&self, media_type: &MediaType) -> Self {
        self.with_query_param(MEDIA_TYPE_PARAM, &media_type.to_string())
    }

    /// The media type attached to this URI, if any.
    pub fn media_type(&self) -> Result<Option<MediaType>> {
        self.query_param(MEDIA_TYPE_PARAM)
            .map(MediaType::parse)
            .transpose()
    }

    fn key(&self) -> (&str, Option<&str>, &str, &BTreeMap<String, String>, Option<&str>) {
        (
            &self.scheme,
            self.authority(),
            &self.path,
            &self.query,
            self.fragment(),
        )
    }
}

impl PartialEq for Uri {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Uri {}

impl Hash for Uri {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Uri {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Uri {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;
        if self.hierarchical {
            f.write_str("//")?;
        }
        if let Some(authority) = &self.authority {
            write!(f, "{}", utf8_percent_encode(authority, AUTHORITY))?;
        }
        write!(f, "{}", utf8_percent_encode(&self.path, PATH))?;

        if !self.query.is_empty() {
            let mut separator = '?';
            for (name, value) in &self.query {
                write!(
                    f,
                    "{}{}={}",
                    separator,
                    utf8_percent_encode(name, QUERY),
                    utf8_percent_encode(value, QUERY)
                )?;
                separator = '&';
            }
        } else if !self.hierarchical
            && self.authority.is_none()
            && self.path.is_empty()
            && self.fragment.is_none()
        {
            // keeps the scheme-specific part non-empty, so the text re-parses
            f.write_str("?")?;
        }

        if let Some(fragment) = &self.fragment {
            write!(f, "#{}", utf8_percent_encode(fragment, FRAGMENT))?;
        }
        Ok(())
    }
}

impl FromStr for Uri {
    type Err = ResourceError;

    fn from_str(s: &str) -> Result<Self> {
        Uri::parse(s)
    }
}

impl TryFrom<String> for Uri {
    type Error = ResourceError;

    fn try_from(value: String) -> Result<Self> {
        Uri::parse(&value)
    }
}

impl From<Uri> for String {
    fn from(uri: Uri) -> Self {
        uri.to_string()
    }
}

/// Structural construction of a [`Uri`].
///
/// A URI with an authority is built in the `scheme://authority/path` form,
/// one without in the opaque `scheme:/path` form. Non-empty paths are made
/// absolute.
#[derive(Debug, Clone, Default)]
pub struct UriBuilder {
    scheme: String,
    authority: Option<String>,
    path: String,
    query: BTreeMap<String, String>,
    fragment: Option<String>,
}

impl UriBuilder {
    pub fn authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = Some(authority.into());
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }

    pub fn media_type(self, media_type: &MediaType) -> Self {
        self.query_param(MEDIA_TYPE_PARAM, media_type.to_string())
    }

    pub fn fragment(mut self, fragment: impl Into<String>) -> Self {
        self.fragment = Some(fragment.into());
        self
    }

    pub fn build(self) -> Result<Uri> {
        if !is_valid_scheme(&self.scheme) {
            return Err(ResourceError::invalid_uri(&self.scheme, "invalid scheme"));
        }
        let authority = self.authority.filter(|a| !a.is_empty());
        Ok(Uri {
            scheme: self.scheme,
            hierarchical: authority.is_some(),
            authority,
            path: absolute(&self.path),
            query: self.query,
            fragment: self.fragment,
        })
    }
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn absolute(path: &str) -> String {
    if path.is_empty() || path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// `name=value` pairs separated by `&`. A `+` is a literal plus sign, not a
/// space, so values such as `application/ld+json` survive.
fn parse_query(input: &str, query: &str) -> Result<BTreeMap<String, String>> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(input, name)?, decode(input, value)?))
        })
        .collect()
}

fn decode(input: &str, component: &str) -> Result<String> {
    percent_decode_str(component)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| ResourceError::invalid_uri(input, "percent-encoding is not valid UTF-8"))
}
