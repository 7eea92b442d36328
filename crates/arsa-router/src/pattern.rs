//! Route pattern parsing and structural matching.
//!
//! A pattern is a `/`-separated sequence of static segments and named
//! variables. Variables are written `<name>` or `<converter:name>`:
//!
//! ```text
//! /accounts/<account_id>
//! /foobar/<int:slug>
//! /files/<path:rest>
//! ```

use std::collections::HashSet;
use std::fmt;

use uuid::Uuid;

use crate::error::PatternError;
use crate::params::{ParamValue, Params};

/// Converter applied to a path variable.
///
/// A segment that fails its converter makes the whole pattern miss; it is
/// never reported as a validation fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Converter {
    /// Any non-empty segment (default).
    String,
    /// Decimal digits, converted to `i64`.
    Int,
    /// `digits.digits`, converted to `f64`.
    Float,
    /// One or more trailing segments joined with `/`. Must be last.
    Path,
    /// A hyphenated UUID.
    Uuid,
}

impl Converter {
    /// Resolves a converter by its name in a pattern.
    pub fn from_name(name: &str) -> Result<Self, PatternError> {
        match name {
            "string" | "default" => Ok(Self::String),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            "path" => Ok(Self::Path),
            "uuid" => Ok(Self::Uuid),
            other => Err(PatternError::UnknownConverter(other.to_string())),
        }
    }

    /// Returns the converter name as written in patterns.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Path => "path",
            Self::Uuid => "uuid",
        }
    }

    /// Converts a single raw segment, or returns `None` if it does not fit.
    #[must_use]
    pub fn convert(&self, raw: &str) -> Option<ParamValue> {
        if raw.is_empty() {
            return None;
        }
        match self {
            Self::String | Self::Path => Some(ParamValue::Str(raw.to_string())),
            Self::Int => {
                if !raw.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                raw.parse().ok().map(ParamValue::Int)
            }
            Self::Float => {
                let (whole, frac) = raw.split_once('.')?;
                let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
                if !digits(whole) || !digits(frac) {
                    return None;
                }
                raw.parse().ok().map(ParamValue::Float)
            }
            Self::Uuid => Uuid::try_parse(raw).ok().map(ParamValue::Uuid),
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One segment of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal segment that must match exactly.
    Static(String),
    /// Named variable with its converter.
    Variable {
        /// Variable name, used as the argument key.
        name: String,
        /// Converter applied to the raw segment.
        converter: Converter,
    },
}

/// A parsed route pattern.
///
/// # Example
///
/// ```rust
/// use arsa_router::Pattern;
///
/// let pattern = Pattern::parse("/foobar/<int:slug>").unwrap();
/// assert_eq!(pattern.variable_count(), 1);
/// assert_eq!(pattern.static_prefix_len(), 1);
///
/// assert!(pattern.matches("/foobar/12").is_some());
/// assert!(pattern.matches("/foobar/bar").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    source: String,
    segments: Vec<Segment>,
}

impl Pattern {
    /// Parses a pattern string.
    pub fn parse(source: &str) -> Result<Self, PatternError> {
        if !source.starts_with('/') {
            return Err(PatternError::MissingLeadingSlash(source.to_string()));
        }

        let raw_segments: Vec<&str> = source.split('/').filter(|s| !s.is_empty()).collect();
        let mut segments = Vec::with_capacity(raw_segments.len());
        let mut seen = HashSet::new();

        for (index, raw) in raw_segments.iter().enumerate() {
            let segment = Self::parse_segment(raw)?;
            if let Segment::Variable { name, converter } = &segment {
                if !seen.insert(name.clone()) {
                    return Err(PatternError::DuplicateVariable(name.clone()));
                }
                if *converter == Converter::Path && index + 1 != raw_segments.len() {
                    return Err(PatternError::PathNotLast(name.clone()));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    fn parse_segment(raw: &str) -> Result<Segment, PatternError> {
        let Some(inner) = raw.strip_prefix('<').and_then(|s| s.strip_suffix('>')) else {
            if raw.contains('<') || raw.contains('>') {
                return Err(PatternError::MalformedSegment(raw.to_string()));
            }
            return Ok(Segment::Static(raw.to_string()));
        };

        let (converter, name) = match inner.split_once(':') {
            Some((converter, name)) => (Converter::from_name(converter)?, name),
            None => (Converter::String, inner),
        };

        let valid_name = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_name {
            return Err(PatternError::MalformedSegment(raw.to_string()));
        }

        Ok(Segment::Variable {
            name: name.to_string(),
            converter,
        })
    }

    /// Returns the pattern as written.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Returns the parsed segments.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Number of variable segments.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Variable { .. }))
            .count()
    }

    /// Number of static segments before the first variable.
    #[must_use]
    pub fn static_prefix_len(&self) -> usize {
        self.segments
            .iter()
            .take_while(|s| matches!(s, Segment::Static(_)))
            .count()
    }

    /// Matches a request path, returning the converted variables.
    ///
    /// Empty segments are ignored, so `/users/` matches `/users`.
    #[must_use]
    pub fn matches(&self, path: &str) -> Option<Params> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.match_segments(&parts)
    }

    pub(crate) fn match_segments(&self, parts: &[&str]) -> Option<Params> {
        let mut params = Params::with_capacity(self.variable_count());

        for (index, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(expected) => {
                    if parts.get(index) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Variable {
                    name,
                    converter: Converter::Path,
                } => {
                    let rest = parts.get(index..).filter(|rest| !rest.is_empty())?;
                    params.push(name.clone(), rest.join("/"));
                    return Some(params);
                }
                Segment::Variable { name, converter } => {
                    let value = converter.convert(parts.get(index)?)?;
                    params.push(name.clone(), value);
                }
            }
        }

        (parts.len() == self.segments.len()).then_some(params)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
