//! NRN (nullplatform resource name) parsing and construction
//!
//! An NRN is a `:`-separated path of `level=id` pairs walking the
//! organization tree top-down, e.g.
//! `organization=1:account=2:namespace=3:application=4:scope=5`.

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NrnLevel {
    Organization,
    Account,
    Namespace,
    Application,
    Scope,
}

impl NrnLevel {
    pub const ALL: [NrnLevel; 5] = [
        NrnLevel::Organization,
        NrnLevel::Account,
        NrnLevel::Namespace,
        NrnLevel::Application,
        NrnLevel::Scope,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NrnLevel::Organization => "organization",
            NrnLevel::Account => "account",
            NrnLevel::Namespace => "namespace",
            NrnLevel::Application => "application",
            NrnLevel::Scope => "scope",
        }
    }

    fn depth(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for NrnLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NrnLevel {
    type Err = NrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NrnLevel::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| NrnError::UnknownLevel(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NrnError {
    #[error("NRN is empty")]
    Empty,

    #[error("NRN '{0}' contains whitespace")]
    Whitespace(String),

    #[error("segment '{0}' is not of the form level=id")]
    MalformedSegment(String),

    #[error("unknown NRN level '{0}'")]
    UnknownLevel(String),

    #[error("NRN level '{0}' has an empty id")]
    EmptyId(NrnLevel),

    #[error("expected level '{expected}' but found '{found}'")]
    OutOfOrder { expected: NrnLevel, found: NrnLevel },

    #[error("'{level}' requires '{missing}' to be set")]
    MissingAncestor { level: NrnLevel, missing: NrnLevel },
}

/// A parsed NRN; segments always start at `organization` with no gaps
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Nrn {
    segments: Vec<(NrnLevel, String)>,
}

impl Nrn {
    pub fn builder() -> NrnBuilder {
        NrnBuilder::default()
    }

    /// Deepest level present
    pub fn level(&self) -> NrnLevel {
        self.segments
            .last()
            .map(|(level, _)| *level)
            .unwrap_or(NrnLevel::Organization)
    }

    pub fn get(&self, level: NrnLevel) -> Option<&str> {
        self.segments
            .iter()
            .find(|(l, _)| *l == level)
            .map(|(_, id)| id.as_str())
    }

    /// The NRN one level up, `None` for an organization
    pub fn parent(&self) -> Option<Nrn> {
        if self.segments.len() <= 1 {
            return None;
        }
        Some(Nrn {
            segments: self.segments[..self.segments.len() - 1].to_vec(),
        })
    }

    /// Extend the NRN by the next level down
    pub fn child(&self, id: impl Into<String>) -> Result<Nrn, NrnError> {
        let next = NrnLevel::ALL
            .get(self.segments.len())
            .copied()
            .ok_or_else(|| NrnError::MalformedSegment(format!("{}:<child>", self)))?;
        let id = id.into();
        if id.trim().is_empty() {
            return Err(NrnError::EmptyId(next));
        }
        let mut segments = self.segments.clone();
        segments.push((next, id));
        Ok(Nrn { segments })
    }
}

impl fmt::Display for Nrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (level, id)) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(":")?;
            }
            write!(f, "{}={}", level, id)?;
        }
        Ok(())
    }
}

impl FromStr for Nrn {
    type Err = NrnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(NrnError::Empty);
        }
        // the raw text is hashed into parameter value ids
        if s.chars().any(char::is_whitespace) {
            return Err(NrnError::Whitespace(s.to_string()));
        }

        let mut segments = Vec::new();
        for (depth, segment) in s.split(':').enumerate() {
            let (level, id) = segment
                .split_once('=')
                .ok_or_else(|| NrnError::MalformedSegment(segment.to_string()))?;
            let level: NrnLevel = level.parse()?;

            let expected = NrnLevel::ALL
                .get(depth)
                .copied()
                .ok_or_else(|| NrnError::MalformedSegment(segment.to_string()))?;
            if level != expected {
                return Err(NrnError::OutOfOrder {
                    expected,
                    found: level,
                });
            }
            if id.is_empty() {
                return Err(NrnError::EmptyId(level));
            }

            segments.push((level, id.to_string()));
        }

        Ok(Nrn { segments })
    }
}

impl serde::Serialize for Nrn {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for Nrn {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Builds an NRN from individual ids
///
/// Every level set must have all of its ancestors set too.
#[derive(Debug, Clone, Default)]
pub struct NrnBuilder {
    ids: [Option<String>; 5],
}

impl NrnBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, level: NrnLevel, id: impl ToString) -> Self {
        self.ids[level.depth()] = Some(id.to_string());
        self
    }

    pub fn set_optional(self, level: NrnLevel, id: Option<impl ToString>) -> Self {
        match id {
            Some(id) => self.set(level, id),
            None => self,
        }
    }

    pub fn organization(self, id: impl ToString) -> Self {
        self.set(NrnLevel::Organization, id)
    }

    pub fn account(self, id: impl ToString) -> Self {
        self.set(NrnLevel::Account, id)
    }

    pub fn namespace(self, id: impl ToString) -> Self {
        self.set(NrnLevel::Namespace, id)
    }

    pub fn application(self, id: impl ToString) -> Self {
        self.set(NrnLevel::Application, id)
    }

    pub fn scope(self, id: impl ToString) -> Self {
        self.set(NrnLevel::Scope, id)
    }

    pub fn build(self) -> Result<Nrn, NrnError> {
        let deepest = self
            .ids
            .iter()
            .rposition(Option::is_some)
            .ok_or(NrnError::Empty)?;

        let mut segments = Vec::with_capacity(deepest + 1);
        for (depth, id) in self.ids.into_iter().take(deepest + 1).enumerate() {
            let level = NrnLevel::ALL[depth];
            match id {
                Some(id) if id.trim().is_empty() => return Err(NrnError::EmptyId(level)),
                Some(id) => segments.push((level, id)),
                None => {
                    return Err(NrnError::MissingAncestor {
                        level: NrnLevel::ALL[deepest],
                        missing: level,
                    })
                }
            }
        }

        Ok(Nrn { segments })
    }
}
