//! Lookup keys and the patterns they normalize into.
//!
//! A [`Query`] is whatever a caller hands to a collection lookup: an exact
//! [`Identifier`], a string, or a regular expression. A [`Pattern`] is the
//! single match predicate a query resolves to:
//!
//! | Query                | Pattern                                      |
//! |----------------------|----------------------------------------------|
//! | `Query::Identifier`  | exact string equality                        |
//! | `Query::String`      | glob (`*`/`?` stay within a segment, `**` spans segments, `{a,b}` alternation) |
//! | `Query::Regex`       | unanchored regex search on the string form   |

use crate::error::{ErrorKind, Result};
use crate::identifier::Identifier;
use exn::ResultExt;
use globset::{GlobBuilder, GlobMatcher};
use regex::Regex;
use std::any::{Any, type_name};

#[derive(Debug, Clone)]
pub enum Query {
    Identifier(Identifier),
    String(String),
    Regex(Regex),
}
impl Query {
    /// Interprets a dynamically typed key, for callers that can't commit to a
    /// key type at compile time.
    ///
    /// Accepts [`Query`], [`Identifier`], [`String`], `&'static str` and
    /// [`Regex`]; anything else is an [`InvalidArgument`](ErrorKind::InvalidArgument).
    ///
    /// ```
    /// use quill_core::Query;
    /// use quill_core::error::ErrorKind;
    ///
    /// assert!(matches!(Query::from_any(&"/a/").unwrap(), Query::String(_)));
    /// let err = Query::from_any(&42).unwrap_err();
    /// assert_eq!(*err, ErrorKind::InvalidArgument("i32"));
    /// ```
    pub fn from_any<K: Any>(key: &K) -> Result<Self> {
        let any = key as &dyn Any;
        if let Some(query) = any.downcast_ref::<Query>() {
            return Ok(query.clone());
        }
        if let Some(identifier) = any.downcast_ref::<Identifier>() {
            return Ok(Self::Identifier(identifier.clone()));
        }
        if let Some(string) = any.downcast_ref::<String>() {
            return Ok(Self::String(string.clone()));
        }
        if let Some(string) = any.downcast_ref::<&str>() {
            return Ok(Self::String((*string).to_string()));
        }
        if let Some(regex) = any.downcast_ref::<Regex>() {
            return Ok(Self::Regex(regex.clone()));
        }
        exn::bail!(ErrorKind::InvalidArgument(type_name::<K>()))
    }

    /// Hashable stand-in for the query, used to key memoized lookups.
    ///
    /// Regexes have none: flags set through [`regex::RegexBuilder`] aren't
    /// part of [`Regex::as_str`], so two different regexes can share a source.
    pub(crate) fn memo_key(&self) -> Option<MemoKey> {
        match self {
            Query::Identifier(identifier) => Some(MemoKey::Identifier(identifier.as_str().to_string())),
            Query::String(string) => Some(MemoKey::String(string.clone())),
            Query::Regex(_) => None,
        }
    }
}
impl From<Identifier> for Query {
    fn from(identifier: Identifier) -> Self {
        Self::Identifier(identifier)
    }
}
impl From<&Identifier> for Query {
    fn from(identifier: &Identifier) -> Self {
        Self::Identifier(identifier.clone())
    }
}
impl From<String> for Query {
    fn from(string: String) -> Self {
        Self::String(string)
    }
}
impl From<&str> for Query {
    fn from(string: &str) -> Self {
        Self::String(string.to_string())
    }
}
impl From<Regex> for Query {
    fn from(regex: Regex) -> Self {
        Self::Regex(regex)
    }
}
impl From<&Regex> for Query {
    fn from(regex: &Regex) -> Self {
        Self::Regex(regex.clone())
    }
}

/// The variant keeps an identifier and a glob with the same text apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub(crate) enum MemoKey {
    Identifier(String),
    String(String),
}

#[derive(Debug, Clone)]
pub struct Glob {
    matcher: GlobMatcher,
}
impl Glob {
    pub fn new(source: impl AsRef<str>) -> Result<Self> {
        let source = source.as_ref();
        let matcher = GlobBuilder::new(source)
            .literal_separator(true)
            .backslash_escape(true)
            .build()
            .or_raise(|| ErrorKind::InvalidPattern(source.to_string()))?
            .compile_matcher();
        Ok(Self { matcher })
    }

    pub fn is_match(&self, candidate: &str) -> bool {
        self.matcher.is_match(candidate)
    }
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Identifier(Identifier),
    Glob(Glob),
    Regex(Regex),
}
impl Pattern {
    pub fn from_query(query: &Query) -> Result<Self> {
        Ok(match query {
            Query::Identifier(identifier) => Self::Identifier(identifier.clone()),
            Query::String(string) => Self::Glob(Glob::new(string.as_str())?),
            Query::Regex(regex) => Self::Regex(regex.clone()),
        })
    }

    /// Compiles a regular expression pattern from source.
    pub fn regex(source: impl AsRef<str>) -> Result<Self> {
        let source = source.as_ref();
        Ok(Self::Regex(Regex::new(source).or_raise(|| ErrorKind::InvalidPattern(source.to_string()))?))
    }

    pub fn is_match(&self, identifier: &Identifier) -> bool {
        match self {
            Pattern::Identifier(exact) => exact == identifier,
            Pattern::Glob(glob) => glob.is_match(identifier.as_str()),
            Pattern::Regex(regex) => regex.is_match(identifier.as_str()),
        }
    }
}
