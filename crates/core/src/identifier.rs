//! Hierarchical identifiers for content.
//!
//! An identifier is a path-like key such as `/about.md` (a *full* identifier)
//! or `/about/` (a *legacy* identifier). Two identifiers are equal when their
//! string forms are equal, regardless of kind.

use crate::error::{Error, ErrorKind, Result};
use crate::pattern::Pattern;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdentifierKind {
    /// `/path/to/file.ext`, compared verbatim.
    Full,
    /// `/path/to/file/`, always wrapped in single slashes.
    Legacy,
}

#[derive(Debug, Clone)]
pub struct Identifier {
    string: String,
    kind: IdentifierKind,
}
impl Identifier {
    /// Creates a full identifier.
    ///
    /// ```
    /// use quill_core::Identifier;
    ///
    /// assert!(Identifier::new("/about.md").is_ok());
    /// assert!(Identifier::new("about.md").is_err()); // not rooted
    /// assert!(Identifier::new("/about/").is_err()); // trailing slash is legacy-only
    /// assert!(Identifier::new("/").is_ok()); // except for the root
    /// ```
    pub fn new(string: impl Into<String>) -> Result<Self> {
        let string = string.into();
        if !string.starts_with('/') || (string.ends_with('/') && string != "/") {
            exn::bail!(ErrorKind::InvalidIdentifier(string));
        }
        Ok(Self {
            string,
            kind: IdentifierKind::Full,
        })
    }

    /// Creates a legacy identifier, normalizing slashes.
    ///
    /// ```
    /// use quill_core::Identifier;
    ///
    /// assert_eq!(Identifier::legacy("about").as_str(), "/about/");
    /// assert_eq!(Identifier::legacy("//blog///post/").as_str(), "/blog/post/");
    /// assert_eq!(Identifier::legacy("").as_str(), "/");
    /// ```
    pub fn legacy(string: impl AsRef<str>) -> Self {
        let inner = string.as_ref().split('/').filter(|c| !c.is_empty()).collect::<Vec<_>>().join("/");
        let string = match inner.is_empty() {
            true => "/".to_string(),
            false => format!("/{inner}/"),
        };
        Self {
            string,
            kind: IdentifierKind::Legacy,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }

    pub fn is_full(&self) -> bool {
        self.kind == IdentifierKind::Full
    }

    pub fn is_legacy(&self) -> bool {
        self.kind == IdentifierKind::Legacy
    }

    /// Non-empty path segments, in order.
    pub fn components(&self) -> impl Iterator<Item = &str> {
        self.string.split('/').filter(|c| !c.is_empty())
    }

    /// Extension of the last segment, without the dot. Dotfiles such as
    /// `/.htaccess` have no extension, and legacy identifiers never do.
    pub fn extension(&self) -> Option<&str> {
        if self.is_legacy() {
            return None;
        }
        let last = self.components().last()?;
        match last.rfind('.') {
            Some(0) | None => None,
            Some(i) => Some(&last[i + 1..]),
        }
    }

    /// The identifier string with the last extension removed.
    pub fn without_extension(&self) -> &str {
        match self.extension() {
            Some(ext) => &self.string[..self.string.len() - ext.len() - 1],
            None => &self.string,
        }
    }

    pub fn matches(&self, pattern: &Pattern) -> bool {
        pattern.is_match(self)
    }
}
impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.string == other.string
    }
}
impl Eq for Identifier {}
impl Hash for Identifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.string.hash(state);
    }
}
impl PartialEq<str> for Identifier {
    fn eq(&self, other: &str) -> bool {
        self.string == other
    }
}
impl PartialEq<&str> for Identifier {
    fn eq(&self, other: &&str) -> bool {
        self.string == *other
    }
}
impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        &self.string
    }
}
impl Display for Identifier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.string)
    }
}
impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/index.html")]
    #[case("/blog/2024/post.md")]
    #[case("/.htaccess")]
    #[case("/")]
    fn test_valid_full(#[case] input: &str) {
        let id = Identifier::new(input).unwrap();
        assert_eq!(id.as_str(), input);
        assert!(id.is_full());
    }

    #[rstest]
    #[case("")]
    #[case("index.html")]
    #[case("/blog/")]
    #[case("//")]
    fn test_invalid_full(#[case] input: &str) {
        let err = Identifier::new(input).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidIdentifier(s) if s == input));
    }

    #[rstest]
    #[case("/about/", "/about/")]
    #[case("about", "/about/")]
    #[case("/a//b/", "/a/b/")]
    #[case("///", "/")]
    fn test_legacy_normalization(#[case] input: &str, #[case] expected: &str) {
        let id = Identifier::legacy(input);
        assert_eq!(id.as_str(), expected);
        assert!(id.is_legacy());
    }

    #[test]
    fn test_equality_ignores_kind() {
        // Same string, different construction paths.
        let full: Identifier = "/a.md".parse().unwrap();
        let other = Identifier::new(String::from("/a.md")).unwrap();
        assert_eq!(full, other);
        assert_eq!(full, "/a.md");
        assert_ne!(Identifier::legacy("/a/"), Identifier::legacy("/b/"));
    }

    #[rstest]
    #[case("/a/b.md", Some("md"), "/a/b")]
    #[case("/a/b.tar.gz", Some("gz"), "/a/b.tar")]
    #[case("/a/b", None, "/a/b")]
    #[case("/.htaccess", None, "/.htaccess")]
    #[case("/", None, "/")]
    fn test_extension(#[case] input: &str, #[case] ext: Option<&str>, #[case] stem: &str) {
        let id = Identifier::new(input).unwrap();
        assert_eq!(id.extension(), ext);
        assert_eq!(id.without_extension(), stem);
    }

    #[test]
    fn test_components() {
        let id = Identifier::new("/blog/2024/post.md").unwrap();
        assert_eq!(id.components().collect::<Vec<_>>(), ["blog", "2024", "post.md"]);
        assert_eq!(Identifier::legacy("/blog/post/").components().count(), 2);
        assert_eq!(Identifier::legacy("/blog/post/").extension(), None);
    }
}
