//! Identifier-indexed collections with a two-phase lifecycle.
//!
//! While the site model is being assembled, a collection is *mutable*: it
//! is replaced wholesale by [`add`](IdentifiableCollection::add) and
//! [`reject`](IdentifiableCollection::reject), and every query is a linear
//! scan. Freezing it once the model is final builds an exact-match index and
//! turns on memoization of glob queries, after which the collection is
//! read-only and safe to share between threads.
//!
//! The generic type has no public constructor. Concrete collections such as
//! [`ItemCollection`](crate::ItemCollection) wrap it and delegate to it.

use crate::error::{ErrorKind, Result};
use crate::identifier::Identifier;
use crate::memo::Memo;
use crate::pattern::{Glob, MemoKey, Pattern, Query};
use quill_config::Config;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;
use tracing::instrument;

/// Anything addressable by an [`Identifier`].
pub trait Identifiable {
    fn identifier(&self) -> &Identifier;
}

enum Phase<T> {
    Mutable,
    Indexed(Index<T>),
}

struct Index<T> {
    by_identifier: HashMap<String, Arc<T>>,
    get: Memo<MemoKey, Option<Arc<T>>>,
    find_all: Memo<MemoKey, Arc<[Arc<T>]>>,
}

pub struct IdentifiableCollection<T> {
    config: Arc<Config>,
    // Objects are shared between every collection derived from this one.
    objects: Arc<[Arc<T>]>,
    name: Option<String>,
    phase: Phase<T>,
}
impl<T: Identifiable> IdentifiableCollection<T> {
    pub(crate) fn new_basic(
        config: Arc<Config>,
        objects: impl IntoIterator<Item = impl Into<Arc<T>>>,
        name: Option<String>,
    ) -> Self {
        Self {
            config,
            objects: objects.into_iter().map(Into::into).collect(),
            name,
            phase: Phase::Mutable,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.phase, Phase::Indexed(_))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<T>> {
        self.objects.iter()
    }

    /// Ordered snapshot of the contents.
    pub fn to_vec(&self) -> Vec<Arc<T>> {
        self.objects.to_vec()
    }

    /// Exact lookup by identifier string; never interprets patterns.
    pub fn object_with_identifier(&self, identifier: impl AsRef<str>) -> Option<Arc<T>> {
        let identifier = identifier.as_ref();
        match &self.phase {
            Phase::Mutable => self.objects.iter().find(|o| o.identifier() == identifier).cloned(),
            Phase::Indexed(index) => index.by_identifier.get(identifier).cloned(),
        }
    }

    /// Finds at most one object:
    ///
    /// - an [`Identifier`] matches exactly,
    /// - a string matches exactly, then (only in glob mode) as a glob,
    /// - a regex matches the first identifier it finds a match in.
    ///
    /// Exact matches always win over glob matches, and "first" always means
    /// first in collection order. A string that isn't a valid glob simply
    /// matches nothing.
    pub fn get(&self, query: impl Into<Query>) -> Result<Option<Arc<T>>> {
        let query = query.into();
        let Phase::Indexed(index) = &self.phase else {
            return Ok(self.get_unmemoized(&query));
        };
        Ok(match &query {
            Query::Identifier(identifier) => self.object_with_identifier(identifier),
            Query::String(string) => match self.object_with_identifier(string) {
                Some(object) => Some(object),
                None if !self.config.uses_globs() => None,
                None => memoized(&index.get, &query, || self.object_matching_glob(string)),
            },
            Query::Regex(_) => memoized(&index.get, &query, || self.get_unmemoized(&query)),
        })
    }

    /// [`get`](Self::get) for keys whose type is only known at runtime.
    pub fn get_any<K: Any>(&self, key: &K) -> Result<Option<Arc<T>>> {
        self.get(Query::from_any(key)?)
    }

    /// All objects matching the query's [`Pattern`], in collection order.
    ///
    /// Unlike [`get`](Self::get), strings are always treated as globs here,
    /// and one that isn't a valid glob matches nothing.
    pub fn find_all(&self, query: impl Into<Query>) -> Result<Arc<[Arc<T>]>> {
        let query = query.into();
        Ok(match &self.phase {
            Phase::Mutable => self.find_all_unmemoized(&query),
            Phase::Indexed(index) => memoized(&index.find_all, &query, || self.find_all_unmemoized(&query)),
        })
    }

    /// [`find_all`](Self::find_all) for keys whose type is only known at runtime.
    pub fn find_all_any<K: Any>(&self, key: &K) -> Result<Arc<[Arc<T>]>> {
        self.find_all(Query::from_any(key)?)
    }

    /// Returns a new, mutable collection with `object` appended. The receiver
    /// is left untouched, frozen or not.
    pub(crate) fn add(&self, object: impl Into<Arc<T>>) -> Self {
        let objects = self.objects.iter().cloned().chain(std::iter::once(object.into()));
        Self::new_basic(Arc::clone(&self.config), objects, self.name.clone())
    }

    /// Returns a new, mutable collection without the objects `predicate` accepts.
    pub(crate) fn reject(&self, mut predicate: impl FnMut(&T) -> bool) -> Self {
        let objects = self.objects.iter().filter(|o| !predicate(o)).cloned();
        Self::new_basic(Arc::clone(&self.config), objects, self.name.clone())
    }

    /// Indexes the collection and makes it read-only. Objects sharing an
    /// identifier are resolved in favour of the last one.
    #[instrument(skip_all, fields(name = self.name.as_deref().unwrap_or_default(), len = self.objects.len()))]
    pub(crate) fn freeze(mut self) -> Self {
        if self.is_frozen() {
            return self;
        }
        let mut by_identifier = HashMap::with_capacity(self.objects.len());
        for object in self.objects.iter() {
            if by_identifier.insert(object.identifier().to_string(), Arc::clone(object)).is_some() {
                tracing::warn!(identifier = %object.identifier(), "duplicate identifier; keeping the last object");
            }
        }
        self.phase = Phase::Indexed(Index {
            by_identifier,
            get: Memo::new(),
            find_all: Memo::new(),
        });
        tracing::debug!("collection frozen");
        self
    }

    /// Like [`freeze`](Self::freeze), but refuses to index a collection in
    /// which two objects share an identifier.
    pub(crate) fn try_freeze(self) -> Result<Self> {
        let mut seen = HashSet::with_capacity(self.objects.len());
        if let Some(duplicate) = self.objects.iter().map(|o| o.identifier().as_str()).find(|id| !seen.insert(*id)) {
            exn::bail!(ErrorKind::DuplicateIdentifier(duplicate.to_string()));
        }
        Ok(self.freeze())
    }

    fn get_unmemoized(&self, query: &Query) -> Option<Arc<T>> {
        match query {
            Query::Identifier(identifier) => self.object_with_identifier(identifier),
            Query::String(string) => self.object_with_identifier(string).or_else(|| self.object_matching_glob(string)),
            Query::Regex(regex) => self.objects.iter().find(|o| regex.is_match(o.identifier().as_str())).cloned(),
        }
    }

    fn find_all_unmemoized(&self, query: &Query) -> Arc<[Arc<T>]> {
        let pattern = match Pattern::from_query(query) {
            Ok(pattern) => pattern,
            Err(err) => {
                tracing::debug!(error = ?err, "query is not a valid pattern; nothing matches");
                return Arc::from(Vec::new());
            },
        };
        tracing::trace!(?pattern, "scanning collection");
        self.objects.iter().filter(|o| pattern.is_match(o.identifier())).cloned().collect()
    }

    fn object_matching_glob(&self, glob: &str) -> Option<Arc<T>> {
        if !self.config.uses_globs() {
            return None;
        }
        let glob = match Glob::new(glob) {
            Ok(glob) => glob,
            Err(err) => {
                tracing::debug!(error = ?err, "string is not a valid glob; nothing matches");
                return None;
            },
        };
        self.objects.iter().find(|o| glob.is_match(o.identifier().as_str())).cloned()
    }

    #[cfg(test)]
    pub(crate) fn memoized_queries(&self) -> usize {
        match &self.phase {
            Phase::Mutable => 0,
            Phase::Indexed(index) => index.get.len() + index.find_all.len(),
        }
    }
}

/// Looks `query` up in `memo`, computing it on a miss. Queries without a
/// memo key are computed every time.
fn memoized<V: Clone>(memo: &Memo<MemoKey, V>, query: &Query, compute: impl FnOnce() -> V) -> V {
    match query.memo_key() {
        Some(key) => memo.get_or_insert_with(key, compute),
        None => compute(),
    }
}

impl<T> Debug for IdentifiableCollection<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("IdentifiableCollection")
            .field("name", &self.name)
            .field("len", &self.objects.len())
            .field("frozen", &matches!(self.phase, Phase::Indexed(_)))
            .finish()
    }
}
impl<'a, T> IntoIterator for &'a IdentifiableCollection<T> {
    type Item = &'a Arc<T>;
    type IntoIter = std::slice::Iter<'a, Arc<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.objects.iter()
    }
}
