//! Content objects and the named collections that hold them.

use crate::collection::{Identifiable, IdentifiableCollection};
use crate::error::Result;
use crate::identifier::Identifier;
use quill_config::Config;
use serde_json::{Map, Value};
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::ops::Deref;
use std::path::PathBuf;
use std::sync::Arc;

/// Free-form metadata attached to items and layouts.
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Text held in memory.
    Textual(String),
    /// Binary data left on disk.
    Binary(PathBuf),
}

/// A unit of source content; compiled into one or more representations.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub identifier: Identifier,
    pub content: Content,
    pub attributes: Attributes,
}
impl Item {
    pub fn new(identifier: Identifier, content: Content) -> Self {
        Self {
            identifier,
            content,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
impl Identifiable for Item {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

/// A template that item content gets wrapped in.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub identifier: Identifier,
    pub content: String,
    pub attributes: Attributes,
}
impl Layout {
    pub fn new(identifier: Identifier, content: impl Into<String>) -> Self {
        Self {
            identifier,
            content: content.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}
impl Identifiable for Layout {
    fn identifier(&self) -> &Identifier {
        &self.identifier
    }
}

/// Declares a named wrapper around [`IdentifiableCollection`].
///
/// Reads go through [`Deref`]; the non-destructive updates and the freeze
/// transition are re-declared so they hand back the wrapper type.
macro_rules! named_collection {
    ($(#[$meta:meta])* $name:ident($object:ty, $label:literal)) => {
        $(#[$meta])*
        pub struct $name(IdentifiableCollection<$object>);
        impl $name {
            pub fn new(config: Arc<Config>) -> Self {
                Self::with_objects(config, std::iter::empty::<$object>())
            }

            pub fn with_objects(
                config: Arc<Config>,
                objects: impl IntoIterator<Item = impl Into<Arc<$object>>>,
            ) -> Self {
                Self(IdentifiableCollection::new_basic(config, objects, Some($label.to_string())))
            }

            /// Returns a new collection with `object` appended; `self` is unchanged.
            pub fn add(&self, object: impl Into<Arc<$object>>) -> Self {
                Self(self.0.add(object))
            }

            /// Returns a new collection without the objects `predicate` accepts.
            pub fn reject(&self, predicate: impl FnMut(&$object) -> bool) -> Self {
                Self(self.0.reject(predicate))
            }

            /// Indexes the collection for the build; see [`IdentifiableCollection`].
            pub fn freeze(self) -> Self {
                Self(self.0.freeze())
            }

            /// Freezes, failing on duplicate identifiers instead of keeping the last.
            pub fn try_freeze(self) -> Result<Self> {
                self.0.try_freeze().map(Self)
            }
        }
        impl Deref for $name {
            type Target = IdentifiableCollection<$object>;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
                write!(f, "<{} len={}>", stringify!($name), self.0.len())
            }
        }
        impl<'a> IntoIterator for &'a $name {
            type Item = &'a Arc<$object>;
            type IntoIter = std::slice::Iter<'a, Arc<$object>>;

            fn into_iter(self) -> Self::IntoIter {
                self.0.iter()
            }
        }
    };
}

named_collection! {
    /// All items of a site.
    ItemCollection(Item, "items")
}

named_collection! {
    /// All layouts of a site.
    LayoutCollection(Layout, "layouts")
}

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;

    fn item(id: &str) -> Item {
        Item::new(Identifier::new(id).unwrap(), Content::Textual(format!("content of {id}")))
    }

    #[test]
    fn test_item_collection_lifecycle() {
        let config = Arc::new(Config::default());
        let items = ItemCollection::new(Arc::clone(&config));
        assert!(items.is_empty());
        assert_eq!(items.name(), Some("items"));

        let items = items.add(item("/index.md")).add(item("/blog/one.md")).add(item("/blog/two.md"));
        let items = items.reject(|i| i.identifier == "/blog/two.md").freeze();
        assert!(items.is_frozen());
        assert_eq!(items.len(), 2);

        let posts = items.find_all("/blog/*.md").unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].identifier, "/blog/one.md");
        assert_eq!(items.get("/*.md").unwrap().unwrap().identifier, "/index.md");
        assert_eq!(format!("{items:?}"), "<ItemCollection len=2>");
    }

    #[test]
    fn test_layout_collection() {
        let config = Arc::new(Config::default());
        let layouts = LayoutCollection::with_objects(
            config,
            [
                Layout::new(Identifier::new("/default.html").unwrap(), "<html>{{ yield }}</html>")
                    .with_attribute("kind", "page"),
                Layout::new(Identifier::new("/post.html").unwrap(), "<article/>"),
            ],
        )
        .freeze();
        let layout = layouts.get(Regex::new("post").unwrap()).unwrap().unwrap();
        assert_eq!(layout.identifier, "/post.html");
        let default = layouts.object_with_identifier("/default.html").unwrap();
        assert_eq!(default.attributes["kind"], "page");
        assert_eq!((&layouts).into_iter().count(), 2);
    }

    #[test]
    fn test_binary_content_stays_on_disk() {
        let logo = Item::new(Identifier::new("/logo.png").unwrap(), Content::Binary(PathBuf::from("content/logo.png")));
        let items = ItemCollection::with_objects(Arc::new(Config::default()), [logo]).freeze();
        let found = items.get("/*.png").unwrap().unwrap();
        assert_eq!(found.content, Content::Binary(PathBuf::from("content/logo.png")));
    }
}
