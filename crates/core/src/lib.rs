//! Core data structures for compiling a quill site.
//!
//! - [`ItemCollection`] and [`LayoutCollection`] locate content by exact
//!   identifier, string, glob or regular expression. They are scanned
//!   linearly while the site model is being assembled, then frozen into an
//!   indexed, memoizing, thread-safe form for the rest of the build.
//! - [`ActionSequence`] is the compiled pipeline of one [`ItemRep`], with a
//!   cached serialized form that build caches fingerprint to detect changes.

mod action;
mod checksum;
mod collection;
mod content;
pub mod error;
mod identifier;
mod memo;
mod pattern;
mod rep;
mod sequence;

pub use crate::action::{Filter, LayoutAction, Params, ProcessingAction, Snapshot};
pub use crate::checksum::checksum;
pub use crate::collection::{Identifiable, IdentifiableCollection};
pub use crate::content::{Attributes, Content, Item, ItemCollection, Layout, LayoutCollection};
pub use crate::identifier::{Identifier, IdentifierKind};
pub use crate::pattern::{Glob, Pattern, Query};
pub use crate::rep::{DEFAULT_REP_NAME, ItemRep};
pub use crate::sequence::{ActionSequence, ActionSequenceBuilder};
pub use quill_config::{Config, StringPatternType};

#[cfg(test)]
mod tests {
    use super::*;
    use regex::Regex;
    use std::sync::Arc;

    fn config(mode: StringPatternType) -> Arc<Config> {
        Arc::new(Config {
            string_pattern_type: mode,
        })
    }

    fn items(ids: &[&str], mode: StringPatternType) -> ItemCollection {
        let items = ids.iter().map(|id| Item::new(Identifier::legacy(id), Content::Textual(String::new())));
        ItemCollection::with_objects(config(mode), items)
    }

    #[test]
    fn test_every_identifier_resolves_before_and_after_freeze() {
        let ids = ["/", "/about/", "/blog/", "/blog/one/", "/blog/two/"];
        let mutable = items(&ids, StringPatternType::Glob);
        let expected: Vec<_> = mutable.to_vec();
        let frozen = mutable.freeze();
        let mutable = items(&ids, StringPatternType::Glob);
        for (k, id) in ids.iter().enumerate() {
            let identifier = Identifier::legacy(id);
            assert_eq!(mutable.get(&identifier).unwrap().unwrap().identifier, expected[k].identifier);
            assert!(Arc::ptr_eq(&frozen.get(&identifier).unwrap().unwrap(), &expected[k]));
        }
    }

    #[test]
    fn test_exact_priority_and_glob_gating() {
        let globbing = items(&["/a*/", "/a/"], StringPatternType::Glob).freeze();
        assert_eq!(globbing.get("/a/").unwrap().unwrap().identifier, "/a/");

        let legacy = items(&["/a/", "/ab/"], StringPatternType::Legacy).freeze();
        assert!(legacy.get("/a*/").unwrap().is_none());
        // Still reachable as a pattern through find_all.
        assert_eq!(legacy.find_all("/a*/").unwrap().len(), 2);
    }

    #[test]
    fn test_invalid_key_type() {
        let collection = items(&["/a/"], StringPatternType::Glob);
        let err = collection.get_any(&42).unwrap_err();
        assert!(matches!(&*err, error::ErrorKind::InvalidArgument(_)));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_add_leaves_receiver_alone() {
        let c = items(&["/a/", "/b/"], StringPatternType::Glob);
        let d = c.add(Item::new(Identifier::legacy("/x/"), Content::Textual(String::new())));
        assert_eq!(c.len(), 2);
        assert_eq!(d.len(), c.len() + 1);
    }

    #[test]
    fn test_concurrent_readers_share_memoized_results() {
        let ids: Vec<String> = (0..200).map(|i| format!("/page{i}/")).collect();
        let ids: Vec<&str> = ids.iter().map(String::as_str).collect();
        let collection = items(&ids, StringPatternType::Glob).freeze();
        let regex = Regex::new(r"^/page1\d/$").unwrap();

        let results: Vec<_> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let globbed = collection.find_all("/page1*/").unwrap();
                        let first = collection.get(&regex).unwrap().unwrap();
                        let exact = collection.get("/page42/").unwrap().unwrap();
                        (globbed, first, exact)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let (globbed, first, exact) = &results[0];
        // /page1/, /page10/ to /page19/, /page100/ to /page199/
        assert_eq!(globbed.len(), 111);
        assert_eq!(first.identifier, "/page10/");
        assert_eq!(exact.identifier, "/page42/");
        for (g, f, e) in &results {
            assert!(Arc::ptr_eq(g, globbed));
            assert!(Arc::ptr_eq(f, first));
            assert!(Arc::ptr_eq(e, exact));
        }
    }

    #[test]
    fn test_sequence_for_collection_item() {
        let collection = items(&["/a/"], StringPatternType::Glob).freeze();
        let item = collection.get("/a/").unwrap().unwrap();
        let rep = ItemRep::new(item.identifier.clone(), DEFAULT_REP_NAME);

        let mut builder = ActionSequenceBuilder::new(rep);
        builder.add_filter("erb", Params::new()).add_snapshot("last", None).unwrap();
        let sequence = builder.build().map(|action| match action {
            ProcessingAction::Snapshot(s) => {
                ProcessingAction::Snapshot(s.update(Vec::<String>::new(), ["/out/a.html"]))
            },
            other => other.clone(),
        });

        assert_eq!(sequence.paths(), [(vec!["last".to_string()], vec!["/out/a.html".to_string()])]);
        assert_eq!(sequence.serialize(), sequence.serialize());
        assert_eq!(sequence.serialize(), sequence.serialize_uncached().as_slice());
        assert_eq!(sequence.rep().to_string(), "<rep item=/a/ name=default>");
    }
}
