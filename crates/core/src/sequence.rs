//! Compiled, ordered pipelines for a single item representation.

use crate::action::{Params, ProcessingAction, Snapshot};
use crate::checksum::checksum;
use crate::error::{ErrorKind, Result};
use crate::rep::ItemRep;
use serde_json::Value;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::{Arc, OnceLock};
use tracing::instrument;

/// The actions computed for one [`ItemRep`], in execution order.
///
/// A sequence never changes once built; [`map`](Self::map) produces a new
/// one. The serialized form is computed at most once per instance.
#[derive(Clone)]
pub struct ActionSequence {
    rep: Arc<ItemRep>,
    actions: Arc<[ProcessingAction]>,
    serialized: OnceLock<Vec<Value>>,
}
impl ActionSequence {
    pub fn new(rep: impl Into<Arc<ItemRep>>, actions: impl IntoIterator<Item = ProcessingAction>) -> Self {
        Self {
            rep: rep.into(),
            actions: actions.into_iter().collect(),
            serialized: OnceLock::new(),
        }
    }

    pub fn rep(&self) -> &Arc<ItemRep> {
        &self.rep
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// The action at `idx`, or `None` past the end.
    pub fn get(&self, idx: usize) -> Option<&ProcessingAction> {
        self.actions.get(idx)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProcessingAction> {
        self.actions.iter()
    }

    /// Visits every action in order, returning `self` for chaining.
    pub fn each(&self, visitor: impl FnMut(&ProcessingAction)) -> &Self {
        self.actions.iter().for_each(visitor);
        self
    }

    pub fn snapshot_actions(&self) -> Vec<&Snapshot> {
        self.actions.iter().filter_map(ProcessingAction::as_snapshot).collect()
    }

    /// `(snapshot names, output paths)` for every snapshot, in order.
    pub fn paths(&self) -> Vec<(Vec<String>, Vec<String>)> {
        self.snapshot_actions().into_iter().map(|s| (s.snapshot_names.clone(), s.paths.clone())).collect()
    }

    /// A new sequence for the same representation with every action replaced
    /// by `transform(action)`.
    #[instrument(skip_all, fields(rep = %self.rep, len = self.actions.len()))]
    pub fn map(&self, transform: impl FnMut(&ProcessingAction) -> ProcessingAction) -> Self {
        Self::new(Arc::clone(&self.rep), self.actions.iter().map(transform))
    }

    /// Plain form of the sequence, cached after the first call.
    pub fn serialize(&self) -> &[Value] {
        self.serialized.get_or_init(|| self.serialize_uncached())
    }

    /// Plain form of the sequence, recomputed on every call.
    pub fn serialize_uncached(&self) -> Vec<Value> {
        self.actions.iter().map(ProcessingAction::serialize).collect()
    }

    /// Digest of [`serialize`](Self::serialize); changes whenever the
    /// pipeline does.
    pub fn checksum(&self) -> String {
        checksum(&Value::Array(self.serialize().to_vec()))
    }
}
impl PartialEq for ActionSequence {
    fn eq(&self, other: &Self) -> bool {
        self.rep == other.rep && self.actions == other.actions
    }
}
impl Debug for ActionSequence {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ActionSequence").field("rep", &self.rep).field("actions", &self.actions).finish()
    }
}
impl<'a> IntoIterator for &'a ActionSequence {
    type Item = &'a ProcessingAction;
    type IntoIter = std::slice::Iter<'a, ProcessingAction>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}

/// Accumulates actions while rules are evaluated for one representation.
///
/// ```
/// use quill_core::{ActionSequenceBuilder, Identifier, ItemRep, Params};
///
/// let rep = ItemRep::new(Identifier::new("/index.md").unwrap(), "default");
/// let mut builder = ActionSequenceBuilder::new(rep);
/// builder.add_filter("kramdown", Params::new()).add_layout("/default.html", Params::new());
/// builder.add_snapshot("last", Some("/index.html".to_string())).unwrap();
/// let sequence = builder.build();
///
/// assert_eq!(sequence.len(), 3);
/// assert_eq!(sequence.paths(), [(vec!["last".to_string()], vec!["/index.html".to_string()])]);
/// ```
#[derive(Debug)]
pub struct ActionSequenceBuilder {
    rep: Arc<ItemRep>,
    actions: Vec<ProcessingAction>,
}
impl ActionSequenceBuilder {
    pub fn new(rep: impl Into<Arc<ItemRep>>) -> Self {
        Self {
            rep: rep.into(),
            actions: Vec::new(),
        }
    }

    pub fn add_filter(&mut self, filter_name: impl Into<String>, params: Params) -> &mut Self {
        self.actions.push(ProcessingAction::filter(filter_name, params));
        self
    }

    pub fn add_layout(&mut self, layout_identifier: impl Into<String>, params: Params) -> &mut Self {
        self.actions.push(ProcessingAction::layout(layout_identifier, params));
        self
    }

    /// Adds a snapshot named `snapshot_name`, optionally written to `path`.
    /// Each name may only be used once per representation.
    pub fn add_snapshot(&mut self, snapshot_name: impl Into<String>, path: Option<String>) -> Result<&mut Self> {
        let snapshot_name = snapshot_name.into();
        let taken = self.actions.iter().filter_map(ProcessingAction::as_snapshot).any(|s| s.produces(&snapshot_name));
        if taken {
            exn::bail!(ErrorKind::DuplicateSnapshotName {
                rep: self.rep.to_string(),
                name: snapshot_name,
            });
        }
        self.actions.push(ProcessingAction::snapshot([snapshot_name], path));
        Ok(self)
    }

    pub fn build(self) -> ActionSequence {
        tracing::debug!(rep = %self.rep, actions = self.actions.len(), "built action sequence");
        ActionSequence::new(self.rep, self.actions)
    }
}
