//! Individual pipeline steps.
//!
//! Each action knows how to reduce itself to a plain [`Value`] that is stable
//! across builds. Filter and layout parameters are folded into a checksum, so
//! the serialized form stays small no matter how large the parameters are.

use crate::checksum::checksum;
use serde_json::{Map, Value, json};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Arguments passed to a filter or layout.
pub type Params = Map<String, Value>;

#[derive(Debug, Clone, PartialEq)]
pub enum ProcessingAction {
    Filter(Filter),
    Layout(LayoutAction),
    Snapshot(Snapshot),
}
impl ProcessingAction {
    pub fn filter(filter_name: impl Into<String>, params: Params) -> Self {
        Self::Filter(Filter {
            filter_name: filter_name.into(),
            params,
        })
    }

    pub fn layout(layout_identifier: impl Into<String>, params: Params) -> Self {
        Self::Layout(LayoutAction {
            layout_identifier: layout_identifier.into(),
            params,
        })
    }

    pub fn snapshot(
        snapshot_names: impl IntoIterator<Item = impl Into<String>>,
        paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self::Snapshot(Snapshot {
            snapshot_names: snapshot_names.into_iter().map(Into::into).collect(),
            paths: paths.into_iter().map(Into::into).collect(),
        })
    }

    pub fn as_snapshot(&self) -> Option<&Snapshot> {
        match self {
            ProcessingAction::Snapshot(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    /// The plain form of this action:
    ///
    /// ```text
    /// ["filter",   "erb",            "<params checksum>"]
    /// ["layout",   "/default.html",  "<params checksum>"]
    /// ["snapshot", ["raw", "last"],  ["/index.html"]]
    /// ```
    pub fn serialize(&self) -> Value {
        match self {
            ProcessingAction::Filter(filter) => {
                json!(["filter", filter.filter_name, checksum(&Value::Object(filter.params.clone()))])
            },
            ProcessingAction::Layout(layout) => {
                json!(["layout", layout.layout_identifier, checksum(&Value::Object(layout.params.clone()))])
            },
            ProcessingAction::Snapshot(snapshot) => json!(["snapshot", snapshot.snapshot_names, snapshot.paths]),
        }
    }
}
impl Display for ProcessingAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingAction::Filter(filter) => write!(f, "filter {}", filter.filter_name),
            ProcessingAction::Layout(layout) => write!(f, "layout {}", layout.layout_identifier),
            ProcessingAction::Snapshot(snapshot) => {
                write!(f, "snapshot [{}] paths [{}]", snapshot.snapshot_names.join(", "), snapshot.paths.join(", "))
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub filter_name: String,
    pub params: Params,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutAction {
    pub layout_identifier: String,
    pub params: Params,
}

/// A checkpoint whose content is kept under one or more names, and written
/// to zero or more output paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub snapshot_names: Vec<String>,
    pub paths: Vec<String>,
}
impl Snapshot {
    /// A copy of this snapshot with extra names and paths appended.
    pub fn update(
        &self,
        snapshot_names: impl IntoIterator<Item = impl Into<String>>,
        paths: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            snapshot_names: self
                .snapshot_names
                .iter()
                .cloned()
                .chain(snapshot_names.into_iter().map(Into::into))
                .collect(),
            paths: self.paths.iter().cloned().chain(paths.into_iter().map(Into::into)).collect(),
        }
    }

    pub fn produces(&self, snapshot_name: &str) -> bool {
        self.snapshot_names.iter().any(|n| n == snapshot_name)
    }
}
