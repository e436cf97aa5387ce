use crate::identifier::Identifier;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Name given to an item's representation when rules don't name one.
pub const DEFAULT_REP_NAME: &str = "default";

/// One representation of an item: the unit a single action sequence compiles.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ItemRep {
    item: Identifier,
    name: String,
}
impl ItemRep {
    pub fn new(item: Identifier, name: impl Into<String>) -> Self {
        Self { item, name: name.into() }
    }

    pub fn item(&self) -> &Identifier {
        &self.item
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
impl Display for ItemRep {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "<rep item={} name={}>", self.item, self.name)
    }
}
