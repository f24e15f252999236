//! Ordered legend of sprite types.

use std::collections::HashMap;

use tilepush_core::{EngineError, LegendEntry, SpriteType};

/// Ordered legend with a derived tag lookup.
///
/// The entry order is semantic: it decides how sprites sharing a cell are
/// stacked. The lookup table maps each tag to its position in that order.
#[derive(Clone, Debug, Default)]
pub(crate) struct Legend {
    entries: Vec<LegendEntry>,
    order: HashMap<SpriteType, usize>,
}

impl Legend {
    /// Builds a legend, rejecting reserved and duplicated tags.
    pub(crate) fn from_entries(entries: Vec<LegendEntry>) -> Result<Self, EngineError> {
        let mut order = HashMap::with_capacity(entries.len());
        for (index, entry) in entries.iter().enumerate() {
            if entry.tag.is_empty_marker() {
                return Err(EngineError::ReservedType(entry.tag));
            }
            if order.insert(entry.tag, index).is_some() {
                return Err(EngineError::DuplicateLegendType(entry.tag));
            }
        }
        Ok(Self { entries, order })
    }

    /// Position of the tag within the legend, if registered.
    pub(crate) fn order_of(&self, tag: SpriteType) -> Option<usize> {
        self.order.get(&tag).copied()
    }

    pub(crate) fn contains(&self, tag: SpriteType) -> bool {
        self.order.contains_key(&tag)
    }

    /// Fails with [`EngineError::UnknownType`] when the tag is not registered.
    pub(crate) fn require(&self, tag: SpriteType) -> Result<(), EngineError> {
        if self.contains(tag) {
            Ok(())
        } else {
            Err(EngineError::UnknownType(tag))
        }
    }

    pub(crate) fn entries(&self) -> &[LegendEntry] {
        &self.entries
    }
}
