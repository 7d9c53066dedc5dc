//! Sibling ordering arithmetic for moves.
//!
//! A move removes the node from its current list and then inserts it into
//! the target list. When both lists are the same and the node sat before the
//! anchor, the removal shifts the anchor one slot left, so the insertion
//! index is the anchor's own index instead of the slot after it.

use docvault_core::error::AppError;
use docvault_core::result::AppResult;
use docvault_entity::folder::Folder;
use docvault_entity::node::NodeKind;

/// Where a moved node lands in its target list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// At the front of the list.
    First,
    /// Directly after the sibling currently at this index.
    After(usize),
}

impl Placement {
    /// Resolve an optional anchor sibling against the target folder.
    ///
    /// An anchor that is not a child of `target` is rejected.
    pub fn resolve(target: &Folder, place_after: Option<NodeKind>) -> AppResult<Self> {
        let Some(anchor) = place_after else {
            return Ok(Self::First);
        };
        target
            .position_of(anchor)
            .map(Self::After)
            .ok_or_else(|| {
                AppError::validation(format!(
                    "Cannot place after {anchor}: not a child of folder '{}'",
                    target.name
                ))
            })
    }
}

/// Index at which a moved node is inserted after its removal.
///
/// `current_index` is the node's index in its current parent list and is
/// only consulted when the move stays inside the same parent.
pub fn insertion_index(current_index: usize, same_parent: bool, placement: Placement) -> usize {
    match placement {
        Placement::First => 0,
        Placement::After(anchor) => {
            let naive = anchor + 1;
            if same_parent && current_index < naive {
                anchor
            } else {
                naive
            }
        }
    }
}
