use crate::model::{NodeId, NodeLevel, OrbatDoc};
use crate::tree;
use tracing::debug;

/// Moves `arr[from]` so that it lands before the element currently at `to`.
/// `to == arr.len()` moves it to the end.
pub fn array_insert_move<T>(arr: &[T], from: usize, to: usize) -> Vec<T>
where
    T: Clone,
{
    let mut next = arr.to_vec();
    if from >= next.len() {
        return next;
    }
    let item = next.remove(from);
    let adjusted = if from < to { to - 1 } else { to };
    next.insert(adjusted.min(next.len()), item);
    next
}

/// Reorders the `level` siblings of `parent_id`, returning the complete
/// (all levels) child order for that parent.
///
/// Returns `None` when `dragged_id` is not a `level` child of `parent_id`, or
/// when the clamped target equals the current position. Children of other
/// levels keep their positions in the complete list.
pub fn reorder_within_level(
    doc: &OrbatDoc,
    parent_id: &str,
    level: NodeLevel,
    dragged_id: &str,
    target_index: usize,
) -> Option<Vec<NodeId>> {
    let children = tree::children_of(&doc.nodes, &doc.parent_by_id);
    let all = tree::ordered_children(parent_id, &children, &doc.children_order);

    let siblings: Vec<NodeId> = all
        .iter()
        .filter(|id| doc.level_of(id) == Some(level))
        .cloned()
        .collect();

    let from = siblings.iter().position(|id| id == dragged_id)?;
    let to = target_index.min(siblings.len());
    if to == from {
        return None;
    }

    let moved = array_insert_move(&siblings, from, to);
    if moved == siblings {
        // Dropping right after itself lands on the same spot.
        return None;
    }

    let mut moved_iter = moved.into_iter();
    let next_all = all
        .into_iter()
        .map(|id| {
            if doc.level_of(&id) == Some(level) {
                moved_iter.next().unwrap_or(id)
            } else {
                id
            }
        })
        .collect();

    debug!(parent = parent_id, dragged = dragged_id, from, to, "reordered siblings");
    Some(next_all)
}

/// Source identity captured when a drag begins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragContext {
    pub parent_id: NodeId,
    pub dragged_id: NodeId,
    pub level: NodeLevel,
}

impl DragContext {
    /// Begins dragging `node_id`. Fails for unknown ids.
    pub fn begin(doc: &OrbatDoc, node_id: &str) -> Option<Self> {
        let node = doc.get(node_id)?;
        let parent_id = doc
            .parent_of(node_id)
            .map(str::to_string)
            .unwrap_or_else(|| crate::model::ROOT_ID.to_string());
        Some(Self {
            parent_id,
            dragged_id: node.id.clone(),
            level: node.level,
        })
    }

    /// Whether a node can receive this drag (same parent, same level, not itself).
    pub fn accepts(&self, doc: &OrbatDoc, over_id: &str) -> bool {
        let over_parent = doc.parent_of(over_id).unwrap_or(crate::model::ROOT_ID);
        over_id != self.dragged_id
            && doc.level_of(over_id) == Some(self.level)
            && over_parent == self.parent_id
    }

    /// Commits the drag at a sibling index. Returns the parent id and its new
    /// complete child order, or `None` for a no-op/invalid drop.
    pub fn drop_at(self, doc: &OrbatDoc, target_index: usize) -> Option<(NodeId, Vec<NodeId>)> {
        let next = reorder_within_level(
            doc,
            &self.parent_id,
            self.level,
            &self.dragged_id,
            target_index,
        )?;
        Some((self.parent_id, next))
    }

    /// Commits the drag before or after `over_id`.
    pub fn drop_on(
        self,
        doc: &OrbatDoc,
        over_id: &str,
        after: bool,
    ) -> Option<(NodeId, Vec<NodeId>)> {
        if !self.accepts(doc, over_id) {
            return None;
        }
        let children = tree::children_of(&doc.nodes, &doc.parent_by_id);
        let siblings = tree::siblings_of_level(&self.parent_id, self.level, &children, doc);
        let over_index = siblings.iter().position(|id| id == over_id)?;
        let target = if after { over_index + 1 } else { over_index };
        self.drop_at(doc, target)
    }
}
