use crate::model::{ChildrenOrder, NodeId, NodeLevel, OrbatDoc, OrbatNode, ParentById, ROOT_ID};
use std::collections::{HashMap, HashSet};

/// Upper bound on parent-pointer walks. The hierarchy is three levels deep;
/// the slack only matters for malformed (cyclic) parent maps.
const MAX_ANCESTOR_WALK: usize = 8;

/// Adjacency map built in one pass over the node list.
///
/// Every node gets an entry (possibly empty), and so does [`ROOT_ID`], which
/// collects the nodes whose parent is `null` or the root sentinel. Children
/// appear in node-list order.
pub fn children_of(nodes: &[OrbatNode], parent_by_id: &ParentById) -> HashMap<NodeId, Vec<NodeId>> {
    let mut children: HashMap<NodeId, Vec<NodeId>> = HashMap::with_capacity(nodes.len() + 1);
    children.insert(ROOT_ID.to_string(), Vec::new());
    for node in nodes {
        children.entry(node.id.clone()).or_default();
    }

    for node in nodes {
        let parent = match parent_by_id.get(&node.id) {
            Some(Some(p)) => p.as_str(),
            _ => ROOT_ID,
        };
        children
            .entry(parent.to_string())
            .or_default()
            .push(node.id.clone());
    }

    children
}

/// Reconciles the raw child list of `parent_id` with its order hint.
///
/// Hint entries absent from `raw` are dropped, `raw` entries absent from the
/// hint are appended in their original order. The result is always a
/// permutation of `raw`.
pub fn stable_order(parent_id: &str, raw: &[NodeId], hint: &ChildrenOrder) -> Vec<NodeId> {
    let ordered = match hint.get(parent_id) {
        Some(list) if !list.is_empty() => list,
        _ => return raw.to_vec(),
    };

    let raw_set: HashSet<&str> = raw.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(raw.len());
    let mut result = Vec::with_capacity(raw.len());

    for id in ordered {
        if raw_set.contains(id.as_str()) && seen.insert(id.as_str()) {
            result.push(id.clone());
        }
    }
    for id in raw {
        if seen.insert(id.as_str()) {
            result.push(id.clone());
        }
    }

    result
}

/// Children of `parent_id` restricted to `level`, in reconciled order.
pub fn siblings_of_level(
    parent_id: &str,
    level: NodeLevel,
    children: &HashMap<NodeId, Vec<NodeId>>,
    doc: &OrbatDoc,
) -> Vec<NodeId> {
    let raw: Vec<NodeId> = children
        .get(parent_id)
        .map(|kids| {
            kids.iter()
                .filter(|id| doc.level_of(id) == Some(level))
                .cloned()
                .collect()
        })
        .unwrap_or_default();
    stable_order(parent_id, &raw, &doc.children_order)
}

/// All children of `parent_id` (every level), in reconciled order.
pub fn ordered_children(
    parent_id: &str,
    children: &HashMap<NodeId, Vec<NodeId>>,
    hint: &ChildrenOrder,
) -> Vec<NodeId> {
    let raw = children.get(parent_id).map(Vec::as_slice).unwrap_or(&[]);
    stable_order(parent_id, raw, hint)
}

/// Leads hanging off the root, reconciled against the root's order hint.
pub fn lead_roots(doc: &OrbatDoc) -> Vec<NodeId> {
    let raw: Vec<NodeId> = doc
        .nodes
        .iter()
        .filter(|n| n.level == NodeLevel::Lead && doc.parent_of(&n.id).is_none())
        .map(|n| n.id.clone())
        .collect();
    stable_order(ROOT_ID, &raw, &doc.children_order)
}

/// Walks parent pointers from `node_id` (inclusive) until a node of `level`
/// is found. Returns `None` when the root is reached first or the id is unknown.
pub fn ancestor_at_level(node_id: &str, level: NodeLevel, doc: &OrbatDoc) -> Option<NodeId> {
    let mut current = Some(node_id);
    for _ in 0..MAX_ANCESTOR_WALK {
        let id = current?;
        let node = doc.get(id)?;
        if node.level == level {
            return Some(node.id.clone());
        }
        current = doc.parent_of(id);
    }
    None
}

/// Depth-first walk from the leads down, in reconciled order, paired with
/// each node's depth (leads are 0). Nodes unreachable from a lead are skipped.
pub fn outline(doc: &OrbatDoc) -> Vec<(NodeId, usize)> {
    let children = children_of(&doc.nodes, &doc.parent_by_id);
    let mut rows = Vec::with_capacity(doc.nodes.len());
    let mut visited: HashSet<NodeId> = HashSet::with_capacity(doc.nodes.len());

    let mut stack: Vec<(NodeId, usize)> = lead_roots(doc)
        .into_iter()
        .rev()
        .map(|id| (id, 0))
        .collect();
    while let Some((id, depth)) = stack.pop() {
        if !visited.insert(id.clone()) {
            continue;
        }
        let kids = ordered_children(&id, &children, &doc.children_order);
        stack.extend(kids.into_iter().rev().map(|kid| (kid, depth + 1)));
        rows.push((id, depth));
    }
    rows
}
