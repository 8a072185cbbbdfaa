//! Structural edits of an [`OrbatDoc`].
//!
//! Every function here keeps the node list, the parent map and the order map
//! consistent with each other in a single call. Stale ids are ignored rather
//! than reported: the caller checks selection validity, these stay defensive.

use crate::model::{NodeId, NodeLevel, NodePatch, OrbatDoc, OrbatNode, ROOT_ID};
use crate::tree;
use std::collections::HashSet;
use tracing::{debug, info};

const ID_PROBE_LIMIT: u32 = 9999;

const NEW_LEAD_LABEL: &str = "PL";

/// First unused `prefix<N>` id, N starting at 1. Falls back to a
/// millisecond timestamp suffix once the probe range is exhausted.
pub fn next_id(prefix: &str, doc: &OrbatDoc) -> NodeId {
    let used: HashSet<&str> = doc.nodes.iter().map(|n| n.id.as_str()).collect();
    (1..ID_PROBE_LIMIT)
        .map(|i| format!("{prefix}{i}"))
        .find(|id| !used.contains(id.as_str()))
        .unwrap_or_else(|| format!("{prefix}{}", chrono::Utc::now().timestamp_millis()))
}

/// Adds a node of `level` as the last child of `parent_id`.
///
/// The parent must exist and sit exactly one level above `level`.
pub fn add_child(doc: &mut OrbatDoc, parent_id: &str, level: NodeLevel) -> Option<NodeId> {
    let parent_level = doc.level_of(parent_id)?;
    if parent_level.child_level() != Some(level) {
        debug!(parent = parent_id, %level, "rejected add: level mismatch");
        return None;
    }

    let id = next_id(level.id_prefix(), doc);
    insert_node(doc, OrbatNode::new(id.clone(), level), Some(parent_id));
    info!(%id, parent = parent_id, "added node");
    Some(id)
}

/// Adds a new lead under the root, appended to the root order list.
pub fn add_lead(doc: &mut OrbatDoc) -> NodeId {
    let id = next_id(NodeLevel::Lead.id_prefix(), doc);
    let node = OrbatNode::new(id.clone(), NodeLevel::Lead).with_label_main(NEW_LEAD_LABEL);
    insert_node(doc, node, None);
    info!(%id, "added lead");
    id
}

fn insert_node(doc: &mut OrbatDoc, node: OrbatNode, parent_id: Option<&str>) {
    let id = node.id.clone();
    doc.nodes.push(node);
    doc.parent_by_id
        .insert(id.clone(), parent_id.map(str::to_string));
    doc.children_order
        .entry(parent_id.unwrap_or(ROOT_ID).to_string())
        .or_default()
        .push(id);
}

/// Collects `start_id` and every node reachable below it.
pub fn descendant_closure(doc: &OrbatDoc, start_id: &str) -> HashSet<NodeId> {
    let children = tree::children_of(&doc.nodes, &doc.parent_by_id);
    let mut closure = HashSet::new();
    let mut stack = vec![start_id.to_string()];

    while let Some(current) = stack.pop() {
        if !closure.insert(current.clone()) {
            continue;
        }
        if let Some(kids) = children.get(&current) {
            stack.extend(kids.iter().cloned());
        }
    }

    closure
}

/// Removes `start_id` and its whole subtree. Returns the removed count,
/// 0 when `start_id` is unknown.
pub fn delete_cascade(doc: &mut OrbatDoc, start_id: &str) -> usize {
    if start_id == ROOT_ID || !doc.contains(start_id) {
        return 0;
    }

    let doomed = descendant_closure(doc, start_id);

    doc.nodes.retain(|n| !doomed.contains(&n.id));

    doc.parent_by_id.retain(|id, _| !doomed.contains(id));
    for parent in doc.parent_by_id.values_mut() {
        if parent.as_ref().is_some_and(|p| doomed.contains(p)) {
            *parent = None;
        }
    }

    doc.children_order.retain(|id, _| !doomed.contains(id));
    for list in doc.children_order.values_mut() {
        list.retain(|id| !doomed.contains(id));
    }

    info!(start = start_id, removed = doomed.len(), "cascade delete");
    doomed.len()
}

/// Shallow-merges `patch` into the node `id`. Returns whether it matched.
pub fn update_node(doc: &mut OrbatDoc, id: &str, patch: &NodePatch) -> bool {
    match doc.get_mut(id) {
        Some(node) => {
            patch.apply(node);
            true
        }
        None => false,
    }
}

/// Writes a reconciled child order produced by the ordering engine.
pub fn set_children_order(doc: &mut OrbatDoc, parent_id: &str, order: Vec<NodeId>) {
    doc.children_order.insert(parent_id.to_string(), order);
}
