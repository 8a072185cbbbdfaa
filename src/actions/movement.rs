use crate::app::AppState;
use crate::model::{NodeId, NodeLevel, OrbatDoc};
use crate::tree;

/// Nodes of `level` in the order they appear on the board, left to right.
/// Units and subs are flattened across their parents.
pub fn visual_order(doc: &OrbatDoc, level: NodeLevel) -> Vec<NodeId> {
    let children = tree::children_of(&doc.nodes, &doc.parent_by_id);
    let leads = tree::lead_roots(doc);
    match level {
        NodeLevel::Lead => leads,
        NodeLevel::Unit => leads
            .iter()
            .flat_map(|l| tree::siblings_of_level(l, NodeLevel::Unit, &children, doc))
            .collect(),
        NodeLevel::Sub => leads
            .iter()
            .flat_map(|l| tree::siblings_of_level(l, NodeLevel::Unit, &children, doc))
            .flat_map(|u| tree::siblings_of_level(&u, NodeLevel::Sub, &children, doc))
            .collect(),
    }
}

/// Subs stacked under the same unit as `sub_id`, top to bottom.
fn sub_stack(doc: &OrbatDoc, sub_id: &str) -> Vec<NodeId> {
    let Some(unit) = doc.parent_of(sub_id) else {
        return Vec::new();
    };
    let children = tree::children_of(&doc.nodes, &doc.parent_by_id);
    tree::siblings_of_level(unit, NodeLevel::Sub, &children, doc)
}

/// Selects the first lead when nothing (or a deleted node) is selected.
/// Returns the current selection, if any.
fn ensure_selection(app: &mut AppState) -> Option<NodeId> {
    let current = app
        .selected_id
        .as_deref()
        .filter(|id| app.doc.contains(id))
        .map(str::to_string);
    if current.is_none() {
        app.selected_id = tree::lead_roots(&app.doc).into_iter().next();
    }
    current
}

fn step_sideways(app: &mut AppState, delta: isize) {
    let Some(current) = ensure_selection(app) else {
        return;
    };
    let Some(level) = app.doc.level_of(&current) else {
        return;
    };
    let row = visual_order(&app.doc, level);
    let Some(pos) = row.iter().position(|id| *id == current) else {
        return;
    };
    let next = pos as isize + delta;
    if next >= 0 && (next as usize) < row.len() {
        app.selected_id = Some(row[next as usize].clone());
    }
}

pub fn go_left(app: &mut AppState) {
    step_sideways(app, -1);
}

pub fn go_right(app: &mut AppState) {
    step_sideways(app, 1);
}

pub fn go_up(app: &mut AppState) {
    let Some(current) = ensure_selection(app) else {
        return;
    };

    if app.doc.level_of(&current) == Some(NodeLevel::Sub) {
        let stack = sub_stack(&app.doc, &current);
        if let Some(pos) = stack.iter().position(|id| *id == current) {
            if pos > 0 {
                app.selected_id = Some(stack[pos - 1].clone());
                return;
            }
        }
    }

    if let Some(parent) = app.doc.parent_of(&current) {
        app.selected_id = Some(parent.to_string());
    }
}

pub fn go_down(app: &mut AppState) {
    let Some(current) = ensure_selection(app) else {
        return;
    };
    let Some(level) = app.doc.level_of(&current) else {
        return;
    };

    if level == NodeLevel::Sub {
        let stack = sub_stack(&app.doc, &current);
        if let Some(pos) = stack.iter().position(|id| *id == current) {
            if let Some(next) = stack.get(pos + 1) {
                app.selected_id = Some(next.clone());
            }
        }
        return;
    }

    let Some(child_level) = level.child_level() else {
        return;
    };
    let children = tree::children_of(&app.doc.nodes, &app.doc.parent_by_id);
    let kids = tree::siblings_of_level(&current, child_level, &children, &app.doc);
    if let Some(first) = kids.into_iter().next() {
        app.selected_id = Some(first);
    }
}

/// Steps through the outline (depth-first order), wrapping at both ends.
fn step_outline(app: &mut AppState, delta: isize) {
    let Some(current) = ensure_selection(app) else {
        return;
    };
    let rows = tree::outline(&app.doc);
    if rows.is_empty() {
        return;
    }
    let Some(pos) = rows.iter().position(|(id, _)| *id == current) else {
        return;
    };
    let next = (pos as isize + delta).rem_euclid(rows.len() as isize) as usize;
    app.selected_id = Some(rows[next].0.clone());
}

pub fn go_next_in_outline(app: &mut AppState) {
    step_outline(app, 1);
}

pub fn go_prev_in_outline(app: &mut AppState) {
    step_outline(app, -1);
}

pub fn go_to_first_lead(app: &mut AppState) {
    if let Some(first) = tree::lead_roots(&app.doc).into_iter().next() {
        app.selected_id = Some(first);
    }
}
