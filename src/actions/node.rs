use super::InitParam;
use crate::app::AppState;
use crate::model::{NodeLevel, NodePatch};
use crate::mutation;
use crate::ordering::DragContext;
use crate::preset::{
    build_initial_orbat, InitParams, LEAD_COUNT_RANGE, SUBS_PER_UNIT_RANGE, UNITS_PER_LEAD_RANGE,
};
use crate::tree;

pub fn add_lead(app: &mut AppState) {
    app.push_history();
    let id = mutation::add_lead(&mut app.doc);
    app.touch();
    app.set_message(format!("Added {id}"));
    app.selected_id = Some(id);
}

/// Adds a child of `level` under the selection's ancestor one level up.
fn add_under_ancestor(app: &mut AppState, level: NodeLevel) {
    let Some(parent_level) = level.parent_level() else {
        return;
    };
    let target = app
        .selected_id
        .as_deref()
        .and_then(|id| tree::ancestor_at_level(id, parent_level, &app.doc));

    let Some(parent_id) = target else {
        app.set_message(format!("Select a {parent_level} (or one of its children) first"));
        return;
    };

    app.push_history();
    if let Some(id) = mutation::add_child(&mut app.doc, &parent_id, level) {
        app.touch();
        app.set_message(format!("Added {id} under {parent_id}"));
        app.selected_id = Some(id);
    }
}

pub fn add_unit(app: &mut AppState) {
    add_under_ancestor(app, NodeLevel::Unit);
}

pub fn add_sub(app: &mut AppState) {
    add_under_ancestor(app, NodeLevel::Sub);
}

pub fn delete_selected(app: &mut AppState) {
    let Some(node) = app.selected_node() else {
        app.set_message("Nothing selected");
        return;
    };
    let (id, level) = (node.id.clone(), node.level);

    if level == NodeLevel::Lead && tree::lead_roots(&app.doc).len() <= 1 {
        app.set_message("Cannot delete the last lead");
        return;
    }

    app.push_history();
    let removed = mutation::delete_cascade(&mut app.doc, &id);
    app.touch();
    if app
        .selected_id
        .as_deref()
        .is_some_and(|sel| !app.doc.contains(sel))
    {
        app.selected_id = None;
    }
    if app
        .drag
        .as_ref()
        .is_some_and(|d| !app.doc.contains(&d.dragged_id))
    {
        app.drag = None;
    }
    app.set_message(format!("Deleted {id} ({level}) - {removed} node(s)"));
}

/// Keyboard reorder: moves the selection one slot among its same-level siblings.
pub fn move_selected(app: &mut AppState, delta: i32) {
    let Some(id) = app.selected_id.clone() else {
        return;
    };
    let Some(drag) = DragContext::begin(&app.doc, &id) else {
        return;
    };

    let children = tree::children_of(&app.doc.nodes, &app.doc.parent_by_id);
    let siblings = tree::siblings_of_level(&drag.parent_id, drag.level, &children, &app.doc);
    let Some(from) = siblings.iter().position(|s| *s == id) else {
        return;
    };

    // Insert-before index: one step right skips over the neighbour.
    let target = if delta < 0 {
        match from.checked_sub(1) {
            Some(t) => t,
            None => return,
        }
    } else {
        from + 2
    };

    if let Some((parent, order)) = drag.drop_at(&app.doc, target) {
        app.push_history();
        mutation::set_children_order(&mut app.doc, &parent, order);
        app.touch();
    }
}

/// Two-phase drag: the first press grabs the selection, the second drops it
/// onto the node selected at that time.
pub fn grab_or_drop(app: &mut AppState) {
    let Some(selected) = app.selected_id.clone() else {
        return;
    };

    let Some(drag) = app.drag.take() else {
        match DragContext::begin(&app.doc, &selected) {
            Some(drag) => {
                app.set_message(format!(
                    "Grabbed {} - select a {} sibling and press g to drop",
                    drag.dragged_id, drag.level
                ));
                app.drag = Some(drag);
            }
            None => app.set_message("Nothing to grab"),
        }
        return;
    };

    if drag.dragged_id == selected {
        app.set_message("Drop cancelled");
        return;
    }

    let children = tree::children_of(&app.doc.nodes, &app.doc.parent_by_id);
    let siblings = tree::siblings_of_level(&drag.parent_id, drag.level, &children, &app.doc);
    let from = siblings.iter().position(|s| *s == drag.dragged_id);
    let over = siblings.iter().position(|s| *s == selected);
    let after = matches!((from, over), (Some(f), Some(o)) if f < o);
    let dragged = drag.dragged_id.clone();

    match drag.drop_on(&app.doc, &selected, after) {
        Some((parent, order)) => {
            app.push_history();
            mutation::set_children_order(&mut app.doc, &parent, order);
            app.touch();
            app.selected_id = Some(dragged.clone());
            app.set_message(format!("Moved {dragged}"));
        }
        None => app.set_message("Can only drop onto a sibling of the same level"),
    }
}

pub fn cancel_drag(app: &mut AppState) {
    if app.drag.take().is_some() {
        app.set_message("Drag cancelled");
    }
}

pub fn cycle_kind(app: &mut AppState, forward: bool) {
    let Some(node) = app.selected_node() else {
        return;
    };
    let (id, kind) = (node.id.clone(), node.kind);
    let next = if forward { kind.next() } else { kind.prev() };

    app.push_history();
    mutation::update_node(&mut app.doc, &id, &NodePatch::kind(next));
    app.touch();
    app.set_message(format!("{id}: {}", next.label()));
}

pub fn adjust_init_param(app: &mut AppState, param: InitParam, delta: i32) {
    let apply = |value: u32, (min, max): (u32, u32)| -> u32 {
        (value as i64 + delta as i64).clamp(min as i64, max as i64) as u32
    };

    let mut params = app.init_params;
    match param {
        InitParam::Leads => params.lead_count = apply(params.lead_count, LEAD_COUNT_RANGE),
        InitParam::Units => {
            params.units_per_lead = apply(params.units_per_lead, UNITS_PER_LEAD_RANGE)
        }
        InitParam::Subs => params.subs_per_unit = apply(params.subs_per_unit, SUBS_PER_UNIT_RANGE),
    }
    app.init_params = params;
    app.set_message(format!(
        "Preset: {} lead(s), {} unit(s)/lead, {} sub(s)/unit - press R to apply",
        params.lead_count, params.units_per_lead, params.subs_per_unit
    ));
}

/// Replaces the document with a freshly generated one.
pub fn apply_preset(app: &mut AppState) {
    let params = InitParams {
        unit_rail_direction: app.unit_rail_direction,
        ..app.init_params
    }
    .clamped();
    let init = build_initial_orbat(params);

    app.push_history();
    app.doc = init.doc;
    app.selected_id = init.selected_id;
    app.drag = None;
    app.init_params = params;
    app.touch();
    app.set_message(format!("Generated {} node(s)", app.doc.len()));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::model::{UnitKind, ROOT_ID};

    fn create_test_app() -> AppState {
        AppState::new(AppConfig::default())
    }

    #[test]
    fn test_add_unit_targets_lead_ancestor() {
        let mut app = create_test_app();
        app.select("U2");
        add_unit(&mut app);

        assert_eq!(app.selected_id.as_deref(), Some("U4"));
        assert_eq!(app.doc.parent_of("U4"), Some("L1"));
        assert_eq!(app.doc.children_order["L1"].last().map(String::as_str), Some("U4"));
    }

    #[test]
    fn test_add_sub_needs_unit_ancestor() {
        let mut app = create_test_app();
        app.select("L1");
        let before = app.doc.clone();
        add_sub(&mut app);
        assert_eq!(app.doc, before);
        assert!(!app.can_undo());
        assert!(app.message.as_deref().unwrap().contains("UNIT"));

        app.select("U1");
        add_sub(&mut app);
        add_sub(&mut app);
        assert_eq!(app.doc.parent_of("S2"), Some("U1"));
    }

    #[test]
    fn test_delete_reports_count_and_clears_selection() {
        let mut app = create_test_app();
        app.select("U1");
        add_sub(&mut app);
        add_sub(&mut app);
        app.select("U1");

        delete_selected(&mut app);
        assert_eq!(app.message.as_deref(), Some("Deleted U1 (UNIT) - 3 node(s)"));
        assert_eq!(app.selected_id, None);
        assert!(!app.doc.contains("S1"));
    }

    #[test]
    fn test_last_lead_is_protected() {
        let mut app = create_test_app();
        app.select("L1");
        delete_selected(&mut app);
        assert!(app.doc.contains("L1"));
        assert_eq!(app.message.as_deref(), Some("Cannot delete the last lead"));

        add_lead(&mut app);
        app.select("L1");
        delete_selected(&mut app);
        assert!(!app.doc.contains("L1"));
        assert_eq!(app.doc.len(), 1);
    }

    #[test]
    fn test_move_selected() {
        let mut app = create_test_app();
        app.select("U1");
        move_selected(&mut app, 1);
        assert_eq!(app.doc.children_order["L1"], vec!["U2", "U1", "U3"]);
        move_selected(&mut app, 1);
        assert_eq!(app.doc.children_order["L1"], vec!["U2", "U3", "U1"]);

        let rev = app.revision();
        move_selected(&mut app, 1);
        assert_eq!(app.revision(), rev, "moving past the end is a no-op");

        move_selected(&mut app, -1);
        assert_eq!(app.doc.children_order["L1"], vec!["U2", "U1", "U3"]);
    }

    #[test]
    fn test_grab_and_drop() {
        let mut app = create_test_app();
        app.select("U3");
        grab_or_drop(&mut app);
        assert!(app.drag.is_some());

        app.select("U1");
        grab_or_drop(&mut app);
        assert!(app.drag.is_none());
        assert_eq!(app.doc.children_order["L1"], vec!["U3", "U1", "U2"]);
        assert_eq!(app.selected_id.as_deref(), Some("U3"));

        // Forward drop lands on the target's slot.
        app.select("U1");
        grab_or_drop(&mut app);
        app.select("U2");
        grab_or_drop(&mut app);
        assert_eq!(app.doc.children_order["L1"], vec!["U3", "U2", "U1"]);
    }

    #[test]
    fn test_drop_on_other_level_is_rejected() {
        let mut app = create_test_app();
        app.select("U1");
        grab_or_drop(&mut app);
        app.select("L1");
        let before = app.doc.clone();
        grab_or_drop(&mut app);
        assert_eq!(app.doc, before);
        assert!(app.drag.is_none());
    }

    #[test]
    fn test_reorder_leads_updates_root_order() {
        let mut app = create_test_app();
        add_lead(&mut app);
        app.select("L2");
        move_selected(&mut app, -1);
        assert_eq!(app.doc.children_order[ROOT_ID], vec!["L2", "L1"]);
    }

    #[test]
    fn test_cycle_kind() {
        let mut app = create_test_app();
        app.select("U1");
        cycle_kind(&mut app, true);
        let kind = app.doc.get("U1").unwrap().kind;
        assert_ne!(kind, UnitKind::UnitBlufor);
        cycle_kind(&mut app, false);
        assert_eq!(app.doc.get("U1").unwrap().kind, UnitKind::UnitBlufor);
    }

    #[test]
    fn test_adjust_and_apply_preset() {
        let mut app = create_test_app();
        adjust_init_param(&mut app, InitParam::Leads, 1);
        adjust_init_param(&mut app, InitParam::Subs, 2);
        adjust_init_param(&mut app, InitParam::Units, -10);
        assert_eq!(app.init_params.lead_count, 2);
        assert_eq!(app.init_params.units_per_lead, 0);

        apply_preset(&mut app);
        assert_eq!(app.doc.len(), 2);
        assert_eq!(app.selected_id.as_deref(), Some("L1"));
        assert!(app.can_undo());
    }
}
