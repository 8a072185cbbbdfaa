mod common;

use orbat_rs::actions::{execute_action, Action};
use orbat_rs::model::{LabelField, ROOT_ID};
use orbat_rs::svg;
use orbat_rs::AppMode;

fn run(app: &mut orbat_rs::AppState, actions: &[Action]) {
    for action in actions {
        execute_action(action.clone(), app).unwrap();
    }
}

#[test]
fn test_build_board_from_keyboard_actions() {
    let mut app = common::create_test_app();
    run(
        &mut app,
        &[
            Action::GoDown,
            Action::AddSub,
            Action::AddSub,
            Action::AddLead,
            Action::AddUnit,
        ],
    );

    assert_eq!(app.doc.len(), 8);
    assert_eq!(app.doc.parent_of("S2"), Some("U1"));
    assert_eq!(app.doc.parent_of("U4"), Some("L2"));
    assert_eq!(app.selected_id.as_deref(), Some("U4"));
    assert!(app.is_dirty);
}

#[test]
fn test_label_editing_flow() {
    let mut app = common::create_test_app();
    run(
        &mut app,
        &[
            Action::GoDown,
            Action::EditLabel(LabelField::Main),
            Action::TypeChar('1'),
            Action::TypeChar('P'),
            Action::TypeChar('L'),
            Action::NextEditField,
            Action::TypeChar('<'),
            Action::TypeChar('A'),
            Action::TypeChar('>'),
            Action::ConfirmEdit,
        ],
    );

    let node = app.doc.get("U1").unwrap();
    assert_eq!(node.label_main.as_deref(), Some("1PL"));
    assert_eq!(node.label_top.as_deref(), Some("<A>"));
    assert_eq!(app.mode, AppMode::Normal);

    let markup = svg::export_svg(&app.doc, &app.config.layout, app.color_preset);
    assert!(markup.contains("&lt;A&gt;"));
    assert!(markup.contains(">1PL</text>"));
}

#[test]
fn test_reorder_leads_and_undo_all() {
    let mut app = common::create_test_app();
    let original = app.doc.clone();

    run(
        &mut app,
        &[
            Action::AddLead,
            Action::MoveSelectedLeft,
            Action::GoRight,
            Action::GrabOrDrop,
            Action::GoLeft,
            Action::GrabOrDrop,
        ],
    );
    // L2 moved in front of L1, then L1 was dragged back in front of L2.
    assert_eq!(app.doc.children_order[ROOT_ID], vec!["L1", "L2"]);

    for _ in 0..3 {
        execute_action(Action::Undo, &mut app).unwrap();
    }
    assert_eq!(app.doc, original);
    execute_action(Action::Undo, &mut app).unwrap();
    assert_eq!(app.message.as_deref(), Some("Nothing to undo"));
}

#[test]
fn test_regenerate_from_adjusted_preset() {
    let mut app = common::create_test_app();
    run(
        &mut app,
        &[
            Action::AdjustInitParam(orbat_rs::actions::InitParam::Leads, 2),
            Action::AdjustInitParam(orbat_rs::actions::InitParam::Units, -1),
            Action::AdjustInitParam(orbat_rs::actions::InitParam::Subs, 1),
            Action::ApplyPreset,
        ],
    );

    // 3 leads x 2 units x 1 sub
    assert_eq!(app.doc.len(), 3 + 6 + 6);
    let layout = app.layout(orbat_rs::LayoutMode::Export);
    assert_eq!(layout.slots.len(), 15);
    assert_eq!(layout.edges.len(), 12);
}

#[test]
fn test_svg_for_default_board() {
    let app = common::create_test_app();
    let markup = svg::export_svg(&app.doc, &app.config.layout, app.color_preset);

    assert!(markup.starts_with(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="780" height="445" viewBox="0 0 780 445">"#
    ));
    assert_eq!(markup.matches("<rect").count(), 4);
    assert_eq!(markup.matches("<path").count(), 3);
}
