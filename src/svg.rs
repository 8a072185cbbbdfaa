//! Standalone SVG rendering of a board.
//!
//! Always draws the export-mode layout at 1:1 so the editor zoom never leaks
//! into the file.

use crate::layout::{compute_layout, BoardLayout, LayoutMode, LayoutStyle, Slot};
use crate::links::{drawable_polylines, path_data};
use crate::model::{OrbatDoc, OrbatNode};
use crate::theme::ColorPresetId;
use std::fmt::Write;

pub const LINK_STROKE_WIDTH: f64 = 4.0;
const BOX_STROKE_WIDTH: f64 = 4.0;
const FONT_SIZE: f64 = 14.0;
const LINE_INSET: f64 = 22.0;

pub fn escape_xml(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Text lines of a node box, top to bottom, with their y offset in the slot.
fn node_lines(node: &OrbatNode, slot: &Slot) -> Vec<(f64, String)> {
    let mut lines = Vec::with_capacity(4);
    if let Some(top) = node.label_top.as_deref() {
        lines.push((LINE_INSET, top.to_string()));
    }
    lines.push((slot.h / 2.0, node.kind.label().to_string()));
    if let Some(main) = node.label_main.as_deref() {
        lines.push((slot.h / 2.0 + LINE_INSET, main.to_string()));
    }
    let bottom = node.label_bottom.as_deref().or(node.display_id.as_deref());
    if let Some(bottom) = bottom {
        lines.push((slot.h - LINE_INSET / 2.0, bottom.to_string()));
    }
    lines
}

/// Renders an already computed layout.
pub fn render_svg(doc: &OrbatDoc, layout: &BoardLayout, preset: ColorPresetId) -> String {
    let colors = preset.colors();
    let (w, h) = (layout.board.w, layout.board.h);
    let mut out = String::new();

    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );

    for (id, points) in drawable_polylines(&layout.slots, &layout.edges) {
        let _ = writeln!(
            out,
            r#"  <path id="{}" d="{}" fill="none" stroke="{}" stroke-width="{LINK_STROKE_WIDTH}" stroke-linecap="square" stroke-linejoin="miter"/>"#,
            escape_xml(&id),
            path_data(&points),
            colors.stroke,
        );
    }

    for slot in &layout.slots {
        let Some(node) = doc.get(&slot.id) else {
            continue;
        };
        let _ = writeln!(
            out,
            r#"  <g id="{}">"#,
            escape_xml(&slot.id)
        );
        let _ = writeln!(
            out,
            r#"    <rect x="{}" y="{}" width="{}" height="{}" fill="{}" stroke="{}" stroke-width="{BOX_STROKE_WIDTH}"/>"#,
            slot.x, slot.y, slot.w, slot.h, colors.bg, colors.stroke,
        );
        for (dy, text) in node_lines(node, slot) {
            let _ = writeln!(
                out,
                r#"    <text x="{}" y="{}" text-anchor="middle" font-family="sans-serif" font-size="{FONT_SIZE}" fill="{}">{}</text>"#,
                slot.center_x(),
                slot.y + dy,
                colors.shape,
                escape_xml(&text),
            );
        }
        out.push_str("  </g>\n");
    }

    out.push_str("</svg>\n");
    out
}

/// Lays out `doc` in export mode and renders it.
pub fn export_svg(doc: &OrbatDoc, style: &LayoutStyle, preset: ColorPresetId) -> String {
    let layout = compute_layout(doc, style, LayoutMode::Export);
    render_svg(doc, &layout, preset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{LabelField, NodePatch};
    use crate::mutation::update_node;
    use crate::preset::{build_initial_orbat, InitParams};

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("A&B <C> \"d\" 'e'"), "A&amp;B &lt;C&gt; &quot;d&quot; &apos;e&apos;");
    }

    #[test]
    fn test_export_uses_trimmed_size() {
        let init = build_initial_orbat(InitParams::default());
        let svg = export_svg(&init.doc, &LayoutStyle::default(), ColorPresetId::P1);

        assert!(svg.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="780" height="445" viewBox="0 0 780 445">"#
        ));
        assert_eq!(svg.matches("<rect").count(), 4);
        assert_eq!(svg.matches("<path").count(), 3);
        assert!(svg.contains(r#"d="M 390 165 L 390 225 L 110 225 L 110 280""#));
        assert!(svg.contains("stroke-width=\"4\""));
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn test_labels_are_escaped_and_colored() {
        let mut init = build_initial_orbat(InitParams::new(1, 1, 0));
        update_node(
            &mut init.doc,
            "U1",
            &NodePatch::label(LabelField::Top, "A&B <1>"),
        );
        let svg = export_svg(&init.doc, &LayoutStyle::default(), ColorPresetId::P2);

        assert!(svg.contains(">A&amp;B &lt;1&gt;</text>"));
        assert!(!svg.contains("A&B"));
        assert!(svg.contains("fill=\"#b3d9ff\""));
        assert!(svg.contains("stroke=\"#0033a0\""));
        assert!(svg.contains(">HQ</text>"));
    }
}
