use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

// Help section structure
pub struct HelpSection {
    pub title: &'static str,
    pub items: &'static [(&'static str, &'static str)],
}

// Help section definitions
pub const SECTIONS: &[HelpSection] = &[
    HelpSection {
        title: "Navigation:",
        items: &[
            ("h/←", "Previous node on the same level"),
            ("l/→", "Next node on the same level"),
            ("k/↑", "Up (previous sub, then parent)"),
            ("j/↓", "Down (next sub, or first child)"),
            ("m  ", "First lead"),
            ("⇥/⇤", "Next / previous in the outline"),
        ],
    },
    HelpSection {
        title: "Structure:",
        items: &[
            ("n  ", "Add lead"),
            ("a  ", "Add unit under the selected lead"),
            ("A  ", "Add sub under the selected unit"),
            ("d  ", "Delete node and its subtree"),
            ("H/L", "Move left / right among siblings"),
            ("g/␣", "Grab, then drop onto a sibling"),
            ("t/T", "Next / previous unit kind"),
        ],
    },
    HelpSection {
        title: "Labels:",
        items: &[
            ("e/⏎", "Edit main label"),
            ("E  ", "Edit top label"),
            ("b  ", "Edit bottom label"),
            ("i  ", "Edit display id"),
            ("⇥  ", "Next field while editing"),
        ],
    },
    HelpSection {
        title: "Generate:",
        items: &[
            ("[ ]", "Leads -/+"),
            ("{ }", "Units per lead -/+"),
            ("( )", "Subs per unit -/+"),
            ("R  ", "Regenerate board"),
        ],
    },
    HelpSection {
        title: "View:",
        items: &[
            ("+/-", "Zoom in / out"),
            ("c  ", "Next color preset"),
            ("p  ", "Toggle export preview"),
            ("o  ", "Show / hide the outline"),
        ],
    },
    HelpSection {
        title: "File:",
        items: &[
            ("s  ", "Save JSON"),
            ("x  ", "Export SVG"),
            ("y  ", "Copy JSON to clipboard"),
            ("r  ", "Reload from file"),
            ("u  ", "Undo"),
            ("^r ", "Redo"),
            ("q  ", "Quit"),
        ],
    },
];

// Help renderer
pub struct HelpRenderer;

impl HelpRenderer {
    pub fn render(frame: &mut Frame, area: Rect) {
        let help_text = Self::build_help_text();
        let block = Block::default().borders(Borders::ALL).title(" Help ");
        let paragraph = Paragraph::new(help_text)
            .block(block)
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_help_text() -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![Span::styled(
                "orbat-rs Help",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
        ];

        for section in SECTIONS {
            lines.push(Line::from(vec![Span::styled(
                section.title,
                Style::default().add_modifier(Modifier::BOLD),
            )]));

            for (key, desc) in section.items {
                lines.push(Line::from(format!("  {}  {}", key, desc)));
            }

            lines.push(Line::from(""));
        }

        lines.push(Line::from("Press ESC or q to close help"));
        lines
    }
}
