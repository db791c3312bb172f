use std::fmt::Write;

use doclist_core::{AppViewModel, DocumentCardView};

const RULE: &str = "----------------------------------------";

/// Draws the whole page as plain text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Documents");
    let _ = writeln!(out, "{}  |  {}", view.header, view.total_size_label);
    let searching = if view.searching { " (searching...)" } else { "" };
    let _ = writeln!(out, "Search: \"{}\"{}", view.search_text, searching);

    if let Some(error) = &view.load_error {
        let _ = writeln!(out, "! {error}");
    }
    if let Some(error) = &view.search_error {
        let _ = writeln!(out, "! {error}");
    }

    if view.upload.in_flight {
        let _ = writeln!(out, "Upload: in progress...");
    }
    if let Some(error) = &view.upload.error {
        let _ = writeln!(out, "Upload: {error}");
    }
    if let Some(success) = &view.upload.success {
        let _ = writeln!(out, "Upload: {success}");
    }

    let _ = writeln!(out, "{RULE}");
    for card in &view.documents {
        let _ = writeln!(out, "{}", render_card(card));
    }
    out
}

fn render_card(card: &DocumentCardView) -> String {
    let mut line = format!("[{}] {}  {}", card.id, card.name, card.size_label);
    if card.deleting {
        line.push_str("  (deleting...)");
    }
    if let Some(error) = &card.error {
        line.push_str("  ! ");
        line.push_str(error);
    }
    line
}
