//! Outbound script-call builders for the host → content direction.
//!
//! The editor exposes a `vellum.*` script API inside the embedded document;
//! the host drives it by evaluating single statements built here. Every
//! string literal interpolated into a statement goes through [`escape_js`] —
//! interpolation is a mini serialization protocol, and an unescaped quote is
//! script injection, not a cosmetic bug.

use std::fmt::Write;

/// Escape a string for inclusion in a single- or double-quoted JS literal.
///
/// Covers backslash, both quote characters, newline/CR/tab, the remaining C0
/// controls as `\uXXXX`, and U+2028/U+2029 (legal in JSON strings, illegal in
/// JS string literals).
pub fn escape_js(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c if (c as u32) < 0x20 => {
                // write! into a String cannot fail
                let _ = write!(out, "\\u{:04x}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

/// Paragraph alignment targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

impl Alignment {
    fn as_str(self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
        }
    }
}

// === Document content ===

pub fn get_html() -> String {
    "vellum.getHtml();".into()
}

pub fn set_html(html: &str) -> String {
    format!("vellum.setHtml('{}');", escape_js(html))
}

pub fn get_text() -> String {
    "vellum.getText();".into()
}

pub fn get_placeholder() -> String {
    "vellum.getPlaceholder();".into()
}

pub fn set_placeholder(text: &str) -> String {
    format!("vellum.setPlaceholder('{}');", escape_js(text))
}

pub fn get_line_height() -> String {
    "vellum.getLineHeight();".into()
}

pub fn set_line_height(px: i32) -> String {
    format!("vellum.setLineHeight('{px}px');")
}

pub fn get_content_editable() -> String {
    "vellum.isContentEditable();".into()
}

pub fn set_content_editable(editable: bool) -> String {
    format!("vellum.setContentEditable({editable});")
}

// === Styling ===
//
// Colors arrive pre-encoded as hex strings; the host-side color helpers that
// produce them are outside this crate.

pub fn set_background_color(hex: &str) -> String {
    format!("vellum.setBackgroundColor('{}');", escape_js(hex))
}

pub fn set_text_color(hex: &str) -> String {
    format!("vellum.setTextColor('{}');", escape_js(hex))
}

pub fn set_selection_color(hex: &str) -> String {
    format!("vellum.setSelectionColor('{}');", escape_js(hex))
}

pub fn get_background_color() -> String {
    "vellum.getBackgroundColor();".into()
}

pub fn get_text_color() -> String {
    "vellum.getTextColor();".into()
}

pub fn get_selection_color() -> String {
    "vellum.getSelectionColor();".into()
}

pub fn get_font_size() -> String {
    "vellum.getFontSize();".into()
}

pub fn set_font_size(px: i32) -> String {
    format!("vellum.setFontSize('{px}px');")
}

// === Formatting commands ===

pub fn set_bold() -> String {
    "vellum.setBold();".into()
}

pub fn set_italic() -> String {
    "vellum.setItalic();".into()
}

pub fn set_underline() -> String {
    "vellum.setUnderline();".into()
}

pub fn set_strikethrough() -> String {
    "vellum.setStrikethrough();".into()
}

pub fn set_subscript() -> String {
    "vellum.setSubscript();".into()
}

pub fn set_superscript() -> String {
    "vellum.setSuperscript();".into()
}

pub fn set_heading(level: u8) -> String {
    format!("vellum.setHeading('{level}');")
}

pub fn indent() -> String {
    "vellum.setIndent();".into()
}

pub fn outdent() -> String {
    "vellum.setOutdent();".into()
}

pub fn ordered_list() -> String {
    "vellum.setOrderedList();".into()
}

pub fn unordered_list() -> String {
    "vellum.setUnorderedList();".into()
}

pub fn blockquote() -> String {
    "vellum.setBlockquote();".into()
}

pub fn align(alignment: Alignment) -> String {
    format!("vellum.setJustify('{}');", alignment.as_str())
}

pub fn insert_image(src: &str, alt: &str) -> String {
    format!(
        "vellum.insertImage('{}', '{}');",
        escape_js(src),
        escape_js(alt)
    )
}

pub fn insert_link(href: &str, title: &str) -> String {
    format!(
        "vellum.insertLink('{}', '{}');",
        escape_js(href),
        escape_js(title)
    )
}

pub fn undo() -> String {
    "vellum.undo();".into()
}

pub fn redo() -> String {
    "vellum.redo();".into()
}

// === Focus ===

pub fn focus() -> String {
    "vellum.focus();".into()
}

pub fn focus_at(x: f64, y: f64) -> String {
    format!("vellum.focusAtPoint({x}, {y});")
}

pub fn blur() -> String {
    "vellum.blur();".into()
}

// === Queries ===

pub fn range_selection_exists() -> String {
    "vellum.rangeSelectionExists();".into()
}

pub fn range_or_caret_selection_exists() -> String {
    "vellum.rangeOrCaretSelectionExists();".into()
}

pub fn selected_href() -> String {
    "vellum.getSelectedHref();".into()
}

/// Fetch the queued command strings as a JSON array and clear the queue.
pub fn poll_commands() -> String {
    "vellum.pollCommands();".into()
}

/// Caret Y offset relative to the visible region, in pixels.
pub fn caret_y() -> String {
    "vellum.getRelativeCaretY();".into()
}

/// Height of the visible region, in pixels.
pub fn client_height() -> String {
    "vellum.getClientHeight();".into()
}
