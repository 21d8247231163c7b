//! Heuristic source analysis for completion and hover.
//!
//! The line under the cursor is usually mid-edit and would not match the
//! statement grammar, so completion looks at raw text before the cursor.
//! Binding classes come from the complete statements elsewhere in the file.

use std::collections::HashMap;

use rbxgui_script::statement::{self, Statement};
use tower_lsp::lsp_types::Position;

// ── Context kind ──────────────────────────────────────────────────────────────

/// What the cursor is positioned inside, used to drive completions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Context {
    /// Inside the string of `Instance.new("`.
    ClassName,
    /// After `binding.`: a property name is expected.
    Property { binding: String },
    /// After `binding.Property =`.
    Value { binding: String, prop: String },
    /// Anywhere else (comments, strings, expressions).
    Unknown,
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Byte column for `pos` on `line`, clamped to a char boundary.
fn column(line: &str, pos: &Position) -> usize {
    let mut col = (pos.character as usize).min(line.len());
    while !line.is_char_boundary(col) {
        col -= 1;
    }
    col
}

// ── member_at ─────────────────────────────────────────────────────────────────

/// The identifier containing or just before the cursor, together with the
/// binding it is a member of, if any: `f.Size` with the cursor on `Size`
/// gives `(Some("f"), "Size")`.
///
/// Returns sub-slices of the line, so the lifetime is tied to `text`.
pub fn member_at<'t>(text: &'t str, pos: &Position) -> Option<(Option<&'t str>, &'t str)> {
    let (start, end, line) = word_bounds(text, pos)?;
    let word = &line[start..end];
    let owner = line[..start].strip_suffix('.').and_then(|before| {
        let from = before.rfind(|c: char| !is_ident_char(c)).map(|i| i + 1).unwrap_or(0);
        let owner = &before[from..];
        (!owner.is_empty()).then_some(owner)
    });
    Some((owner, word))
}

fn word_bounds<'t>(text: &'t str, pos: &Position) -> Option<(usize, usize, &'t str)> {
    let line = text.lines().nth(pos.line as usize)?;
    let col = column(line, pos);

    let start = line[..col]
        .rfind(|c: char| !is_ident_char(c))
        .map(|i| i + line[i..].chars().next().map_or(1, char::len_utf8))
        .unwrap_or(0);

    let end = col
        + line[col..]
            .find(|c: char| !is_ident_char(c))
            .unwrap_or(line.len() - col);

    (start < end).then_some((start, end, line))
}

// ── bindings ──────────────────────────────────────────────────────────────────

/// Class of every `Instance.new` binding in `text`. Later constructions
/// shadow earlier ones, as they do during extraction.
pub fn bindings(text: &str) -> HashMap<String, String> {
    statement::statements(text)
        .filter_map(|(_, stmt)| match stmt {
            Statement::Construct { binding, class, .. } => Some((binding, class)),
            _ => None,
        })
        .collect()
}

/// 0-based line of each binding's latest construction, and of each display
/// name set through `.Name`.
pub fn declaration_lines(text: &str) -> HashMap<String, u32> {
    let mut out = HashMap::new();
    let mut display = Vec::new();
    for (line, stmt) in statement::statements(text) {
        let line = line.saturating_sub(1) as u32;
        match stmt {
            Statement::Construct { binding, .. } => {
                out.insert(binding, line);
            }
            Statement::Assign { binding, property, value } if property == "Name" => {
                if let Some(name) = rbxgui_script::value::string(&value) {
                    display.push((binding, name));
                }
            }
            _ => {}
        }
    }
    for (binding, name) in display {
        if let Some(&line) = out.get(&binding) {
            out.entry(name).or_insert(line);
        }
    }
    out
}

// ── completion_context ────────────────────────────────────────────────────────

/// Classify the cursor position for completion.
pub fn completion_context(text: &str, pos: &Position) -> Context {
    let line = text.lines().nth(pos.line as usize).unwrap_or("");
    let before = strip_comment(&line[..column(line, pos)]);

    if let Some(idx) = before.rfind("Instance.new(") {
        let arg = &before[idx + "Instance.new(".len()..];
        let mut chars = arg.chars();
        if matches!(chars.next(), Some('"' | '\'')) && chars.all(is_ident_char) {
            return Context::ClassName;
        }
    }

    if let Some(eq) = before.find('=') {
        let lhs = before[..eq].trim();
        return match split_member(lhs) {
            Some((binding, prop)) if !prop.is_empty() => Context::Value {
                binding: binding.to_string(),
                prop: prop.to_string(),
            },
            _ => Context::Unknown,
        };
    }

    match split_member(before.trim_start()) {
        Some((binding, _)) => Context::Property { binding: binding.to_string() },
        None => Context::Unknown,
    }
}

// ── helpers ───────────────────────────────────────────────────────────────────

/// `binding.partial` → (`binding`, `partial`). Both halves must be plain
/// identifier text; `partial` may be empty.
fn split_member(s: &str) -> Option<(&str, &str)> {
    let (binding, prop) = s.split_once('.')?;
    let ident = |w: &str| w.chars().all(is_ident_char);
    (!binding.is_empty() && ident(binding) && ident(prop)).then_some((binding, prop))
}

/// Cuts a trailing `--` comment, ignoring dashes inside string literals.
fn strip_comment(s: &str) -> &str {
    let mut quote: Option<char> = None;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q && prev != '\\' => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '-' && prev == '-' => return &s[..i - 1],
            None => {}
        }
        prev = c;
    }
    s
}
