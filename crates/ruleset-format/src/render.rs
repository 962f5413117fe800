//! [`RuleDocument`] to text.
//!
//! Output is deterministic: a fixed header, then one `[Name]` table per
//! category in document order, each preceded by a banner comment and holding
//! one pattern per line. Parsing the output reproduces the document exactly.

use ruleset_types::{is_bare_key, Category, RuleDocument};

use crate::descriptions::describe_category;
use crate::PATTERNS_KEY;

/// Header written at the top of every rendered file.
pub const HEADER: &str = "\
# Merged gitignore rules from distributor and user files
# Generated automatically by ruleset
";

const BANNER: &str = "####################################################################";

/// Render a document as a TOML rule file.
pub fn render(document: &RuleDocument) -> String {
    let mut out = String::from(HEADER);
    for category in document.categories() {
        out.push('\n');
        render_category(&mut out, category);
    }
    out
}

fn render_category(out: &mut String, category: &Category) {
    let name = category.name();
    out.push_str(BANNER);
    out.push('\n');
    out.push_str(&format!("# [{name}] {}\n", describe_category(name)));
    out.push_str(&format!("[{}]\n", render_key(name)));
    out.push_str(&format!("{PATTERNS_KEY} = [\n"));
    for pattern in category.patterns() {
        out.push_str("  ");
        out.push_str(&quote(pattern.text()));
        out.push(',');
        if let Some(comment) = pattern.comment() {
            out.push_str(" # ");
            out.push_str(comment);
        }
        out.push('\n');
    }
    out.push_str("]\n");
}

fn render_key(name: &str) -> String {
    if is_bare_key(name) {
        name.to_string()
    } else {
        quote(name)
    }
}

/// Encode `text` as a TOML basic string.
fn quote(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            c if c.is_control() => out.push_str(&format!("\\u{:04X}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
