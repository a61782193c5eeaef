//! Rendering of variable sets into terraform's tfvars format.

use crate::types::{VarValue, Variables};

/// Render a variable set as tfvars text, one `name=value` per line.
///
/// Each entry is preceded by a newline. Names and values are not validated;
/// malformed input only surfaces when terraform parses the file.
pub fn format_vars(vars: &Variables) -> String {
    let mut out = String::new();
    for (name, value) in vars {
        out.push('\n');
        out.push_str(name);
        out.push('=');
        out.push_str(&render_value(value));
    }
    out
}

/// Render a single value in tfvars syntax.
///
/// Strings are double-quoted with embedded newlines escaped as `\n` so the
/// assignment stays on one line. List elements are quoted and joined with no
/// further escaping.
pub fn render_value(value: &VarValue) -> String {
    match value {
        VarValue::String(s) => format!("\"{}\"", s.replace('\n', "\\n")),
        VarValue::List(items) => format!("[\"{}\"]", items.join("\",\"")),
        VarValue::Raw(text) => text.clone(),
    }
}
