//! Identifier and literal helpers shared by type and function synthesis.

/// Check if a property name must be quoted to be used as an object key.
///
/// True when the name is empty, doesn't start with a letter, `_` or `$`, or contains
/// anything other than ASCII alphanumerics, `_` and `$`.
pub fn needs_quoting(name: &str) -> bool {
    !name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        || !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// Escape a string for use in a double-quoted JavaScript literal.
pub fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Quote a property key if it is not a valid identifier.
pub fn quote_if_needed(name: &str) -> String {
    if needs_quoting(name) {
        format!("\"{}\"", escape_js_string(name))
    } else {
        name.to_string()
    }
}

/// Property access on `obj`, falling back to bracket notation (`params["foo-bar"]`).
pub fn format_param_access(obj: &str, prop: &str) -> String {
    if needs_quoting(prop) {
        format!("{obj}[\"{}\"]", escape_js_string(prop))
    } else {
        format!("{obj}.{prop}")
    }
}

/// Escape text placed inside a `/** */` block comment.
pub fn escape_doc(text: &str) -> String {
    text.replace("*/", "*\\/")
}

/// Escape a static part of a template literal.
pub fn escape_template(s: &str) -> String {
    s.replace('\\', "\\\\").replace('`', "\\`").replace("${", "\\${")
}
