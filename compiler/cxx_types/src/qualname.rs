//! Helpers for `::`-separated qualified names.
//!
//! Separators nested inside `<...>` or `(...)` belong to a template argument
//! or a function signature and never split a name.

/// Split a qualified name into its top-level components.
///
/// `"std::map<int,std::string>::iterator"` yields
/// `["std", "map<int,std::string>", "iterator"]`.
pub fn split_scoped(name: &str) -> Vec<&str> {
    let bytes = name.as_bytes();
    let mut parts = Vec::new();
    // `<` and `>` inside parentheses are operators, not brackets
    let mut angle: i32 = 0;
    let mut paren: i32 = 0;
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'(' => paren += 1,
            b')' => paren -= 1,
            b'<' if paren == 0 => angle += 1,
            b'>' if paren == 0 => angle -= 1,
            b':' if angle == 0 && paren == 0 && bytes.get(i + 1) == Some(&b':') => {
                parts.push(&name[start..i]);
                i += 2;
                start = i;
                continue;
            }
            _ => {}
        }
        i += 1;
    }
    parts.push(&name[start..]);
    parts
}

/// Join a scope and a local name. The global scope is the empty string.
pub fn join(scope: &str, name: &str) -> String {
    if scope.is_empty() {
        name.to_string()
    } else {
        format!("{scope}::{name}")
    }
}

/// The name of `qualified` relative to `scope`.
///
/// Derived types (pointers, arrays, function types) are declared in the
/// global scope and keep their whole spelling.
pub fn strip_scope<'a>(qualified: &'a str, scope: &str) -> &'a str {
    if scope.is_empty() {
        return qualified;
    }
    qualified
        .strip_prefix(scope)
        .and_then(|rest| rest.strip_prefix("::"))
        .unwrap_or(qualified)
}

/// Everything before the last top-level `::`, or `""` for a global name.
pub fn enclosing(name: &str) -> &str {
    let parts = split_scoped(name);
    match parts.last() {
        Some(last) if parts.len() > 1 => {
            let cut = name.len() - last.len() - 2;
            &name[..cut]
        }
        _ => "",
    }
}
