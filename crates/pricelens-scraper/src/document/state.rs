//! Embedded JSON state objects assigned in inline scripts.

use regex::Regex;

/// Finds `window.NAME = {…}` (or a bare `NAME = {…}`) in `script` and parses
/// the assigned object.
///
/// Returns `None` when the assignment is missing, unterminated, or not valid
/// JSON.
#[must_use]
pub fn extract_state_object(script: &str, name: &str) -> Option<serde_json::Value> {
    let assign_re = Regex::new(&format!(r"(?:window\.)?\b{}\s*=\s*", regex::escape(name)))
        .expect("valid state regex");

    let found = assign_re.find_iter(script).find_map(|m| {
        let rest = &script[m.end()..];
        let object = extract_balanced_json(rest)?;
        serde_json::from_str(object).ok()
    });
    found
}

/// Extracts a balanced JSON object or array from the start of `s`.
///
/// Tracks bracket depth while respecting string literals and escape
/// sequences. Returns the shortest prefix that closes the opening bracket
/// with its matching kind, or `None` if unterminated. `[42}` is never
/// accepted.
#[must_use]
pub fn extract_balanced_json(s: &str) -> Option<&str> {
    let close = match s.chars().next()? {
        '{' => '}',
        '[' => ']',
        _ => return None,
    };
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape = false;
    for (i, c) in s.char_indices() {
        if escape {
            escape = false;
            continue;
        }
        if in_string {
            match c {
                '\\' => escape = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '[' | '{' => depth += 1,
            ']' | '}' => {
                depth -= 1;
                if depth == 0 {
                    return (c == close).then(|| &s[..=i]);
                }
            }
            _ => {}
        }
    }
    None
}
